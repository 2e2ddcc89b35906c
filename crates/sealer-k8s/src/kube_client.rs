// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::ACCEPT;
use kube::{
	config::{KubeConfigOptions, Kubeconfig},
	Client, Config,
};
use tracing::{debug, instrument};

use crate::client::{K8sClient, K8sConnector};
use crate::error::K8sError;

/// Content types accepted from the certificate endpoint.
pub const PEM_ACCEPT: &str = "application/x-pem-file, */*";

/// Production K8s client implementation using the kube crate.
pub struct KubeClient {
	client: Client,
}

impl KubeClient {
	/// Create a client from an explicit kubeconfig file.
	pub async fn from_kubeconfig(path: &Path) -> Result<Self, K8sError> {
		let kubeconfig = Kubeconfig::read_from(path)?;
		let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default()).await?;
		let client = Client::try_from(config)?;
		debug!(kubeconfig = %path.display(), "K8s client initialized");
		Ok(Self { client })
	}

	/// Create a client that auto-discovers cluster configuration.
	///
	/// This will attempt to load config from:
	/// 1. In-cluster service account (when running in K8s)
	/// 2. KUBECONFIG environment variable
	/// 3. ~/.kube/config
	pub async fn infer() -> Result<Self, K8sError> {
		let config = Config::infer().await?;
		let client = Client::try_from(config)?;
		debug!("K8s client initialized from inferred config");
		Ok(Self { client })
	}
}

/// Build the API server path that proxies `path` to an HTTP service port.
pub fn service_proxy_path(namespace: &str, service: &str, path: &str) -> String {
	let path = path.trim_start_matches('/');
	format!("/api/v1/namespaces/{namespace}/services/http:{service}:/proxy/{path}")
}

#[async_trait]
impl K8sClient for KubeClient {
	#[instrument(skip(self))]
	async fn proxy_get(&self, namespace: &str, service: &str, path: &str) -> Result<Bytes, K8sError> {
		let proxy_err = |message: String| K8sError::ProxyRequest {
			namespace: namespace.to_string(),
			service: service.to_string(),
			path: path.to_string(),
			message,
		};

		let request = http::Request::get(service_proxy_path(namespace, service, path))
			.header(ACCEPT, PEM_ACCEPT)
			.body(Vec::new())
			.map_err(|e| proxy_err(e.to_string()))?;

		let body = self
			.client
			.request_text(request)
			.await
			.map_err(|e| proxy_err(e.to_string()))?;

		debug!(bytes = body.len(), "service proxy request completed");
		Ok(Bytes::from(body))
	}
}

/// Connector that creates a [`KubeClient`] per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct KubeConnector;

#[async_trait]
impl K8sConnector for KubeConnector {
	async fn connect(&self, kubeconfig: Option<&Path>) -> Result<Arc<dyn K8sClient>, K8sError> {
		let client = match kubeconfig {
			Some(path) => KubeClient::from_kubeconfig(path).await?,
			None => KubeClient::infer().await?,
		};
		Ok(Arc::new(client))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn proxy_path_targets_http_port_of_service() {
		assert_eq!(
			service_proxy_path("kube-system", "sealed-secrets-controller", "/v1/cert.pem"),
			"/api/v1/namespaces/kube-system/services/http:sealed-secrets-controller:/proxy/v1/cert.pem"
		);
	}

	#[test]
	fn proxy_path_accepts_relative_path() {
		assert_eq!(
			service_proxy_path("ns", "svc", "v1/cert.pem"),
			"/api/v1/namespaces/ns/services/http:svc:/proxy/v1/cert.pem"
		);
	}

	#[tokio::test]
	async fn missing_kubeconfig_file_is_a_config_error() {
		let result = KubeConnector
			.connect(Some(Path::new("/nonexistent/kubeconfig")))
			.await;
		assert!(matches!(result, Err(K8sError::ClientConfig { .. })));
	}
}
