// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The sealing pipeline behind each HTTP operation.

use std::collections::BTreeMap;
use std::sync::Arc;

use k8s_openapi::api::core::v1::Secret;
use sealer_k8s::K8sConnector;
use tracing::instrument;

use crate::config::{ClusterSource, SealConfig};
use crate::domain::TlsDomain;
use crate::error::{SealError, SealResult};
use crate::key::parse_public_key;
use crate::output::encode;
use crate::seal::Sealer;
use crate::secret::{
	dockerconfigjson_secret, opaque_secret, read_tls_pair, strip_server_fields, tls_secret,
};

/// Path of the certificate endpoint on the sealed-secrets controller.
pub const CONTROLLER_CERT_PATH: &str = "/v1/cert.pem";

/// Builds, seals and encodes Secrets for a configured set of clusters.
///
/// Holds no mutable state; one instance is shared across all requests.
#[derive(Clone)]
pub struct SealService {
	config: Arc<SealConfig>,
	connector: Arc<dyn K8sConnector>,
	sealer: Arc<dyn Sealer>,
}

impl SealService {
	pub fn new(
		config: Arc<SealConfig>,
		connector: Arc<dyn K8sConnector>,
		sealer: Arc<dyn Sealer>,
	) -> Self {
		Self {
			config,
			connector,
			sealer,
		}
	}

	pub fn config(&self) -> &SealConfig {
		&self.config
	}

	#[instrument(skip(self, data), fields(keys = data.len()))]
	pub async fn seal_opaque(
		&self,
		cluster: &str,
		name: &str,
		namespace: &str,
		data: BTreeMap<String, Vec<u8>>,
	) -> SealResult<Vec<u8>> {
		let source = self.config.cluster_source(cluster)?;
		let secret = opaque_secret(name, namespace, data)?;
		self.seal_and_encode(source, secret).await
	}

	#[instrument(skip(self, username, password))]
	pub async fn seal_dockerconfigjson(
		&self,
		cluster: &str,
		name: &str,
		namespace: &str,
		username: &str,
		password: &str,
	) -> SealResult<Vec<u8>> {
		let source = self.config.cluster_source(cluster)?;
		let secret = dockerconfigjson_secret(
			name,
			namespace,
			&self.config.registry_host,
			username,
			password,
		)?;
		self.seal_and_encode(source, secret).await
	}

	#[instrument(skip(self))]
	pub async fn seal_tls(&self, cluster: &str, namespace: &str, domain: &str) -> SealResult<Vec<u8>> {
		let source = self.config.cluster_source(cluster)?;
		let tls_domain = TlsDomain::for_domain(domain)?;
		let (cert, key) = read_tls_pair(self.config.tls_pair(tls_domain)).await?;
		let secret = tls_secret(namespace, domain, cert, key)?;
		self.seal_and_encode(source, secret).await
	}

	async fn seal_and_encode(&self, source: &ClusterSource, mut secret: Secret) -> SealResult<Vec<u8>> {
		strip_server_fields(&mut secret.metadata);
		let pem = self.certificate(source).await?;
		let public_key = parse_public_key(&pem)?;
		let sealed = self.sealer.seal(&secret, &public_key)?;
		encode(&sealed, self.config.output_format)
	}

	/// The cluster's sealing certificate, from disk or from the controller.
	async fn certificate(&self, source: &ClusterSource) -> SealResult<Vec<u8>> {
		if let Some(path) = source.cert_path() {
			tracing::debug!(path = %path.display(), "reading sealing certificate from file");
			return tokio::fs::read(path)
				.await
				.map_err(|source| SealError::CertFileUnavailable {
					path: path.to_path_buf(),
					source,
				});
		}

		let controller = &self.config.controller;
		tracing::debug!(
			namespace = %controller.namespace,
			service = %controller.name,
			kubeconfig = ?source.kubeconfig_path(),
			"fetching sealing certificate from controller"
		);
		let client = self.connector.connect(source.kubeconfig_path()).await?;
		let pem = client
			.proxy_get(&controller.namespace, &controller.name, CONTROLLER_CERT_PATH)
			.await?;
		Ok(pem.to_vec())
	}
}
