// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! In-memory K8s connector for tests.
//!
//! Lets callers exercise the in-cluster certificate path without a running
//! cluster, and inspect which kubeconfig and service were requested.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use crate::client::{K8sClient, K8sConnector};
use crate::error::K8sError;

/// A service proxy request observed by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRequest {
	pub kubeconfig: Option<PathBuf>,
	pub namespace: String,
	pub service: String,
	pub path: String,
}

#[derive(Debug, Clone)]
enum MockBehavior {
	Respond(Bytes),
	FailConnect(String),
	FailProxy(String),
}

/// A mock connector whose clients answer every proxy request with a
/// configured body or error.
#[derive(Debug, Clone)]
pub struct MockK8sConnector {
	behavior: MockBehavior,
	requests: Arc<Mutex<Vec<ProxyRequest>>>,
}

impl MockK8sConnector {
	/// Respond to every proxy request with `body`.
	pub fn responding(body: impl Into<Bytes>) -> Self {
		Self::with_behavior(MockBehavior::Respond(body.into()))
	}

	/// Fail to build a client.
	pub fn failing_connect(message: impl Into<String>) -> Self {
		Self::with_behavior(MockBehavior::FailConnect(message.into()))
	}

	/// Build clients whose proxy requests fail.
	pub fn failing_proxy(message: impl Into<String>) -> Self {
		Self::with_behavior(MockBehavior::FailProxy(message.into()))
	}

	fn with_behavior(behavior: MockBehavior) -> Self {
		Self {
			behavior,
			requests: Arc::new(Mutex::new(Vec::new())),
		}
	}

	/// Proxy requests seen so far, in order.
	pub fn requests(&self) -> Vec<ProxyRequest> {
		self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
	}
}

#[async_trait]
impl K8sConnector for MockK8sConnector {
	async fn connect(&self, kubeconfig: Option<&Path>) -> Result<Arc<dyn K8sClient>, K8sError> {
		if let MockBehavior::FailConnect(message) = &self.behavior {
			return Err(K8sError::ClientConfig {
				message: message.clone(),
			});
		}
		Ok(Arc::new(MockK8sClient {
			kubeconfig: kubeconfig.map(Path::to_path_buf),
			behavior: self.behavior.clone(),
			requests: Arc::clone(&self.requests),
		}))
	}
}

struct MockK8sClient {
	kubeconfig: Option<PathBuf>,
	behavior: MockBehavior,
	requests: Arc<Mutex<Vec<ProxyRequest>>>,
}

#[async_trait]
impl K8sClient for MockK8sClient {
	async fn proxy_get(&self, namespace: &str, service: &str, path: &str) -> Result<Bytes, K8sError> {
		self.requests.lock().unwrap_or_else(|e| e.into_inner()).push(ProxyRequest {
			kubeconfig: self.kubeconfig.clone(),
			namespace: namespace.to_string(),
			service: service.to_string(),
			path: path.to_string(),
		});

		match &self.behavior {
			MockBehavior::Respond(body) => Ok(body.clone()),
			MockBehavior::FailProxy(message) | MockBehavior::FailConnect(message) => {
				Err(K8sError::ProxyRequest {
					namespace: namespace.to_string(),
					service: service.to_string(),
					path: path.to_string(),
					message: message.clone(),
				})
			}
		}
	}
}
