// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::K8sError;

/// Trait for K8s client operations.
///
/// Only the operations the sealer needs are exposed, which keeps the
/// production client and the test mock small.
#[async_trait]
pub trait K8sClient: Send + Sync {
	/// Issue a GET through the API server's service proxy and return the body.
	///
	/// Equivalent to
	/// `GET /api/v1/namespaces/{namespace}/services/http:{service}:/proxy{path}`.
	async fn proxy_get(&self, namespace: &str, service: &str, path: &str) -> Result<Bytes, K8sError>;
}

/// Builds [`K8sClient`]s for a cluster.
///
/// Each cluster carries its own kubeconfig, so clients are created per call
/// rather than once at startup.
#[async_trait]
pub trait K8sConnector: Send + Sync {
	/// Connect using the given kubeconfig file, or infer the configuration
	/// (in-cluster service account, `KUBECONFIG`, `~/.kube/config`) when `None`.
	async fn connect(&self, kubeconfig: Option<&Path>) -> Result<Arc<dyn K8sClient>, K8sError>;
}
