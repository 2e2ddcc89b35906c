// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use thiserror::Error;

/// Result type alias for K8s operations.
pub type K8sResult<T> = Result<T, K8sError>;

/// Errors that can occur during K8s operations.
#[derive(Error, Debug)]
pub enum K8sError {
	#[error("K8s client configuration error: {message}")]
	ClientConfig { message: String },

	#[error("K8s API error: {message}")]
	ApiError { message: String },

	#[error("Service proxy request to {namespace}/{service}{path} failed: {message}")]
	ProxyRequest {
		namespace: String,
		service: String,
		path: String,
		message: String,
	},
}

impl From<kube::Error> for K8sError {
	fn from(err: kube::Error) -> Self {
		K8sError::ApiError {
			message: err.to_string(),
		}
	}
}

impl From<kube::config::KubeconfigError> for K8sError {
	fn from(err: kube::config::KubeconfigError) -> Self {
		K8sError::ClientConfig {
			message: err.to_string(),
		}
	}
}

impl From<kube::config::InferConfigError> for K8sError {
	fn from(err: kube::config::InferConfigError) -> Self {
		K8sError::ClientConfig {
			message: err.to_string(),
		}
	}
}
