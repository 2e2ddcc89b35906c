// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for sealing operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for sealing operations.
pub type SealResult<T> = Result<T, SealError>;

/// Which half of a TLS pair could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsPart {
	Cert,
	Key,
}

impl std::fmt::Display for TlsPart {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			TlsPart::Cert => f.write_str("cert"),
			TlsPart::Key => f.write_str("key"),
		}
	}
}

/// Errors that can occur while building, sealing or encoding a secret.
#[derive(Error, Debug)]
pub enum SealError {
	#[error("Invalid cluster: {0}")]
	InvalidCluster(String),

	#[error("Cannot open cert file {path}: {source}")]
	CertFileUnavailable {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Error fetching certificate: {0}")]
	CertFetchFailed(#[from] sealer_k8s::K8sError),

	#[error("Failed to read any certificates: {0}")]
	NoCertificatesFound(String),

	#[error("Expected RSA public key but found {0}")]
	UnsupportedKeyType(String),

	#[error(
		"Unsupported domain: {0}. Domain must be *.teko.vn or *.services.teko.vn or *.vnshop.vn"
	)]
	UnsupportedDomain(String),

	#[error("Cannot read tls {part} file: {reason}")]
	CertOrKeyReadFailed { part: TlsPart, reason: String },

	#[error("Unsupported output format: {0}")]
	UnsupportedOutputFormat(String),

	#[error("Secret {0} must be set")]
	IncompleteSecret(&'static str),

	#[error("Cannot create sealed secret: {0}")]
	SealingFailed(String),

	#[error("Cannot encode sealed secret: {0}")]
	EncodingFailed(String),
}
