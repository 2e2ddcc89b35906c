// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Read-only settings the seal service runs with.
//!
//! Built once at startup (see `sealer-config`) and shared by reference.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::cluster::Cluster;
use crate::domain::TlsDomain;
use crate::error::SealError;
use crate::output::OutputFormat;

pub const DEFAULT_CONTROLLER_NAMESPACE: &str = "kube-system";
pub const DEFAULT_CONTROLLER_NAME: &str = "sealed-secrets-controller";

/// Where a cluster's sealing certificate comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterSource {
	/// Local PEM file. When unset the certificate is fetched from the controller.
	pub cert_file: Option<PathBuf>,
	/// Kubeconfig used for the controller fallback. When unset the client
	/// configuration is inferred.
	pub kubeconfig_file: Option<PathBuf>,
}

static EMPTY_CLUSTER_SOURCE: ClusterSource = ClusterSource {
	cert_file: None,
	kubeconfig_file: None,
};

static EMPTY_TLS_PAIR: TlsPair = TlsPair {
	cert_file: None,
	key_file: None,
};

impl ClusterSource {
	/// The local certificate path, if one is configured and non-empty.
	pub fn cert_path(&self) -> Option<&Path> {
		non_empty(self.cert_file.as_deref())
	}

	pub fn kubeconfig_path(&self) -> Option<&Path> {
		non_empty(self.kubeconfig_file.as_deref())
	}
}

/// Certificate and key files for a [`TlsDomain`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsPair {
	pub cert_file: Option<PathBuf>,
	pub key_file: Option<PathBuf>,
}

/// The service that serves the sealing certificate inside each cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerRef {
	pub namespace: String,
	pub name: String,
}

impl Default for ControllerRef {
	fn default() -> Self {
		Self {
			namespace: DEFAULT_CONTROLLER_NAMESPACE.to_string(),
			name: DEFAULT_CONTROLLER_NAME.to_string(),
		}
	}
}

/// Fully resolved sealing settings.
#[derive(Debug, Clone, Default)]
pub struct SealConfig {
	pub output_format: OutputFormat,
	/// Registry written into generated `.dockerconfigjson` payloads.
	pub registry_host: String,
	pub controller: ControllerRef,
	pub clusters: BTreeMap<Cluster, ClusterSource>,
	pub tls: BTreeMap<TlsDomain, TlsPair>,
}

impl SealConfig {
	/// Resolve a cluster name to its certificate source.
	///
	/// Pure lookup: no disk or network access. Known clusters without
	/// configuration resolve to an empty source (controller fallback with an
	/// inferred client).
	pub fn cluster_source(&self, cluster: &str) -> Result<&ClusterSource, SealError> {
		let cluster: Cluster = cluster.parse()?;
		Ok(self.clusters.get(&cluster).unwrap_or(&EMPTY_CLUSTER_SOURCE))
	}

	/// The configured files for a domain suffix.
	pub fn tls_pair(&self, domain: TlsDomain) -> &TlsPair {
		self.tls.get(&domain).unwrap_or(&EMPTY_TLS_PAIR)
	}
}

fn non_empty(path: Option<&Path>) -> Option<&Path> {
	path.filter(|p| !p.as_os_str().is_empty())
}
