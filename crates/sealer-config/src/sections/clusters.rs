// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-cluster certificate sources, keyed by cluster name.

use std::collections::BTreeMap;
use std::path::PathBuf;

use sealer_core::{Cluster, ClusterSource};
use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ClusterConfigLayer {
	#[serde(default)]
	pub cert_file: Option<PathBuf>,
	#[serde(default)]
	pub kubeconfig_file: Option<PathBuf>,
}

impl ClusterConfigLayer {
	pub fn merge(&mut self, other: ClusterConfigLayer) {
		if other.cert_file.is_some() {
			self.cert_file = other.cert_file;
		}
		if other.kubeconfig_file.is_some() {
			self.kubeconfig_file = other.kubeconfig_file;
		}
	}

	pub fn finalize(self) -> ClusterSource {
		ClusterSource {
			cert_file: self.cert_file,
			kubeconfig_file: self.kubeconfig_file,
		}
	}
}

/// Resolve `[clusters.<name>]` tables, rejecting unknown cluster names.
pub fn finalize_clusters(
	layers: BTreeMap<String, ClusterConfigLayer>,
) -> Result<BTreeMap<Cluster, ClusterSource>, ConfigError> {
	layers
		.into_iter()
		.map(|(name, layer)| -> Result<_, ConfigError> {
			let cluster = name.parse::<Cluster>().map_err(|_| {
				ConfigError::Validation(format!(
					"unknown cluster '{name}' (expected production, lab, dev or stage)"
				))
			})?;
			Ok((cluster, layer.finalize()))
		})
		.collect()
}
