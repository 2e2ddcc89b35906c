// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sealing behaviour: output format, registry and controller location.

use std::collections::BTreeMap;

use sealer_core::{Cluster, ClusterSource, ControllerRef, OutputFormat, SealConfig, TlsDomain, TlsPair};
use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SealConfigLayer {
	#[serde(default)]
	pub output_format: Option<String>,
	#[serde(default)]
	pub registry_host: Option<String>,
	#[serde(default)]
	pub controller_namespace: Option<String>,
	#[serde(default)]
	pub controller_name: Option<String>,
}

impl SealConfigLayer {
	pub fn merge(&mut self, other: SealConfigLayer) {
		if other.output_format.is_some() {
			self.output_format = other.output_format;
		}
		if other.registry_host.is_some() {
			self.registry_host = other.registry_host;
		}
		if other.controller_namespace.is_some() {
			self.controller_namespace = other.controller_namespace;
		}
		if other.controller_name.is_some() {
			self.controller_name = other.controller_name;
		}
	}

	/// Combine with the resolved cluster and TLS tables into a [`SealConfig`].
	pub fn finalize(
		self,
		clusters: BTreeMap<Cluster, ClusterSource>,
		tls: BTreeMap<TlsDomain, TlsPair>,
	) -> Result<SealConfig, ConfigError> {
		let output_format: OutputFormat = self
			.output_format
			.as_deref()
			.unwrap_or_default()
			.parse()
			.map_err(|e: sealer_core::SealError| ConfigError::InvalidValue {
				key: "seal.output_format".to_string(),
				message: e.to_string(),
			})?;

		let defaults = ControllerRef::default();
		let controller = ControllerRef {
			namespace: self.controller_namespace.unwrap_or(defaults.namespace),
			name: self.controller_name.unwrap_or(defaults.name),
		};
		if controller.namespace.trim().is_empty() {
			return Err(ConfigError::Validation(
				"seal.controller_namespace must not be empty".to_string(),
			));
		}
		if controller.name.trim().is_empty() {
			return Err(ConfigError::Validation(
				"seal.controller_name must not be empty".to_string(),
			));
		}

		Ok(SealConfig {
			output_format,
			registry_host: self.registry_host.unwrap_or_default(),
			controller,
			clusters,
			tls,
		})
	}
}
