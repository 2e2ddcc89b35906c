// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wildcard certificate/key files, keyed by domain suffix.

use std::collections::BTreeMap;
use std::path::PathBuf;

use sealer_core::{TlsDomain, TlsPair};
use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TlsPairLayer {
	#[serde(default)]
	pub cert_file: Option<PathBuf>,
	#[serde(default)]
	pub key_file: Option<PathBuf>,
}

impl TlsPairLayer {
	pub fn merge(&mut self, other: TlsPairLayer) {
		if other.cert_file.is_some() {
			self.cert_file = other.cert_file;
		}
		if other.key_file.is_some() {
			self.key_file = other.key_file;
		}
	}

	pub fn finalize(self) -> TlsPair {
		TlsPair {
			cert_file: self.cert_file,
			key_file: self.key_file,
		}
	}
}

/// Resolve `[tls.<suffix>]` tables, rejecting unknown suffix keys.
pub fn finalize_tls(
	layers: BTreeMap<String, TlsPairLayer>,
) -> Result<BTreeMap<TlsDomain, TlsPair>, ConfigError> {
	layers
		.into_iter()
		.map(|(key, layer)| -> Result<_, ConfigError> {
			let domain = key.parse::<TlsDomain>().map_err(ConfigError::Validation)?;
			Ok((domain, layer.finalize()))
		})
		.collect()
}
