// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration layer for merging from multiple sources.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::sections::{
	ClusterConfigLayer, HttpConfigLayer, LoggingConfigLayer, SealConfigLayer, TlsPairLayer,
};

/// Sealer configuration layer - all fields are Option for merging.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SealerConfigLayer {
	#[serde(default)]
	pub http: Option<HttpConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
	#[serde(default)]
	pub seal: Option<SealConfigLayer>,
	#[serde(default)]
	pub clusters: Option<BTreeMap<String, ClusterConfigLayer>>,
	#[serde(default)]
	pub tls: Option<BTreeMap<String, TlsPairLayer>>,
}

impl SealerConfigLayer {
	/// Merge another layer into this one. Other layer takes precedence.
	pub fn merge(&mut self, other: SealerConfigLayer) {
		merge_option(&mut self.http, other.http, HttpConfigLayer::merge);
		merge_option(&mut self.logging, other.logging, LoggingConfigLayer::merge);
		merge_option(&mut self.seal, other.seal, SealConfigLayer::merge);
		merge_option(&mut self.clusters, other.clusters, |t, s| {
			merge_map(t, s, ClusterConfigLayer::merge)
		});
		merge_option(&mut self.tls, other.tls, |t, s| {
			merge_map(t, s, TlsPairLayer::merge)
		});
	}
}

fn merge_option<T, F>(target: &mut Option<T>, source: Option<T>, merge_fn: F)
where
	F: FnOnce(&mut T, T),
{
	match (target.as_mut(), source) {
		(Some(t), Some(s)) => merge_fn(t, s),
		(None, Some(s)) => *target = Some(s),
		_ => {}
	}
}

fn merge_map<T, F>(target: &mut BTreeMap<String, T>, source: BTreeMap<String, T>, merge_fn: F)
where
	F: Fn(&mut T, T),
{
	for (key, value) in source {
		match target.get_mut(&key) {
			Some(existing) => merge_fn(existing, value),
			None => {
				target.insert(key, value);
			}
		}
	}
}
