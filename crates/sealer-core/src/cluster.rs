// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Logical cluster identifiers.

use std::fmt;
use std::str::FromStr;

use crate::error::SealError;

/// A deployment environment with its own sealing certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Cluster {
	Production,
	Lab,
	Dev,
	Stage,
}

impl Cluster {
	pub const ALL: [Cluster; 4] = [
		Cluster::Production,
		Cluster::Lab,
		Cluster::Dev,
		Cluster::Stage,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			Cluster::Production => "production",
			Cluster::Lab => "lab",
			Cluster::Dev => "dev",
			Cluster::Stage => "stage",
		}
	}

	/// Prefix of the environment variables holding this cluster's paths,
	/// e.g. `PROD` for `PROD_CERT_FILE` / `PROD_KUBECONFIG_FILE`.
	pub fn env_prefix(&self) -> &'static str {
		match self {
			Cluster::Production => "PROD",
			Cluster::Lab => "LAB",
			Cluster::Dev => "DEV",
			Cluster::Stage => "STAGE",
		}
	}
}

impl fmt::Display for Cluster {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Cluster {
	type Err = SealError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Cluster::ALL
			.into_iter()
			.find(|c| c.as_str() == s)
			.ok_or_else(|| SealError::InvalidCluster(s.to_string()))
	}
}
