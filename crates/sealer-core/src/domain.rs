// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Domains with a managed wildcard TLS certificate.

use std::fmt;
use std::str::FromStr;

use crate::error::SealError;

/// A domain suffix with its own configured certificate/key pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TlsDomain {
	/// `*.services.teko.vn`
	Services,
	/// `*.teko.vn`
	Teko,
	/// `*.vnshop.vn`
	Vnshop,
}

impl TlsDomain {
	/// Ordered so the more specific suffix wins.
	pub const ALL: [TlsDomain; 3] = [TlsDomain::Services, TlsDomain::Teko, TlsDomain::Vnshop];

	pub fn suffix(&self) -> &'static str {
		match self {
			TlsDomain::Services => ".services.teko.vn",
			TlsDomain::Teko => ".teko.vn",
			TlsDomain::Vnshop => ".vnshop.vn",
		}
	}

	/// Config key, used in TOML `[tls.<key>]` tables.
	pub fn as_str(&self) -> &'static str {
		match self {
			TlsDomain::Services => "services",
			TlsDomain::Teko => "teko",
			TlsDomain::Vnshop => "vnshop",
		}
	}

	/// Prefix of the environment variables holding this pair,
	/// e.g. `TEKO` for `TEKO_TLS_CERT_FILE` / `TEKO_TLS_KEY_FILE`.
	pub fn env_prefix(&self) -> &'static str {
		match self {
			TlsDomain::Services => "SERVICES",
			TlsDomain::Teko => "TEKO",
			TlsDomain::Vnshop => "VNSHOP",
		}
	}

	/// Select the certificate pair that covers `domain`.
	pub fn for_domain(domain: &str) -> Result<Self, SealError> {
		TlsDomain::ALL
			.into_iter()
			.find(|d| domain.ends_with(d.suffix()))
			.ok_or_else(|| SealError::UnsupportedDomain(domain.to_string()))
	}
}

impl fmt::Display for TlsDomain {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for TlsDomain {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		TlsDomain::ALL
			.into_iter()
			.find(|d| d.as_str() == s)
			.ok_or_else(|| format!("unknown TLS domain '{s}' (expected services, teko or vnshop)"))
	}
}
