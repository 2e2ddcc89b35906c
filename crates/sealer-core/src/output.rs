// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Serializes a SealedSecret into the configured manifest format.

use std::fmt;
use std::str::FromStr;

use crate::error::{SealError, SealResult};
use crate::sealed_secret::SealedSecret;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
	#[default]
	Json,
	Yaml,
}

impl OutputFormat {
	pub fn as_str(&self) -> &'static str {
		match self {
			OutputFormat::Json => "json",
			OutputFormat::Yaml => "yaml",
		}
	}
}

impl fmt::Display for OutputFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for OutputFormat {
	type Err = SealError;

	/// Case-insensitive. An empty string selects JSON.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"" | "json" => Ok(OutputFormat::Json),
			"yaml" => Ok(OutputFormat::Yaml),
			_ => Err(SealError::UnsupportedOutputFormat(s.to_string())),
		}
	}
}

/// Encode `sealed` as a manifest ending in exactly one newline.
pub fn encode(sealed: &SealedSecret, format: OutputFormat) -> SealResult<Vec<u8>> {
	let mut text = match format {
		OutputFormat::Json => serde_json::to_string_pretty(sealed)
			.map_err(|e| SealError::EncodingFailed(e.to_string()))?,
		OutputFormat::Yaml => {
			serde_yaml::to_string(sealed).map_err(|e| SealError::EncodingFailed(e.to_string()))?
		}
	};
	text.truncate(text.trim_end_matches('\n').len());
	text.push('\n');
	Ok(text.into_bytes())
}
