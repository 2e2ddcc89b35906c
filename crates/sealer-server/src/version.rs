// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Build information for k8s-sealer.

/// Format version info for display.
pub fn format_version_info() -> String {
	format!(
		"k8s-sealer version: {}\n\
         Package:            {}\n\
         Platform:           {}-{}",
		env!("CARGO_PKG_VERSION"),
		env!("CARGO_PKG_NAME"),
		std::env::consts::ARCH,
		std::env::consts::OS,
	)
}
