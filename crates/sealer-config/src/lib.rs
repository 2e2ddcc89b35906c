// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration management for k8s-sealer.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Validation of cluster names, TLS keys and output format at startup
//! - The established environment variable names (`PROD_CERT_FILE`, `OUTPUT_FORMAT`, ...)
//!
//! # Usage
//!
//! ```ignore
//! use sealer_config::load_config;
//!
//! let config = load_config()?;
//! println!("Listening on {}", config.socket_addr());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::SealerConfigLayer;
pub use sections::*;
pub use sources::{
	load_from_lookup, ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource,
	SYSTEM_CONFIG_PATH,
};

use sealer_core::SealConfig;
use tracing::{debug, info};

/// Fully resolved sealer configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub logging: LoggingConfig,
	pub seal: SealConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables
/// 2. Config file (`/etc/k8s-sealer/sealer.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<ServerConfig, ConfigError> {
	let mut merged = SealerConfigLayer::default();
	merged.merge(EnvSource.load()?);
	finalize(merged)
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = SealerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: SealerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize()?;
	let clusters = finalize_clusters(layer.clusters.unwrap_or_default())?;
	let tls = finalize_tls(layer.tls.unwrap_or_default())?;
	let seal = layer.seal.unwrap_or_default().finalize(clusters, tls)?;

	info!(
		host = %http.host,
		port = http.port,
		output_format = %seal.output_format,
		registry_host = %seal.registry_host,
		controller = %format!("{}/{}", seal.controller.namespace, seal.controller.name),
		clusters_with_cert_file = seal.clusters.values().filter(|c| c.cert_path().is_some()).count(),
		tls_domains = seal.tls.len(),
		"Sealer configuration loaded"
	);

	Ok(ServerConfig {
		http,
		logging,
		seal,
	})
}
