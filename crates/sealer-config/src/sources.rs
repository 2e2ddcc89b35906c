// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::collections::BTreeMap;
use std::path::PathBuf;

use sealer_core::{Cluster, TlsDomain};
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::SealerConfigLayer;
use crate::sections::{
	ClusterConfigLayer, HttpConfigLayer, LoggingConfigLayer, SealConfigLayer, TlsPairLayer,
};

/// Default location of the config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/k8s-sealer/sealer.toml";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<SealerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<SealerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(SealerConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new(SYSTEM_CONFIG_PATH)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<SealerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(SealerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: SealerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Cluster and TLS paths keep their historical names (`PROD_CERT_FILE`,
/// `TEKO_TLS_KEY_FILE`, `OUTPUT_FORMAT`, ...). Listener, logging and
/// controller settings use `SEALER_<FIELD>`.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<SealerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		load_from_lookup(|name| std::env::var(name).ok())
	}
}

/// Build a layer from an arbitrary variable lookup. Empty values count as unset.
pub fn load_from_lookup<F>(lookup: F) -> Result<SealerConfigLayer, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	let var = |name: &str| lookup(name).filter(|s| !s.is_empty());

	let port = match var("SEALER_PORT") {
		Some(v) => Some(v.parse().map_err(|_| ConfigError::InvalidValue {
			key: "SEALER_PORT".to_string(),
			message: format!("invalid u16 value '{v}'"),
		})?),
		None => None,
	};

	let mut clusters = BTreeMap::new();
	for cluster in Cluster::ALL {
		let prefix = cluster.env_prefix();
		let layer = ClusterConfigLayer {
			cert_file: var(&format!("{prefix}_CERT_FILE")).map(PathBuf::from),
			kubeconfig_file: var(&format!("{prefix}_KUBECONFIG_FILE")).map(PathBuf::from),
		};
		if layer != ClusterConfigLayer::default() {
			clusters.insert(cluster.as_str().to_string(), layer);
		}
	}

	let mut tls = BTreeMap::new();
	for domain in TlsDomain::ALL {
		let prefix = domain.env_prefix();
		let layer = TlsPairLayer {
			cert_file: var(&format!("{prefix}_TLS_CERT_FILE")).map(PathBuf::from),
			key_file: var(&format!("{prefix}_TLS_KEY_FILE")).map(PathBuf::from),
		};
		if layer != TlsPairLayer::default() {
			tls.insert(domain.as_str().to_string(), layer);
		}
	}

	Ok(SealerConfigLayer {
		http: Some(HttpConfigLayer {
			host: var("SEALER_HOST"),
			port,
		}),
		logging: Some(LoggingConfigLayer {
			level: var("SEALER_LOG_LEVEL"),
			format: var("SEALER_LOG_FORMAT"),
		}),
		seal: Some(SealConfigLayer {
			output_format: var("OUTPUT_FORMAT"),
			registry_host: var("REGISTRY_HOST"),
			controller_namespace: var("SEALER_CONTROLLER_NAMESPACE"),
			controller_name: var("SEALER_CONTROLLER_NAME"),
		}),
		clusters: Some(clusters),
		tls: Some(tls),
	})
}
