// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sealing core for k8s-sealer.
//!
//! Builds Kubernetes Secrets and turns them into SealedSecrets that only the
//! target cluster's sealed-secrets controller can decrypt:
//! - Cluster and TLS domain resolution against a [`SealConfig`]
//! - Secret builders for opaque, registry and TLS secrets
//! - RSA key extraction from the controller certificate
//! - Hybrid RSA-OAEP / AES-GCM sealing
//! - JSON or YAML manifest encoding
//! - [`SealService`], which runs the whole pipeline per request

pub mod cluster;
pub mod config;
pub mod domain;
pub mod error;
pub mod key;
pub mod output;
pub mod seal;
pub mod sealed_secret;
pub mod secret;
pub mod service;

pub use cluster::Cluster;
pub use config::{ClusterSource, ControllerRef, SealConfig, TlsPair};
pub use domain::TlsDomain;
pub use error::{SealError, SealResult, TlsPart};
pub use key::parse_public_key;
pub use output::{encode, OutputFormat};
pub use seal::{hybrid_decrypt, hybrid_encrypt, HybridSealer, Sealer, SealingScope};
pub use sealed_secret::{SealedSecret, SealedSecretSpec, SecretTemplateSpec};
pub use service::SealService;
