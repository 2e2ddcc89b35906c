// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections for k8s-sealer.

pub mod clusters;
pub mod http;
pub mod logging;
pub mod seal;
pub mod tls;

pub use clusters::{finalize_clusters, ClusterConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use seal::SealConfigLayer;
pub use tls::{finalize_tls, TlsPairLayer};
