// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! K8s client abstraction for k8s-sealer.
//!
//! This crate provides:
//! - A trait-based K8s client abstraction for testability
//! - Production implementation using the kube crate
//! - A mock connector for exercising the in-cluster certificate path

mod client;
mod error;
mod kube_client;
mod mock;

pub use client::{K8sClient, K8sConnector};
pub use error::{K8sError, K8sResult};
pub use kube_client::{service_proxy_path, KubeClient, KubeConnector, PEM_ACCEPT};
pub use mock::{MockK8sConnector, ProxyRequest};
