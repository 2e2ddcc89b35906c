// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! HTTP front end for k8s-sealer.
//!
//! Exposes one `POST` route per secret kind under `/api/seal/` and returns
//! the sealed manifest base64-encoded in a JSON envelope.

pub mod api;
pub mod error;
pub mod routes;

pub use api::{create_router, AppState};
pub use error::{ErrorResponse, ServerError};
