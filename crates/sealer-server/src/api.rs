// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Router construction and shared request state.

use std::sync::Arc;

use axum::{
	http::{header, HeaderValue, Method},
	routing::post,
	Router,
};
use sealer_core::SealService;
use tower_http::{
	cors::{Any, CorsLayer},
	set_header::SetResponseHeaderLayer,
};

use crate::routes;

/// Content type stamped on every response.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// State shared by all handlers. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
	pub seal_service: Arc<SealService>,
}

impl AppState {
	pub fn new(seal_service: SealService) -> Self {
		Self {
			seal_service: Arc::new(seal_service),
		}
	}
}

/// Browser clients call the API cross-origin.
fn cors_layer() -> CorsLayer {
	CorsLayer::new()
		.allow_origin(Any)
		.allow_methods([Method::POST, Method::GET, Method::PUT, Method::PATCH])
		.allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
}

pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/api/seal/opaque", post(routes::seal::seal_opaque))
		.route(
			"/api/seal/dockerconfigjson",
			post(routes::seal::seal_dockerconfigjson),
		)
		.route("/api/seal/tls", post(routes::seal::seal_tls))
		.fallback(routes::fallback::not_found)
		.with_state(state)
		.layer(cors_layer())
		.layer(SetResponseHeaderLayer::overriding(
			header::CONTENT_TYPE,
			HeaderValue::from_static(JSON_CONTENT_TYPE),
		))
}
