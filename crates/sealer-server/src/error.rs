// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Server error types and HTTP response conversions.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use sealer_core::SealError;
use serde::Serialize;

/// Message returned in place of any sealing failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal error";

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	/// The request body was not valid JSON for the route.
	#[error("Malformed request body: {0}")]
	MalformedRequestBody(#[source] serde_json::Error),

	#[error(transparent)]
	Seal(#[from] SealError),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
	pub err: String,
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let (status, err) = match &self {
			// Decode errors are shown to the caller; they only describe their own input.
			ServerError::MalformedRequestBody(e) => {
				tracing::warn!(error = %e, "rejecting malformed request body");
				(StatusCode::FORBIDDEN, e.to_string())
			}
			ServerError::Seal(e) => {
				tracing::error!(error = %e, "sealing request failed");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					INTERNAL_ERROR_MESSAGE.to_string(),
				)
			}
		};

		(status, Json(ErrorResponse { err })).into_response()
	}
}
