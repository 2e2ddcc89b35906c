// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use axum::{http::StatusCode, response::IntoResponse, Json};

/// Unmatched paths answer with an empty JSON object.
pub async fn not_found() -> impl IntoResponse {
	(StatusCode::NOT_FOUND, Json(serde_json::json!({})))
}
