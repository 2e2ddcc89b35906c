// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Sealing HTTP handlers.
//!
//! Bodies are read as raw bytes and decoded as JSON regardless of the
//! request's `Content-Type`. Every field is optional and defaults to empty.

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use bytes::Bytes;
use serde::{de, de::DeserializeOwned, Deserialize, Deserializer, Serialize};

use crate::{api::AppState, error::ServerError};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OpaqueRequest {
	pub cluster: String,
	pub name: String,
	pub namespace: String,
	/// Values are standard base64 on the wire.
	#[serde(deserialize_with = "base64_values")]
	pub data: BTreeMap<String, Vec<u8>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DockerConfigJsonRequest {
	pub cluster: String,
	pub name: String,
	pub namespace: String,
	pub username: String,
	pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TlsRequest {
	pub cluster: String,
	pub namespace: String,
	pub domain: String,
}

/// Successful seal: the encoded manifest, base64 encoded.
#[derive(Debug, Serialize, Deserialize)]
pub struct SealResponse {
	#[serde(rename = "sealedSecret")]
	pub sealed_secret: String,
}

impl SealResponse {
	pub fn new(manifest: &[u8]) -> Self {
		Self {
			sealed_secret: BASE64.encode(manifest),
		}
	}
}

fn base64_values<'de, D>(deserializer: D) -> Result<BTreeMap<String, Vec<u8>>, D::Error>
where
	D: Deserializer<'de>,
{
	let encoded = Option::<BTreeMap<String, String>>::deserialize(deserializer)?;
	encoded
		.unwrap_or_default()
		.into_iter()
		.map(|(key, value)| {
			BASE64
				.decode(value.as_bytes())
				.map(|bytes| (key.clone(), bytes))
				.map_err(|e| <D::Error as de::Error>::custom(format!("data.{key}: {e}")))
		})
		.collect()
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ServerError> {
	serde_json::from_slice(body).map_err(ServerError::MalformedRequestBody)
}

pub async fn seal_opaque(
	State(state): State<AppState>,
	body: Bytes,
) -> Result<Json<SealResponse>, ServerError> {
	let req: OpaqueRequest = decode(&body)?;
	let manifest = state
		.seal_service
		.seal_opaque(&req.cluster, &req.name, &req.namespace, req.data)
		.await?;
	Ok(Json(SealResponse::new(&manifest)))
}

pub async fn seal_dockerconfigjson(
	State(state): State<AppState>,
	body: Bytes,
) -> Result<Json<SealResponse>, ServerError> {
	let req: DockerConfigJsonRequest = decode(&body)?;
	let manifest = state
		.seal_service
		.seal_dockerconfigjson(
			&req.cluster,
			&req.name,
			&req.namespace,
			&req.username,
			&req.password,
		)
		.await?;
	Ok(Json(SealResponse::new(&manifest)))
}

pub async fn seal_tls(
	State(state): State<AppState>,
	body: Bytes,
) -> Result<Json<SealResponse>, ServerError> {
	let req: TlsRequest = decode(&body)?;
	let manifest = state
		.seal_service
		.seal_tls(&req.cluster, &req.namespace, &req.domain)
		.await?;
	Ok(Json(SealResponse::new(&manifest)))
}
