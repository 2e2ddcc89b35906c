// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Integration tests for the sealing API.
//!
//! Tests cover:
//! - Each seal route against file and in-cluster certificate sources
//! - 403 for undecodable bodies and 500 with a hidden cause for sealing failures
//! - 404 fallback, CORS and content-type headers

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
	body::Body,
	http::{header, Method, Request, StatusCode},
	response::Response,
	Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use sealer_core::{
	hybrid_decrypt, Cluster, ClusterSource, ControllerRef, HybridSealer, SealConfig, SealService,
	SealedSecret, TlsDomain, TlsPair,
};
use sealer_k8s::{MockK8sConnector, ProxyRequest};
use sealer_server::{create_router, AppState};
use tower::ServiceExt;

const CERT_PEM: &str = include_str!("../../sealer-core/tests/fixtures/sealer-cert.pem");

fn fixture(name: &str) -> PathBuf {
	PathBuf::from(env!("CARGO_MANIFEST_DIR"))
		.join("../sealer-core/tests/fixtures")
		.join(name)
}

fn dev_config() -> SealConfig {
	SealConfig {
		registry_host: "registry.example.com".to_string(),
		clusters: BTreeMap::from([(
			Cluster::Dev,
			ClusterSource {
				cert_file: Some(fixture("sealer-cert.pem")),
				kubeconfig_file: None,
			},
		)]),
		tls: BTreeMap::from([(
			TlsDomain::Teko,
			TlsPair {
				cert_file: Some(fixture("sealer-cert.pem")),
				key_file: Some(fixture("sealer-key.pem")),
			},
		)]),
		..Default::default()
	}
}

fn app_with(config: SealConfig, connector: MockK8sConnector) -> Router {
	let service = SealService::new(Arc::new(config), Arc::new(connector), Arc::new(HybridSealer));
	create_router(AppState::new(service))
}

fn app() -> Router {
	app_with(dev_config(), MockK8sConnector::responding("unused"))
}

fn post(uri: &str, body: &str) -> Request<Body> {
	Request::builder()
		.method(Method::POST)
		.uri(uri)
		.header(header::CONTENT_TYPE, "application/json")
		.body(Body::from(body.to_string()))
		.unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
	axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap()
		.to_vec()
}

async fn body_json(response: Response) -> serde_json::Value {
	serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Decode the `sealedSecret` envelope back into the manifest.
async fn sealed_secret(response: Response) -> SealedSecret {
	let body = body_json(response).await;
	let encoded = body["sealedSecret"].as_str().unwrap();
	assert!(!encoded.is_empty());
	let manifest = BASE64.decode(encoded).unwrap();
	serde_json::from_slice(&manifest).unwrap()
}

// ============================================================================
// Seal routes
// ============================================================================

#[tokio::test]
async fn test_seal_opaque_returns_sealed_secret() {
	let response = app()
		.oneshot(post(
			"/api/seal/opaque",
			r#"{"cluster":"dev","name":"s1","namespace":"default","data":{"k":"dGVzdA=="}}"#,
		))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	let sealed = sealed_secret(response).await;
	assert_eq!(sealed.metadata.name.as_deref(), Some("s1"));
	assert_eq!(sealed.metadata.namespace.as_deref(), Some("default"));

	let private_key = fixture_private_key();
	let ciphertext = BASE64.decode(&sealed.spec.encrypted_data["k"]).unwrap();
	let plaintext = hybrid_decrypt(&private_key, &ciphertext, "default/s1").unwrap();
	assert_eq!(plaintext.as_slice(), b"test");
}

fn fixture_private_key() -> rsa::RsaPrivateKey {
	use rsa::pkcs8::DecodePrivateKey;
	let pem = std::fs::read_to_string(fixture("sealer-key.pem")).unwrap();
	rsa::RsaPrivateKey::from_pkcs8_pem(&pem).unwrap()
}

#[tokio::test]
async fn test_seal_dockerconfigjson() {
	let response = app()
		.oneshot(post(
			"/api/seal/dockerconfigjson",
			r#"{"cluster":"dev","name":"pull","namespace":"ci","username":"u","password":"p"}"#,
		))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	let sealed = sealed_secret(response).await;
	assert_eq!(
		sealed.spec.template.type_.as_deref(),
		Some("kubernetes.io/dockerconfigjson")
	);

	let ciphertext = BASE64
		.decode(&sealed.spec.encrypted_data[".dockerconfigjson"])
		.unwrap();
	let private_key = fixture_private_key();
	let plaintext = hybrid_decrypt(&private_key, &ciphertext, "ci/pull").unwrap();
	assert_eq!(
		plaintext.as_slice(),
		br#"{"auths":{"registry.example.com":{"auth":"dTpw"}}}"#
	);
}

#[tokio::test]
async fn test_seal_tls() {
	let response = app()
		.oneshot(post(
			"/api/seal/tls",
			r#"{"cluster":"dev","namespace":"web","domain":"shop.teko.vn"}"#,
		))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	let sealed = sealed_secret(response).await;
	assert_eq!(sealed.metadata.name.as_deref(), Some("shop.teko.vn-tls"));
	assert!(sealed.spec.encrypted_data.contains_key("tls.crt"));
	assert!(sealed.spec.encrypted_data.contains_key("tls.key"));
}

#[tokio::test]
async fn test_seal_uses_controller_when_cert_file_unset() {
	let connector = MockK8sConnector::responding(CERT_PEM);
	let config = SealConfig {
		controller: ControllerRef {
			namespace: "kube-system".to_string(),
			name: "sealed-secrets-controller".to_string(),
		},
		..Default::default()
	};
	let app = app_with(config, connector.clone());

	let response = app
		.oneshot(post(
			"/api/seal/opaque",
			r#"{"cluster":"production","name":"s1","namespace":"default","data":{}}"#,
		))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(
		connector.requests(),
		vec![ProxyRequest {
			kubeconfig: None,
			namespace: "kube-system".to_string(),
			service: "sealed-secrets-controller".to_string(),
			path: "/v1/cert.pem".to_string(),
		}]
	);
}

// ============================================================================
// Error mapping
// ============================================================================

#[tokio::test]
async fn test_malformed_body_returns_403() {
	let response = app()
		.oneshot(post("/api/seal/opaque", "{not json"))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::FORBIDDEN);
	let body = body_json(response).await;
	assert!(body["err"].is_string());
	assert!(!body["err"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_body_is_decoded_regardless_of_content_type() {
	let request = Request::builder()
		.method(Method::POST)
		.uri("/api/seal/opaque")
		.header(header::CONTENT_TYPE, "text/plain")
		.body(Body::from(
			r#"{"cluster":"dev","name":"s1","namespace":"default","data":{"k":"dGVzdA=="}}"#,
		))
		.unwrap();

	let response = app().oneshot(request).await.unwrap();
	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_cluster_returns_internal_error() {
	let response = app()
		.oneshot(post(
			"/api/seal/opaque",
			r#"{"cluster":"qa","name":"s1","namespace":"default","data":{}}"#,
		))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(
		body_json(response).await,
		serde_json::json!({ "err": "internal error" })
	);
}

#[tokio::test]
async fn test_unsupported_domain_hides_cause() {
	let response = app()
		.oneshot(post(
			"/api/seal/tls",
			r#"{"cluster":"dev","namespace":"web","domain":"example.com"}"#,
		))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	let body = body_json(response).await;
	assert_eq!(body["err"], "internal error");
}

#[tokio::test]
async fn test_controller_failure_returns_internal_error() {
	let app = app_with(
		SealConfig::default(),
		MockK8sConnector::failing_proxy("connection refused"),
	);
	let response = app
		.oneshot(post(
			"/api/seal/opaque",
			r#"{"cluster":"lab","name":"s1","namespace":"default"}"#,
		))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_empty_cert_file_returns_internal_error() {
	let cert = tempfile::NamedTempFile::new().unwrap();
	let mut config = dev_config();
	config.clusters.insert(
		Cluster::Dev,
		ClusterSource {
			cert_file: Some(cert.path().to_path_buf()),
			kubeconfig_file: None,
		},
	);

	let response = app_with(config, MockK8sConnector::responding("unused"))
		.oneshot(post(
			"/api/seal/opaque",
			r#"{"cluster":"dev","name":"s1","namespace":"default","data":{}}"#,
		))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(
		body_json(response).await,
		serde_json::json!({ "err": "internal error" })
	);
}

#[tokio::test]
async fn test_empty_controller_certificate_returns_internal_error() {
	let app = app_with(SealConfig::default(), MockK8sConnector::responding("\n"));
	let response = app
		.oneshot(post(
			"/api/seal/opaque",
			r#"{"cluster":"lab","name":"s1","namespace":"default"}"#,
		))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_empty_body_fields_fail_as_internal_error() {
	let response = app()
		.oneshot(post("/api/seal/opaque", r#"{"cluster":"dev"}"#))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ============================================================================
// Fallback and headers
// ============================================================================

#[tokio::test]
async fn test_unknown_path_returns_empty_object() {
	let response = app()
		.oneshot(
			Request::builder()
				.uri("/api/unknown")
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::NOT_FOUND);
	assert_eq!(body_json(response).await, serde_json::json!({}));
}

#[tokio::test]
async fn test_responses_are_json_with_cors() {
	let request = Request::builder()
		.method(Method::POST)
		.uri("/api/seal/opaque")
		.header(header::ORIGIN, "https://ui.example.com")
		.body(Body::from("{"))
		.unwrap();

	let response = app().oneshot(request).await.unwrap();

	let headers = response.headers();
	assert_eq!(
		headers.get(header::CONTENT_TYPE).unwrap(),
		"application/json; charset=utf-8"
	);
	assert_eq!(
		headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
		"*"
	);
}

#[tokio::test]
async fn test_preflight_returns_empty_body() {
	let request = Request::builder()
		.method(Method::OPTIONS)
		.uri("/api/seal/opaque")
		.header(header::ORIGIN, "https://ui.example.com")
		.header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
		.header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
		.body(Body::empty())
		.unwrap();

	let response = app().oneshot(request).await.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	let allow_methods = response
		.headers()
		.get(header::ACCESS_CONTROL_ALLOW_METHODS)
		.and_then(|v| v.to_str().ok())
		.unwrap_or("")
		.to_string();
	assert!(allow_methods.contains("POST"));
	assert!(allow_methods.contains("PATCH"));
	let allow_headers = response
		.headers()
		.get(header::ACCESS_CONTROL_ALLOW_HEADERS)
		.and_then(|v| v.to_str().ok())
		.unwrap_or("")
		.to_ascii_lowercase();
	assert!(allow_headers.contains("authorization"));
	assert!(body_bytes(response).await.is_empty());
}

// ============================================================================
// Configuration wiring
// ============================================================================

#[tokio::test]
async fn test_router_from_toml_config() {
	use sealer_config::ConfigSource;
	use std::io::Write;

	let mut file = tempfile::NamedTempFile::new().unwrap();
	write!(
		file,
		"[seal]\noutput_format = \"yaml\"\n\n[clusters.stage]\ncert_file = \"{}\"\n",
		fixture("sealer-cert.pem").display()
	)
	.unwrap();

	let layer = sealer_config::TomlSource::new(file.path()).load().unwrap();
	let config = sealer_config::finalize(layer).unwrap();
	let app = app_with(config.seal, MockK8sConnector::responding("unused"));

	let response = app
		.oneshot(post(
			"/api/seal/opaque",
			r#"{"cluster":"stage","name":"s1","namespace":"default","data":{"k":"dGVzdA=="}}"#,
		))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	let body = body_json(response).await;
	let manifest = BASE64
		.decode(body["sealedSecret"].as_str().unwrap())
		.unwrap();
	let manifest = String::from_utf8(manifest).unwrap();
	assert!(manifest.starts_with("apiVersion: bitnami.com/v1alpha1\n"));
	assert!(manifest.ends_with('\n'));
}
