// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Builders for the Secret kinds the service can seal.

use std::collections::BTreeMap;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::ByteString;
use zeroize::Zeroizing;

use crate::config::TlsPair;
use crate::error::{SealError, SealResult, TlsPart};

pub const OPAQUE_TYPE: &str = "Opaque";
pub const DOCKER_CONFIG_JSON_TYPE: &str = "kubernetes.io/dockerconfigjson";
pub const DOCKER_CONFIG_JSON_KEY: &str = ".dockerconfigjson";
pub const TLS_TYPE: &str = "kubernetes.io/tls";
pub const TLS_CERT_KEY: &str = "tls.crt";
pub const TLS_PRIVATE_KEY_KEY: &str = "tls.key";

fn build(
	name: &str,
	namespace: &str,
	type_: &str,
	data: BTreeMap<String, Vec<u8>>,
) -> SealResult<Secret> {
	if name.is_empty() {
		return Err(SealError::IncompleteSecret("name"));
	}
	if namespace.is_empty() {
		return Err(SealError::IncompleteSecret("namespace"));
	}

	Ok(Secret {
		metadata: ObjectMeta {
			name: Some(name.to_string()),
			namespace: Some(namespace.to_string()),
			..Default::default()
		},
		type_: Some(type_.to_string()),
		data: Some(
			data.into_iter()
				.map(|(k, v)| (k, ByteString(v)))
				.collect(),
		),
		..Default::default()
	})
}

/// An `Opaque` Secret holding `data` verbatim.
pub fn opaque_secret(
	name: &str,
	namespace: &str,
	data: BTreeMap<String, Vec<u8>>,
) -> SealResult<Secret> {
	build(name, namespace, OPAQUE_TYPE, data)
}

/// The `.dockerconfigjson` payload for a single registry login.
pub fn docker_config_json(host: &str, username: &str, password: &str) -> Vec<u8> {
	let auth = Zeroizing::new(format!("{username}:{password}"));
	let config = serde_json::json!({
		"auths": {
			host: { "auth": BASE64.encode(auth.as_bytes()) }
		}
	});
	config.to_string().into_bytes()
}

pub fn dockerconfigjson_secret(
	name: &str,
	namespace: &str,
	host: &str,
	username: &str,
	password: &str,
) -> SealResult<Secret> {
	let data = BTreeMap::from([(
		DOCKER_CONFIG_JSON_KEY.to_string(),
		docker_config_json(host, username, password),
	)]);
	build(name, namespace, DOCKER_CONFIG_JSON_TYPE, data)
}

/// Read the certificate and key of a configured TLS pair.
/// Both buffers are moved into the Secret's `ByteString`s as-is.
pub async fn read_tls_pair(pair: &TlsPair) -> SealResult<(Vec<u8>, Vec<u8>)> {
	let cert = read_part(pair.cert_file.as_deref(), TlsPart::Cert).await?;
	let key = read_part(pair.key_file.as_deref(), TlsPart::Key).await?;
	Ok((cert, key))
}

async fn read_part(path: Option<&Path>, part: TlsPart) -> SealResult<Vec<u8>> {
	let Some(path) = path.filter(|p| !p.as_os_str().is_empty()) else {
		return Err(SealError::CertOrKeyReadFailed {
			part,
			reason: "no file configured".to_string(),
		});
	};
	tokio::fs::read(path)
		.await
		.map_err(|e| SealError::CertOrKeyReadFailed {
			part,
			reason: format!("{}: {e}", path.display()),
		})
}

/// A `kubernetes.io/tls` Secret named `<domain>-tls`.
pub fn tls_secret(
	namespace: &str,
	domain: &str,
	cert: Vec<u8>,
	key: Vec<u8>,
) -> SealResult<Secret> {
	if domain.is_empty() {
		return Err(SealError::IncompleteSecret("name"));
	}
	let data = BTreeMap::from([
		(TLS_CERT_KEY.to_string(), cert),
		(TLS_PRIVATE_KEY_KEY.to_string(), key),
	]);
	build(&format!("{domain}-tls"), namespace, TLS_TYPE, data)
}

/// Clear metadata owned by the API server so it never ends up in a template.
pub fn strip_server_fields(metadata: &mut ObjectMeta) {
	metadata.self_link = None;
	metadata.uid = None;
	metadata.resource_version = None;
	metadata.generation = None;
	metadata.creation_timestamp = None;
	metadata.deletion_timestamp = None;
	metadata.deletion_grace_period_seconds = None;
	metadata.managed_fields = None;
}

#[cfg(test)]
mod tests {
	use super::*;
	use k8s_openapi::apimachinery::pkg::apis::meta::v1::ManagedFieldsEntry;
	use proptest::prelude::*;
	use std::io::Write;
	use tempfile::NamedTempFile;

	#[test]
	fn docker_config_json_is_exact() {
		let payload = docker_config_json("registry.example.com", "u", "p");
		assert_eq!(
			String::from_utf8(payload).unwrap(),
			r#"{"auths":{"registry.example.com":{"auth":"dTpw"}}}"#
		);
	}

	#[test]
	fn opaque_secret_keeps_data_verbatim() {
		let data = BTreeMap::from([("k".to_string(), b"test".to_vec())]);
		let secret = opaque_secret("s1", "default", data).unwrap();
		assert_eq!(secret.type_.as_deref(), Some("Opaque"));
		assert_eq!(secret.metadata.name.as_deref(), Some("s1"));
		assert_eq!(secret.metadata.namespace.as_deref(), Some("default"));
		assert_eq!(secret.data.unwrap()["k"], ByteString(b"test".to_vec()));
	}

	#[test]
	fn empty_data_is_allowed() {
		let secret = opaque_secret("s1", "default", BTreeMap::new()).unwrap();
		assert!(secret.data.unwrap().is_empty());
	}

	#[test]
	fn missing_name_or_namespace_is_rejected() {
		assert!(matches!(
			opaque_secret("", "default", BTreeMap::new()),
			Err(SealError::IncompleteSecret("name"))
		));
		assert!(matches!(
			opaque_secret("s1", "", BTreeMap::new()),
			Err(SealError::IncompleteSecret("namespace"))
		));
	}

	#[test]
	fn dockerconfigjson_secret_has_single_key() {
		let secret =
			dockerconfigjson_secret("pull", "default", "registry.example.com", "u", "p").unwrap();
		assert_eq!(secret.type_.as_deref(), Some(DOCKER_CONFIG_JSON_TYPE));
		let data = secret.data.unwrap();
		assert_eq!(data.len(), 1);
		assert_eq!(
			data[DOCKER_CONFIG_JSON_KEY].0,
			docker_config_json("registry.example.com", "u", "p")
		);
	}

	#[test]
	fn tls_secret_is_named_after_domain() {
		let secret = tls_secret("web", "app.teko.vn", b"CERT".to_vec(), b"KEY".to_vec()).unwrap();
		assert_eq!(secret.metadata.name.as_deref(), Some("app.teko.vn-tls"));
		assert_eq!(secret.type_.as_deref(), Some(TLS_TYPE));
		let data = secret.data.unwrap();
		assert_eq!(data[TLS_CERT_KEY].0, b"CERT");
		assert_eq!(data[TLS_PRIVATE_KEY_KEY].0, b"KEY");
	}

	#[test]
	fn builder_is_deterministic() {
		let a = dockerconfigjson_secret("pull", "ns", "r.example.com", "u", "p").unwrap();
		let b = dockerconfigjson_secret("pull", "ns", "r.example.com", "u", "p").unwrap();
		assert_eq!(a, b);

		let a = tls_secret("web", "app.teko.vn", b"CERT".to_vec(), b"KEY".to_vec()).unwrap();
		let b = tls_secret("web", "app.teko.vn", b"CERT".to_vec(), b"KEY".to_vec()).unwrap();
		assert_eq!(a, b);
	}

	#[test]
	fn strip_clears_server_fields_only() {
		let mut metadata = ObjectMeta {
			name: Some("s1".to_string()),
			namespace: Some("default".to_string()),
			labels: Some(BTreeMap::from([("app".to_string(), "web".to_string())])),
			self_link: Some("/api/v1/namespaces/default/secrets/s1".to_string()),
			uid: Some("1234".to_string()),
			resource_version: Some("42".to_string()),
			generation: Some(3),
			deletion_grace_period_seconds: Some(30),
			managed_fields: Some(vec![ManagedFieldsEntry::default()]),
			..Default::default()
		};
		strip_server_fields(&mut metadata);

		assert_eq!(metadata.name.as_deref(), Some("s1"));
		assert_eq!(metadata.namespace.as_deref(), Some("default"));
		assert!(metadata.labels.is_some());
		assert!(metadata.self_link.is_none());
		assert!(metadata.uid.is_none());
		assert!(metadata.resource_version.is_none());
		assert!(metadata.generation.is_none());
		assert!(metadata.deletion_grace_period_seconds.is_none());
		assert!(metadata.managed_fields.is_none());
	}

	#[tokio::test]
	async fn reads_tls_pair_from_disk() {
		let mut cert = NamedTempFile::new().unwrap();
		cert.write_all(b"CERT").unwrap();
		let mut key = NamedTempFile::new().unwrap();
		key.write_all(b"KEY").unwrap();

		let pair = TlsPair {
			cert_file: Some(cert.path().to_path_buf()),
			key_file: Some(key.path().to_path_buf()),
		};
		let (cert_bytes, key_bytes) = read_tls_pair(&pair).await.unwrap();
		assert_eq!(cert_bytes, b"CERT");
		assert_eq!(key_bytes, b"KEY");
	}

	#[tokio::test]
	async fn unreadable_key_names_the_key() {
		let mut cert = NamedTempFile::new().unwrap();
		cert.write_all(b"CERT").unwrap();
		let pair = TlsPair {
			cert_file: Some(cert.path().to_path_buf()),
			key_file: Some("/nonexistent/tls.key".into()),
		};
		assert!(matches!(
			read_tls_pair(&pair).await,
			Err(SealError::CertOrKeyReadFailed { part: TlsPart::Key, .. })
		));
	}

	#[tokio::test]
	async fn unset_cert_names_the_cert() {
		let result = read_tls_pair(&TlsPair::default()).await;
		assert!(matches!(
			result,
			Err(SealError::CertOrKeyReadFailed { part: TlsPart::Cert, .. })
		));
	}

	proptest! {
		#[test]
		fn docker_auth_decodes_to_credentials(
			host in "[a-z][a-z0-9.-]{0,30}",
			user in "[a-zA-Z0-9_]{1,16}",
			pass in "[ -~]{0,24}",
		) {
			let payload = docker_config_json(&host, &user, &pass);
			let value: serde_json::Value = serde_json::from_slice(&payload).unwrap();
			let auth = value["auths"][host.as_str()]["auth"].as_str().unwrap();
			let decoded = BASE64.decode(auth).unwrap();
			prop_assert_eq!(decoded, format!("{user}:{pass}").into_bytes());
		}

		#[test]
		fn opaque_builder_is_deterministic(
			name in "[a-z][a-z0-9-]{0,20}",
			namespace in "[a-z][a-z0-9-]{0,20}",
			data in prop::collection::btree_map(
				"[a-zA-Z0-9._-]{1,16}",
				prop::collection::vec(any::<u8>(), 0..64),
				0..8,
			),
		) {
			let a = opaque_secret(&name, &namespace, data.clone()).unwrap();
			let b = opaque_secret(&name, &namespace, data.clone()).unwrap();
			prop_assert_eq!(&a, &b);

			let stored = a.data.unwrap_or_default();
			prop_assert_eq!(stored.len(), data.len());
			for (key, value) in &data {
				prop_assert_eq!(&stored[key].0, value);
			}
		}
	}
}
