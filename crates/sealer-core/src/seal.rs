// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Hybrid sealing compatible with the sealed-secrets controller.
//!
//! Each value is encrypted under a fresh AES-256-GCM session key, and the
//! session key is wrapped with RSA-OAEP(SHA-256). The OAEP label binds the
//! ciphertext to the secret's scope, so the controller refuses to unseal it
//! under a different name or namespace.
//!
//! Wire layout: `u16 BE len(rsa) || rsa ciphertext || aes-gcm ciphertext`.

use std::collections::BTreeMap;

use aes_gcm::{
	aead::{Aead, KeyInit, OsRng},
	Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use rand::RngCore;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{SealError, SealResult};
use crate::sealed_secret::{SealedSecret, SealedSecretSpec, SecretTemplateSpec};

/// Size of the AES-256 session key in bytes.
pub const SESSION_KEY_SIZE: usize = 32;

/// AES-GCM nonce size. The nonce is all zeroes; session keys are single use.
const NONCE_SIZE: usize = 12;

pub const CLUSTER_WIDE_ANNOTATION: &str = "sealedsecrets.bitnami.com/cluster-wide";
pub const NAMESPACE_WIDE_ANNOTATION: &str = "sealedsecrets.bitnami.com/namespace-wide";
const LAST_APPLIED_ANNOTATION: &str = "kubectl.kubernetes.io/last-applied-configuration";

/// Seals a Secret with a cluster's public key.
pub trait Sealer: Send + Sync {
	fn seal(&self, secret: &Secret, public_key: &RsaPublicKey) -> SealResult<SealedSecret>;
}

/// Where a sealed secret may be unsealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SealingScope {
	/// Only under the same name and namespace.
	#[default]
	Strict,
	/// Under any name within the same namespace.
	NamespaceWide,
	/// Anywhere in the cluster.
	ClusterWide,
}

impl SealingScope {
	/// Read the scope from a Secret's annotations.
	pub fn of(metadata: &ObjectMeta) -> Self {
		let is_set = |key: &str| {
			metadata
				.annotations
				.as_ref()
				.and_then(|a| a.get(key))
				.is_some_and(|v| v == "true")
		};
		if is_set(CLUSTER_WIDE_ANNOTATION) {
			SealingScope::ClusterWide
		} else if is_set(NAMESPACE_WIDE_ANNOTATION) {
			SealingScope::NamespaceWide
		} else {
			SealingScope::Strict
		}
	}

	/// OAEP label the controller expects for this scope.
	pub fn label(&self, namespace: &str, name: &str) -> String {
		match self {
			SealingScope::Strict => format!("{namespace}/{name}"),
			SealingScope::NamespaceWide => namespace.to_string(),
			SealingScope::ClusterWide => String::new(),
		}
	}

	fn annotations(&self) -> Option<BTreeMap<String, String>> {
		let key = match self {
			SealingScope::Strict => return None,
			SealingScope::NamespaceWide => NAMESPACE_WIDE_ANNOTATION,
			SealingScope::ClusterWide => CLUSTER_WIDE_ANNOTATION,
		};
		Some(BTreeMap::from([(key.to_string(), "true".to_string())]))
	}
}

fn generate_session_key() -> Zeroizing<[u8; SESSION_KEY_SIZE]> {
	let mut key = Zeroizing::new([0u8; SESSION_KEY_SIZE]);
	OsRng.fill_bytes(key.as_mut());
	key
}

/// Encrypt `plaintext` for the holder of the private half of `public_key`.
pub fn hybrid_encrypt(
	public_key: &RsaPublicKey,
	plaintext: &[u8],
	label: &str,
) -> SealResult<Vec<u8>> {
	let session_key = generate_session_key();

	let rsa_ciphertext = public_key
		.encrypt(
			&mut OsRng,
			Oaep::new_with_label::<Sha256, _>(label),
			session_key.as_slice(),
		)
		.map_err(|e| SealError::SealingFailed(format!("session key encryption failed: {e}")))?;
	let rsa_len = u16::try_from(rsa_ciphertext.len())
		.map_err(|_| SealError::SealingFailed("RSA ciphertext exceeds 65535 bytes".to_string()))?;

	let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(session_key.as_slice()));
	let aes_ciphertext = cipher
		.encrypt(Nonce::from_slice(&[0u8; NONCE_SIZE]), plaintext)
		.map_err(|e| SealError::SealingFailed(format!("payload encryption failed: {e}")))?;

	let mut out = Vec::with_capacity(2 + rsa_ciphertext.len() + aes_ciphertext.len());
	out.extend_from_slice(&rsa_len.to_be_bytes());
	out.extend_from_slice(&rsa_ciphertext);
	out.extend_from_slice(&aes_ciphertext);
	Ok(out)
}

/// Reverse of [`hybrid_encrypt`].
pub fn hybrid_decrypt(
	private_key: &RsaPrivateKey,
	ciphertext: &[u8],
	label: &str,
) -> SealResult<Zeroizing<Vec<u8>>> {
	let Some((len_bytes, rest)) = ciphertext.split_first_chunk::<2>() else {
		return Err(SealError::SealingFailed("ciphertext too short".to_string()));
	};
	let rsa_len = u16::from_be_bytes(*len_bytes) as usize;
	if rest.len() < rsa_len {
		return Err(SealError::SealingFailed("ciphertext truncated".to_string()));
	}
	let (rsa_ciphertext, aes_ciphertext) = rest.split_at(rsa_len);

	let session_key = Zeroizing::new(
		private_key
			.decrypt(Oaep::new_with_label::<Sha256, _>(label), rsa_ciphertext)
			.map_err(|e| SealError::SealingFailed(format!("session key decryption failed: {e}")))?,
	);
	if session_key.len() != SESSION_KEY_SIZE {
		return Err(SealError::SealingFailed(format!(
			"session key has {} bytes, expected {SESSION_KEY_SIZE}",
			session_key.len()
		)));
	}

	let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&session_key));
	let plaintext = cipher
		.decrypt(Nonce::from_slice(&[0u8; NONCE_SIZE]), aes_ciphertext)
		.map_err(|e| SealError::SealingFailed(format!("payload decryption failed: {e}")))?;

	Ok(Zeroizing::new(plaintext))
}

/// [`Sealer`] producing controller-compatible SealedSecrets.
#[derive(Debug, Clone, Copy, Default)]
pub struct HybridSealer;

impl Sealer for HybridSealer {
	fn seal(&self, secret: &Secret, public_key: &RsaPublicKey) -> SealResult<SealedSecret> {
		let name = required(secret.metadata.name.as_deref(), "name")?;
		let namespace = required(secret.metadata.namespace.as_deref(), "namespace")?;

		let scope = SealingScope::of(&secret.metadata);
		let label = scope.label(namespace, name);

		let mut encrypted_data = BTreeMap::new();
		for (key, value) in secret.data.iter().flatten() {
			let ciphertext = hybrid_encrypt(public_key, &value.0, &label)?;
			encrypted_data.insert(key.clone(), BASE64.encode(ciphertext));
		}
		for (key, value) in secret.string_data.iter().flatten() {
			let ciphertext = hybrid_encrypt(public_key, value.as_bytes(), &label)?;
			encrypted_data.insert(key.clone(), BASE64.encode(ciphertext));
		}

		let mut template_metadata = secret.metadata.clone();
		template_metadata.owner_references = None;
		if let Some(annotations) = template_metadata.annotations.as_mut() {
			annotations.remove(LAST_APPLIED_ANNOTATION);
			if annotations.is_empty() {
				template_metadata.annotations = None;
			}
		}

		let mut sealed = SealedSecret::new(
			name,
			SealedSecretSpec {
				template: SecretTemplateSpec {
					metadata: template_metadata,
					type_: secret.type_.clone(),
				},
				encrypted_data,
			},
		);
		sealed.metadata.namespace = Some(namespace.to_string());
		sealed.metadata.annotations = scope.annotations();

		tracing::debug!(
			name,
			namespace,
			keys = sealed.spec.encrypted_data.len(),
			scope = ?scope,
			"sealed secret"
		);
		Ok(sealed)
	}
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> SealResult<&'a str> {
	value
		.filter(|v| !v.is_empty())
		.ok_or(SealError::IncompleteSecret(field))
}
