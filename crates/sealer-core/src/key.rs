// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Extracts the RSA sealing key from a PEM certificate.

use rsa::pkcs8::DecodePublicKey;
use rsa::RsaPublicKey;
use x509_cert::der::{DecodePem, Encode};
use x509_cert::spki::ObjectIdentifier;
use x509_cert::Certificate;

use crate::error::{SealError, SealResult};

const EC_PUBLIC_KEY_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
const ED25519_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.112");

const PEM_BEGIN: &str = "-----BEGIN ";
const PEM_END: &str = "-----END ";
const PEM_DASHES: &str = "-----";
const CERTIFICATE_LABEL: &str = "CERTIFICATE";

/// Parse the first certificate in a PEM bundle and return its RSA public key.
///
/// Blocks with other labels (private keys, CSRs) and text between blocks are
/// skipped. Every `CERTIFICATE` block must decode.
pub fn parse_public_key(pem: &[u8]) -> SealResult<RsaPublicKey> {
	let text = String::from_utf8_lossy(pem);
	let certs = pem_blocks(&text)
		.into_iter()
		.filter(|(label, _)| *label == CERTIFICATE_LABEL)
		.map(|(_, block)| {
			Certificate::from_pem(block.as_bytes())
				.map_err(|e| SealError::NoCertificatesFound(e.to_string()))
		})
		.collect::<SealResult<Vec<_>>>()?;
	let Some(cert) = certs.into_iter().next() else {
		return Err(SealError::NoCertificatesFound(
			"no PEM certificate blocks in input".to_string(),
		));
	};

	let spki = cert.tbs_certificate.subject_public_key_info;
	if spki.algorithm.oid != rsa::pkcs1::ALGORITHM_OID {
		return Err(SealError::UnsupportedKeyType(describe_algorithm(
			spki.algorithm.oid,
		)));
	}

	let der = spki
		.to_der()
		.map_err(|e| SealError::UnsupportedKeyType(format!("RSA key ({e})")))?;
	RsaPublicKey::from_public_key_der(&der)
		.map_err(|e| SealError::UnsupportedKeyType(format!("RSA key ({e})")))
}

/// Split `text` into `(label, block)` pairs, each block running from its
/// BEGIN line through the matching END line. Unterminated blocks are dropped.
fn pem_blocks(text: &str) -> Vec<(&str, &str)> {
	let mut blocks = Vec::new();
	let mut rest = text;
	while let Some(start) = rest.find(PEM_BEGIN) {
		let block = &rest[start..];
		let after_begin = &block[PEM_BEGIN.len()..];
		let Some(label_len) = after_begin.find(PEM_DASHES) else {
			break;
		};
		let label = &after_begin[..label_len];
		if label.contains('\n') {
			rest = after_begin;
			continue;
		}

		let end_line = format!("{PEM_END}{label}{PEM_DASHES}");
		let Some(end) = block.find(&end_line) else {
			rest = after_begin;
			continue;
		};
		let len = end + end_line.len();
		blocks.push((label, &block[..len]));
		rest = &block[len..];
	}
	blocks
}

fn describe_algorithm(oid: ObjectIdentifier) -> String {
	if oid == EC_PUBLIC_KEY_OID {
		"ECDSA key".to_string()
	} else if oid == ED25519_OID {
		"Ed25519 key".to_string()
	} else {
		format!("key with algorithm {oid}")
	}
}
