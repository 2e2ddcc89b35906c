// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The `bitnami.com/v1alpha1` SealedSecret resource.

use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// Spec of a SealedSecret: the Secret template plus one ciphertext per key.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[kube(
	group = "bitnami.com",
	version = "v1alpha1",
	kind = "SealedSecret",
	namespaced,
	derive = "PartialEq",
	schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct SealedSecretSpec {
	pub template: SecretTemplateSpec,
	/// Base64 hybrid ciphertext per data key.
	pub encrypted_data: BTreeMap<String, String>,
}

/// Metadata and type of the Secret the controller will unseal.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SecretTemplateSpec {
	#[serde(default)]
	pub metadata: ObjectMeta,
	#[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
	pub type_: Option<String>,
}
