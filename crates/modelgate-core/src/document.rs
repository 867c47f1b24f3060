// Config document model
//
// Two layers: the on-disk document (providers kept as raw JSON until $extend
// resolution) and the resolved artifact (flat credential and model lists,
// ready for upsert with no further lookups downstream).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level config document, as written on disk (base or local override).
///
/// Provider blocks stay as raw JSON here because `$extend` resolution merges
/// them structurally before any typed interpretation happens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub providers: Map<String, Value>,
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    #[serde(default)]
    pub fallbacks: Vec<FallbackRule>,
}

/// One fallback rule: a source model/alias mapped to the ordered list of
/// targets to try when it fails. Written in config as a single-key map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FallbackRule(pub BTreeMap<String, Vec<String>>);

impl FallbackRule {
    pub fn entries(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }
}

/// A provider block after `$extend` resolution.
///
/// The map key in the document is the provider's `service_name`; it is not
/// repeated inside the block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Provider {
    /// Upstream API key. A provider without one contributes no credentials
    /// and no models.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Upstream endpoint, without the interface-specific path suffix.
    #[serde(default)]
    pub api_base: String,

    /// Default access groups for every model under this provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_groups: Option<Vec<String>>,

    /// Wire-protocol dialects this provider is addressed with. A null value
    /// registers the interface (and its credential) with no models.
    #[serde(default)]
    pub interfaces: BTreeMap<String, Option<InterfaceConfig>>,
}

/// Per-interface config: the models registered through that dialect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterfaceConfig {
    #[serde(default)]
    pub models: BTreeMap<String, Option<ModelOverride>>,
}

/// Optional per-model overrides. All fields default; a bare `null` entry
/// registers the model under its raw id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelOverride {
    /// Public name for the model group; defaults to the raw model id.
    #[serde(default)]
    pub model_name: Option<String>,

    /// model_info fragment merged into the registration (base_model etc.).
    #[serde(default)]
    pub model_info: Map<String, Value>,

    /// litellm_params fragment merged into the registration.
    #[serde(default)]
    pub litellm_params: Map<String, Value>,

    /// Overrides the provider-level access groups. An explicit empty list
    /// suppresses them.
    #[serde(default)]
    pub access_groups: Option<Vec<String>>,
}

/// One credential to upsert: the (service, interface) pair plus the secrets
/// it carries. Remote name is `"{service_name}-{interface}"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSpec {
    pub service_name: String,
    #[serde(rename = "provider")]
    pub interface: String,
    pub api_key: String,
    pub api_base: String,
}

impl CredentialSpec {
    pub fn credential_name(&self) -> String {
        format!("{}-{}", self.service_name, self.interface)
    }
}

/// One model registration, keyed remotely by (model_name, credential_name).
/// Serializes to exactly the upsert payload shape (audit stamps are added by
/// the reconciler at write time).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRegistration {
    pub model_name: String,
    pub litellm_params: Map<String, Value>,
    pub model_info: Map<String, Value>,
}

impl ModelRegistration {
    pub fn credential_name(&self) -> &str {
        self.litellm_params
            .get("litellm_credential_name")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// The remote identity key for duplicate detection and pruning.
    pub fn key(&self) -> (String, String) {
        (self.model_name.clone(), self.credential_name().to_string())
    }
}

/// The fully-resolved artifact consumed by the reconciler: four flat arrays,
/// plain data, no further environment lookups required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolvedConfig {
    pub credentials: Vec<CredentialSpec>,
    pub models: Vec<ModelRegistration>,
    pub aliases: BTreeMap<String, String>,
    pub fallbacks: Vec<FallbackRule>,
}
