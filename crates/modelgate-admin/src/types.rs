// Wire types for the gateway admin API
//
// Request shapes serialize exactly what the gateway expects; response shapes
// default every field so schema drift degrades to "absent" instead of a
// decode failure.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Payload for POST /credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPayload {
    pub credential_name: String,
    pub credential_values: CredentialValues,
    pub credential_info: CredentialInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialValues {
    pub api_key: String,
    pub api_base: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialInfo {
    pub custom_llm_provider: String,
}

/// GET /credentials returns either `{"credentials": [...]}` or a bare
/// array depending on gateway version; both are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CredentialListResponse {
    Wrapped { credentials: Vec<CredentialEntry> },
    Bare(Vec<CredentialEntry>),
}

#[derive(Debug, Deserialize)]
pub struct CredentialEntry {
    #[serde(default)]
    pub credential_name: Option<String>,
}

impl CredentialListResponse {
    /// Credential names only; entries without one are ignored.
    pub fn names(self) -> Vec<String> {
        let entries = match self {
            CredentialListResponse::Wrapped { credentials } => credentials,
            CredentialListResponse::Bare(entries) => entries,
        };
        entries
            .into_iter()
            .filter_map(|entry| entry.credential_name)
            .collect()
    }
}

/// One registration as reported by GET /v2/model/info.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteModel {
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub litellm_params: Map<String, Value>,
    #[serde(default)]
    pub model_info: Map<String, Value>,
}

impl RemoteModel {
    pub fn id(&self) -> Option<&str> {
        self.model_info.get("id").and_then(Value::as_str)
    }

    pub fn credential_name(&self) -> Option<&str> {
        self.litellm_params
            .get("litellm_credential_name")
            .and_then(Value::as_str)
    }
}

#[derive(Debug, Deserialize)]
pub struct ModelListResponse {
    #[serde(default)]
    pub data: Vec<RemoteModel>,
}

/// Body for POST /model/new and PATCH /model/{id}/update. Identical to the
/// resolved registration plus the audit stamps added at write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelUpsert {
    pub model_name: String,
    pub litellm_params: Map<String, Value>,
    pub model_info: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct RouterSettingsResponse {
    #[serde(default)]
    pub current_values: Map<String, Value>,
}

/// GET /key/info, identity metadata for the calling bearer token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyInfo {
    #[serde(default)]
    pub info: KeyInfoDetails,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyInfoDetails {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub team_id: Option<String>,
}

impl KeyInfo {
    /// user_id, else team_id; empty strings count as absent.
    pub fn actor(&self) -> Option<&str> {
        self.info
            .user_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or(self.info.team_id.as_deref().filter(|id| !id.is_empty()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserListResponse {
    #[serde(default)]
    pub users: Vec<UserRecord>,
}

/// Body for POST /user/new.
#[derive(Debug, Clone, Serialize)]
pub struct NewUserRequest {
    pub user_id: Option<String>,
    pub user_email: String,
    pub user_role: String,
    pub models: Vec<String>,
    pub auto_create_key: bool,
}

impl NewUserRequest {
    /// Least-privilege onboarding default: read-only viewer, no auto key.
    pub fn viewer(email: &str) -> Self {
        Self {
            user_id: None,
            user_email: email.to_string(),
            user_role: "internal_user_viewer".to_string(),
            models: vec!["General".to_string()],
            auto_create_key: false,
        }
    }
}

/// Body for POST /key/generate.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateKeyRequest {
    pub user_id: String,
    pub team_id: Option<String>,
    pub key_alias: String,
    pub models: Vec<String>,
    pub key_type: String,
    pub metadata: Map<String, Value>,
}

impl GenerateKeyRequest {
    pub fn llm_api(user_id: &str, alias: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            team_id: None,
            key_alias: alias.to_string(),
            models: vec!["all-team-models".to_string()],
            key_type: "llm_api".to_string(),
            metadata: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedKey {
    pub key: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn credential_list_accepts_both_shapes() {
        let wrapped: CredentialListResponse = serde_json::from_value(json!({
            "credentials": [
                {"credential_name": "acme-openai"},
                {"other_field": true}
            ]
        }))
        .unwrap();
        assert_eq!(wrapped.names(), vec!["acme-openai"]);

        let bare: CredentialListResponse =
            serde_json::from_value(json!([{"credential_name": "acme-gemini"}])).unwrap();
        assert_eq!(bare.names(), vec!["acme-gemini"]);
    }

    #[test]
    fn key_info_actor_prefers_user_id_and_skips_empty() {
        let both: KeyInfo = serde_json::from_value(json!({
            "info": {"user_id": "user-1", "team_id": "team-1"}
        }))
        .unwrap();
        assert_eq!(both.actor(), Some("user-1"));

        let team_only: KeyInfo = serde_json::from_value(json!({
            "info": {"user_id": "", "team_id": "team-1"}
        }))
        .unwrap();
        assert_eq!(team_only.actor(), Some("team-1"));

        let neither: KeyInfo = serde_json::from_value(json!({"info": {}})).unwrap();
        assert_eq!(neither.actor(), None);
    }

    #[test]
    fn remote_model_reads_id_and_credential() {
        let model: RemoteModel = serde_json::from_value(json!({
            "model_name": "foo",
            "litellm_params": {"litellm_credential_name": "acme-openai"},
            "model_info": {"id": "abc-123"}
        }))
        .unwrap();
        assert_eq!(model.id(), Some("abc-123"));
        assert_eq!(model.credential_name(), Some("acme-openai"));
    }
}
