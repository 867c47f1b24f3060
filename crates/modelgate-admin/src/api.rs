// AdminApi trait: the seam between reconciliation and transport

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::AdminError;
use crate::types::{
    CredentialPayload, GenerateKeyRequest, GeneratedKey, KeyInfo, ModelUpsert, NewUserRequest,
    RemoteModel, UserRecord,
};

/// Everything the sync engine needs from the gateway. Implemented by the
/// reqwest-backed client and by the in-memory fake used in tests.
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// GET /credentials, names only.
    async fn list_credentials(&self) -> Result<Vec<String>, AdminError>;

    /// POST /credentials.
    async fn create_credential(&self, payload: &CredentialPayload) -> Result<(), AdminError>;

    /// DELETE /credentials/{name}.
    async fn delete_credential(&self, name: &str) -> Result<(), AdminError>;

    /// GET /v2/model/info?include_team_models=true.
    async fn list_models(&self) -> Result<Vec<RemoteModel>, AdminError>;

    /// POST /model/new.
    async fn create_model(&self, model: &ModelUpsert) -> Result<(), AdminError>;

    /// PATCH /model/{id}/update.
    async fn update_model(&self, id: &str, model: &ModelUpsert) -> Result<(), AdminError>;

    /// POST /model/delete with body `{"id": ...}`.
    async fn delete_model(&self, id: &str) -> Result<(), AdminError>;

    /// GET /router/settings, unwrapped to the current_values map.
    async fn router_settings(&self) -> Result<Map<String, Value>, AdminError>;

    /// POST /config/update with `{"router_settings": ...}`. Callers merge
    /// their changes into the fetched settings first; this replaces the
    /// whole router_settings object server-side.
    async fn update_router_settings(&self, settings: &Map<String, Value>)
        -> Result<(), AdminError>;

    /// GET /key/info, the identity of the calling token.
    async fn key_info(&self) -> Result<KeyInfo, AdminError>;

    /// GET /user/list with a partial-match email filter. Callers must
    /// post-filter for exact equality.
    async fn list_users(&self, email_query: &str) -> Result<Vec<UserRecord>, AdminError>;

    /// POST /user/new.
    async fn create_user(&self, request: &NewUserRequest) -> Result<UserRecord, AdminError>;

    /// POST /key/generate.
    async fn generate_key(&self, request: &GenerateKeyRequest)
        -> Result<GeneratedKey, AdminError>;
}
