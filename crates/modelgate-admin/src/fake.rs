// In-memory AdminApi implementation for tests
//
// Decision: parking_lot locks with no await held across a lock section.
// Model ids are minted as "model-{n}"; users as "user-{n}".

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Map, Value};

use crate::api::AdminApi;
use crate::error::AdminError;
use crate::types::{
    CredentialPayload, GenerateKeyRequest, GeneratedKey, KeyInfo, KeyInfoDetails, ModelUpsert,
    NewUserRequest, RemoteModel, UserRecord,
};

/// In-memory gateway. State is lost on drop; failure flags let tests
/// exercise the degrade paths.
#[derive(Default)]
pub struct FakeAdmin {
    state: RwLock<FakeState>,
}

#[derive(Default)]
struct FakeState {
    credentials: BTreeMap<String, CredentialPayload>,
    models: Vec<(String, ModelUpsert)>,
    router: Map<String, Value>,
    users: Vec<UserRecord>,
    key_requests: Vec<GenerateKeyRequest>,
    key_identity: KeyInfoDetails,
    next_id: u64,
    fail_list_credentials: bool,
    fail_list_models: bool,
    fail_create_model: bool,
    fail_key_info: bool,
}

impl FakeAdmin {
    pub fn new() -> Self {
        Self::default()
    }

    fn injected_failure() -> AdminError {
        AdminError::Api {
            status: 500,
            body: "injected failure".to_string(),
        }
    }

    fn not_found(what: &str) -> AdminError {
        AdminError::Api {
            status: 404,
            body: format!("{what} not found"),
        }
    }

    // ---- seeding ----

    pub fn seed_credential(&self, name: &str) {
        let payload = CredentialPayload {
            credential_name: name.to_string(),
            credential_values: crate::types::CredentialValues {
                api_key: "seeded".to_string(),
                api_base: "http://seeded".to_string(),
            },
            credential_info: crate::types::CredentialInfo {
                custom_llm_provider: "seeded".to_string(),
            },
        };
        self.state
            .write()
            .credentials
            .insert(name.to_string(), payload);
    }

    pub fn seed_model(&self, model_name: &str, credential_name: &str) -> String {
        let mut state = self.state.write();
        state.next_id += 1;
        let id = format!("model-{}", state.next_id);

        let mut litellm_params = Map::new();
        litellm_params.insert(
            "litellm_credential_name".to_string(),
            Value::String(credential_name.to_string()),
        );
        state.models.push((
            id.clone(),
            ModelUpsert {
                model_name: model_name.to_string(),
                litellm_params,
                model_info: Map::new(),
            },
        ));
        id
    }

    pub fn seed_user(&self, user_id: &str, email: &str) {
        self.state.write().users.push(UserRecord {
            user_id: Some(user_id.to_string()),
            user_email: Some(email.to_string()),
        });
    }

    pub fn set_key_identity(&self, user_id: Option<&str>, team_id: Option<&str>) {
        self.state.write().key_identity = KeyInfoDetails {
            user_id: user_id.map(str::to_string),
            team_id: team_id.map(str::to_string),
        };
    }

    pub fn set_router_value(&self, key: &str, value: Value) {
        self.state.write().router.insert(key.to_string(), value);
    }

    // ---- failure injection ----

    pub fn fail_list_credentials(&self) {
        self.state.write().fail_list_credentials = true;
    }

    pub fn fail_list_models(&self) {
        self.state.write().fail_list_models = true;
    }

    pub fn fail_create_model(&self) {
        self.state.write().fail_create_model = true;
    }

    pub fn fail_key_info(&self) {
        self.state.write().fail_key_info = true;
    }

    // ---- inspection ----

    pub fn credential_names(&self) -> Vec<String> {
        self.state.read().credentials.keys().cloned().collect()
    }

    pub fn credential(&self, name: &str) -> Option<CredentialPayload> {
        self.state.read().credentials.get(name).cloned()
    }

    pub fn stored_models(&self) -> Vec<(String, ModelUpsert)> {
        self.state.read().models.clone()
    }

    pub fn models_for(&self, model_name: &str, credential_name: &str) -> Vec<ModelUpsert> {
        self.state
            .read()
            .models
            .iter()
            .filter(|(_, model)| {
                model.model_name == model_name
                    && model
                        .litellm_params
                        .get("litellm_credential_name")
                        .and_then(Value::as_str)
                        == Some(credential_name)
            })
            .map(|(_, model)| model.clone())
            .collect()
    }

    pub fn router_value(&self, key: &str) -> Option<Value> {
        self.state.read().router.get(key).cloned()
    }

    pub fn key_requests(&self) -> Vec<GenerateKeyRequest> {
        self.state.read().key_requests.clone()
    }

    pub fn user_count(&self) -> usize {
        self.state.read().users.len()
    }
}

#[async_trait]
impl AdminApi for FakeAdmin {
    async fn list_credentials(&self) -> Result<Vec<String>, AdminError> {
        let state = self.state.read();
        if state.fail_list_credentials {
            return Err(Self::injected_failure());
        }
        Ok(state.credentials.keys().cloned().collect())
    }

    async fn create_credential(&self, payload: &CredentialPayload) -> Result<(), AdminError> {
        self.state
            .write()
            .credentials
            .insert(payload.credential_name.clone(), payload.clone());
        Ok(())
    }

    async fn delete_credential(&self, name: &str) -> Result<(), AdminError> {
        match self.state.write().credentials.remove(name) {
            Some(_) => Ok(()),
            None => Err(Self::not_found("credential")),
        }
    }

    async fn list_models(&self) -> Result<Vec<RemoteModel>, AdminError> {
        let state = self.state.read();
        if state.fail_list_models {
            return Err(Self::injected_failure());
        }
        Ok(state
            .models
            .iter()
            .map(|(id, model)| {
                let mut model_info = model.model_info.clone();
                model_info.insert("id".to_string(), Value::String(id.clone()));
                RemoteModel {
                    model_name: Some(model.model_name.clone()),
                    litellm_params: model.litellm_params.clone(),
                    model_info,
                }
            })
            .collect())
    }

    async fn create_model(&self, model: &ModelUpsert) -> Result<(), AdminError> {
        let mut state = self.state.write();
        if state.fail_create_model {
            return Err(Self::injected_failure());
        }
        state.next_id += 1;
        let id = format!("model-{}", state.next_id);
        state.models.push((id, model.clone()));
        Ok(())
    }

    async fn update_model(&self, id: &str, model: &ModelUpsert) -> Result<(), AdminError> {
        let mut state = self.state.write();
        match state.models.iter_mut().find(|(model_id, _)| model_id == id) {
            Some((_, slot)) => {
                *slot = model.clone();
                Ok(())
            }
            None => Err(Self::not_found("model")),
        }
    }

    async fn delete_model(&self, id: &str) -> Result<(), AdminError> {
        let mut state = self.state.write();
        let before = state.models.len();
        state.models.retain(|(model_id, _)| model_id != id);
        if state.models.len() == before {
            return Err(Self::not_found("model"));
        }
        Ok(())
    }

    async fn router_settings(&self) -> Result<Map<String, Value>, AdminError> {
        Ok(self.state.read().router.clone())
    }

    async fn update_router_settings(
        &self,
        settings: &Map<String, Value>,
    ) -> Result<(), AdminError> {
        self.state.write().router = settings.clone();
        Ok(())
    }

    async fn key_info(&self) -> Result<KeyInfo, AdminError> {
        let state = self.state.read();
        if state.fail_key_info {
            return Err(Self::injected_failure());
        }
        Ok(KeyInfo {
            info: state.key_identity.clone(),
        })
    }

    async fn list_users(&self, email_query: &str) -> Result<Vec<UserRecord>, AdminError> {
        // the real endpoint is a partial-match filter
        Ok(self
            .state
            .read()
            .users
            .iter()
            .filter(|user| {
                user.user_email
                    .as_deref()
                    .is_some_and(|email| email.contains(email_query))
            })
            .cloned()
            .collect())
    }

    async fn create_user(&self, request: &NewUserRequest) -> Result<UserRecord, AdminError> {
        let mut state = self.state.write();
        state.next_id += 1;
        let record = UserRecord {
            user_id: Some(format!("user-{}", state.next_id)),
            user_email: Some(request.user_email.clone()),
        };
        state.users.push(record.clone());
        Ok(record)
    }

    async fn generate_key(
        &self,
        request: &GenerateKeyRequest,
    ) -> Result<GeneratedKey, AdminError> {
        let mut state = self.state.write();
        state.next_id += 1;
        let key = format!("sk-fake-{}", state.next_id);
        state.key_requests.push(request.clone());
        Ok(GeneratedKey {
            key,
            user_id: Some(request.user_id.clone()),
        })
    }
}
