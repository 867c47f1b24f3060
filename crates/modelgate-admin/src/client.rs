// HTTP client for the gateway admin API
//
// Thin reqwest wrapper: every request carries the bearer token, every
// non-success response becomes AdminError::Api with status and body.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Map, Value};

use crate::api::AdminApi;
use crate::error::AdminError;
use crate::types::{
    CredentialListResponse, CredentialPayload, GenerateKeyRequest, GeneratedKey, KeyInfo,
    ModelListResponse, ModelUpsert, NewUserRequest, RemoteModel, RouterSettingsResponse,
    UserListResponse, UserRecord,
};

pub struct HttpAdminClient {
    base_url: String,
    token: String,
    http: reqwest::Client,
}

impl HttpAdminClient {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.http.request(method, url).bearer_auth(&self.token)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AdminError> {
        let response = self.request(Method::GET, path).send().await?;
        Self::decode(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AdminError> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        Self::decode(response).await
    }

    async fn post_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<(), AdminError> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        Self::expect_success(response).await
    }

    async fn patch_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<(), AdminError> {
        let response = self.request(Method::PATCH, path).json(body).send().await?;
        Self::expect_success(response).await
    }

    async fn delete_unit(&self, path: &str) -> Result<(), AdminError> {
        let response = self.request(Method::DELETE, path).send().await?;
        Self::expect_success(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, AdminError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdminError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }

    async fn expect_success(response: Response) -> Result<(), AdminError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdminError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AdminApi for HttpAdminClient {
    async fn list_credentials(&self) -> Result<Vec<String>, AdminError> {
        let response: CredentialListResponse = self.get("/credentials").await?;
        Ok(response.names())
    }

    async fn create_credential(&self, payload: &CredentialPayload) -> Result<(), AdminError> {
        self.post_unit("/credentials", payload).await
    }

    async fn delete_credential(&self, name: &str) -> Result<(), AdminError> {
        self.delete_unit(&format!("/credentials/{name}")).await
    }

    async fn list_models(&self) -> Result<Vec<RemoteModel>, AdminError> {
        let response: ModelListResponse =
            self.get("/v2/model/info?include_team_models=true").await?;
        Ok(response.data)
    }

    async fn create_model(&self, model: &ModelUpsert) -> Result<(), AdminError> {
        self.post_unit("/model/new", model).await
    }

    async fn update_model(&self, id: &str, model: &ModelUpsert) -> Result<(), AdminError> {
        self.patch_unit(&format!("/model/{id}/update"), model).await
    }

    async fn delete_model(&self, id: &str) -> Result<(), AdminError> {
        self.post_unit("/model/delete", &json!({ "id": id })).await
    }

    async fn router_settings(&self) -> Result<Map<String, Value>, AdminError> {
        let response: RouterSettingsResponse = self.get("/router/settings").await?;
        Ok(response.current_values)
    }

    async fn update_router_settings(
        &self,
        settings: &Map<String, Value>,
    ) -> Result<(), AdminError> {
        self.post_unit("/config/update", &json!({ "router_settings": settings }))
            .await
    }

    async fn key_info(&self) -> Result<KeyInfo, AdminError> {
        self.get("/key/info").await
    }

    async fn list_users(&self, email_query: &str) -> Result<Vec<UserRecord>, AdminError> {
        let response = self
            .request(Method::GET, "/user/list")
            .query(&[
                ("user_email", email_query),
                ("page", "1"),
                ("page_size", "100"),
            ])
            .send()
            .await?;
        let decoded: UserListResponse = Self::decode(response).await?;
        Ok(decoded.users)
    }

    async fn create_user(&self, request: &NewUserRequest) -> Result<UserRecord, AdminError> {
        self.post("/user/new", request).await
    }

    async fn generate_key(
        &self,
        request: &GenerateKeyRequest,
    ) -> Result<GeneratedKey, AdminError> {
        self.post("/key/generate", request).await
    }
}
