// User and API-key provisioning
//
// Idempotent on the user (looked up by exact email before creating), not on
// the key: every invocation mints a fresh key.

use modelgate_admin::{AdminApi, AdminError, GenerateKeyRequest, NewUserRequest};

/// Ensure a gateway user exists for `email` and generate an API key for
/// them. Returns the new key. The alias defaults to the email local part.
pub async fn provision_key(
    api: &dyn AdminApi,
    email: &str,
    alias: Option<&str>,
) -> Result<String, AdminError> {
    let alias = alias
        .map(str::to_string)
        .unwrap_or_else(|| email.split('@').next().unwrap_or(email).to_string());

    let user_id = match find_user(api, email).await {
        Some(user_id) => {
            tracing::info!(user = %user_id, "user already exists");
            user_id
        }
        None => {
            tracing::info!(email = %email, "creating user");
            let created = api.create_user(&NewUserRequest::viewer(email)).await?;
            let user_id = created.user_id.unwrap_or_default();
            tracing::info!(user = %user_id, "user created");
            user_id
        }
    };

    tracing::info!(alias = %alias, "generating api key");
    let generated = api
        .generate_key(&GenerateKeyRequest::llm_api(&user_id, &alias))
        .await?;
    Ok(generated.key)
}

/// The user_email filter matches partially server-side; post-filter for
/// exact equality. Lookup errors degrade to "not found".
async fn find_user(api: &dyn AdminApi, email: &str) -> Option<String> {
    match api.list_users(email).await {
        Ok(users) => users
            .into_iter()
            .find(|user| user.user_email.as_deref() == Some(email))
            .and_then(|user| user.user_id),
        Err(err) => {
            tracing::warn!(error = %err, "failed to look up user; treating as absent");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelgate_admin::FakeAdmin;

    #[tokio::test]
    async fn existing_user_is_matched_exactly_not_partially() {
        let fake = FakeAdmin::new();
        // partial-match decoy: contains the queried email as a substring
        fake.seed_user("user-decoy", "dev@example.com.backup");
        fake.seed_user("user-real", "dev@example.com");

        let key = provision_key(&fake, "dev@example.com", None).await.unwrap();
        assert!(key.starts_with("sk-fake-"));
        // no new user was created
        assert_eq!(fake.user_count(), 2);

        let requests = fake.key_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].user_id, "user-real");
        assert_eq!(requests[0].key_alias, "dev");
        assert_eq!(requests[0].key_type, "llm_api");
    }

    #[tokio::test]
    async fn missing_user_is_created_first() {
        let fake = FakeAdmin::new();

        provision_key(&fake, "new@example.com", Some("ci-key"))
            .await
            .unwrap();

        assert_eq!(fake.user_count(), 1);
        let requests = fake.key_requests();
        assert_eq!(requests[0].key_alias, "ci-key");
    }
}
