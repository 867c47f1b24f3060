// Audit identity and timestamps
//
// Every model write is stamped with the invoking actor and a
// millisecond-precision UTC timestamp (ISO-8601, literal Z suffix).

use chrono::{SecondsFormat, Utc};
use modelgate_admin::AdminApi;

/// Resolve the actor identity stamped into created_by/updated_by fields:
/// the calling key's user_id, else its team_id, else a prefix of the bearer
/// token itself. Resolved once per run.
pub async fn resolve_actor(api: &dyn AdminApi, api_key: &str) -> String {
    match api.key_info().await {
        Ok(info) => info
            .actor()
            .map(str::to_string)
            .unwrap_or_else(|| key_prefix(api_key)),
        Err(err) => {
            tracing::warn!(error = %err, "failed to resolve actor from key info");
            key_prefix(api_key)
        }
    }
}

fn key_prefix(api_key: &str) -> String {
    api_key.chars().take(20).collect()
}

pub(crate) fn utc_now_millis() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelgate_admin::FakeAdmin;

    #[tokio::test]
    async fn actor_prefers_key_identity() {
        let fake = FakeAdmin::new();
        fake.set_key_identity(Some("user-7"), Some("team-9"));
        assert_eq!(resolve_actor(&fake, "sk-abc").await, "user-7");

        fake.set_key_identity(None, Some("team-9"));
        assert_eq!(resolve_actor(&fake, "sk-abc").await, "team-9");
    }

    #[tokio::test]
    async fn actor_falls_back_to_key_prefix() {
        let fake = FakeAdmin::new();
        fake.fail_key_info();
        let long_key = "sk-0123456789abcdefghijklmnop";
        assert_eq!(resolve_actor(&fake, long_key).await, "sk-0123456789abcdefg");
    }

    #[test]
    fn timestamp_is_millisecond_utc_with_z() {
        let stamp = utc_now_millis();
        assert!(stamp.ends_with('Z'));
        let parsed = chrono::DateTime::parse_from_rfc3339(&stamp).unwrap();
        assert_eq!(parsed.timezone().utc_minus_local(), 0);
        // fractional seconds carry exactly three digits
        let fraction = stamp.split('.').nth(1).unwrap();
        assert_eq!(fraction.len(), "123Z".len());
    }
}
