// Router settings reconciliation: aliases and fallbacks
//
// Both are a single read-compare-push per run against the router settings
// object. The push merges into the fetched settings (shallow key overwrite)
// so unrelated router settings survive. Post-push target validation is
// advisory: dangling names are warnings, never failures.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::json;
use serde_json::{Map, Value};

use modelgate_admin::AdminApi;
use modelgate_core::FallbackRule;

use crate::remote::RemoteModels;
use crate::report::ResourceReport;

const ALIASES_KEY: &str = "model_group_alias";
const FALLBACKS_KEY: &str = "fallbacks";

pub async fn sync_aliases(
    api: &dyn AdminApi,
    desired: &BTreeMap<String, String>,
    force: bool,
) -> ResourceReport {
    tracing::info!("syncing aliases");
    let mut report = ResourceReport::default();

    if desired.is_empty() {
        tracing::info!("no aliases configured");
        return report;
    }

    let settings = fetch_router_settings(api).await;
    let current: BTreeMap<String, String> = settings
        .get(ALIASES_KEY)
        .cloned()
        .map(|value| serde_json::from_value(value).unwrap_or_default())
        .unwrap_or_default();

    if !force && current == *desired {
        tracing::info!("aliases already up to date");
        report.skipped += 1;
        return report;
    }

    let mut updated = settings;
    updated.insert(ALIASES_KEY.to_string(), json!(desired));

    match api.update_router_settings(&updated).await {
        Ok(()) => {
            tracing::info!(count = desired.len(), "updated model group aliases");
            if current.is_empty() {
                report.created += 1;
            } else {
                report.replaced += 1;
            }
            validate_alias_targets(api, desired).await;
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to update aliases");
            report.failed += 1;
        }
    }

    report
}

pub async fn sync_fallbacks(
    api: &dyn AdminApi,
    desired: &[FallbackRule],
    force: bool,
) -> ResourceReport {
    tracing::info!("syncing fallbacks");
    let mut report = ResourceReport::default();

    if desired.is_empty() {
        tracing::info!("no fallbacks configured");
        return report;
    }

    let settings = fetch_router_settings(api).await;
    let current: Vec<FallbackRule> = settings
        .get(FALLBACKS_KEY)
        .cloned()
        .map(|value| serde_json::from_value(value).unwrap_or_default())
        .unwrap_or_default();

    // order matters: a reordered target list is a different config
    if !force && current == desired {
        tracing::info!("fallbacks already up to date");
        report.skipped += 1;
        return report;
    }

    let mut updated = settings;
    updated.insert(FALLBACKS_KEY.to_string(), json!(desired));

    match api.update_router_settings(&updated).await {
        Ok(()) => {
            tracing::info!(count = desired.len(), "updated fallback rules");
            if current.is_empty() {
                report.created += 1;
            } else {
                report.replaced += 1;
            }
            validate_fallback_targets(api, desired).await;
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to update fallbacks");
            report.failed += 1;
        }
    }

    report
}

async fn fetch_router_settings(api: &dyn AdminApi) -> Map<String, Value> {
    match api.router_settings().await {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!(error = %err, "failed to fetch router settings; assuming empty");
            Map::new()
        }
    }
}

/// Alias targets must resolve to a known model or another desired alias.
async fn validate_alias_targets(api: &dyn AdminApi, desired: &BTreeMap<String, String>) {
    let remote = RemoteModels::fetch(api).await;
    let mut valid = remote.names();
    valid.extend(desired.keys().cloned());

    for (alias, target) in desired {
        if !valid.contains(target) {
            tracing::warn!(alias = %alias, target = %target, "alias points to a nonexistent model");
        }
    }
}

/// Fallback sources and targets must resolve to a known model or a
/// currently configured alias.
async fn validate_fallback_targets(api: &dyn AdminApi, desired: &[FallbackRule]) {
    let remote = RemoteModels::fetch(api).await;
    let mut valid: BTreeSet<String> = remote.names();

    let settings = fetch_router_settings(api).await;
    let current_aliases: BTreeMap<String, String> = settings
        .get(ALIASES_KEY)
        .cloned()
        .map(|value| serde_json::from_value(value).unwrap_or_default())
        .unwrap_or_default();
    valid.extend(current_aliases.into_keys());

    for rule in desired {
        for (source, targets) in rule.entries() {
            if !valid.contains(source) {
                tracing::warn!(source = %source, "fallback source is not a known model or alias");
            }
            for target in targets {
                if !valid.contains(target) {
                    tracing::warn!(source = %source, target = %target, "fallback target is not a known model or alias");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelgate_admin::FakeAdmin;

    fn aliases(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(alias, target)| (alias.to_string(), target.to_string()))
            .collect()
    }

    fn rule(key: &str, targets: &[&str]) -> FallbackRule {
        FallbackRule(BTreeMap::from([(
            key.to_string(),
            targets.iter().map(|t| t.to_string()).collect(),
        )]))
    }

    #[tokio::test]
    async fn alias_push_preserves_unrelated_router_settings() {
        let fake = FakeAdmin::new();
        fake.set_router_value("routing_strategy", json!("least-busy"));

        let desired = aliases(&[("fast", "foo")]);
        let report = sync_aliases(&fake, &desired, false).await;
        assert_eq!(report.created, 1);

        assert_eq!(fake.router_value("routing_strategy"), Some(json!("least-busy")));
        assert_eq!(
            fake.router_value("model_group_alias"),
            Some(json!({"fast": "foo"}))
        );
    }

    #[tokio::test]
    async fn alias_equal_map_skips_unless_forced() {
        let fake = FakeAdmin::new();
        fake.set_router_value("model_group_alias", json!({"fast": "foo"}));

        let desired = aliases(&[("fast", "foo")]);
        let report = sync_aliases(&fake, &desired, false).await;
        assert_eq!(report.skipped, 1);
        assert_eq!(report.created + report.replaced, 0);

        let report = sync_aliases(&fake, &desired, true).await;
        assert_eq!(report.replaced, 1);
    }

    #[tokio::test]
    async fn alias_with_dangling_target_still_succeeds() {
        let fake = FakeAdmin::new();
        let desired = aliases(&[("fast", "no-such-model")]);

        let report = sync_aliases(&fake, &desired, false).await;
        // validation warns but the push itself succeeded
        assert_eq!(report.created, 1);
        assert_eq!(report.failed, 0);
    }

    #[tokio::test]
    async fn empty_alias_map_is_a_no_op() {
        let fake = FakeAdmin::new();
        let report = sync_aliases(&fake, &BTreeMap::new(), true).await;
        assert_eq!(report, ResourceReport::default());
        assert_eq!(fake.router_value("model_group_alias"), None);
    }

    #[tokio::test]
    async fn fallback_equality_is_order_sensitive() {
        let fake = FakeAdmin::new();
        fake.set_router_value("fallbacks", json!([{"m": ["a", "b"]}]));

        let same_order = vec![rule("m", &["a", "b"])];
        let report = sync_fallbacks(&fake, &same_order, false).await;
        assert_eq!(report.skipped, 1);

        let reordered = vec![rule("m", &["b", "a"])];
        let report = sync_fallbacks(&fake, &reordered, false).await;
        assert_eq!(report.replaced, 1);
        assert_eq!(
            fake.router_value("fallbacks"),
            Some(json!([{"m": ["b", "a"]}]))
        );
    }

    #[tokio::test]
    async fn fallback_push_merges_into_existing_settings() {
        let fake = FakeAdmin::new();
        fake.set_router_value("model_group_alias", json!({"fast": "foo"}));

        let desired = vec![rule("foo", &["bar"])];
        let report = sync_fallbacks(&fake, &desired, false).await;
        assert_eq!(report.created, 1);
        // aliases survived the fallback push
        assert_eq!(
            fake.router_value("model_group_alias"),
            Some(json!({"fast": "foo"}))
        );
    }
}
