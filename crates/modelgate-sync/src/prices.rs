// Price refresh
//
// Walks the remote model list and patches each registration with the cost
// fields found in the public pricing catalog. Missing price data skips the
// model; nothing here is fatal.

use serde_json::Value;

use modelgate_admin::{price_fields, AdminApi, ModelUpsert, PricingCatalog};

use crate::audit::utc_now_millis;
use crate::report::ResourceReport;

pub async fn refresh_prices(
    api: &dyn AdminApi,
    catalog: &PricingCatalog,
    actor: &str,
    dry_run: bool,
) -> ResourceReport {
    let mut report = ResourceReport::default();

    let models = match api.list_models().await {
        Ok(models) => models,
        Err(err) => {
            tracing::warn!(error = %err, "failed to fetch models for price refresh");
            return report;
        }
    };
    tracing::info!(
        models = models.len(),
        catalog_entries = catalog.len(),
        "refreshing model prices"
    );

    for model in models {
        let Some(name) = model.model_name.clone() else {
            continue;
        };
        let Some(id) = model.id().map(str::to_string) else {
            tracing::warn!(model = %name, "model has no id; skipping");
            continue;
        };

        let fields = catalog.find(&name).map(price_fields).unwrap_or_default();
        if fields.is_empty() {
            tracing::info!(model = %name, "no pricing found; skipping");
            report.skipped += 1;
            continue;
        }

        let mut model_info = model.model_info.clone();
        for (key, value) in fields {
            model_info.insert(key, value);
        }
        model_info.insert(
            "updated_at".to_string(),
            Value::String(utc_now_millis()),
        );
        model_info.insert("updated_by".to_string(), Value::String(actor.to_string()));

        if dry_run {
            tracing::info!(model = %name, id = %id, "dry run: would update pricing");
            report.skipped += 1;
            continue;
        }

        let upsert = ModelUpsert {
            model_name: name.clone(),
            litellm_params: model.litellm_params.clone(),
            model_info,
        };
        match api.update_model(&id, &upsert).await {
            Ok(()) => {
                tracing::info!(model = %name, id = %id, "updated pricing");
                report.replaced += 1;
            }
            Err(err) => {
                tracing::error!(model = %name, id = %id, error = %err, "failed to update pricing");
                report.failed += 1;
            }
        }
    }

    tracing::info!(
        updated = report.replaced,
        skipped = report.skipped,
        failed = report.failed,
        "price refresh complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelgate_admin::FakeAdmin;
    use serde_json::json;

    fn catalog() -> PricingCatalog {
        PricingCatalog::from_map(
            json!({
                "flash": {
                    "input_cost_per_token": 0.001,
                    "output_cost_per_token": 0.002,
                    "max_tokens": 128000
                }
            })
            .as_object()
            .unwrap()
            .clone(),
        )
    }

    #[tokio::test]
    async fn patches_cost_fields_and_stamps_update() {
        let fake = FakeAdmin::new();
        fake.seed_model("flash", "acme-gemini");
        fake.seed_model("unpriced", "acme-gemini");

        let report = refresh_prices(&fake, &catalog(), "tester", false).await;
        assert_eq!(report.replaced, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, 0);

        let stored = fake.models_for("flash", "acme-gemini");
        let info = &stored[0].model_info;
        assert_eq!(info["input_cost_per_token"], 0.001);
        assert_eq!(info["updated_by"], "tester");
        // non-cost catalog fields never leak into model_info
        assert!(!info.contains_key("max_tokens"));
    }

    #[tokio::test]
    async fn prefix_stripped_lookup_finds_catalog_entry() {
        let fake = FakeAdmin::new();
        fake.seed_model("gemini-flash-thinking", "acme-gemini");

        let report = refresh_prices(&fake, &catalog(), "tester", false).await;
        assert_eq!(report.replaced, 1);
    }

    #[tokio::test]
    async fn dry_run_writes_nothing() {
        let fake = FakeAdmin::new();
        fake.seed_model("flash", "acme-gemini");

        let report = refresh_prices(&fake, &catalog(), "tester", true).await;
        assert_eq!(report.replaced, 0);
        assert_eq!(report.skipped, 1);

        let stored = fake.models_for("flash", "acme-gemini");
        assert!(!stored[0].model_info.contains_key("input_cost_per_token"));
    }
}
