// Model reconciliation
//
// Same batched shape as credentials, with two twists: the remote key maps
// to a *list* of ids (duplicates from prior partial runs), and every write
// is stamped with audit fields. On force, every existing id under the key
// is deleted before one fresh registration is created.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use modelgate_admin::{AdminApi, ModelUpsert};
use modelgate_core::ModelRegistration;

use crate::audit::utc_now_millis;
use crate::engine::{SyncOptions, WORKER_SLOTS};
use crate::remote::RemoteModels;
use crate::report::{Outcome, ResourceReport};

pub async fn sync_models(
    api: Arc<dyn AdminApi>,
    expected: &[ModelRegistration],
    options: SyncOptions,
    actor: &str,
) -> ResourceReport {
    tracing::info!("syncing models");
    let remote = RemoteModels::fetch(api.as_ref()).await;

    let mut expected_keys = HashSet::new();
    let semaphore = Arc::new(Semaphore::new(WORKER_SLOTS));
    let mut tasks = JoinSet::new();

    for registration in expected {
        let key = registration.key();
        expected_keys.insert(key.clone());

        let existing_ids = remote.ids(&key).to_vec();
        let registration = registration.clone();
        let api = api.clone();
        let force = options.force;
        let actor = actor.to_string();
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("semaphore closed");

        tasks.spawn(async move {
            let _permit = permit;
            apply_model(api.as_ref(), &registration, &existing_ids, force, &actor).await
        });
    }

    let mut report = ResourceReport::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => report.record(outcome),
            Err(err) => {
                tracing::error!(error = %err, "model task panicked");
                report.record(Outcome::Failed);
            }
        }
    }

    if options.prune {
        prune_models(api.as_ref(), &remote, &expected_keys, &mut report).await;
    }

    tracing::info!(
        created = report.created,
        replaced = report.replaced,
        skipped = report.skipped,
        deleted = report.deleted,
        failed = report.failed,
        status = %report.status(),
        "models synced"
    );
    report
}

async fn apply_model(
    api: &dyn AdminApi,
    registration: &ModelRegistration,
    existing_ids: &[String],
    force: bool,
    actor: &str,
) -> Outcome {
    let name = &registration.model_name;
    let credential = registration.credential_name();

    if !existing_ids.is_empty() && !force {
        tracing::info!(model = %name, credential = %credential, "skipped model");
        return Outcome::Skipped;
    }

    let replacing = !existing_ids.is_empty();
    for id in existing_ids {
        if let Err(err) = api.delete_model(id).await {
            tracing::error!(model = %name, id = %id, error = %err, "failed to delete model for replace");
            return Outcome::Failed;
        }
    }

    let upsert = stamped_upsert(registration, actor, !replacing);
    match api.create_model(&upsert).await {
        Ok(()) if replacing => {
            tracing::info!(model = %name, credential = %credential, "replaced model");
            Outcome::Replaced {
                duplicates_deleted: existing_ids.len() - 1,
            }
        }
        Ok(()) => {
            tracing::info!(model = %name, credential = %credential, "created model");
            Outcome::Created
        }
        Err(err) => {
            tracing::error!(model = %name, credential = %credential, error = %err, "failed to create model");
            Outcome::Failed
        }
    }
}

/// Build the write payload with audit stamps: updated_at/updated_by always,
/// created_at/created_by only on true creation.
fn stamped_upsert(registration: &ModelRegistration, actor: &str, fresh: bool) -> ModelUpsert {
    let now = utc_now_millis();
    let mut model_info = registration.model_info.clone();
    model_info.insert("updated_at".to_string(), Value::String(now.clone()));
    model_info.insert("updated_by".to_string(), Value::String(actor.to_string()));
    if fresh {
        model_info.insert("created_at".to_string(), Value::String(now));
        model_info.insert("created_by".to_string(), Value::String(actor.to_string()));
    }

    ModelUpsert {
        model_name: registration.model_name.clone(),
        litellm_params: registration.litellm_params.clone(),
        model_info,
    }
}

async fn prune_models(
    api: &dyn AdminApi,
    remote: &RemoteModels,
    expected: &HashSet<(String, String)>,
    report: &mut ResourceReport,
) {
    tracing::info!("pruning models absent from config");
    for (key, ids) in remote.iter() {
        if expected.contains(key) {
            continue;
        }
        let (name, credential) = key;
        for id in ids {
            match api.delete_model(id).await {
                Ok(()) => {
                    tracing::info!(model = %name, credential = %credential, id = %id, "pruned model");
                    report.deleted += 1;
                }
                Err(err) => {
                    tracing::error!(model = %name, credential = %credential, id = %id, error = %err, "failed to prune model");
                    report.failed += 1;
                }
            }
        }
    }
}
