// Credential reconciliation
//
// One upsert task per expected credential, fanned out through the bounded
// worker pool. Safe to parallelize: credential names are disjoint and each
// create call is independent and order-insensitive.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use modelgate_admin::{AdminApi, CredentialInfo, CredentialPayload, CredentialValues};
use modelgate_core::{interface_profile, CredentialSpec, InterfaceProfile};

use crate::engine::{SyncOptions, WORKER_SLOTS};
use crate::remote::RemoteCredentials;
use crate::report::{Outcome, ResourceReport};

pub async fn sync_credentials(
    api: Arc<dyn AdminApi>,
    expected: &[CredentialSpec],
    options: SyncOptions,
) -> ResourceReport {
    tracing::info!("syncing credentials");
    let remote = RemoteCredentials::fetch(api.as_ref()).await;

    let mut expected_names = HashSet::new();
    let semaphore = Arc::new(Semaphore::new(WORKER_SLOTS));
    let mut tasks = JoinSet::new();

    for spec in expected {
        let Some(profile) = interface_profile(&spec.interface) else {
            tracing::warn!(interface = %spec.interface, "unknown interface; skipping credential");
            continue;
        };

        let name = spec.credential_name();
        expected_names.insert(name.clone());

        let exists = remote.contains(&name);
        let payload = credential_payload(spec, profile);
        let api = api.clone();
        let force = options.force;
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("semaphore closed");

        tasks.spawn(async move {
            let _permit = permit;
            apply_credential(api.as_ref(), &name, &payload, exists, force).await
        });
    }

    let mut report = ResourceReport::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => report.record(outcome),
            Err(err) => {
                tracing::error!(error = %err, "credential task panicked");
                report.record(Outcome::Failed);
            }
        }
    }

    if options.prune {
        prune_credentials(api.as_ref(), &remote, &expected_names, &mut report).await;
    }

    tracing::info!(
        created = report.created,
        replaced = report.replaced,
        skipped = report.skipped,
        deleted = report.deleted,
        failed = report.failed,
        status = %report.status(),
        "credentials synced"
    );
    report
}

fn credential_payload(spec: &CredentialSpec, profile: &InterfaceProfile) -> CredentialPayload {
    CredentialPayload {
        credential_name: spec.credential_name(),
        credential_values: CredentialValues {
            api_key: spec.api_key.clone(),
            api_base: format!("{}{}", spec.api_base, profile.path_suffix),
        },
        credential_info: CredentialInfo {
            custom_llm_provider: profile.upstream_provider.to_string(),
        },
    }
}

async fn apply_credential(
    api: &dyn AdminApi,
    name: &str,
    payload: &CredentialPayload,
    exists: bool,
    force: bool,
) -> Outcome {
    if exists && !force {
        tracing::info!(credential = %name, "skipped credential");
        return Outcome::Skipped;
    }

    if exists {
        if let Err(err) = api.delete_credential(name).await {
            tracing::error!(credential = %name, error = %err, "failed to delete credential for replace");
            return Outcome::Failed;
        }
    }

    match api.create_credential(payload).await {
        Ok(()) if exists => {
            tracing::info!(credential = %name, "replaced credential");
            Outcome::Replaced {
                duplicates_deleted: 0,
            }
        }
        Ok(()) => {
            tracing::info!(credential = %name, "created credential");
            Outcome::Created
        }
        Err(err) => {
            tracing::error!(credential = %name, error = %err, "failed to create credential");
            Outcome::Failed
        }
    }
}

async fn prune_credentials(
    api: &dyn AdminApi,
    remote: &RemoteCredentials,
    expected: &HashSet<String>,
    report: &mut ResourceReport,
) {
    tracing::info!("pruning credentials absent from config");
    for name in remote.iter() {
        if expected.contains(name) {
            continue;
        }
        match api.delete_credential(name).await {
            Ok(()) => {
                tracing::info!(credential = %name, "pruned credential");
                report.deleted += 1;
            }
            Err(err) => {
                tracing::error!(credential = %name, error = %err, "failed to prune credential");
                report.failed += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelgate_admin::FakeAdmin;

    fn spec(service: &str, interface: &str) -> CredentialSpec {
        CredentialSpec {
            service_name: service.to_string(),
            interface: interface.to_string(),
            api_key: "sk-test".to_string(),
            api_base: "http://upstream".to_string(),
        }
    }

    #[tokio::test]
    async fn creates_missing_credentials_with_interface_suffix() {
        let fake = Arc::new(FakeAdmin::new());
        let expected = vec![spec("acme", "openai"), spec("acme", "anthropic")];

        let report = sync_credentials(fake.clone(), &expected, SyncOptions::default()).await;
        assert_eq!(report.created, 2);
        assert_eq!(report.failed, 0);

        let openai = fake.credential("acme-openai").unwrap();
        assert_eq!(openai.credential_values.api_base, "http://upstream/v1");
        assert_eq!(openai.credential_info.custom_llm_provider, "OpenAI_Compatible");

        let anthropic = fake.credential("acme-anthropic").unwrap();
        assert_eq!(anthropic.credential_values.api_base, "http://upstream");
    }

    #[tokio::test]
    async fn existing_credential_skips_without_force_and_replaces_with_force() {
        let fake = Arc::new(FakeAdmin::new());
        fake.seed_credential("acme-openai");
        let expected = vec![spec("acme", "openai")];

        let report = sync_credentials(fake.clone(), &expected, SyncOptions::default()).await;
        assert_eq!(report.skipped, 1);
        assert_eq!(report.created + report.replaced, 0);
        // the seeded payload was left untouched
        assert_eq!(
            fake.credential("acme-openai").unwrap().credential_values.api_key,
            "seeded"
        );

        let report = sync_credentials(
            fake.clone(),
            &expected,
            SyncOptions {
                force: true,
                prune: false,
            },
        )
        .await;
        assert_eq!(report.replaced, 1);
        assert_eq!(
            fake.credential("acme-openai").unwrap().credential_values.api_key,
            "sk-test"
        );
    }

    #[tokio::test]
    async fn unknown_interface_is_skipped_and_pruned() {
        let fake = Arc::new(FakeAdmin::new());
        fake.seed_credential("acme-cohere");
        let expected = vec![spec("acme", "cohere"), spec("acme", "openai")];

        let report = sync_credentials(
            fake.clone(),
            &expected,
            SyncOptions {
                force: false,
                prune: true,
            },
        )
        .await;

        // the unknown interface produced no upsert and fell out of the
        // expected set, so pruning removed its stale remote credential
        assert_eq!(report.created, 1);
        assert_eq!(report.deleted, 1);
        assert_eq!(fake.credential_names(), vec!["acme-openai"]);
    }

    #[tokio::test]
    async fn prune_false_leaves_remote_extras_alone() {
        let fake = Arc::new(FakeAdmin::new());
        fake.seed_credential("stale-openai");

        let report = sync_credentials(fake.clone(), &[], SyncOptions::default()).await;
        assert_eq!(report.deleted, 0);
        assert_eq!(fake.credential_names(), vec!["stale-openai"]);
    }
}
