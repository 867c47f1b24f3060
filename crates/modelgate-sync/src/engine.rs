// Phase orchestration
//
// Phases run strictly in dependency order; each one is independent and a
// failure inside one never aborts the next.

use std::sync::Arc;

use modelgate_admin::AdminApi;
use modelgate_core::ResolvedConfig;

use crate::audit::resolve_actor;
use crate::credentials::sync_credentials;
use crate::models::sync_models;
use crate::report::SyncReport;
use crate::router::{sync_aliases, sync_fallbacks};

/// Concurrency cap for the per-item fan-out inside a phase.
pub(crate) const WORKER_SLOTS: usize = 10;

/// The resource types a run can be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Credentials,
    Models,
    Aliases,
    Fallbacks,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Replace existing resources instead of skipping them.
    pub force: bool,
    /// Delete remote credentials/models absent from the expected set.
    pub prune: bool,
}

pub struct SyncRequest<'a> {
    pub resolved: &'a ResolvedConfig,
    pub components: &'a [Component],
    pub options: SyncOptions,
    /// Bearer token, used only as the actor-identity fallback.
    pub api_key: &'a str,
}

pub async fn run_sync(api: Arc<dyn AdminApi>, request: SyncRequest<'_>) -> SyncReport {
    let selected = |component| request.components.contains(&component);
    let mut report = SyncReport::default();

    if selected(Component::Credentials) {
        report.credentials = Some(
            sync_credentials(api.clone(), &request.resolved.credentials, request.options).await,
        );
    }

    if selected(Component::Models) {
        let actor = resolve_actor(api.as_ref(), request.api_key).await;
        tracing::info!(actor = %actor, "resolved actor identity");
        report.models = Some(
            sync_models(
                api.clone(),
                &request.resolved.models,
                request.options,
                &actor,
            )
            .await,
        );
    }

    if selected(Component::Aliases) {
        report.aliases = Some(
            sync_aliases(
                api.as_ref(),
                &request.resolved.aliases,
                request.options.force,
            )
            .await,
        );
    }

    if selected(Component::Fallbacks) {
        report.fallbacks = Some(
            sync_fallbacks(
                api.as_ref(),
                &request.resolved.fallbacks,
                request.options.force,
            )
            .await,
        );
    }

    report
}
