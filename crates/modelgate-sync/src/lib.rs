// Sync Engine
//
// Reconciles the resolved config artifact against the gateway, one resource
// type per phase. Nothing here is transactional: every operation reports
// individually, a failure never rolls back or cancels siblings, and
// re-running is always safe because create/replace decisions are recomputed
// from live remote state each time.
//
// Key design decisions:
// - Phases are strictly sequential (credentials → models → aliases →
//   fallbacks) because models reference credential names and
//   aliases/fallbacks reference model names
// - Per-item calls inside the credentials and models phases fan out through
//   a bounded Semaphore + JoinSet worker pool
// - Remote state is fetched once per phase; a fetch failure degrades to
//   "nothing exists", which biases toward re-creation rather than crashing

pub mod audit;
pub mod credentials;
pub mod engine;
pub mod models;
pub mod prices;
pub mod provision;
pub mod remote;
pub mod report;
pub mod router;

pub use audit::resolve_actor;
pub use credentials::sync_credentials;
pub use engine::{run_sync, Component, SyncOptions, SyncRequest};
pub use models::sync_models;
pub use prices::refresh_prices;
pub use provision::provision_key;
pub use remote::{RemoteCredentials, RemoteModels};
pub use report::{Outcome, ResourceReport, RunStatus, SyncReport};
pub use router::{sync_aliases, sync_fallbacks};
