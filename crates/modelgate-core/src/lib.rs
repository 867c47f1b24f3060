// Config Resolution Core
//
// This crate turns a declarative gateway config (base document plus optional
// local override) into the flat artifact the reconciler consumes.
//
// Key design decisions:
// - Documents are JSON; merging happens on serde_json::Value so override
//   fragments of any shape carry through untouched
// - $extend inheritance between provider blocks resolves by fixpoint
//   iteration, so multi-hop chains work regardless of declaration order and
//   cycles fail per-provider instead of hanging
// - $base tokens inside fallback target lists splice in the base document's
//   targets for the same source key
// - A provider without an api_key contributes nothing to the output
// - Invalid provider blocks are skipped with a logged error; only an
//   unreadable or unparseable top-level document is fatal

pub mod document;
pub mod error;
pub mod interface;
pub mod loader;
pub mod merge;
pub mod resolve;

pub use document::{
    ConfigDocument, CredentialSpec, FallbackRule, InterfaceConfig, ModelOverride,
    ModelRegistration, Provider, ResolvedConfig,
};
pub use error::ConfigError;
pub use interface::{interface_profile, InterfaceProfile};
pub use loader::{generate, load_with_local};
pub use merge::{deep_merge, resolve_base_refs, resolve_extends};
pub use resolve::{resolve_credentials, resolve_models};
