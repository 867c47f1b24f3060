// Gateway Admin API
//
// The narrow transport boundary between reconciliation logic and the remote
// gateway. Everything upstream of this crate treats the gateway as an opaque
// key-value store reached through the AdminApi trait; the reqwest client and
// the in-memory fake are interchangeable implementations.

pub mod api;
pub mod client;
pub mod error;
pub mod fake;
pub mod pricing;
pub mod types;

pub use api::AdminApi;
pub use client::HttpAdminClient;
pub use error::AdminError;
pub use fake::FakeAdmin;
pub use pricing::{price_fields, PricingCatalog};
pub use types::{
    CredentialInfo, CredentialPayload, CredentialValues, GenerateKeyRequest, GeneratedKey,
    KeyInfo, ModelUpsert, NewUserRequest, RemoteModel, UserRecord,
};
