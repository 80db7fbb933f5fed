//! Domain layer entry modules.

pub mod seed_kind;
pub mod tenant;

pub use seed_kind::SeedKind;
pub use tenant::{PUBLIC_SCHEMA, TenantPosition, TenantRef, eligible_tenants};
