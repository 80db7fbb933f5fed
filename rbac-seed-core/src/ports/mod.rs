//! Capability ports consumed by the seeding service.
//!
//! Tenant lookup, the role/group definers and connection management all live
//! outside this crate; callers hand in implementations as `Arc<dyn _>`.

pub mod connections;
pub mod seeders;
pub mod tenants;

pub use connections::{ConnectionCleanup, NoopConnectionCleanup};
pub use seeders::{GroupSeeder, RoleSeeder};
pub use tenants::TenantRegistry;
