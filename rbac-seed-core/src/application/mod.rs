//! Application services composed from the ports.

pub mod tenant_seeding;

pub use tenant_seeding::TenantSeedingService;
