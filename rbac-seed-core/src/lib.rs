//! # rbac-seed core
//!
//! Re-applies default authorization roles and the default platform group to
//! every tenant of a schema-per-tenant deployment, skipping the shared
//! `public` schema.
//!
//! ## Architecture
//!
//! - [`ports`]: traits for the tenant registry, the role/group seeders and
//!   worker connection cleanup. Implementations live with the host
//!   application.
//! - [`orchestration`]: [`orchestration::BoundedFanOut`], which runs one job
//!   per tenant with a fixed number of worker slots.
//! - [`application`]: [`application::TenantSeedingService`], the startup
//!   entry points.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use rbac_seed_core::{
//!     application::TenantSeedingService,
//!     orchestration::SeedConfig,
//!     ports::{GroupSeeder, RoleSeeder, TenantRegistry},
//! };
//!
//! async fn on_startup(
//!     tenants: Arc<dyn TenantRegistry>,
//!     roles: Arc<dyn RoleSeeder>,
//!     groups: Arc<dyn GroupSeeder>,
//! ) {
//!     let service = TenantSeedingService::new(
//!         SeedConfig::with_max_workers(4),
//!         tenants,
//!         roles,
//!         groups,
//!     );
//!     service.run_startup_seeding().await;
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Startup seeding service
pub mod application;

/// Tenant and seed-kind types
pub mod domain;

/// Error types and error handling utilities
pub mod error;

/// Worker-pool fan-out and its configuration
pub mod orchestration;

/// Ports for the collaborators owned by the host application
pub mod ports;

pub use error::{Result, SeedError};
