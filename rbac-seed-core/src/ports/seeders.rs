use async_trait::async_trait;

use crate::domain::TenantRef;
use crate::error::Result;

/// Re-applies the default role definitions to one tenant.
#[async_trait]
pub trait RoleSeeder: Send + Sync {
    /// With `update` set, existing roles are brought in line with the
    /// current definitions instead of being left untouched.
    async fn seed_roles(&self, tenant: &TenantRef, update: bool) -> Result<()>;
}

/// Re-applies the default platform group to one tenant.
#[async_trait]
pub trait GroupSeeder: Send + Sync {
    async fn seed_group(&self, tenant: &TenantRef) -> Result<()>;
}
