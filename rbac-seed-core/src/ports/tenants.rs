use async_trait::async_trait;

use crate::domain::TenantRef;
use crate::error::Result;

/// Source of truth for the tenants in the deployment.
#[async_trait]
pub trait TenantRegistry: Send + Sync {
    /// Every tenant, `public` included, in a stable order.
    async fn list_all_tenants(&self) -> Result<Vec<TenantRef>>;
}
