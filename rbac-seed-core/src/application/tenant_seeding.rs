use std::{any::type_name_of_val, fmt, panic::AssertUnwindSafe, sync::Arc};

use futures::FutureExt;
use tracing::{debug, error, info};

use crate::{
    domain::{SeedKind, TenantPosition, TenantRef, eligible_tenants},
    error::Result,
    orchestration::{
        BoundedFanOut, FanOutJob, FanOutReport, SeedConfig,
        fanout::panic_message,
    },
    ports::{
        ConnectionCleanup, GroupSeeder, NoopConnectionCleanup, RoleSeeder,
        TenantRegistry,
    },
};

/// Re-applies default roles and groups to every non-public tenant.
///
/// The entry points never fail: enumeration errors are logged and swallowed,
/// and per-tenant failures are logged by the fan-out without stopping the
/// other tenants.
#[derive(Clone)]
pub struct TenantSeedingService {
    config: SeedConfig,
    tenants: Arc<dyn TenantRegistry>,
    roles: Arc<dyn RoleSeeder>,
    groups: Arc<dyn GroupSeeder>,
    connections: Arc<dyn ConnectionCleanup>,
}

impl fmt::Debug for TenantSeedingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TenantSeedingService")
            .field("config", &self.config)
            .field("tenants", &type_name_of_val(self.tenants.as_ref()))
            .field("roles", &type_name_of_val(self.roles.as_ref()))
            .field("groups", &type_name_of_val(self.groups.as_ref()))
            .field(
                "connections",
                &type_name_of_val(self.connections.as_ref()),
            )
            .finish()
    }
}

impl TenantSeedingService {
    pub fn new(
        config: SeedConfig,
        tenants: Arc<dyn TenantRegistry>,
        roles: Arc<dyn RoleSeeder>,
        groups: Arc<dyn GroupSeeder>,
    ) -> Self {
        Self {
            config,
            tenants,
            roles,
            groups,
            connections: Arc::new(NoopConnectionCleanup),
        }
    }

    pub fn with_connection_cleanup(
        mut self,
        connections: Arc<dyn ConnectionCleanup>,
    ) -> Self {
        self.connections = connections;
        self
    }

    pub fn config(&self) -> &SeedConfig {
        &self.config
    }

    /// Update any roles at startup.
    pub async fn seed_roles_for_all_tenants(&self) {
        self.seed_all(SeedKind::Roles).await;
    }

    /// Update the platform group at startup.
    pub async fn seed_groups_for_all_tenants(&self) {
        self.seed_all(SeedKind::Groups).await;
    }

    /// Roles first, then groups. Group seeding runs even when role seeding
    /// could not enumerate tenants.
    pub async fn run_startup_seeding(&self) {
        self.seed_roles_for_all_tenants().await;
        self.seed_groups_for_all_tenants().await;
    }

    async fn seed_all(&self, kind: SeedKind) {
        match AssertUnwindSafe(self.try_seed_all(kind)).catch_unwind().await {
            Ok(Ok(report)) => {
                debug!(
                    kind = %kind,
                    submitted = report.submitted,
                    succeeded = report.succeeded,
                    failed = report.failed,
                    panicked = report.panicked,
                    "tenant seeding pass complete"
                );
            }
            Ok(Err(err)) => {
                error!("Error encountered during {kind} seeding {err}.");
            }
            Err(payload) => {
                error!(
                    "Error encountered during {kind} seeding {}.",
                    panic_message(payload.as_ref())
                );
            }
        }
    }

    async fn try_seed_all(&self, kind: SeedKind) -> Result<FanOutReport> {
        let fan_out = BoundedFanOut::new(self.config.effective_max_workers());
        let tenants = self.tenants.list_all_tenants().await?;

        let jobs = eligible_tenants(tenants).into_iter().map(
            |(tenant, position)| {
                info!(
                    "Seeding {kind} changes for tenant {} [{position}].",
                    tenant.schema_name
                );
                self.job_for(kind, tenant, position)
            },
        );

        Ok(fan_out.run(jobs).await)
    }

    fn job_for(
        &self,
        kind: SeedKind,
        tenant: TenantRef,
        position: TenantPosition,
    ) -> FanOutJob {
        let label = format!(
            "{kind} seeding for tenant {} [{position}]",
            tenant.schema_name
        );
        let finished = format!(
            "Finished seeding {kind} changes for tenant {} [{position}].",
            tenant.schema_name
        );

        let connections = Arc::clone(&self.connections);
        let on_complete = async move {
            connections.close_all_connections_for_current_worker().await;
            info!("{finished}");
        };

        let job = match kind {
            SeedKind::Roles => {
                let roles = Arc::clone(&self.roles);
                FanOutJob::new(label, async move {
                    roles.seed_roles(&tenant, true).await
                })
            }
            SeedKind::Groups => {
                let groups = Arc::clone(&self.groups);
                FanOutJob::new(label, async move {
                    groups.seed_group(&tenant).await
                })
            }
        };

        job.on_complete(on_complete)
    }
}
