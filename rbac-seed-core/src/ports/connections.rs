use async_trait::async_trait;

/// Releases database connections bound to the worker that just ran a job.
///
/// Called once after every seeding job, whatever its outcome. Implementations
/// must be idempotent and must tolerate having nothing to close.
#[async_trait]
pub trait ConnectionCleanup: Send + Sync {
    async fn close_all_connections_for_current_worker(&self);
}

/// Cleanup for setups where connections are not tied to workers, such as a
/// shared pool that hands out connections per query.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopConnectionCleanup;

#[async_trait]
impl ConnectionCleanup for NoopConnectionCleanup {
    async fn close_all_connections_for_current_worker(&self) {}
}
