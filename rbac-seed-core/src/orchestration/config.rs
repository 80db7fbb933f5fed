use tokio::sync::Semaphore;

/// Hard ceiling for the derived default worker count.
pub const DEFAULT_MAX_WORKERS_CEILING: usize = 32;

/// Default pool size: one slot per core plus headroom for tasks parked on
/// database I/O, capped at [`DEFAULT_MAX_WORKERS_CEILING`].
pub fn default_max_workers() -> usize {
    (num_cpus::get() + 4).min(DEFAULT_MAX_WORKERS_CEILING)
}

/// Largest worker count a pool can be built with.
pub const MAX_WORKERS_LIMIT: usize = Semaphore::MAX_PERMITS;

/// Tuning for one seeding pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConfig {
    /// Upper bound on tenants seeded at the same time. Clamped to
    /// `1..=MAX_WORKERS_LIMIT`.
    pub max_workers: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
        }
    }
}

impl SeedConfig {
    pub fn with_max_workers(max_workers: usize) -> Self {
        Self { max_workers }
    }

    pub fn effective_max_workers(&self) -> usize {
        self.max_workers.clamp(1, MAX_WORKERS_LIMIT)
    }
}
