//! Bounded fan-out of independent jobs over a fixed number of worker slots.

pub mod config;
pub mod fanout;

pub use config::{MAX_WORKERS_LIMIT, SeedConfig, default_max_workers};
pub use fanout::{BoundedFanOut, FanOutJob, FanOutReport};
