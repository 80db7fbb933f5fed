use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("tenant registry error: {0}")]
    TenantRegistry(String),

    #[error("seeding failed for tenant {tenant}: {message}")]
    Seeding { tenant: String, message: String },

    /// For port implementations that fail to open or close tenant
    /// database connections.
    #[error("connection error: {0}")]
    Connection(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SeedError {
    pub fn seeding(tenant: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Seeding {
            tenant: tenant.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SeedError>;
