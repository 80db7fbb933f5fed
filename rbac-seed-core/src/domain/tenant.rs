use std::fmt;

/// Schema name of the shared tenant. It never receives per-tenant seeding.
pub const PUBLIC_SCHEMA: &str = "public";

/// Reference to a tenant, identified by its schema name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantRef {
    pub schema_name: String,
}

impl TenantRef {
    pub fn new(schema_name: impl Into<String>) -> Self {
        Self {
            schema_name: schema_name.into(),
        }
    }

    pub fn is_public(&self) -> bool {
        self.schema_name == PUBLIC_SCHEMA
    }
}

impl fmt::Display for TenantRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.schema_name)
    }
}

/// 1-based position of a tenant within one seeding pass. Renders as
/// `"{ordinal} of {total}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantPosition {
    pub ordinal: usize,
    pub total: usize,
}

impl fmt::Display for TenantPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.ordinal, self.total)
    }
}

/// Drops the public tenant and numbers the rest in enumeration order.
pub fn eligible_tenants(
    tenants: Vec<TenantRef>,
) -> Vec<(TenantRef, TenantPosition)> {
    let eligible: Vec<TenantRef> =
        tenants.into_iter().filter(|tenant| !tenant.is_public()).collect();
    let total = eligible.len();

    eligible
        .into_iter()
        .enumerate()
        .map(|(idx, tenant)| {
            (
                tenant,
                TenantPosition {
                    ordinal: idx + 1,
                    total,
                },
            )
        })
        .collect()
}
