use std::fmt;

/// Which default set a seeding pass re-applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeedKind {
    Roles,
    Groups,
}

impl SeedKind {
    /// Singular noun used in log lines ("role" / "group").
    pub fn noun(self) -> &'static str {
        match self {
            SeedKind::Roles => "role",
            SeedKind::Groups => "group",
        }
    }
}

impl fmt::Display for SeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}
