//! Account roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The role stored for every MigRent account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Looking for a room.
    Seeker,
    /// Lists rooms.
    Owner,
    /// Full access to the admin dashboard.
    Superadmin,
}

impl Role {
    /// All roles, in the order the dashboard offers them.
    pub const ALL: [Role; 3] = [Role::Seeker, Role::Owner, Role::Superadmin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Seeker => "seeker",
            Role::Owner => "owner",
            Role::Superadmin => "superadmin",
        }
    }

    /// Label used in filter dropdowns.
    pub fn plural_label(&self) -> &'static str {
        match self {
            Role::Seeker => "Seekers",
            Role::Owner => "Owners",
            Role::Superadmin => "SuperAdmin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "seeker" => Ok(Role::Seeker),
            "owner" => Ok(Role::Owner),
            "superadmin" => Ok(Role::Superadmin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert!("admin".parse::<Role>().is_err());
        assert!("Superadmin".parse::<Role>().is_err());
    }
}
