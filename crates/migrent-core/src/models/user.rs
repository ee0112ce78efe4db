//! Account records.

use crate::role::Role;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One account as listed in the user management table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub signup_date: NaiveDate,
    pub last_active: NaiveDate,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub suspended: bool,
}

impl AdminUser {
    /// Status label shown in the "Status" column.
    pub fn status_label(&self) -> &'static str {
        if self.suspended { "Suspended" } else { "Active" }
    }

    /// Label shown in the "Verified" column.
    pub fn verified_label(&self) -> &'static str {
        if self.verified { "Verified" } else { "Unverified" }
    }
}
