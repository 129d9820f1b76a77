//! Caller authorization context.
//!
//! Privileged operations take an explicit [`AuthContext`] argument instead of
//! reading the caller's role from ambient state. How the context is obtained
//! (gateway headers, session lookup) is the transport layer's concern.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// Role of a department member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System administrator.
    Admin,
    /// Head of department.
    Hod,
    /// Finance officer.
    Finance,
    /// Regular staff member.
    Staff,
}

impl Role {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Hod => "hod",
            Self::Finance => "finance",
            Self::Staff => "staff",
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
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "hod" => Ok(Self::Hod),
            "finance" => Ok(Self::Finance),
            "staff" => Ok(Self::Staff),
            _ => Err(format!("Unknown role: {s}")),
        }
    }
}

/// The identity and role a request is executed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Acting user.
    pub user_id: UserId,
    /// Role of the acting user.
    pub role: Role,
}

impl AuthContext {
    /// Creates a new context.
    #[must_use]
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Whether the caller may rebuild stored category budgets.
    #[must_use]
    pub const fn can_recalculate(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Hod)
    }

    /// Whether the caller is an admin.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}
