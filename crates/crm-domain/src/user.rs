//! User domain types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// User permission level.
///
/// Wire format: lowercase string (`"admin"`, `"manager"`, `"rep"`).
/// `Admin` and `Manager` see every lead and opportunity; `Rep` sees only its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Rep,
}

impl Role {
    /// Parse the wire value. Returns `None` for unknown roles.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "manager" => Some(Self::Manager),
            "rep" => Some(Self::Rep),
            _ => None,
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Rep => "rep",
        }
    }

    /// Whether this role sees records regardless of owner.
    pub fn sees_all_records(self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::Rep
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// The authenticated principal behind a request, as carried by its credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: UserId,
    pub email: String,
    pub role: Role,
}

impl Caller {
    pub fn new(id: impl Into<UserId>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            role,
        }
    }
}
