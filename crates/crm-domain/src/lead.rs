//! Lead lifecycle types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lead progress: New → Contacted → Qualified.
///
/// Wire format is the variant name verbatim (`"New"`, `"Contacted"`, `"Qualified"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
}

impl LeadStatus {
    pub const ALL: [Self; 3] = [Self::New, Self::Contacted, Self::Qualified];

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "New" => Some(Self::New),
            "Contacted" => Some(Self::Contacted),
            "Qualified" => Some(Self::Qualified),
            _ => None,
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Contacted => "Contacted",
            Self::Qualified => "Qualified",
        }
    }
}

impl Default for LeadStatus {
    fn default() -> Self {
        Self::New
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}
