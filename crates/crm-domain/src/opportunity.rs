//! Opportunity pipeline types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Deal stage: Discovery → Proposal → Won | Lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OpportunityStage {
    Discovery,
    Proposal,
    Won,
    Lost,
}

impl OpportunityStage {
    pub const ALL: [Self; 4] = [Self::Discovery, Self::Proposal, Self::Won, Self::Lost];

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "Discovery" => Some(Self::Discovery),
            "Proposal" => Some(Self::Proposal),
            "Won" => Some(Self::Won),
            "Lost" => Some(Self::Lost),
            _ => None,
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Discovery => "Discovery",
            Self::Proposal => "Proposal",
            Self::Won => "Won",
            Self::Lost => "Lost",
        }
    }
}

impl Default for OpportunityStage {
    fn default() -> Self {
        Self::Discovery
    }
}

impl fmt::Display for OpportunityStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// A deal amount must be a finite, non-negative number.
pub fn is_valid_value(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
