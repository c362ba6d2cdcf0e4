use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crm_domain::id::{LeadId, OpportunityId, UserId};
use crm_domain::lead::LeadStatus;
use crm_domain::opportunity::OpportunityStage;
use crm_domain::user::{Caller, Role};

/// Registered account. `password_hash` is a PHC string and never leaves the service.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl User {
    /// Identity to embed in a bearer token for this user.
    pub fn as_caller(&self) -> Caller {
        Caller {
            id: self.id.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Prospective customer.
///
/// `name`, `email`, `phone` and `status` are required or defaulted at creation,
/// but an update replaces them verbatim, so any of them may be absent later.
#[derive(Debug, Clone, PartialEq)]
pub struct Lead {
    pub id: LeadId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<LeadStatus>,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Sales deal. `lead_id` is set only when created by converting a lead.
#[derive(Debug, Clone, PartialEq)]
pub struct Opportunity {
    pub id: OpportunityId,
    pub title: Option<String>,
    pub value: Option<f64>,
    pub stage: Option<OpportunityStage>,
    pub owner_id: UserId,
    pub lead_id: Option<LeadId>,
    pub created_at: DateTime<Utc>,
}

/// Records that carry an owner and are therefore subject to the access policy.
pub trait Owned {
    fn owner_id(&self) -> &UserId;
}

impl Owned for Lead {
    fn owner_id(&self) -> &UserId {
        &self.owner_id
    }
}

impl Owned for Opportunity {
    fn owner_id(&self) -> &UserId {
        &self.owner_id
    }
}

/// Summary figures over the leads and opportunities visible to one caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    pub total_leads: usize,
    pub total_opportunities: usize,
    pub total_value: f64,
    pub leads_by_status: BTreeMap<LeadStatus, usize>,
    pub opportunities_by_stage: BTreeMap<OpportunityStage, usize>,
}

/// Treat empty strings like missing values, as the web client submits `""`
/// for untouched inputs.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
