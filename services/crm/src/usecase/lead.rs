use chrono::Utc;
use tracing::info;

use crm_domain::id::{LeadId, OpportunityId};
use crm_domain::lead::LeadStatus;
use crm_domain::opportunity::{OpportunityStage, is_valid_value};
use crm_domain::user::Caller;

use crate::domain::policy::{authorize, visible};
use crate::domain::repository::{LeadRepository, OpportunityRepository};
use crate::domain::types::{Lead, Opportunity, non_empty};
use crate::error::CrmServiceError;

fn parse_status(status: &str) -> Result<LeadStatus, CrmServiceError> {
    LeadStatus::from_wire(status).ok_or(CrmServiceError::Validation("invalid status"))
}

// ── ListLeads ────────────────────────────────────────────────────────────────

pub struct ListLeadsUseCase<R: LeadRepository> {
    pub repo: R,
}

impl<R: LeadRepository> ListLeadsUseCase<R> {
    pub async fn execute(&self, caller: &Caller) -> Result<Vec<Lead>, CrmServiceError> {
        Ok(visible(caller, self.repo.list().await?))
    }
}

// ── CreateLead ───────────────────────────────────────────────────────────────

pub struct CreateLeadInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
}

pub struct CreateLeadUseCase<R: LeadRepository> {
    pub repo: R,
}

impl<R: LeadRepository> CreateLeadUseCase<R> {
    pub async fn execute(
        &self,
        caller: &Caller,
        input: CreateLeadInput,
    ) -> Result<Lead, CrmServiceError> {
        let (Some(name), Some(email)) = (non_empty(input.name), non_empty(input.email)) else {
            return Err(CrmServiceError::Validation("name and email are required"));
        };
        let status = match input.status {
            Some(ref s) => parse_status(s)?,
            None => LeadStatus::default(),
        };

        // Uniqueness is scoped to the caller's own leads, not global.
        if self.repo.exists_for_owner(&caller.id, &email).await? {
            return Err(CrmServiceError::LeadAlreadyExists);
        }

        let lead = Lead {
            id: LeadId::generate(),
            name: Some(name),
            email: Some(email),
            phone: input.phone,
            status: Some(status),
            owner_id: caller.id.clone(),
            created_at: Utc::now(),
        };
        self.repo.create(&lead).await?;
        info!(lead_id = %lead.id, owner_id = %lead.owner_id, "lead created");
        Ok(lead)
    }
}

// ── UpdateLead ───────────────────────────────────────────────────────────────

/// Full replacement of the mutable fields: `None` clears the stored value.
pub struct UpdateLeadInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
}

pub struct UpdateLeadUseCase<R: LeadRepository> {
    pub repo: R,
}

impl<R: LeadRepository> UpdateLeadUseCase<R> {
    pub async fn execute(
        &self,
        caller: &Caller,
        id: &LeadId,
        input: UpdateLeadInput,
    ) -> Result<Lead, CrmServiceError> {
        let mut lead = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(CrmServiceError::LeadNotFound)?;
        authorize(caller, &lead)?;

        lead.status = input.status.as_deref().map(parse_status).transpose()?;
        lead.name = input.name;
        lead.email = input.email;
        lead.phone = input.phone;

        if !self.repo.update(&lead).await? {
            return Err(CrmServiceError::LeadNotFound);
        }
        Ok(lead)
    }
}

// ── DeleteLead ───────────────────────────────────────────────────────────────

pub struct DeleteLeadUseCase<R: LeadRepository> {
    pub repo: R,
}

impl<R: LeadRepository> DeleteLeadUseCase<R> {
    pub async fn execute(&self, caller: &Caller, id: &LeadId) -> Result<(), CrmServiceError> {
        let lead = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(CrmServiceError::LeadNotFound)?;
        authorize(caller, &lead)?;

        if !self.repo.delete(id).await? {
            return Err(CrmServiceError::LeadNotFound);
        }
        info!(lead_id = %id, "lead deleted");
        Ok(())
    }
}

// ── ConvertLead ──────────────────────────────────────────────────────────────

pub struct ConvertLeadInput {
    pub title: Option<String>,
    pub value: Option<f64>,
}

/// Marks a lead `Qualified` and opens a `Discovery` opportunity for its owner.
///
/// The lead write and the opportunity write are independent: if the second
/// fails the lead stays `Qualified` with no opportunity. Converting an already
/// qualified lead is allowed and opens another opportunity.
pub struct ConvertLeadUseCase<L: LeadRepository, O: OpportunityRepository> {
    pub leads: L,
    pub opportunities: O,
}

impl<L: LeadRepository, O: OpportunityRepository> ConvertLeadUseCase<L, O> {
    pub async fn execute(
        &self,
        caller: &Caller,
        id: &LeadId,
        input: ConvertLeadInput,
    ) -> Result<Opportunity, CrmServiceError> {
        let title = non_empty(input.title).ok_or(CrmServiceError::Validation("title is required"))?;
        let value = input
            .value
            .filter(|v| is_valid_value(*v))
            .ok_or(CrmServiceError::Validation("value must be a non-negative number"))?;

        let mut lead = self
            .leads
            .find_by_id(id)
            .await?
            .ok_or(CrmServiceError::LeadNotFound)?;
        authorize(caller, &lead)?;

        lead.status = Some(LeadStatus::Qualified);
        if !self.leads.update(&lead).await? {
            return Err(CrmServiceError::LeadNotFound);
        }

        let opportunity = Opportunity {
            id: OpportunityId::generate(),
            title: Some(title),
            value: Some(value),
            stage: Some(OpportunityStage::Discovery),
            owner_id: lead.owner_id.clone(),
            lead_id: Some(lead.id.clone()),
            created_at: Utc::now(),
        };
        self.opportunities.create(&opportunity).await?;
        info!(
            lead_id = %lead.id,
            opportunity_id = %opportunity.id,
            owner_id = %opportunity.owner_id,
            "lead converted"
        );
        Ok(opportunity)
    }
}
