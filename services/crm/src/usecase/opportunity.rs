use chrono::Utc;
use tracing::info;

use crm_domain::id::OpportunityId;
use crm_domain::opportunity::{OpportunityStage, is_valid_value};
use crm_domain::user::Caller;

use crate::domain::policy::{authorize, visible};
use crate::domain::repository::OpportunityRepository;
use crate::domain::types::{Opportunity, non_empty};
use crate::error::CrmServiceError;

const INVALID_VALUE: CrmServiceError =
    CrmServiceError::Validation("value must be a non-negative number");

fn parse_stage(stage: &str) -> Result<OpportunityStage, CrmServiceError> {
    OpportunityStage::from_wire(stage).ok_or(CrmServiceError::Validation("invalid stage"))
}

// ── ListOpportunities ────────────────────────────────────────────────────────

pub struct ListOpportunitiesUseCase<R: OpportunityRepository> {
    pub repo: R,
}

impl<R: OpportunityRepository> ListOpportunitiesUseCase<R> {
    pub async fn execute(&self, caller: &Caller) -> Result<Vec<Opportunity>, CrmServiceError> {
        Ok(visible(caller, self.repo.list().await?))
    }
}

// ── CreateOpportunity ────────────────────────────────────────────────────────

pub struct CreateOpportunityInput {
    pub title: Option<String>,
    pub value: Option<f64>,
    pub stage: Option<String>,
}

pub struct CreateOpportunityUseCase<R: OpportunityRepository> {
    pub repo: R,
}

impl<R: OpportunityRepository> CreateOpportunityUseCase<R> {
    pub async fn execute(
        &self,
        caller: &Caller,
        input: CreateOpportunityInput,
    ) -> Result<Opportunity, CrmServiceError> {
        let title = non_empty(input.title).ok_or(CrmServiceError::Validation("title is required"))?;
        let value = input.value.filter(|v| is_valid_value(*v)).ok_or(INVALID_VALUE)?;
        let stage = match input.stage {
            Some(ref s) => parse_stage(s)?,
            None => OpportunityStage::default(),
        };

        let opportunity = Opportunity {
            id: OpportunityId::generate(),
            title: Some(title),
            value: Some(value),
            stage: Some(stage),
            owner_id: caller.id.clone(),
            lead_id: None,
            created_at: Utc::now(),
        };
        self.repo.create(&opportunity).await?;
        info!(
            opportunity_id = %opportunity.id,
            owner_id = %opportunity.owner_id,
            "opportunity created"
        );
        Ok(opportunity)
    }
}

// ── UpdateOpportunity ────────────────────────────────────────────────────────

/// Full replacement of `title`, `value` and `stage`; `None` clears the field.
pub struct UpdateOpportunityInput {
    pub title: Option<String>,
    pub value: Option<f64>,
    pub stage: Option<String>,
}

pub struct UpdateOpportunityUseCase<R: OpportunityRepository> {
    pub repo: R,
}

impl<R: OpportunityRepository> UpdateOpportunityUseCase<R> {
    pub async fn execute(
        &self,
        caller: &Caller,
        id: &OpportunityId,
        input: UpdateOpportunityInput,
    ) -> Result<Opportunity, CrmServiceError> {
        let mut opportunity = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(CrmServiceError::OpportunityNotFound)?;
        authorize(caller, &opportunity)?;

        if input.value.is_some_and(|v| !is_valid_value(v)) {
            return Err(INVALID_VALUE);
        }
        opportunity.stage = input.stage.as_deref().map(parse_stage).transpose()?;
        opportunity.title = input.title;
        opportunity.value = input.value;

        if !self.repo.update(&opportunity).await? {
            return Err(CrmServiceError::OpportunityNotFound);
        }
        Ok(opportunity)
    }
}

// ── DeleteOpportunity ────────────────────────────────────────────────────────

pub struct DeleteOpportunityUseCase<R: OpportunityRepository> {
    pub repo: R,
}

impl<R: OpportunityRepository> DeleteOpportunityUseCase<R> {
    pub async fn execute(
        &self,
        caller: &Caller,
        id: &OpportunityId,
    ) -> Result<(), CrmServiceError> {
        let opportunity = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(CrmServiceError::OpportunityNotFound)?;
        authorize(caller, &opportunity)?;

        if !self.repo.delete(id).await? {
            return Err(CrmServiceError::OpportunityNotFound);
        }
        info!(opportunity_id = %id, "opportunity deleted");
        Ok(())
    }
}
