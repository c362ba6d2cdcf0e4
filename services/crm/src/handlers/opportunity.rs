use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crm_auth_types::identity::BearerIdentity;
use crm_domain::id::OpportunityId;
use crm_domain::opportunity::OpportunityStage;

use crate::domain::types::Opportunity;
use crate::error::CrmServiceError;
use crate::handlers::{JsonBody, MessageResponse};
use crate::state::AppState;
use crate::usecase::opportunity::{
    CreateOpportunityInput, CreateOpportunityUseCase, DeleteOpportunityUseCase,
    ListOpportunitiesUseCase, UpdateOpportunityInput, UpdateOpportunityUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<OpportunityStage>,
    pub owner_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<String>,
    #[serde(serialize_with = "crm_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Opportunity> for OpportunityResponse {
    fn from(opportunity: Opportunity) -> Self {
        Self {
            id: opportunity.id.0,
            title: opportunity.title,
            value: opportunity.value,
            stage: opportunity.stage,
            owner_id: opportunity.owner_id.0,
            lead_id: opportunity.lead_id.map(|id| id.0),
            created_at: opportunity.created_at,
        }
    }
}

#[derive(Deserialize)]
pub struct OpportunityRequest {
    pub title: Option<String>,
    pub value: Option<f64>,
    pub stage: Option<String>,
}

// ── GET /api/opportunities ───────────────────────────────────────────────────

pub async fn list_opportunities(
    BearerIdentity(caller): BearerIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<OpportunityResponse>>, CrmServiceError> {
    let usecase = ListOpportunitiesUseCase {
        repo: state.opportunity_repo(),
    };
    let opportunities = usecase.execute(&caller).await?;
    Ok(Json(
        opportunities
            .into_iter()
            .map(OpportunityResponse::from)
            .collect(),
    ))
}

// ── POST /api/opportunities ──────────────────────────────────────────────────

pub async fn create_opportunity(
    BearerIdentity(caller): BearerIdentity,
    State(state): State<AppState>,
    WithRejection(Json(body), _): JsonBody<OpportunityRequest>,
) -> Result<(StatusCode, Json<OpportunityResponse>), CrmServiceError> {
    let usecase = CreateOpportunityUseCase {
        repo: state.opportunity_repo(),
    };
    let opportunity = usecase
        .execute(
            &caller,
            CreateOpportunityInput {
                title: body.title,
                value: body.value,
                stage: body.stage,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(opportunity.into())))
}

// ── PUT /api/opportunities/{id} ──────────────────────────────────────────────

pub async fn update_opportunity(
    BearerIdentity(caller): BearerIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(body), _): JsonBody<OpportunityRequest>,
) -> Result<Json<OpportunityResponse>, CrmServiceError> {
    let usecase = UpdateOpportunityUseCase {
        repo: state.opportunity_repo(),
    };
    let opportunity = usecase
        .execute(
            &caller,
            &OpportunityId::from(id),
            UpdateOpportunityInput {
                title: body.title,
                value: body.value,
                stage: body.stage,
            },
        )
        .await?;
    Ok(Json(opportunity.into()))
}

// ── DELETE /api/opportunities/{id} ───────────────────────────────────────────

pub async fn delete_opportunity(
    BearerIdentity(caller): BearerIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, CrmServiceError> {
    let usecase = DeleteOpportunityUseCase {
        repo: state.opportunity_repo(),
    };
    usecase.execute(&caller, &OpportunityId::from(id)).await?;
    Ok(MessageResponse::new("Opportunity deleted successfully"))
}
