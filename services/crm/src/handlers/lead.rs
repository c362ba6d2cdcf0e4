use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crm_auth_types::identity::BearerIdentity;
use crm_domain::id::LeadId;
use crm_domain::lead::LeadStatus;

use crate::domain::types::Lead;
use crate::error::CrmServiceError;
use crate::handlers::opportunity::OpportunityResponse;
use crate::handlers::{JsonBody, MessageResponse};
use crate::state::AppState;
use crate::usecase::lead::{
    ConvertLeadInput, ConvertLeadUseCase, CreateLeadInput, CreateLeadUseCase, DeleteLeadUseCase,
    ListLeadsUseCase, UpdateLeadInput, UpdateLeadUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadStatus>,
    pub owner_id: String,
    #[serde(serialize_with = "crm_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Lead> for LeadResponse {
    fn from(lead: Lead) -> Self {
        Self {
            id: lead.id.0,
            name: lead.name,
            email: lead.email,
            phone: lead.phone,
            status: lead.status,
            owner_id: lead.owner_id.0,
            created_at: lead.created_at,
        }
    }
}

/// Body of both create and update. On update every field is replaced, so an
/// omitted field is cleared.
#[derive(Deserialize)]
pub struct LeadRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
}

// ── GET /api/leads ───────────────────────────────────────────────────────────

pub async fn list_leads(
    BearerIdentity(caller): BearerIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<LeadResponse>>, CrmServiceError> {
    let usecase = ListLeadsUseCase {
        repo: state.lead_repo(),
    };
    let leads = usecase.execute(&caller).await?;
    Ok(Json(leads.into_iter().map(LeadResponse::from).collect()))
}

// ── POST /api/leads ──────────────────────────────────────────────────────────

pub async fn create_lead(
    BearerIdentity(caller): BearerIdentity,
    State(state): State<AppState>,
    WithRejection(Json(body), _): JsonBody<LeadRequest>,
) -> Result<(StatusCode, Json<LeadResponse>), CrmServiceError> {
    let usecase = CreateLeadUseCase {
        repo: state.lead_repo(),
    };
    let lead = usecase
        .execute(
            &caller,
            CreateLeadInput {
                name: body.name,
                email: body.email,
                phone: body.phone,
                status: body.status,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(lead.into())))
}

// ── PUT /api/leads/{id} ──────────────────────────────────────────────────────

pub async fn update_lead(
    BearerIdentity(caller): BearerIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(body), _): JsonBody<LeadRequest>,
) -> Result<Json<LeadResponse>, CrmServiceError> {
    let usecase = UpdateLeadUseCase {
        repo: state.lead_repo(),
    };
    let lead = usecase
        .execute(
            &caller,
            &LeadId::from(id),
            UpdateLeadInput {
                name: body.name,
                email: body.email,
                phone: body.phone,
                status: body.status,
            },
        )
        .await?;
    Ok(Json(lead.into()))
}

// ── DELETE /api/leads/{id} ───────────────────────────────────────────────────

pub async fn delete_lead(
    BearerIdentity(caller): BearerIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, CrmServiceError> {
    let usecase = DeleteLeadUseCase {
        repo: state.lead_repo(),
    };
    usecase.execute(&caller, &LeadId::from(id)).await?;
    Ok(MessageResponse::new("Lead deleted successfully"))
}

// ── POST /api/leads/{id}/convert ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ConvertLeadRequest {
    pub title: Option<String>,
    pub value: Option<f64>,
}

pub async fn convert_lead(
    BearerIdentity(caller): BearerIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(body), _): JsonBody<ConvertLeadRequest>,
) -> Result<(StatusCode, Json<OpportunityResponse>), CrmServiceError> {
    let usecase = ConvertLeadUseCase {
        leads: state.lead_repo(),
        opportunities: state.opportunity_repo(),
    };
    let opportunity = usecase
        .execute(
            &caller,
            &LeadId::from(id),
            ConvertLeadInput {
                title: body.title,
                value: body.value,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(opportunity.into())))
}
