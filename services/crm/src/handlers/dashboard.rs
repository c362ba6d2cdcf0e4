use std::collections::BTreeMap;

use axum::{Json, extract::State};
use serde::Serialize;

use crm_auth_types::identity::BearerIdentity;
use crm_domain::lead::LeadStatus;
use crm_domain::opportunity::OpportunityStage;

use crate::domain::types::DashboardStats;
use crate::error::CrmServiceError;
use crate::state::AppState;
use crate::usecase::dashboard::DashboardStatsUseCase;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatsResponse {
    pub total_leads: usize,
    pub total_opportunities: usize,
    pub total_value: f64,
    pub leads_by_status: BTreeMap<LeadStatus, usize>,
    pub opportunities_by_stage: BTreeMap<OpportunityStage, usize>,
}

impl From<DashboardStats> for DashboardStatsResponse {
    fn from(stats: DashboardStats) -> Self {
        Self {
            total_leads: stats.total_leads,
            total_opportunities: stats.total_opportunities,
            total_value: stats.total_value,
            leads_by_status: stats.leads_by_status,
            opportunities_by_stage: stats.opportunities_by_stage,
        }
    }
}

// ── GET /api/dashboard/stats ─────────────────────────────────────────────────

pub async fn get_stats(
    BearerIdentity(caller): BearerIdentity,
    State(state): State<AppState>,
) -> Result<Json<DashboardStatsResponse>, CrmServiceError> {
    let usecase = DashboardStatsUseCase {
        leads: state.lead_repo(),
        opportunities: state.opportunity_repo(),
    };
    let stats = usecase.execute(&caller).await?;
    Ok(Json(stats.into()))
}
