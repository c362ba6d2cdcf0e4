use crm_domain::user::Caller;

use crate::domain::policy::visible;
use crate::domain::repository::{LeadRepository, OpportunityRepository};
use crate::domain::types::{DashboardStats, Lead, Opportunity};
use crate::error::CrmServiceError;

/// Aggregate counts over a set of leads and opportunities.
///
/// A record whose status or stage has been cleared still counts toward the
/// totals but appears in neither breakdown. A missing `value` adds nothing.
pub fn compute_stats(leads: &[Lead], opportunities: &[Opportunity]) -> DashboardStats {
    let mut stats = DashboardStats {
        total_leads: leads.len(),
        total_opportunities: opportunities.len(),
        ..DashboardStats::default()
    };
    for status in leads.iter().filter_map(|l| l.status) {
        *stats.leads_by_status.entry(status).or_default() += 1;
    }
    for opportunity in opportunities {
        stats.total_value += opportunity.value.unwrap_or(0.0);
        if let Some(stage) = opportunity.stage {
            *stats.opportunities_by_stage.entry(stage).or_default() += 1;
        }
    }
    stats
}

// ── DashboardStats ───────────────────────────────────────────────────────────

pub struct DashboardStatsUseCase<L: LeadRepository, O: OpportunityRepository> {
    pub leads: L,
    pub opportunities: O,
}

impl<L: LeadRepository, O: OpportunityRepository> DashboardStatsUseCase<L, O> {
    pub async fn execute(&self, caller: &Caller) -> Result<DashboardStats, CrmServiceError> {
        let leads = visible(caller, self.leads.list().await?);
        let opportunities = visible(caller, self.opportunities.list().await?);
        Ok(compute_stats(&leads, &opportunities))
    }
}
