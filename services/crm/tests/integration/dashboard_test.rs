use std::collections::BTreeMap;

use crm::usecase::dashboard::DashboardStatsUseCase;
use crm_domain::lead::LeadStatus;
use crm_domain::opportunity::OpportunityStage;
use crm_testing::auth::{admin, rep};

use crate::helpers::{InMemoryLeads, InMemoryOpportunities, test_lead, test_opportunity};

#[tokio::test]
async fn should_aggregate_visible_records() {
    let usecase = DashboardStatsUseCase {
        leads: InMemoryLeads::new(vec![
            test_lead("l1", "a", LeadStatus::New),
            test_lead("l2", "a", LeadStatus::New),
            test_lead("l3", "a", LeadStatus::Qualified),
        ]),
        opportunities: InMemoryOpportunities::new(vec![
            test_opportunity("o1", "a", OpportunityStage::Discovery, 100.0),
            test_opportunity("o2", "a", OpportunityStage::Won, 50.0),
        ]),
    };

    let stats = usecase.execute(&rep("a")).await.unwrap();
    assert_eq!(stats.total_leads, 3);
    assert_eq!(stats.total_opportunities, 2);
    assert_eq!(stats.total_value, 150.0);
    assert_eq!(
        stats.leads_by_status,
        BTreeMap::from([(LeadStatus::New, 2), (LeadStatus::Qualified, 1)])
    );
    assert_eq!(
        stats.opportunities_by_stage,
        BTreeMap::from([(OpportunityStage::Discovery, 1), (OpportunityStage::Won, 1)])
    );
}

#[tokio::test]
async fn should_restrict_rep_stats_to_own_records() {
    let usecase = DashboardStatsUseCase {
        leads: InMemoryLeads::new(vec![
            test_lead("l1", "a", LeadStatus::New),
            test_lead("l2", "b", LeadStatus::Contacted),
        ]),
        opportunities: InMemoryOpportunities::new(vec![
            test_opportunity("o1", "a", OpportunityStage::Proposal, 10.0),
            test_opportunity("o2", "b", OpportunityStage::Lost, 90.0),
        ]),
    };

    let own = usecase.execute(&rep("b")).await.unwrap();
    assert_eq!(own.total_leads, 1);
    assert_eq!(own.total_value, 90.0);
    assert_eq!(own.leads_by_status.get(&LeadStatus::New), None);

    let all = usecase.execute(&admin()).await.unwrap();
    assert_eq!(all.total_leads, 2);
    assert_eq!(all.total_opportunities, 2);
    assert_eq!(all.total_value, 100.0);
}
