use crm::error::CrmServiceError;
use crm::usecase::lead::{
    ConvertLeadInput, ConvertLeadUseCase, CreateLeadInput, CreateLeadUseCase, DeleteLeadUseCase,
    ListLeadsUseCase, UpdateLeadInput, UpdateLeadUseCase,
};
use crm_domain::id::LeadId;
use crm_domain::lead::LeadStatus;
use crm_domain::opportunity::OpportunityStage;
use crm_testing::auth::{admin, manager, rep};

use crate::helpers::{InMemoryLeads, InMemoryOpportunities, test_lead};

fn create_input(email: &str) -> CreateLeadInput {
    CreateLeadInput {
        name: Some("Ada Lovelace".into()),
        email: Some(email.into()),
        phone: None,
        status: None,
    }
}

fn seeded_leads() -> InMemoryLeads {
    InMemoryLeads::new(vec![
        test_lead("l1", "a", LeadStatus::New),
        test_lead("l2", "b", LeadStatus::Contacted),
        test_lead("l3", "a", LeadStatus::Qualified),
    ])
}

// ── ListLeadsUseCase ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_only_own_leads_for_rep() {
    let usecase = ListLeadsUseCase {
        repo: seeded_leads(),
    };

    let leads = usecase.execute(&rep("a")).await.unwrap();
    let ids: Vec<_> = leads.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, ["l1", "l3"]);
    assert!(leads.iter().all(|l| l.owner_id.as_str() == "a"));
}

#[tokio::test]
async fn should_list_all_leads_for_admin_and_manager() {
    let usecase = ListLeadsUseCase {
        repo: seeded_leads(),
    };

    assert_eq!(usecase.execute(&admin()).await.unwrap().len(), 3);
    assert_eq!(usecase.execute(&manager()).await.unwrap().len(), 3);
}

// ── CreateLeadUseCase ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_duplicate_email_for_same_owner() {
    let usecase = CreateLeadUseCase {
        repo: InMemoryLeads::default(),
    };
    usecase
        .execute(&rep("a"), create_input("dup@example.com"))
        .await
        .unwrap();

    let result = usecase
        .execute(&rep("a"), create_input("dup@example.com"))
        .await;
    assert!(
        matches!(result, Err(CrmServiceError::LeadAlreadyExists)),
        "expected LeadAlreadyExists, got {result:?}"
    );
}

#[tokio::test]
async fn should_allow_same_email_for_different_owner() {
    let usecase = CreateLeadUseCase {
        repo: InMemoryLeads::default(),
    };
    usecase
        .execute(&rep("a"), create_input("dup@example.com"))
        .await
        .unwrap();

    let lead = usecase
        .execute(&rep("b"), create_input("dup@example.com"))
        .await
        .unwrap();
    assert_eq!(lead.owner_id.as_str(), "b");
    assert_eq!(usecase.repo.leads.lock().unwrap().len(), 2);
}

// ── UpdateLeadUseCase ────────────────────────────────────────────────────────

fn update_input(status: Option<&str>) -> UpdateLeadInput {
    UpdateLeadInput {
        name: Some("Renamed".into()),
        email: Some("renamed@example.com".into()),
        phone: None,
        status: status.map(str::to_owned),
    }
}

#[tokio::test]
async fn should_forbid_rep_updating_foreign_lead() {
    let repo = seeded_leads();
    let usecase = UpdateLeadUseCase { repo: repo.clone() };

    let result = usecase
        .execute(&rep("a"), &LeadId::from("l2"), update_input(Some("Qualified")))
        .await;
    assert!(matches!(result, Err(CrmServiceError::Forbidden)));
    assert_eq!(repo.get("l2").unwrap().status, Some(LeadStatus::Contacted));
}

#[tokio::test]
async fn should_let_admin_update_any_lead() {
    let repo = seeded_leads();
    let usecase = UpdateLeadUseCase { repo: repo.clone() };

    let lead = usecase
        .execute(&admin(), &LeadId::from("l2"), update_input(Some("Qualified")))
        .await
        .unwrap();
    assert_eq!(lead.status, Some(LeadStatus::Qualified));
    assert_eq!(lead.owner_id.as_str(), "b");
    assert_eq!(repo.get("l2").unwrap().name.as_deref(), Some("Renamed"));
}

#[tokio::test]
async fn should_clear_fields_omitted_from_update() {
    let repo = seeded_leads();
    let usecase = UpdateLeadUseCase { repo: repo.clone() };

    let lead = usecase
        .execute(&rep("a"), &LeadId::from("l1"), update_input(None))
        .await
        .unwrap();
    assert_eq!(lead.status, None);
    assert_eq!(lead.phone, None);
    assert_eq!(repo.get("l1").unwrap().status, None);
}

#[tokio::test]
async fn should_reject_unknown_status_on_update() {
    let usecase = UpdateLeadUseCase {
        repo: seeded_leads(),
    };
    let result = usecase
        .execute(&rep("a"), &LeadId::from("l1"), update_input(Some("Won")))
        .await;
    assert!(matches!(result, Err(CrmServiceError::Validation(_))));
}

#[tokio::test]
async fn should_return_not_found_before_checking_ownership() {
    let usecase = UpdateLeadUseCase {
        repo: seeded_leads(),
    };
    let result = usecase
        .execute(&rep("a"), &LeadId::from("missing"), update_input(None))
        .await;
    assert!(matches!(result, Err(CrmServiceError::LeadNotFound)));
}

// ── DeleteLeadUseCase ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_forbid_rep_deleting_foreign_lead() {
    let repo = seeded_leads();
    let usecase = DeleteLeadUseCase { repo: repo.clone() };

    let result = usecase.execute(&rep("a"), &LeadId::from("l2")).await;
    assert!(matches!(result, Err(CrmServiceError::Forbidden)));
    assert!(repo.get("l2").is_some());
}

#[tokio::test]
async fn should_let_admin_delete_any_lead() {
    let repo = seeded_leads();
    let usecase = DeleteLeadUseCase { repo: repo.clone() };

    usecase.execute(&admin(), &LeadId::from("l2")).await.unwrap();
    assert!(repo.get("l2").is_none());
    assert_eq!(repo.leads.lock().unwrap().len(), 2);
}

// ── ConvertLeadUseCase ───────────────────────────────────────────────────────

fn convert_input() -> ConvertLeadInput {
    ConvertLeadInput {
        title: Some("Deal".into()),
        value: Some(100.0),
    }
}

#[tokio::test]
async fn should_qualify_lead_and_open_discovery_opportunity() {
    let leads = seeded_leads();
    let opportunities = InMemoryOpportunities::default();
    let usecase = ConvertLeadUseCase {
        leads: leads.clone(),
        opportunities: opportunities.clone(),
    };

    let opportunity = usecase
        .execute(&rep("a"), &LeadId::from("l1"), convert_input())
        .await
        .unwrap();

    assert_eq!(leads.get("l1").unwrap().status, Some(LeadStatus::Qualified));
    assert_eq!(opportunity.stage, Some(OpportunityStage::Discovery));
    assert_eq!(opportunity.value, Some(100.0));
    assert_eq!(opportunity.title.as_deref(), Some("Deal"));
    assert_eq!(opportunity.lead_id, Some(LeadId::from("l1")));
    assert_eq!(opportunity.owner_id.as_str(), "a");
    assert_eq!(opportunities.all(), vec![opportunity]);
}

#[tokio::test]
async fn should_assign_converted_opportunity_to_lead_owner() {
    let opportunities = InMemoryOpportunities::default();
    let usecase = ConvertLeadUseCase {
        leads: seeded_leads(),
        opportunities: opportunities.clone(),
    };

    let opportunity = usecase
        .execute(&manager(), &LeadId::from("l2"), convert_input())
        .await
        .unwrap();
    assert_eq!(opportunity.owner_id.as_str(), "b");
}

#[tokio::test]
async fn should_allow_repeated_conversion() {
    let opportunities = InMemoryOpportunities::default();
    let usecase = ConvertLeadUseCase {
        leads: seeded_leads(),
        opportunities: opportunities.clone(),
    };

    let first = usecase
        .execute(&rep("a"), &LeadId::from("l3"), convert_input())
        .await
        .unwrap();
    let second = usecase
        .execute(&rep("a"), &LeadId::from("l3"), convert_input())
        .await
        .unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(opportunities.all().len(), 2);
}

#[tokio::test]
async fn should_forbid_rep_converting_foreign_lead() {
    let leads = seeded_leads();
    let opportunities = InMemoryOpportunities::default();
    let usecase = ConvertLeadUseCase {
        leads: leads.clone(),
        opportunities: opportunities.clone(),
    };

    let result = usecase
        .execute(&rep("a"), &LeadId::from("l2"), convert_input())
        .await;
    assert!(matches!(result, Err(CrmServiceError::Forbidden)));
    assert_eq!(leads.get("l2").unwrap().status, Some(LeadStatus::Contacted));
    assert!(opportunities.all().is_empty());
}
