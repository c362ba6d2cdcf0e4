use crm::error::CrmServiceError;
use crm::usecase::opportunity::{
    CreateOpportunityInput, CreateOpportunityUseCase, DeleteOpportunityUseCase,
    ListOpportunitiesUseCase, UpdateOpportunityInput, UpdateOpportunityUseCase,
};
use crm_domain::id::OpportunityId;
use crm_domain::opportunity::OpportunityStage;
use crm_testing::auth::{admin, manager, rep};

use crate::helpers::{InMemoryOpportunities, test_opportunity};

fn create_input(value: f64) -> CreateOpportunityInput {
    CreateOpportunityInput {
        title: Some("Annual contract".into()),
        value: Some(value),
        stage: None,
    }
}

fn seeded() -> InMemoryOpportunities {
    InMemoryOpportunities::new(vec![
        test_opportunity("o1", "a", OpportunityStage::Discovery, 100.0),
        test_opportunity("o2", "b", OpportunityStage::Won, 50.0),
    ])
}

#[tokio::test]
async fn should_reject_negative_value() {
    let repo = InMemoryOpportunities::default();
    let usecase = CreateOpportunityUseCase { repo: repo.clone() };

    let result = usecase.execute(&rep("a"), create_input(-5.0)).await;
    assert!(
        matches!(result, Err(CrmServiceError::Validation(_))),
        "expected Validation, got {result:?}"
    );
    assert!(repo.all().is_empty());
}

#[tokio::test]
async fn should_accept_zero_value() {
    let repo = InMemoryOpportunities::default();
    let usecase = CreateOpportunityUseCase { repo: repo.clone() };

    let opportunity = usecase.execute(&rep("a"), create_input(0.0)).await.unwrap();
    assert_eq!(opportunity.value, Some(0.0));
    assert_eq!(opportunity.stage, Some(OpportunityStage::Discovery));
    assert_eq!(repo.all().len(), 1);
}

#[tokio::test]
async fn should_allow_duplicate_titles() {
    let usecase = CreateOpportunityUseCase {
        repo: InMemoryOpportunities::default(),
    };
    usecase.execute(&rep("a"), create_input(1.0)).await.unwrap();
    usecase.execute(&rep("a"), create_input(2.0)).await.unwrap();
    assert_eq!(usecase.repo.all().len(), 2);
}

#[tokio::test]
async fn should_list_only_own_opportunities_for_rep() {
    let usecase = ListOpportunitiesUseCase { repo: seeded() };

    let own = usecase.execute(&rep("b")).await.unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].id, OpportunityId::from("o2"));

    assert_eq!(usecase.execute(&manager()).await.unwrap().len(), 2);
}

#[tokio::test]
async fn should_forbid_rep_updating_foreign_opportunity() {
    let usecase = UpdateOpportunityUseCase { repo: seeded() };
    let result = usecase
        .execute(
            &rep("a"),
            &OpportunityId::from("o2"),
            UpdateOpportunityInput {
                title: Some("Mine now".into()),
                value: Some(1.0),
                stage: Some("Lost".into()),
            },
        )
        .await;
    assert!(matches!(result, Err(CrmServiceError::Forbidden)));
}

#[tokio::test]
async fn should_replace_all_fields_on_update() {
    let repo = seeded();
    let usecase = UpdateOpportunityUseCase { repo: repo.clone() };

    let updated = usecase
        .execute(
            &rep("a"),
            &OpportunityId::from("o1"),
            UpdateOpportunityInput {
                title: None,
                value: Some(250.0),
                stage: Some("Proposal".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, None);
    assert_eq!(updated.value, Some(250.0));
    assert_eq!(updated.stage, Some(OpportunityStage::Proposal));
    assert_eq!(repo.all()[0], updated);
}

#[tokio::test]
async fn should_reject_negative_value_on_update() {
    let usecase = UpdateOpportunityUseCase { repo: seeded() };
    let result = usecase
        .execute(
            &admin(),
            &OpportunityId::from("o1"),
            UpdateOpportunityInput {
                title: Some("Deal".into()),
                value: Some(-1.0),
                stage: None,
            },
        )
        .await;
    assert!(matches!(result, Err(CrmServiceError::Validation(_))));
}

#[tokio::test]
async fn should_delete_with_ownership_check() {
    let repo = seeded();
    let usecase = DeleteOpportunityUseCase { repo: repo.clone() };

    let denied = usecase.execute(&rep("a"), &OpportunityId::from("o2")).await;
    assert!(matches!(denied, Err(CrmServiceError::Forbidden)));

    usecase
        .execute(&admin(), &OpportunityId::from("o2"))
        .await
        .unwrap();
    assert_eq!(repo.all().len(), 1);

    let missing = usecase
        .execute(&admin(), &OpportunityId::from("o2"))
        .await;
    assert!(matches!(missing, Err(CrmServiceError::OpportunityNotFound)));
}
