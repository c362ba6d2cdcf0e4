use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, sea_query::Expr,
};

use crm_domain::id::{LeadId, OpportunityId, UserId};
use crm_domain::lead::LeadStatus;
use crm_domain::opportunity::OpportunityStage;
use crm_domain::user::Role;
use crm_schema::{leads, opportunities, users};

use crate::domain::repository::{LeadRepository, OpportunityRepository, UserRepository};
use crate::domain::types::{Lead, Opportunity, User};
use crate::error::CrmServiceError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn list(&self) -> Result<Vec<User>, CrmServiceError> {
        let models = users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .order_by_asc(users::Column::Id)
            .all(&self.db)
            .await
            .context("list users")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, CrmServiceError> {
        let model = users::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CrmServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &User) -> Result<(), CrmServiceError> {
        users::ActiveModel {
            id: Set(user.id.to_string()),
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(user.role.as_wire().to_owned()),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .context("create user")?;
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<bool, CrmServiceError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::Name, Expr::value(user.name.clone()))
            .col_expr(users::Column::Email, Expr::value(user.email.clone()))
            .col_expr(users::Column::PasswordHash, Expr::value(user.password_hash.clone()))
            .col_expr(users::Column::Role, Expr::value(user.role.as_wire()))
            .filter(users::Column::Id.eq(user.id.as_str()))
            .exec(&self.db)
            .await
            .context("update user")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, CrmServiceError> {
        let result = users::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected > 0)
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: UserId(model.id),
        name: model.name,
        email: model.email,
        password_hash: model.password_hash,
        role: Role::from_wire(&model.role).unwrap_or_default(),
    }
}

// ── Lead repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbLeadRepository {
    pub db: DatabaseConnection,
}

impl LeadRepository for DbLeadRepository {
    async fn list(&self) -> Result<Vec<Lead>, CrmServiceError> {
        let models = leads::Entity::find()
            .order_by_asc(leads::Column::CreatedAt)
            .order_by_asc(leads::Column::Id)
            .all(&self.db)
            .await
            .context("list leads")?;
        Ok(models.into_iter().map(lead_from_model).collect())
    }

    async fn find_by_id(&self, id: &LeadId) -> Result<Option<Lead>, CrmServiceError> {
        let model = leads::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .context("find lead by id")?;
        Ok(model.map(lead_from_model))
    }

    async fn exists_for_owner(
        &self,
        owner_id: &UserId,
        email: &str,
    ) -> Result<bool, CrmServiceError> {
        let count = leads::Entity::find()
            .filter(leads::Column::OwnerId.eq(owner_id.as_str()))
            .filter(leads::Column::Email.eq(email))
            .count(&self.db)
            .await
            .context("count leads by owner and email")?;
        Ok(count > 0)
    }

    async fn create(&self, lead: &Lead) -> Result<(), CrmServiceError> {
        lead_to_active_model(lead)
            .insert(&self.db)
            .await
            .context("create lead")?;
        Ok(())
    }

    async fn update(&self, lead: &Lead) -> Result<bool, CrmServiceError> {
        let result = leads::Entity::update_many()
            .col_expr(leads::Column::Name, Expr::value(lead.name.clone()))
            .col_expr(leads::Column::Email, Expr::value(lead.email.clone()))
            .col_expr(leads::Column::Phone, Expr::value(lead.phone.clone()))
            .col_expr(
                leads::Column::Status,
                Expr::value(lead.status.map(|s| s.as_wire().to_owned())),
            )
            .filter(leads::Column::Id.eq(lead.id.as_str()))
            .exec(&self.db)
            .await
            .context("update lead")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: &LeadId) -> Result<bool, CrmServiceError> {
        let result = leads::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .context("delete lead")?;
        Ok(result.rows_affected > 0)
    }
}

fn lead_to_active_model(lead: &Lead) -> leads::ActiveModel {
    leads::ActiveModel {
        id: Set(lead.id.to_string()),
        name: Set(lead.name.clone()),
        email: Set(lead.email.clone()),
        phone: Set(lead.phone.clone()),
        status: Set(lead.status.map(|s| s.as_wire().to_owned())),
        owner_id: Set(lead.owner_id.to_string()),
        created_at: Set(lead.created_at),
    }
}

fn lead_from_model(model: leads::Model) -> Lead {
    Lead {
        id: LeadId(model.id),
        name: model.name,
        email: model.email,
        phone: model.phone,
        status: model.status.as_deref().and_then(LeadStatus::from_wire),
        owner_id: UserId(model.owner_id),
        created_at: model.created_at,
    }
}

// ── Opportunity repository ───────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOpportunityRepository {
    pub db: DatabaseConnection,
}

impl OpportunityRepository for DbOpportunityRepository {
    async fn list(&self) -> Result<Vec<Opportunity>, CrmServiceError> {
        let models = opportunities::Entity::find()
            .order_by_asc(opportunities::Column::CreatedAt)
            .order_by_asc(opportunities::Column::Id)
            .all(&self.db)
            .await
            .context("list opportunities")?;
        Ok(models.into_iter().map(opportunity_from_model).collect())
    }

    async fn find_by_id(
        &self,
        id: &OpportunityId,
    ) -> Result<Option<Opportunity>, CrmServiceError> {
        let model = opportunities::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .context("find opportunity by id")?;
        Ok(model.map(opportunity_from_model))
    }

    async fn create(&self, opportunity: &Opportunity) -> Result<(), CrmServiceError> {
        opportunities::ActiveModel {
            id: Set(opportunity.id.to_string()),
            title: Set(opportunity.title.clone()),
            value: Set(opportunity.value),
            stage: Set(opportunity.stage.map(|s| s.as_wire().to_owned())),
            owner_id: Set(opportunity.owner_id.to_string()),
            lead_id: Set(opportunity.lead_id.as_ref().map(ToString::to_string)),
            created_at: Set(opportunity.created_at),
        }
        .insert(&self.db)
        .await
        .context("create opportunity")?;
        Ok(())
    }

    async fn update(&self, opportunity: &Opportunity) -> Result<bool, CrmServiceError> {
        let result = opportunities::Entity::update_many()
            .col_expr(opportunities::Column::Title, Expr::value(opportunity.title.clone()))
            .col_expr(opportunities::Column::Value, Expr::value(opportunity.value))
            .col_expr(
                opportunities::Column::Stage,
                Expr::value(opportunity.stage.map(|s| s.as_wire().to_owned())),
            )
            .filter(opportunities::Column::Id.eq(opportunity.id.as_str()))
            .exec(&self.db)
            .await
            .context("update opportunity")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: &OpportunityId) -> Result<bool, CrmServiceError> {
        let result = opportunities::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .context("delete opportunity")?;
        Ok(result.rows_affected > 0)
    }
}

fn opportunity_from_model(model: opportunities::Model) -> Opportunity {
    Opportunity {
        id: OpportunityId(model.id),
        title: model.title,
        value: model.value,
        stage: model.stage.as_deref().and_then(OpportunityStage::from_wire),
        owner_id: UserId(model.owner_id),
        lead_id: model.lead_id.map(LeadId),
        created_at: model.created_at,
    }
}
