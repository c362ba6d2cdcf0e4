//! Backend selection. Each store enum forwards to the JSON-file or database
//! repository chosen at start-up, so use cases stay generic over one type.

use anyhow::Context as _;
use sea_orm::DatabaseConnection;

use crm_domain::id::{LeadId, OpportunityId, UserId};

use crate::domain::repository::{LeadRepository, OpportunityRepository, UserRepository};
use crate::domain::types::{Lead, Opportunity, User};
use crate::error::CrmServiceError;
use crate::infra::db::{DbLeadRepository, DbOpportunityRepository, DbUserRepository};
use crate::infra::json_store::{
    JsonLeadRepository, JsonOpportunityRepository, JsonStore, JsonUserRepository,
};

/// Where records live.
#[derive(Clone)]
pub enum Backend {
    Json(JsonStore),
    Database(DatabaseConnection),
}

impl Backend {
    pub async fn ping(&self) -> anyhow::Result<()> {
        match self {
            Self::Json(store) => store.ping().await,
            Self::Database(db) => db.ping().await.context("ping database"),
        }
    }

    pub fn users(&self) -> UserStore {
        match self {
            Self::Json(store) => UserStore::Json(store.user_repo()),
            Self::Database(db) => UserStore::Database(DbUserRepository { db: db.clone() }),
        }
    }

    pub fn leads(&self) -> LeadStore {
        match self {
            Self::Json(store) => LeadStore::Json(store.lead_repo()),
            Self::Database(db) => LeadStore::Database(DbLeadRepository { db: db.clone() }),
        }
    }

    pub fn opportunities(&self) -> OpportunityStore {
        match self {
            Self::Json(store) => OpportunityStore::Json(store.opportunity_repo()),
            Self::Database(db) => {
                OpportunityStore::Database(DbOpportunityRepository { db: db.clone() })
            }
        }
    }
}

// ── Users ────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub enum UserStore {
    Json(JsonUserRepository),
    Database(DbUserRepository),
}

impl UserRepository for UserStore {
    async fn list(&self) -> Result<Vec<User>, CrmServiceError> {
        match self {
            Self::Json(repo) => repo.list().await,
            Self::Database(repo) => repo.list().await,
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, CrmServiceError> {
        match self {
            Self::Json(repo) => repo.find_by_id(id).await,
            Self::Database(repo) => repo.find_by_id(id).await,
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CrmServiceError> {
        match self {
            Self::Json(repo) => repo.find_by_email(email).await,
            Self::Database(repo) => repo.find_by_email(email).await,
        }
    }

    async fn create(&self, user: &User) -> Result<(), CrmServiceError> {
        match self {
            Self::Json(repo) => repo.create(user).await,
            Self::Database(repo) => repo.create(user).await,
        }
    }

    async fn update(&self, user: &User) -> Result<bool, CrmServiceError> {
        match self {
            Self::Json(repo) => repo.update(user).await,
            Self::Database(repo) => repo.update(user).await,
        }
    }

    async fn delete(&self, id: &UserId) -> Result<bool, CrmServiceError> {
        match self {
            Self::Json(repo) => repo.delete(id).await,
            Self::Database(repo) => repo.delete(id).await,
        }
    }
}

// ── Leads ────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub enum LeadStore {
    Json(JsonLeadRepository),
    Database(DbLeadRepository),
}

impl LeadRepository for LeadStore {
    async fn list(&self) -> Result<Vec<Lead>, CrmServiceError> {
        match self {
            Self::Json(repo) => repo.list().await,
            Self::Database(repo) => repo.list().await,
        }
    }

    async fn find_by_id(&self, id: &LeadId) -> Result<Option<Lead>, CrmServiceError> {
        match self {
            Self::Json(repo) => repo.find_by_id(id).await,
            Self::Database(repo) => repo.find_by_id(id).await,
        }
    }

    async fn exists_for_owner(
        &self,
        owner_id: &UserId,
        email: &str,
    ) -> Result<bool, CrmServiceError> {
        match self {
            Self::Json(repo) => repo.exists_for_owner(owner_id, email).await,
            Self::Database(repo) => repo.exists_for_owner(owner_id, email).await,
        }
    }

    async fn create(&self, lead: &Lead) -> Result<(), CrmServiceError> {
        match self {
            Self::Json(repo) => repo.create(lead).await,
            Self::Database(repo) => repo.create(lead).await,
        }
    }

    async fn update(&self, lead: &Lead) -> Result<bool, CrmServiceError> {
        match self {
            Self::Json(repo) => repo.update(lead).await,
            Self::Database(repo) => repo.update(lead).await,
        }
    }

    async fn delete(&self, id: &LeadId) -> Result<bool, CrmServiceError> {
        match self {
            Self::Json(repo) => repo.delete(id).await,
            Self::Database(repo) => repo.delete(id).await,
        }
    }
}

// ── Opportunities ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub enum OpportunityStore {
    Json(JsonOpportunityRepository),
    Database(DbOpportunityRepository),
}

impl OpportunityRepository for OpportunityStore {
    async fn list(&self) -> Result<Vec<Opportunity>, CrmServiceError> {
        match self {
            Self::Json(repo) => repo.list().await,
            Self::Database(repo) => repo.list().await,
        }
    }

    async fn find_by_id(
        &self,
        id: &OpportunityId,
    ) -> Result<Option<Opportunity>, CrmServiceError> {
        match self {
            Self::Json(repo) => repo.find_by_id(id).await,
            Self::Database(repo) => repo.find_by_id(id).await,
        }
    }

    async fn create(&self, opportunity: &Opportunity) -> Result<(), CrmServiceError> {
        match self {
            Self::Json(repo) => repo.create(opportunity).await,
            Self::Database(repo) => repo.create(opportunity).await,
        }
    }

    async fn update(&self, opportunity: &Opportunity) -> Result<bool, CrmServiceError> {
        match self {
            Self::Json(repo) => repo.update(opportunity).await,
            Self::Database(repo) => repo.update(opportunity).await,
        }
    }

    async fn delete(&self, id: &OpportunityId) -> Result<bool, CrmServiceError> {
        match self {
            Self::Json(repo) => repo.delete(id).await,
            Self::Database(repo) => repo.delete(id).await,
        }
    }
}
