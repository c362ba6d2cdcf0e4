#![allow(async_fn_in_trait)]

use crm_domain::id::{LeadId, OpportunityId, UserId};

use crate::domain::types::{Lead, Opportunity, User};
use crate::error::CrmServiceError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    /// All users in insertion order.
    async fn list(&self) -> Result<Vec<User>, CrmServiceError>;
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, CrmServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CrmServiceError>;
    async fn create(&self, user: &User) -> Result<(), CrmServiceError>;
    /// Replace the stored user with the same id. Returns `false` if none exists.
    async fn update(&self, user: &User) -> Result<bool, CrmServiceError>;
    /// Returns `true` if a user was deleted.
    async fn delete(&self, id: &UserId) -> Result<bool, CrmServiceError>;
}

/// Repository for leads.
pub trait LeadRepository: Send + Sync {
    /// All leads in insertion order. Visibility filtering is the caller's job.
    async fn list(&self) -> Result<Vec<Lead>, CrmServiceError>;
    async fn find_by_id(&self, id: &LeadId) -> Result<Option<Lead>, CrmServiceError>;
    /// Whether `owner` already has a lead with this exact email.
    async fn exists_for_owner(
        &self,
        owner_id: &UserId,
        email: &str,
    ) -> Result<bool, CrmServiceError>;
    async fn create(&self, lead: &Lead) -> Result<(), CrmServiceError>;
    /// Replace the stored lead with the same id. Returns `false` if none exists.
    async fn update(&self, lead: &Lead) -> Result<bool, CrmServiceError>;
    /// Returns `true` if a lead was deleted.
    async fn delete(&self, id: &LeadId) -> Result<bool, CrmServiceError>;
}

/// Repository for opportunities.
pub trait OpportunityRepository: Send + Sync {
    /// All opportunities in insertion order.
    async fn list(&self) -> Result<Vec<Opportunity>, CrmServiceError>;
    async fn find_by_id(&self, id: &OpportunityId)
    -> Result<Option<Opportunity>, CrmServiceError>;
    async fn create(&self, opportunity: &Opportunity) -> Result<(), CrmServiceError>;
    /// Replace the stored opportunity with the same id. Returns `false` if none exists.
    async fn update(&self, opportunity: &Opportunity) -> Result<bool, CrmServiceError>;
    /// Returns `true` if an opportunity was deleted.
    async fn delete(&self, id: &OpportunityId) -> Result<bool, CrmServiceError>;
}
