use axum::extract::FromRef;

use crm_auth_types::token::Authenticator;

use crate::infra::store::{Backend, LeadStore, OpportunityStore, UserStore};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub backend: Backend,
    pub authenticator: Authenticator,
}

impl AppState {
    pub fn user_repo(&self) -> UserStore {
        self.backend.users()
    }

    pub fn lead_repo(&self) -> LeadStore {
        self.backend.leads()
    }

    pub fn opportunity_repo(&self) -> OpportunityStore {
        self.backend.opportunities()
    }
}

impl FromRef<AppState> for Authenticator {
    fn from_ref(state: &AppState) -> Self {
        state.authenticator.clone()
    }
}
