use std::path::PathBuf;

use serde::Deserialize;

use crm_core::config::Config;

/// CRM service configuration loaded from environment variables.
///
/// Built once in `main` and handed to `AppState`; nothing reads the
/// environment after start-up.
#[derive(Debug, Deserialize)]
pub struct CrmConfig {
    /// HMAC secret for signing bearer tokens. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// TCP port for the HTTP server (default 5000). Env var: `CRM_PORT`.
    #[serde(default = "default_port")]
    pub crm_port: u16,
    /// Directory holding `users.json`, `leads.json` and `opportunities.json`.
    /// Env var: `CRM_DATA_DIR`.
    #[serde(default = "default_data_dir")]
    pub crm_data_dir: PathBuf,
    /// When set, records live in this database instead of JSON files.
    pub database_url: Option<String>,
    /// Browser origin allowed by CORS. Env var: `CRM_CORS_ORIGIN`.
    #[serde(default = "default_cors_origin")]
    pub crm_cors_origin: String,
    /// Create the demo admin/manager/rep accounts when no users exist.
    #[serde(default = "default_seed_users")]
    pub crm_seed_users: bool,
}

impl Config for CrmConfig {}

fn default_port() -> u16 {
    5000
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_owned()
}

fn default_seed_users() -> bool {
    true
}
