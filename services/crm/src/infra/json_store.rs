//! JSON-file persistence: one pretty-printed array per collection.
//!
//! Every write rewrites the whole file through a temp file and a rename, so a
//! reader never sees a half-written array. Writes within one process are
//! serialized per collection; separate processes sharing a directory are
//! last-writer-wins.

use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crm_domain::id::{LeadId, OpportunityId, UserId};
use crm_domain::lead::LeadStatus;
use crm_domain::opportunity::OpportunityStage;
use crm_domain::user::Role;

use crate::domain::repository::{LeadRepository, OpportunityRepository, UserRepository};
use crate::domain::types::{Lead, Opportunity, User};
use crate::error::CrmServiceError;

pub const USERS_FILE: &str = "users.json";
pub const LEADS_FILE: &str = "leads.json";
pub const OPPORTUNITIES_FILE: &str = "opportunities.json";

// ── Collection ───────────────────────────────────────────────────────────────

/// A JSON array of `T` stored in a single file.
pub struct JsonCollection<T> {
    path: PathBuf,
    write_lock: Mutex<()>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> JsonCollection<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
            _record: PhantomData,
        }
    }

    /// All records in file order. A missing file is an empty collection.
    pub async fn read_all(&self) -> anyhow::Result<Vec<T>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("read {}", self.path.display()));
            }
        };
        serde_json::from_slice(&bytes).with_context(|| format!("parse {}", self.path.display()))
    }

    async fn write_all(&self, records: &[T]) -> anyhow::Result<()> {
        let bytes = serde_json::to_vec_pretty(records).context("serialize collection")?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .with_context(|| format!("write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("rename {} into place", tmp.display()))?;
        debug!(path = %self.path.display(), count = records.len(), "collection written");
        Ok(())
    }

    /// Read-modify-write under the collection lock.
    ///
    /// `apply` returns `None` to signal that nothing changed; the file is then
    /// left untouched.
    pub async fn mutate<R>(
        &self,
        apply: impl FnOnce(&mut Vec<T>) -> Option<R>,
    ) -> anyhow::Result<Option<R>> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_all().await?;
        let Some(result) = apply(&mut records) else {
            return Ok(None);
        };
        self.write_all(&records).await?;
        Ok(Some(result))
    }

    /// Write `records` only if the file does not exist yet.
    pub async fn init_if_missing(&self, records: &[T]) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().await;
        if tokio::fs::try_exists(&self.path)
            .await
            .with_context(|| format!("stat {}", self.path.display()))?
        {
            return Ok(());
        }
        self.write_all(records).await
    }
}

// ── Records ──────────────────────────────────────────────────────────────────

/// On-disk user. Files written by older servers keep the hash under `password`.
/// `role` is kept as text; a value outside the known set loads as `rep`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(alias = "password")]
    pub password_hash: String,
    #[serde(default)]
    pub role: String,
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        User {
            id: UserId(r.id),
            name: r.name,
            email: r.email,
            password_hash: r.password_hash,
            role: Role::from_wire(&r.role).unwrap_or_default(),
        }
    }
}

impl From<&User> for UserRecord {
    fn from(u: &User) -> Self {
        UserRecord {
            id: u.id.to_string(),
            name: u.name.clone(),
            email: u.email.clone(),
            password_hash: u.password_hash.clone(),
            role: u.role.as_wire().to_owned(),
        }
    }
}

/// On-disk lead. `status` is kept as text; a value outside the known set
/// loads as a cleared status rather than failing the whole file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub owner_id: String,
    #[serde(serialize_with = "crm_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<LeadRecord> for Lead {
    fn from(r: LeadRecord) -> Self {
        Lead {
            id: LeadId(r.id),
            name: r.name,
            email: r.email,
            phone: r.phone,
            status: r.status.as_deref().and_then(LeadStatus::from_wire),
            owner_id: UserId(r.owner_id),
            created_at: r.created_at,
        }
    }
}

impl From<&Lead> for LeadRecord {
    fn from(l: &Lead) -> Self {
        LeadRecord {
            id: l.id.to_string(),
            name: l.name.clone(),
            email: l.email.clone(),
            phone: l.phone.clone(),
            status: l.status.map(|s| s.as_wire().to_owned()),
            owner_id: l.owner_id.to_string(),
            created_at: l.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    pub owner_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<String>,
    #[serde(serialize_with = "crm_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<OpportunityRecord> for Opportunity {
    fn from(r: OpportunityRecord) -> Self {
        Opportunity {
            id: OpportunityId(r.id),
            title: r.title,
            value: r.value,
            stage: r.stage.as_deref().and_then(OpportunityStage::from_wire),
            owner_id: UserId(r.owner_id),
            lead_id: r.lead_id.map(LeadId),
            created_at: r.created_at,
        }
    }
}

impl From<&Opportunity> for OpportunityRecord {
    fn from(o: &Opportunity) -> Self {
        OpportunityRecord {
            id: o.id.to_string(),
            title: o.title.clone(),
            value: o.value,
            stage: o.stage.map(|s| s.as_wire().to_owned()),
            owner_id: o.owner_id.to_string(),
            lead_id: o.lead_id.as_ref().map(ToString::to_string),
            created_at: o.created_at,
        }
    }
}

// ── Store ────────────────────────────────────────────────────────────────────

/// The three collections of one data directory.
#[derive(Clone)]
pub struct JsonStore {
    users: Arc<JsonCollection<UserRecord>>,
    leads: Arc<JsonCollection<LeadRecord>>,
    opportunities: Arc<JsonCollection<OpportunityRecord>>,
}

impl JsonStore {
    /// Create `dir` if needed and make sure each collection file exists.
    pub async fn open(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("create data dir {}", dir.display()))?;

        let store = Self {
            users: Arc::new(JsonCollection::new(dir.join(USERS_FILE))),
            leads: Arc::new(JsonCollection::new(dir.join(LEADS_FILE))),
            opportunities: Arc::new(JsonCollection::new(dir.join(OPPORTUNITIES_FILE))),
        };
        store.users.init_if_missing(&[]).await?;
        store.leads.init_if_missing(&[]).await?;
        store.opportunities.init_if_missing(&[]).await?;
        debug!(dir = %dir.display(), "json store opened");
        Ok(store)
    }

    /// Readiness probe: the users file can be read and parsed.
    pub async fn ping(&self) -> anyhow::Result<()> {
        self.users.read_all().await.map(|_| ())
    }

    pub fn user_repo(&self) -> JsonUserRepository {
        JsonUserRepository {
            collection: Arc::clone(&self.users),
        }
    }

    pub fn lead_repo(&self) -> JsonLeadRepository {
        JsonLeadRepository {
            collection: Arc::clone(&self.leads),
        }
    }

    pub fn opportunity_repo(&self) -> JsonOpportunityRepository {
        JsonOpportunityRepository {
            collection: Arc::clone(&self.opportunities),
        }
    }
}

/// Replace the record whose id matches; `None` if there is none.
fn replace_where<T>(records: &mut [T], record: T, same_id: impl Fn(&T) -> bool) -> Option<()> {
    let slot = records.iter_mut().find(|r| same_id(r))?;
    *slot = record;
    Some(())
}

/// Remove the record whose id matches; `None` if there is none.
fn remove_where<T>(records: &mut Vec<T>, same_id: impl Fn(&T) -> bool) -> Option<()> {
    let index = records.iter().position(same_id)?;
    records.remove(index);
    Some(())
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct JsonUserRepository {
    collection: Arc<JsonCollection<UserRecord>>,
}

impl UserRepository for JsonUserRepository {
    async fn list(&self) -> Result<Vec<User>, CrmServiceError> {
        let records = self.collection.read_all().await?;
        Ok(records.into_iter().map(User::from).collect())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, CrmServiceError> {
        let records = self.collection.read_all().await?;
        Ok(records
            .into_iter()
            .find(|r| r.id == id.as_str())
            .map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CrmServiceError> {
        let records = self.collection.read_all().await?;
        Ok(records.into_iter().find(|r| r.email == email).map(User::from))
    }

    async fn create(&self, user: &User) -> Result<(), CrmServiceError> {
        let record = UserRecord::from(user);
        self.collection
            .mutate(|records| {
                records.push(record);
                Some(())
            })
            .await?;
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<bool, CrmServiceError> {
        let record = UserRecord::from(user);
        let updated = self
            .collection
            .mutate(|records| replace_where(records, record, |r| r.id == user.id.as_str()))
            .await?;
        Ok(updated.is_some())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, CrmServiceError> {
        let deleted = self
            .collection
            .mutate(|records| remove_where(records, |r| r.id == id.as_str()))
            .await?;
        Ok(deleted.is_some())
    }
}

// ── Lead repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct JsonLeadRepository {
    collection: Arc<JsonCollection<LeadRecord>>,
}

impl LeadRepository for JsonLeadRepository {
    async fn list(&self) -> Result<Vec<Lead>, CrmServiceError> {
        let records = self.collection.read_all().await?;
        Ok(records.into_iter().map(Lead::from).collect())
    }

    async fn find_by_id(&self, id: &LeadId) -> Result<Option<Lead>, CrmServiceError> {
        let records = self.collection.read_all().await?;
        Ok(records
            .into_iter()
            .find(|r| r.id == id.as_str())
            .map(Lead::from))
    }

    async fn exists_for_owner(
        &self,
        owner_id: &UserId,
        email: &str,
    ) -> Result<bool, CrmServiceError> {
        let records = self.collection.read_all().await?;
        Ok(records
            .iter()
            .any(|r| r.owner_id == owner_id.as_str() && r.email.as_deref() == Some(email)))
    }

    async fn create(&self, lead: &Lead) -> Result<(), CrmServiceError> {
        let record = LeadRecord::from(lead);
        self.collection
            .mutate(|records| {
                records.push(record);
                Some(())
            })
            .await?;
        Ok(())
    }

    async fn update(&self, lead: &Lead) -> Result<bool, CrmServiceError> {
        let record = LeadRecord::from(lead);
        let updated = self
            .collection
            .mutate(|records| replace_where(records, record, |r| r.id == lead.id.as_str()))
            .await?;
        Ok(updated.is_some())
    }

    async fn delete(&self, id: &LeadId) -> Result<bool, CrmServiceError> {
        let deleted = self
            .collection
            .mutate(|records| remove_where(records, |r| r.id == id.as_str()))
            .await?;
        Ok(deleted.is_some())
    }
}

// ── Opportunity repository ───────────────────────────────────────────────────

#[derive(Clone)]
pub struct JsonOpportunityRepository {
    collection: Arc<JsonCollection<OpportunityRecord>>,
}

impl OpportunityRepository for JsonOpportunityRepository {
    async fn list(&self) -> Result<Vec<Opportunity>, CrmServiceError> {
        let records = self.collection.read_all().await?;
        Ok(records.into_iter().map(Opportunity::from).collect())
    }

    async fn find_by_id(
        &self,
        id: &OpportunityId,
    ) -> Result<Option<Opportunity>, CrmServiceError> {
        let records = self.collection.read_all().await?;
        Ok(records
            .into_iter()
            .find(|r| r.id == id.as_str())
            .map(Opportunity::from))
    }

    async fn create(&self, opportunity: &Opportunity) -> Result<(), CrmServiceError> {
        let record = OpportunityRecord::from(opportunity);
        self.collection
            .mutate(|records| {
                records.push(record);
                Some(())
            })
            .await?;
        Ok(())
    }

    async fn update(&self, opportunity: &Opportunity) -> Result<bool, CrmServiceError> {
        let record = OpportunityRecord::from(opportunity);
        let updated = self
            .collection
            .mutate(|records| {
                replace_where(records, record, |r| r.id == opportunity.id.as_str())
            })
            .await?;
        Ok(updated.is_some())
    }

    async fn delete(&self, id: &OpportunityId) -> Result<bool, CrmServiceError> {
        let deleted = self
            .collection
            .mutate(|records| remove_where(records, |r| r.id == id.as_str()))
            .await?;
        Ok(deleted.is_some())
    }
}
