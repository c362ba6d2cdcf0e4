//! Role and ownership checks, applied identically to leads and opportunities.

use crm_domain::id::UserId;
use crm_domain::user::{Caller, Role};

use crate::domain::types::Owned;
use crate::error::CrmServiceError;

/// `admin` and `manager` may touch any record; `rep` only records it owns.
pub fn can_access(caller: &Caller, owner_id: &UserId) -> bool {
    caller.role.sees_all_records() || &caller.id == owner_id
}

/// Gate for update/delete/convert: denial is an error, never a silent skip.
pub fn authorize<T: Owned>(caller: &Caller, record: &T) -> Result<(), CrmServiceError> {
    if can_access(caller, record.owner_id()) {
        Ok(())
    } else {
        Err(CrmServiceError::Forbidden)
    }
}

/// Filter for list/aggregate reads. Preserves input order.
pub fn visible<T: Owned>(caller: &Caller, records: Vec<T>) -> Vec<T> {
    if caller.role.sees_all_records() {
        return records;
    }
    records
        .into_iter()
        .filter(|r| can_access(caller, r.owner_id()))
        .collect()
}

/// User management is reserved for admins.
pub fn require_admin(caller: &Caller) -> Result<(), CrmServiceError> {
    if caller.role == Role::Admin {
        Ok(())
    } else {
        Err(CrmServiceError::Forbidden)
    }
}
