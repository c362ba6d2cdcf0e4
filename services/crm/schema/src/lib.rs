//! sea-orm entities for the CRM database backend.

pub mod leads;
pub mod opportunities;
pub mod users;
