//! Test utilities for CRM services.
//!
//! Provides `MockAuth` bearer headers, canonical callers and JSON body helpers.
//! Dev-dependency only.

pub mod auth;
pub mod body;
