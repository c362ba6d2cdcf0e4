//! Domain types shared across the CRM crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; `infra/` and `handlers/` convert
//! to and from their own wire representations.

pub mod id;
pub mod lead;
pub mod opportunity;
pub mod user;
