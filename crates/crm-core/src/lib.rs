//! Shared HTTP plumbing for CRM services: configuration loading, health
//! probes, request ids, tracing setup and serde helpers.

pub mod config;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
