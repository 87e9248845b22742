//! Read-model services: authorization, aggregation, and catalog queries.

pub mod auth;
pub mod authorization;
pub mod catalog;
pub mod dashboard;
pub mod directory;
pub mod metrics;
