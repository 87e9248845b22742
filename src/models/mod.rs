//! Database rows and read models.

pub mod activity;
pub mod course;
pub mod dashboard;
pub mod enrollment;
pub mod limit;
pub mod provider_platform;
pub mod user;
