//! Domain aggregates exposed by the job board service layer.

pub mod application;
pub mod catalog;
pub mod job;
pub mod types;
pub mod user;
