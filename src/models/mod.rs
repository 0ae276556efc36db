//! Database models and request-scoped data shared across the job board.

pub mod application;
pub mod catalog;
pub mod job;
pub mod user;

#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod config;
