//! Search, filter, sort and pagination state shared by every list page.

pub mod codec;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod filters;

#[cfg(feature = "client")]
pub mod cache;
#[cfg(feature = "client")]
pub mod controller;
#[cfg(feature = "client")]
pub mod fetch;

pub use config::QueryConfig;
pub use descriptor::{FilterKey, FilterKind, FilterValue, QueryDescriptor, SortOrder};
pub use error::{FetchError, QueryError};
