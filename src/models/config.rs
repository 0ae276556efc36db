//! Configuration model loaded from external sources.

use serde::Deserialize;

use crate::query::QueryConfig;

#[derive(Clone, Debug, Deserialize)]
/// Settings shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// HS256 key used to verify bearer tokens.
    pub secret: String,
    /// Directory served under `/assets`.
    pub assets_dir: String,
    /// Page sizes and other list tunables, shared with the list clients.
    #[serde(default)]
    pub query: QueryConfig,
}
