use std::time::Duration;

use serde::Deserialize;

use crate::query::error::QueryError;

const DEFAULT_PAGE_SIZES: [usize; 4] = [10, 25, 50, 100];

/// Tunables injected into every list page.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct QueryConfig {
    /// Allowed page sizes; the first entry is used for the initial query.
    pub page_sizes: Vec<usize>,
    /// Quiet period after the last keystroke before the search is emitted.
    pub debounce_ms: u64,
    /// Number of page controls rendered around the current page.
    pub pagination_window: usize,
    /// Drop the displayed results when the latest fetch fails.
    pub clear_on_error: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            page_sizes: DEFAULT_PAGE_SIZES.to_vec(),
            debounce_ms: 300,
            pagination_window: 5,
            clear_on_error: false,
        }
    }
}

impl QueryConfig {
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.page_sizes.is_empty() {
            return Err(QueryError::InvalidConfiguration(
                "page_sizes must not be empty".to_string(),
            ));
        }
        if self.page_sizes.contains(&0) {
            return Err(QueryError::InvalidConfiguration(
                "page_sizes must be positive".to_string(),
            ));
        }
        if self.pagination_window < 3 || self.pagination_window % 2 == 0 {
            return Err(QueryError::InvalidConfiguration(format!(
                "pagination_window must be an odd number >= 3, got {}",
                self.pagination_window
            )));
        }
        Ok(())
    }

    pub fn default_page_size(&self) -> usize {
        self.page_sizes
            .first()
            .copied()
            .unwrap_or(DEFAULT_PAGE_SIZES[0])
    }

    pub fn allows_page_size(&self, size: usize) -> bool {
        self.page_sizes.contains(&size)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(QueryConfig::default().validate().is_ok());
        assert_eq!(QueryConfig::default().debounce(), Duration::from_millis(300));
    }

    #[test]
    fn even_pagination_window_is_rejected() {
        let config = QueryConfig {
            pagination_window: 4,
            ..QueryConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(QueryError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn empty_page_sizes_are_rejected() {
        let config = QueryConfig {
            page_sizes: vec![],
            ..QueryConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(QueryError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config: QueryConfig = serde_json::from_str(r#"{"debounce_ms": 500}"#).unwrap();
        assert_eq!(config.debounce_ms, 500);
        assert_eq!(config.page_sizes, vec![10, 25, 50, 100]);
        assert_eq!(config.pagination_window, 5);
    }
}
