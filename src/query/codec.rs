//! Query-string form of [`QueryDescriptor`], shared by the HTTP client and the API.

use std::collections::BTreeMap;

use crate::query::config::QueryConfig;
use crate::query::descriptor::{FilterKey, FilterKind, FilterValue, QueryDescriptor, SortOrder};
use crate::query::error::QueryError;

const PAGE: &str = "page";
const LIMIT: &str = "limit";
const SEARCH: &str = "search";
const SORT: &str = "sort";

impl<K: FilterKey> QueryDescriptor<K> {
    /// Ordered key/value pairs; defaults (empty search, default sort) are omitted.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            (PAGE.to_string(), self.page().to_string()),
            (LIMIT.to_string(), self.page_size().to_string()),
        ];

        if !self.search().is_empty() {
            pairs.push((SEARCH.to_string(), self.search().to_string()));
        }
        if self.sort() != SortOrder::Default {
            pairs.push((SORT.to_string(), self.sort().to_string()));
        }

        for (key, value) in self.filters() {
            let name = key.as_str();
            match value {
                FilterValue::Single(value) => pairs.push((name.to_string(), value.clone())),
                FilterValue::Many(values) => {
                    pairs.extend(values.iter().map(|value| (name.to_string(), value.clone())));
                }
                FilterValue::Range { min, max } => {
                    if let Some(min) = min {
                        pairs.push((format!("{name}_min"), min.to_string()));
                    }
                    if let Some(max) = max {
                        pairs.push((format!("{name}_max"), max.to_string()));
                    }
                }
            }
        }

        pairs
    }

    pub fn to_query_string(&self) -> Result<String, QueryError> {
        serde_html_form::to_string(self.to_query_pairs())
            .map_err(|err| QueryError::validation(format!("failed to encode query: {err}")))
    }

    /// Parses a query string produced by [`Self::to_query_string`] or typed by a user.
    ///
    /// Missing parameters fall back to the initial descriptor; unknown keys are
    /// ignored.
    pub fn from_query_string(query: &str, config: &QueryConfig) -> Result<Self, QueryError> {
        let params: BTreeMap<String, Vec<String>> = serde_html_form::from_str(query)
            .map_err(|err| QueryError::validation(format!("malformed query string: {err}")))?;

        let mut descriptor = Self::initial(config);

        if let Some(page) = first(&params, PAGE) {
            let page = parse_number::<usize>(PAGE, page)?;
            if page == 0 {
                return Err(QueryError::validation("page must be at least 1"));
            }
            descriptor = descriptor.with_page(page);
        }

        if let Some(limit) = first(&params, LIMIT) {
            let limit = parse_number::<usize>(LIMIT, limit)?;
            descriptor = descriptor.with_page_size(limit, config)?;
        }

        if descriptor.checked_offset().is_none() {
            return Err(QueryError::validation(format!(
                "page {} is out of range",
                descriptor.page()
            )));
        }

        if let Some(search) = first(&params, SEARCH) {
            descriptor = descriptor.with_search(search);
        }

        if let Some(sort) = first(&params, SORT) {
            descriptor = descriptor.with_sort(sort.parse()?);
        }

        for &key in K::all() {
            let name = key.as_str();
            let value = match key.kind() {
                FilterKind::Single => first(&params, name).map(FilterValue::single),
                FilterKind::Many => params
                    .get(name)
                    .map(|values| FilterValue::many(values.iter().cloned())),
                FilterKind::Range => {
                    let min = first(&params, &format!("{name}_min"))
                        .map(|raw| parse_number::<i64>(name, raw))
                        .transpose()?;
                    let max = first(&params, &format!("{name}_max"))
                        .map(|raw| parse_number::<i64>(name, raw))
                        .transpose()?;
                    Some(FilterValue::range(min, max))
                }
            };

            if let Some(value) = value {
                descriptor = descriptor.with_filter(key, value)?;
            }
        }

        Ok(descriptor)
    }
}

fn first<'a>(params: &'a BTreeMap<String, Vec<String>>, name: &str) -> Option<&'a str> {
    params
        .get(name)
        .and_then(|values| values.first())
        .map(String::as_str)
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, QueryError> {
    raw.trim()
        .parse()
        .map_err(|_| QueryError::validation(format!("`{name}` must be a number, got `{raw}`")))
}
