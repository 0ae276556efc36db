//! Canonical description of one list request.
//!
//! A [`QueryDescriptor`] is only ever built through its `with_*` methods, which
//! keep the invariants the rest of the crate relies on: the page is 1-based,
//! the search text is trimmed and an empty selection is represented by the
//! absence of its key.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::query::config::QueryConfig;
use crate::query::error::QueryError;

/// Shape of the value a filter key accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterKind {
    /// One primitive value (`status=enabled`).
    Single,
    /// A set of primitive values (`job_type=contract&job_type=full_time`).
    Many,
    /// An inclusive numeric range (`salary_min=...&salary_max=...`).
    Range,
}

/// Filter keys understood by one list page.
pub trait FilterKey: Copy + Ord + Debug + 'static {
    /// Every key of the page, in serialization order.
    fn all() -> &'static [Self];

    /// Name used in query strings.
    fn as_str(self) -> &'static str;

    fn kind(self) -> FilterKind;

    fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|key| key.as_str() == name)
    }
}

/// Declares a filter key enum together with its [`FilterKey`] implementation.
macro_rules! filter_keys {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => ($key:literal, $kind:ident)),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $crate::query::descriptor::FilterKey for $name {
            fn all() -> &'static [Self] {
                &[$(Self::$variant),+]
            }

            fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $key),+
                }
            }

            fn kind(self) -> $crate::query::descriptor::FilterKind {
                match self {
                    $(Self::$variant => $crate::query::descriptor::FilterKind::$kind),+
                }
            }
        }
    };
}

pub(crate) use filter_keys;

/// Value attached to a filter key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterValue {
    Single(String),
    Many(BTreeSet<String>),
    Range { min: Option<i64>, max: Option<i64> },
}

impl FilterValue {
    pub fn single(value: impl Into<String>) -> Self {
        Self::Single(value.into())
    }

    pub fn many<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Many(values.into_iter().map(Into::into).collect())
    }

    pub fn range(min: Option<i64>, max: Option<i64>) -> Self {
        Self::Range { min, max }
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            Self::Single(_) => FilterKind::Single,
            Self::Many(_) => FilterKind::Many,
            Self::Range { .. } => FilterKind::Range,
        }
    }

    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_many(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Many(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_range(&self) -> Option<(Option<i64>, Option<i64>)> {
        match self {
            Self::Range { min, max } => Some((*min, *max)),
            _ => None,
        }
    }

    /// Trims the value and returns `None` for an empty selection.
    fn normalize(self) -> Result<Option<Self>, QueryError> {
        match self {
            Self::Single(value) => {
                let value = value.trim();
                Ok((!value.is_empty()).then(|| Self::Single(value.to_string())))
            }
            Self::Many(values) => {
                let values: BTreeSet<String> = values
                    .iter()
                    .map(|value| value.trim())
                    .filter(|value| !value.is_empty())
                    .map(str::to_string)
                    .collect();
                Ok((!values.is_empty()).then_some(Self::Many(values)))
            }
            Self::Range { min, max } => match (min, max) {
                (None, None) => Ok(None),
                (Some(min), Some(max)) if min > max => Err(QueryError::validation(format!(
                    "range minimum {min} exceeds maximum {max}"
                ))),
                (min, max) => Ok(Some(Self::Range { min, max })),
            },
        }
    }
}

/// Result ordering requested by the caller; each list decides what it means.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Default,
    Newest,
    Oldest,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Default => "default",
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "default" => Ok(SortOrder::Default),
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            other => Err(QueryError::validation(format!("unknown sort order `{other}`"))),
        }
    }
}

/// Immutable snapshot of search text, filters, sort and page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryDescriptor<K: FilterKey> {
    search: String,
    filters: BTreeMap<K, FilterValue>,
    sort: SortOrder,
    page: usize,
    page_size: usize,
}

impl<K: FilterKey> QueryDescriptor<K> {
    /// First page, no search, no filters, default sort and the configured default page size.
    pub fn initial(config: &QueryConfig) -> Self {
        Self {
            search: String::new(),
            filters: BTreeMap::new(),
            sort: SortOrder::Default,
            page: 1,
            page_size: config.default_page_size(),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn filters(&self) -> &BTreeMap<K, FilterValue> {
        &self.filters
    }

    pub fn filter(&self, key: K) -> Option<&FilterValue> {
        self.filters.get(&key)
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Zero-based row offset of the first item on this page, saturating at `usize::MAX`.
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// The row offset as a SQL `OFFSET`, or `None` when it does not fit one.
    pub fn checked_offset(&self) -> Option<i64> {
        (self.page - 1)
            .checked_mul(self.page_size)
            .and_then(|offset| i64::try_from(offset).ok())
    }

    pub fn with_search(mut self, raw: &str) -> Self {
        self.search = raw.trim().to_string();
        self
    }

    /// Sets `key` after normalizing `value`; an empty selection removes the key.
    pub fn with_filter(mut self, key: K, value: FilterValue) -> Result<Self, QueryError> {
        if value.kind() != key.kind() {
            return Err(QueryError::validation(format!(
                "filter `{}` expects a {:?} value, got {:?}",
                key.as_str(),
                key.kind(),
                value.kind()
            )));
        }

        match value.normalize()? {
            Some(value) => {
                self.filters.insert(key, value);
            }
            None => {
                self.filters.remove(&key);
            }
        }
        Ok(self)
    }

    pub fn without_filter(mut self, key: K) -> Self {
        self.filters.remove(&key);
        self
    }

    pub fn without_filters(mut self) -> Self {
        self.filters.clear();
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Sets the page, treating zero as the first page.
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn with_page_size(mut self, size: usize, config: &QueryConfig) -> Result<Self, QueryError> {
        if !config.allows_page_size(size) {
            return Err(QueryError::validation(format!(
                "page size {size} is not one of {:?}",
                config.page_sizes
            )));
        }
        self.page_size = size;
        Ok(self)
    }
}
