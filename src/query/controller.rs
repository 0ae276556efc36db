//! Query state controller shared by every list page.
//!
//! The controller turns discrete user interactions into a sequence of
//! [`QueryDescriptor`]s and hands each one to a [`ListFetchService`]. It is
//! owned by exactly one page and driven from that page's event loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(input) = ui_events.recv() => page.handle(&mut controller, input),
//!         Some(event) = controller.next_event() => page.render(&controller, event),
//!     }
//! }
//! ```
//!
//! Every emission is tagged with a sequence number. Only the result carrying
//! the most recently emitted number is applied; anything older is dropped on
//! arrival, so responses that come back out of order never overwrite newer
//! state.

use futures::FutureExt;
use futures::StreamExt;
use futures::future::LocalBoxFuture;
use futures::stream::FuturesUnordered;
use tokio::time::{Instant, sleep_until};

use crate::pagination::{Pagination, ResultPage};
use crate::query::config::QueryConfig;
use crate::query::descriptor::{FilterKey, FilterValue, QueryDescriptor, SortOrder};
use crate::query::error::QueryError;
use crate::query::fetch::{FetchResult, ListFetchService};

/// Coarse state exposed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    PendingDebounce,
    Fetching,
    Error,
}

/// Immediate outcome of a controller operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// A fetch was issued under this sequence number.
    Emitted { seq: u64 },
    /// The emission will happen once the input has been quiet until `deadline`.
    Debounced { deadline: Instant },
    /// State was updated but no fetch was issued because authentication expired.
    Suppressed,
}

/// What happened to a completed fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Applied { seq: u64 },
    Failed { seq: u64, error: QueryError },
    /// A newer descriptor had been emitted; the result was ignored.
    StaleResultDiscarded { seq: u64 },
}

/// Reported by [`QueryController::next_event`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControllerEvent {
    DebounceElapsed(Transition),
    Resolved(Resolution),
}

struct Completed<T> {
    seq: u64,
    result: FetchResult<T>,
}

enum Wake<T> {
    Fetched(Completed<T>),
    Debounce,
    Idle,
}

/// Search, filter, sort and pagination state of one list page.
pub struct QueryController<K, S>
where
    K: FilterKey,
    S: ListFetchService<K>,
{
    service: S,
    config: QueryConfig,
    descriptor: QueryDescriptor<K>,
    pending_search: String,
    debounce_deadline: Option<Instant>,
    phase: Phase,
    next_seq: u64,
    latest_seq: Option<u64>,
    awaiting_latest: bool,
    in_flight: FuturesUnordered<LocalBoxFuture<'static, Completed<S::Item>>>,
    results: Option<ResultPage<S::Item>>,
    last_error: Option<QueryError>,
    auth_expired: bool,
}

impl<K, S> QueryController<K, S>
where
    K: FilterKey,
    S: ListFetchService<K>,
{
    pub fn new(service: S, config: QueryConfig) -> Result<Self, QueryError> {
        let descriptor = QueryDescriptor::initial(&config);
        Self::with_descriptor(service, config, descriptor)
    }

    /// Starts from a descriptor restored from elsewhere, e.g. the page URL.
    pub fn with_descriptor(
        service: S,
        config: QueryConfig,
        descriptor: QueryDescriptor<K>,
    ) -> Result<Self, QueryError> {
        config.validate()?;
        if !config.allows_page_size(descriptor.page_size()) {
            return Err(QueryError::validation(format!(
                "page size {} is not one of {:?}",
                descriptor.page_size(),
                config.page_sizes
            )));
        }

        Ok(Self {
            service,
            pending_search: descriptor.search().to_string(),
            descriptor,
            config,
            debounce_deadline: None,
            phase: Phase::Idle,
            next_seq: 0,
            latest_seq: None,
            awaiting_latest: false,
            in_flight: FuturesUnordered::new(),
            results: None,
            last_error: None,
            auth_expired: false,
        })
    }

    /// Descriptor of the most recent emission.
    pub fn descriptor(&self) -> &QueryDescriptor<K> {
        &self.descriptor
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_items(&self) -> &[S::Item] {
        self.results
            .as_ref()
            .map(|page| page.items.as_slice())
            .unwrap_or(&[])
    }

    pub fn current_pagination(&self) -> Option<&Pagination> {
        self.results.as_ref().map(|page| &page.pagination)
    }

    pub fn current_results(&self) -> Option<&ResultPage<S::Item>> {
        self.results.as_ref()
    }

    /// Whether the latest emission is still waiting for its response.
    pub fn is_loading(&self) -> bool {
        self.awaiting_latest
    }

    pub fn last_error(&self) -> Option<&QueryError> {
        self.last_error.as_ref()
    }

    /// Raw text to echo in the search input; may differ from the committed search.
    pub fn pending_search_text(&self) -> &str {
        &self.pending_search
    }

    pub fn is_auth_expired(&self) -> bool {
        self.auth_expired
    }

    /// Page numbers to render around the current page.
    pub fn page_window(&self) -> Vec<usize> {
        self.current_pagination()
            .map(|pagination| pagination.window(self.config.pagination_window))
            .unwrap_or_default()
    }

    pub fn set_search_text(&mut self, raw: impl Into<String>) -> Transition {
        self.pending_search = raw.into();
        let deadline = Instant::now() + self.config.debounce();
        self.debounce_deadline = Some(deadline);
        self.phase = Phase::PendingDebounce;
        Transition::Debounced { deadline }
    }

    /// Emits the pending search text right away.
    pub fn on_key_enter(&mut self) -> Transition {
        let next = self
            .descriptor
            .clone()
            .with_search(&self.pending_search)
            .with_page(1);
        self.emit(next)
    }

    /// Clears the search text and emits right away.
    pub fn on_key_escape(&mut self) -> Transition {
        self.pending_search.clear();
        let next = self.descriptor.clone().with_search("").with_page(1);
        self.emit(next)
    }

    pub fn set_filter(&mut self, key: K, value: FilterValue) -> Result<Transition, QueryError> {
        let next = self.base().with_filter(key, value)?.with_page(1);
        Ok(self.emit(next))
    }

    pub fn clear_filter(&mut self, key: K) -> Transition {
        let next = self.base().without_filter(key).with_page(1);
        self.emit(next)
    }

    /// Empties filters and search; sort and page size are kept.
    pub fn clear_all_filters(&mut self) -> Transition {
        self.pending_search.clear();
        let next = self
            .descriptor
            .clone()
            .with_search("")
            .without_filters()
            .with_page(1);
        self.emit(next)
    }

    pub fn set_sort(&mut self, sort: SortOrder) -> Transition {
        let next = self.base().with_sort(sort).with_page(1);
        self.emit(next)
    }

    /// Moves to `page`, clamped to the page count of the last applied result.
    ///
    /// While a changed search is pending the page is not applied: the search
    /// is committed and fetched from page 1.
    pub fn set_page(&mut self, page: usize) -> Transition {
        if self.pending_search_changed() {
            let next = self.base();
            return self.emit(next);
        }
        let page = self.clamp_page(page);
        let next = self.base().with_page(page);
        self.emit(next)
    }

    pub fn set_page_size(&mut self, size: usize) -> Result<Transition, QueryError> {
        let next = self
            .base()
            .with_page_size(size, &self.config)?
            .with_page(1);
        Ok(self.emit(next))
    }

    /// Re-issues the current descriptor.
    pub fn refresh(&mut self) -> Transition {
        let next = self.base();
        self.emit(next)
    }

    /// Lifts an [`QueryError::AuthExpired`] lock after re-authentication and refetches.
    pub fn reset(&mut self) -> Transition {
        self.auth_expired = false;
        self.last_error = None;
        self.refresh()
    }

    /// Refetches after the caller deleted one of the displayed items.
    ///
    /// Removing the only item of a page other than the first steps back one
    /// page instead of showing an empty page.
    pub fn on_item_removed(&mut self) -> Transition {
        let was_last_on_page = self
            .results
            .as_ref()
            .is_some_and(|results| results.items.len() <= 1);

        let next = self.base();
        let page = next.page();
        let next = if was_last_on_page && page > 1 {
            next.with_page(page - 1)
        } else {
            next
        };
        self.emit(next)
    }

    /// Waits for the debounce timer or the next completed fetch and applies it.
    ///
    /// Returns `None` when nothing is scheduled or in flight. Dropping the
    /// returned future before it completes loses nothing.
    pub async fn next_event(&mut self) -> Option<ControllerEvent> {
        let deadline = self.debounce_deadline;
        let has_in_flight = !self.in_flight.is_empty();
        if deadline.is_none() && !has_in_flight {
            return None;
        }

        let wake = {
            let in_flight = &mut self.in_flight;
            let timer = async move {
                match deadline {
                    Some(deadline) => sleep_until(deadline).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                biased;
                Some(done) = in_flight.next(), if has_in_flight => Wake::Fetched(done),
                () = timer, if deadline.is_some() => Wake::Debounce,
                else => Wake::Idle,
            }
        };

        match wake {
            Wake::Fetched(Completed { seq, result }) => {
                Some(ControllerEvent::Resolved(self.resolve(seq, result)))
            }
            Wake::Debounce => Some(ControllerEvent::DebounceElapsed(self.fire_debounce())),
            Wake::Idle => None,
        }
    }

    /// Processes events until nothing is scheduled or in flight.
    pub async fn settle(&mut self) -> Vec<ControllerEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event().await {
            events.push(event);
        }
        events
    }

    /// Current descriptor with any pending search text folded in.
    ///
    /// A pending text that changes the search starts over at page 1.
    fn base(&self) -> QueryDescriptor<K> {
        if self.pending_search_changed() {
            self.descriptor
                .clone()
                .with_search(&self.pending_search)
                .with_page(1)
        } else {
            self.descriptor.clone()
        }
    }

    fn pending_search_changed(&self) -> bool {
        self.debounce_deadline.is_some() && self.pending_search.trim() != self.descriptor.search()
    }

    fn clamp_page(&self, page: usize) -> usize {
        let last_page = self
            .current_pagination()
            .map(|pagination| pagination.total_pages.max(1))
            .unwrap_or(usize::MAX);
        page.clamp(1, last_page)
    }

    fn fire_debounce(&mut self) -> Transition {
        let next = self
            .descriptor
            .clone()
            .with_search(&self.pending_search)
            .with_page(1);
        self.emit(next)
    }

    fn emit(&mut self, next: QueryDescriptor<K>) -> Transition {
        self.debounce_deadline = None;
        self.pending_search = next.search().to_string();
        self.descriptor = next;

        if self.auth_expired {
            log::debug!("Authentication expired, not fetching {:?}", self.descriptor);
            self.phase = Phase::Error;
            return Transition::Suppressed;
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.latest_seq = Some(seq);
        self.awaiting_latest = true;
        self.phase = Phase::Fetching;

        log::debug!("Emitting query #{seq}: {:?}", self.descriptor);
        let request = self.service.fetch(&self.descriptor);
        self.in_flight
            .push(request.map(move |result| Completed { seq, result }).boxed_local());

        Transition::Emitted { seq }
    }

    fn resolve(&mut self, seq: u64, result: FetchResult<S::Item>) -> Resolution {
        if !self.awaiting_latest || self.latest_seq != Some(seq) {
            log::debug!("Discarding stale result of query #{seq}");
            return Resolution::StaleResultDiscarded { seq };
        }
        self.awaiting_latest = false;

        match result {
            Ok(page) => {
                self.results = Some(page);
                self.last_error = None;
                self.phase = if self.debounce_deadline.is_some() {
                    Phase::PendingDebounce
                } else {
                    Phase::Idle
                };
                Resolution::Applied { seq }
            }
            Err(err) => {
                let error = QueryError::from(err);
                if error == QueryError::AuthExpired {
                    log::warn!("List endpoint rejected the credentials, fetching suspended");
                    self.auth_expired = true;
                    self.debounce_deadline = None;
                } else {
                    log::warn!("Query #{seq} failed: {error}");
                    if self.config.clear_on_error {
                        self.results = None;
                    }
                }

                self.last_error = Some(error.clone());
                self.phase = if self.debounce_deadline.is_some() {
                    Phase::PendingDebounce
                } else {
                    Phase::Error
                };
                Resolution::Failed { seq, error }
            }
        }
    }
}
