//! List-fetch collaborators consumed by the query controller.

use std::marker::PhantomData;
use std::time::Duration;

use futures::FutureExt;
use futures::future::{self, LocalBoxFuture};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::pagination::ResultPage;
use crate::query::descriptor::{FilterKey, QueryDescriptor};
use crate::query::error::FetchError;

pub type FetchResult<T> = Result<ResultPage<T>, FetchError>;

/// Fetches one page of items for a descriptor.
///
/// The returned future must not borrow the service: the controller keeps it
/// around after newer requests have been issued.
pub trait ListFetchService<K: FilterKey> {
    type Item: 'static;

    fn fetch(&self, query: &QueryDescriptor<K>) -> LocalBoxFuture<'static, FetchResult<Self::Item>>;
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Calls one JSON list endpoint of the job board API.
#[derive(Debug, Clone)]
pub struct HttpListFetcher<T> {
    client: reqwest::Client,
    endpoint: String,
    bearer_token: Option<String>,
    timeout: Duration,
    _item: PhantomData<fn() -> T>,
}

impl<T> HttpListFetcher<T> {
    /// `endpoint` is the full list URL without query string, e.g.
    /// `https://jobs.example.com/api/v1/jobs`.
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            bearer_token: None,
            timeout: DEFAULT_TIMEOUT,
            _item: PhantomData,
        }
    }

    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url_for<K: FilterKey>(&self, query: &QueryDescriptor<K>) -> Result<String, FetchError> {
        let query_string = query
            .to_query_string()
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        Ok(format!("{}?{}", self.endpoint, query_string))
    }
}

impl<K, T> ListFetchService<K> for HttpListFetcher<T>
where
    K: FilterKey,
    T: DeserializeOwned + 'static,
{
    type Item = T;

    fn fetch(&self, query: &QueryDescriptor<K>) -> LocalBoxFuture<'static, FetchResult<T>> {
        let url = match self.url_for(query) {
            Ok(url) => url,
            Err(err) => return future::ready(Err(err)).boxed_local(),
        };

        let mut request = self.client.get(url).timeout(self.timeout);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        send_request(request).boxed_local()
    }
}

async fn send_request<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> FetchResult<T> {
    let response = request.send().await?;
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED {
        return Err(FetchError::Unauthorized);
    }
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    response
        .json::<ResultPage<T>>()
        .await
        .map_err(|err| FetchError::Decode(err.to_string()))
}
