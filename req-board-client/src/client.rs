//! HTTP access to one server's collections.

use async_trait::async_trait;
use req_board_core::record::{CollectionName, Fields, Record};
use reqwest::{Response, StatusCode, Url};
use std::fmt;
use thiserror::Error;
use tracing::error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// The four record operations, each with the status it must answer with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn expected_status(&self) -> StatusCode {
        match self {
            Operation::Fetch | Operation::Update => StatusCode::OK,
            Operation::Create => StatusCode::CREATED,
            Operation::Delete => StatusCode::NO_CONTENT,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Fetch => "fetch data from",
            Operation::Create => "add data to",
            Operation::Update => "update entry in",
            Operation::Delete => "delete entry from",
        })
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base URL {0}")]
    InvalidUrl(String),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to {operation} {collection} ({status})")]
    Status {
        operation: Operation,
        collection: CollectionName,
        status: StatusCode,
    },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("Item with id {id} not found in {collection}.")]
    NotFound { collection: CollectionName, id: String },
}

/// Record operations against a collection server.
#[async_trait]
pub trait RecordApi: Send + Sync {
    async fn fetch(&self, collection: CollectionName) -> Result<Vec<Record>, ClientError>;

    async fn create(
        &self,
        collection: CollectionName,
        fields: &Fields,
    ) -> Result<Response, ClientError>;

    async fn update(
        &self,
        collection: CollectionName,
        id: &str,
        fields: &Fields,
    ) -> Result<Response, ClientError>;

    async fn delete(&self, collection: CollectionName, id: &str) -> Result<Response, ClientError>;
}

/// `reqwest` implementation of [`RecordApi`].
#[derive(Clone, Debug)]
pub struct HttpClient {
    base: Url,
    http: reqwest::Client,
}

impl HttpClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base = Url::parse(base_url).map_err(|_| ClientError::InvalidUrl(base_url.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            base,
            http: reqwest::Client::new(),
        })
    }

    /// `{base}/{collection}[/{id}]`, with the id percent-encoded as one segment.
    pub fn url(&self, collection: CollectionName, id: Option<&str>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(collection.as_str());
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }

    async fn send(
        &self,
        operation: Operation,
        collection: CollectionName,
        request: reqwest::RequestBuilder,
        url: Url,
    ) -> Result<Response, ClientError> {
        let response = request
            .send()
            .await
            .map_err(|source| ClientError::Transport { url, source })?;
        if response.status() != operation.expected_status() {
            return Err(ClientError::Status {
                operation,
                collection,
                status: response.status(),
            });
        }
        Ok(response)
    }
}

fn logged<T>(result: Result<T, ClientError>) -> Result<T, ClientError> {
    if let Err(err) = &result {
        error!("Error: {}", err);
    }
    result
}

#[async_trait]
impl RecordApi for HttpClient {
    async fn fetch(&self, collection: CollectionName) -> Result<Vec<Record>, ClientError> {
        let url = self.url(collection, None);
        let request = self.http.get(url.clone());
        let result = match self.send(Operation::Fetch, collection, request, url.clone()).await {
            Ok(response) => response
                .json::<Vec<Record>>()
                .await
                .map_err(|source| ClientError::Decode { url, source }),
            Err(err) => Err(err),
        };
        logged(result)
    }

    async fn create(
        &self,
        collection: CollectionName,
        fields: &Fields,
    ) -> Result<Response, ClientError> {
        let url = self.url(collection, None);
        let request = self.http.post(url.clone()).json(fields);
        logged(self.send(Operation::Create, collection, request, url).await)
    }

    async fn update(
        &self,
        collection: CollectionName,
        id: &str,
        fields: &Fields,
    ) -> Result<Response, ClientError> {
        let url = self.url(collection, Some(id));
        let request = self.http.put(url.clone()).json(fields);
        logged(self.send(Operation::Update, collection, request, url).await)
    }

    async fn delete(&self, collection: CollectionName, id: &str) -> Result<Response, ClientError> {
        let url = self.url(collection, Some(id));
        let request = self.http.delete(url.clone());
        logged(self.send(Operation::Delete, collection, request, url).await)
    }
}
