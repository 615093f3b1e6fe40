//! Protocol engine abstraction.
//!
//! Storage, SPARQL evaluation, content negotiation, and multipart decoding
//! all live behind these seams; this crate only routes.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use mime::Mime;
use thiserror::Error;
use url::Url;

use crate::registry::RegistryError;

/// Errors surfaced by the dispatcher and its delegates.
#[derive(Debug, Error)]
pub enum GspError {
    /// Broken deployment configuration; maps to 500.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A delegated call failed at the transport level; maps to 502.
    #[error("upstream request failed: {0}")]
    Upstream(String),

    /// The inbound request is malformed; maps to 400.
    #[error("invalid request: {0}")]
    BadRequest(String),

    /// The request body carries a media type this resource cannot take.
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
}

impl GspError {
    pub fn status(&self) -> StatusCode {
        match self {
            GspError::Registry(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GspError::Upstream(_) => StatusCode::BAD_GATEWAY,
            GspError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GspError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }
}

impl IntoResponse for GspError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

/// An HTTP-shaped delegate response, relayed to the caller unchanged.
#[derive(Debug, Clone)]
pub struct GspResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl GspResponse {
    /// Success with an empty body, as PATCH returns on completion.
    pub fn empty_ok() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }
}

impl IntoResponse for GspResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// A request body forwarded to the engine untouched.
#[derive(Debug, Clone)]
pub struct GraphPayload {
    pub content_type: String,
    pub body: Bytes,
}

/// The abstract capability "respond to GSP verbs for a graph".
///
/// The graph identity is passed explicitly with every call; implementations
/// own the actual storage semantics.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Retrieve the graph, offering `accept` as the writable media types.
    async fn get(&self, graph: &Url, accept: &[Mime]) -> Result<GspResponse, GspError>;

    /// Merge the payload into the graph (GSP POST).
    async fn merge(&self, graph: &Url, payload: GraphPayload) -> Result<GspResponse, GspError>;

    /// Replace the graph with the payload (GSP PUT).
    async fn replace(&self, graph: &Url, payload: GraphPayload) -> Result<GspResponse, GspError>;

    /// Remove the graph.
    async fn delete(&self, graph: &Url) -> Result<GspResponse, GspError>;

    /// Merge a multipart form body; decoding is the engine's concern.
    async fn merge_multipart(
        &self,
        graph: &Url,
        payload: GraphPayload,
    ) -> Result<GspResponse, GspError>;

    /// Replace the graph from a multipart form body.
    async fn replace_multipart(
        &self,
        graph: &Url,
        payload: GraphPayload,
    ) -> Result<GspResponse, GspError>;
}

/// Outbound side of proxied reads: fetch a rewritten URI and hand back the
/// response for verbatim relay.
#[async_trait]
pub trait RemoteGraphClient: Send + Sync {
    async fn relay_get(&self, target: &Url, accept: &[Mime]) -> Result<GspResponse, GspError>;
}

/// Applies a SPARQL Update document against a graph.
#[async_trait]
pub trait UpdateExecutor: Send + Sync {
    /// Execute `update`. The dataset restrictions mirror the protocol's
    /// USING / USING NAMED lists; this resource always passes both empty.
    async fn execute(
        &self,
        update: &str,
        using: &[Url],
        using_named: &[Url],
    ) -> Result<(), GspError>;
}
