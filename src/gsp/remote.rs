//! HTTP-backed protocol engine variants.
//!
//! Both the local engine and the remote client speak plain Graph Store
//! Protocol over HTTP. The local variant addresses a configured store
//! endpoint indirectly (`?graph=`); the remote variant hits an already
//! rewritten absolute URI.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, Uri};
use bytes::Bytes;
use http_body_util::BodyExt;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use mime::Mime;
use url::Url;

use crate::gsp::backend::{
    GraphPayload, GraphStore, GspError, GspResponse, RemoteGraphClient, UpdateExecutor,
};

pub type HttpClient = Client<HttpConnector, Body>;

/// Media type of SPARQL Update documents.
pub const SPARQL_UPDATE: &str = "application/sparql-update";

/// Local Graph Store Protocol engine reached over HTTP.
pub struct HttpGraphStore {
    client: HttpClient,
    endpoint: Url,
}

impl HttpGraphStore {
    pub fn new(client: HttpClient, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    /// Indirect graph identification against the store endpoint.
    fn graph_target(&self, graph: &Url) -> Url {
        let mut target = self.endpoint.clone();
        target
            .query_pairs_mut()
            .append_pair("graph", graph.as_str());
        target
    }

    async fn send(
        &self,
        method: Method,
        target: &Url,
        accept: &[Mime],
        payload: Option<GraphPayload>,
    ) -> Result<GspResponse, GspError> {
        send_request(&self.client, method, target, accept, payload).await
    }
}

#[async_trait]
impl GraphStore for HttpGraphStore {
    async fn get(&self, graph: &Url, accept: &[Mime]) -> Result<GspResponse, GspError> {
        self.send(Method::GET, &self.graph_target(graph), accept, None)
            .await
    }

    async fn merge(&self, graph: &Url, payload: GraphPayload) -> Result<GspResponse, GspError> {
        self.send(Method::POST, &self.graph_target(graph), &[], Some(payload))
            .await
    }

    async fn replace(&self, graph: &Url, payload: GraphPayload) -> Result<GspResponse, GspError> {
        self.send(Method::PUT, &self.graph_target(graph), &[], Some(payload))
            .await
    }

    async fn delete(&self, graph: &Url) -> Result<GspResponse, GspError> {
        self.send(Method::DELETE, &self.graph_target(graph), &[], None)
            .await
    }

    async fn merge_multipart(
        &self,
        graph: &Url,
        payload: GraphPayload,
    ) -> Result<GspResponse, GspError> {
        // the engine decodes the form; the body passes through untouched
        self.merge(graph, payload).await
    }

    async fn replace_multipart(
        &self,
        graph: &Url,
        payload: GraphPayload,
    ) -> Result<GspResponse, GspError> {
        self.replace(graph, payload).await
    }
}

/// Remote Graph Store client used to relay proxied reads.
pub struct HttpRemoteClient {
    client: HttpClient,
}

impl HttpRemoteClient {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RemoteGraphClient for HttpRemoteClient {
    async fn relay_get(&self, target: &Url, accept: &[Mime]) -> Result<GspResponse, GspError> {
        send_request(&self.client, Method::GET, target, accept, None).await
    }
}

/// SPARQL Update executor reached over HTTP.
pub struct HttpUpdateExecutor {
    client: HttpClient,
    endpoint: Url,
}

impl HttpUpdateExecutor {
    pub fn new(client: HttpClient, endpoint: Url) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl UpdateExecutor for HttpUpdateExecutor {
    async fn execute(
        &self,
        update: &str,
        using: &[Url],
        using_named: &[Url],
    ) -> Result<(), GspError> {
        let mut endpoint = self.endpoint.clone();
        if !using.is_empty() || !using_named.is_empty() {
            let mut pairs = endpoint.query_pairs_mut();
            for graph in using {
                pairs.append_pair("using-graph-uri", graph.as_str());
            }
            for graph in using_named {
                pairs.append_pair("using-named-graph-uri", graph.as_str());
            }
        }

        let payload = GraphPayload {
            content_type: SPARQL_UPDATE.to_string(),
            body: Bytes::from(update.to_string()),
        };
        let response =
            send_request(&self.client, Method::POST, &endpoint, &[], Some(payload)).await?;

        if response.status.is_success() {
            Ok(())
        } else {
            Err(GspError::Upstream(format!(
                "update endpoint returned {}",
                response.status
            )))
        }
    }
}

async fn send_request(
    client: &HttpClient,
    method: Method,
    target: &Url,
    accept: &[Mime],
    payload: Option<GraphPayload>,
) -> Result<GspResponse, GspError> {
    let uri: Uri = target
        .as_str()
        .parse()
        .map_err(|e| GspError::Upstream(format!("invalid target URI <{target}>: {e}")))?;

    let mut builder = Request::builder().method(method).uri(uri);
    if !accept.is_empty() {
        let offered = accept
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        builder = builder.header(header::ACCEPT, offered);
    }

    let request = match payload {
        Some(payload) => builder
            .header(header::CONTENT_TYPE, payload.content_type)
            .body(Body::from(payload.body)),
        None => builder.body(Body::empty()),
    }
    .map_err(|e| GspError::Upstream(e.to_string()))?;

    let response = client
        .request(request)
        .await
        .map_err(|e| GspError::Upstream(e.to_string()))?;

    let (parts, body) = response.into_parts();
    let body = body
        .collect()
        .await
        .map_err(|e| GspError::Upstream(e.to_string()))?
        .to_bytes();

    Ok(GspResponse {
        status: parts.status,
        headers: relay_headers(parts.headers),
        body,
    })
}

/// Drop framing headers; the relayed body is re-framed by the server.
fn relay_headers(mut headers: HeaderMap) -> HeaderMap {
    headers.remove(header::CONTENT_LENGTH);
    headers.remove(header::TRANSFER_ENCODING);
    headers.remove(header::CONNECTION);
    headers
}
