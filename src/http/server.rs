//! HTTP server setup and request handling.
//!
//! # Responsibilities
//! - Create the axum router with the graph resource handler
//! - Reconstruct the absolute request URI (the named graph identity)
//! - Wire up middleware (tracing, limits, request ID, timeout)
//! - Dispatch GSP verbs through the per-request dispatcher
//!
//! # Design Decisions
//! - One catch-all route: every path is a potential named graph
//! - The dispatcher is rebuilt per request from a fresh context model
//!   snapshot, so no shared mutable state exists between requests
//! - `default` and `graph` query parameters are parsed but never honored;
//!   this resource always targets its own URI

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    http::{header, request::Parts, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tower_http::{
    limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use url::Url;

use crate::config::GatewayConfig;
use crate::gsp::remote::SPARQL_UPDATE;
use crate::gsp::{
    media, GraphPayload, GraphStore, GraphStoreDispatcher, GspError, HttpGraphStore,
    HttpRemoteClient, HttpUpdateExecutor, RemoteGraphClient, UpdateExecutor,
};
use crate::http::request::{self, propagate_request_id_layer, set_request_id_layer};
use crate::observability::metrics;
use crate::registry::ContextModel;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<ContextModel>,
    pub local: Arc<dyn GraphStore>,
    pub remote: Arc<dyn RemoteGraphClient>,
    pub updater: Arc<dyn UpdateExecutor>,
    pub public_scheme: String,
    pub max_body_bytes: usize,
}

/// HTTP server for the graph store gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new server with HTTP-backed delegates from the configured
    /// endpoints. Endpoint URLs were validated at config load time.
    pub fn new(
        config: &GatewayConfig,
        context: Arc<ContextModel>,
    ) -> Result<Self, url::ParseError> {
        let client: Client<HttpConnector, Body> =
            Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let store_endpoint = Url::parse(&config.store.graph_store_endpoint)?;
        let update_endpoint = Url::parse(&config.store.update_endpoint)?;

        let state = AppState {
            context,
            local: Arc::new(HttpGraphStore::new(client.clone(), store_endpoint)),
            remote: Arc::new(HttpRemoteClient::new(client.clone())),
            updater: Arc::new(HttpUpdateExecutor::new(client, update_endpoint)),
            public_scheme: config.listener.public_scheme.clone(),
            max_body_bytes: config.limits.max_body_bytes,
        };

        Ok(Self {
            router: Self::build_router(config, state),
        })
    }

    /// Build the axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/", any(graph_handler))
            .route("/{*path}", any(graph_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
            .layer(set_request_id_layer())
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Query parameters of the GSP surface.
#[derive(Debug, Default)]
struct GraphParams {
    /// Accepted but intentionally not honored.
    default_graph: bool,
    /// Accepted but intentionally not honored.
    graph: Option<String>,
    /// Response media type override.
    accept: Option<String>,
}

impl GraphParams {
    fn from_query(query: Option<&str>) -> Self {
        let mut params = Self::default();
        let Some(query) = query else {
            return params;
        };
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "default" => params.default_graph = value == "true",
                "graph" => params.graph = Some(value.into_owned()),
                media::ACCEPT_PARAM => params.accept = Some(value.into_owned()),
                _ => {}
            }
        }
        params
    }
}

/// Handler for every GSP verb on a named graph resource.
async fn graph_handler(
    axum::extract::State(state): axum::extract::State<AppState>,
    request: Request<Body>,
) -> Response {
    let start = Instant::now();
    let request_id = request::request_id(&request).to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Handling graph store request"
    );

    let response = match handle(state, request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Request failed");
            e.into_response()
        }
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), start);
    response
}

async fn handle(state: AppState, request: Request<Body>) -> Result<Response, GspError> {
    let (parts, body) = request.into_parts();

    let graph = graph_uri(&state.public_scheme, &parts)?;
    let params = GraphParams::from_query(parts.uri.query());
    if params.default_graph || params.graph.is_some() {
        // this endpoint represents exactly one named graph
        tracing::debug!(graph = %graph, "ignoring default/graph parameters");
    }

    let dispatcher = GraphStoreDispatcher::new(
        state.context.snapshot(),
        state.local,
        state.remote,
        state.updater,
    );

    let method = parts.method.clone();
    if method == Method::GET {
        let accept_header = parts
            .headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok());
        let offered = media::writable_media_types(params.accept.as_deref(), accept_header)?;
        Ok(dispatcher.get(&graph, &offered).await?.into_response())
    } else if method == Method::POST {
        let payload = read_payload(&parts, body, state.max_body_bytes).await?;
        Ok(dispatcher.post(&graph, payload).await?.into_response())
    } else if method == Method::PUT {
        let payload = read_payload(&parts, body, state.max_body_bytes).await?;
        Ok(dispatcher.put(&graph, payload).await?.into_response())
    } else if method == Method::DELETE {
        Ok(dispatcher.delete(&graph).await?.into_response())
    } else if method == Method::PATCH {
        let payload = read_payload(&parts, body, state.max_body_bytes).await?;
        if !payload
            .content_type
            .to_ascii_lowercase()
            .starts_with(SPARQL_UPDATE)
        {
            return Err(GspError::UnsupportedMediaType(payload.content_type));
        }
        let update = std::str::from_utf8(&payload.body)
            .map_err(|_| GspError::BadRequest("update body is not valid UTF-8".into()))?;
        Ok(dispatcher.patch(&graph, update).await?.into_response())
    } else {
        Ok((StatusCode::METHOD_NOT_ALLOWED, "method not allowed").into_response())
    }
}

/// Reconstruct the absolute request URI that identifies the named graph.
///
/// The query string is not part of the graph identity.
fn graph_uri(scheme: &str, parts: &Parts) -> Result<Url, GspError> {
    let host = parts
        .headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| GspError::BadRequest("missing Host header".into()))?;

    Url::parse(&format!("{scheme}://{host}{}", parts.uri.path()))
        .map_err(|e| GspError::BadRequest(format!("cannot reconstruct request URI: {e}")))
}

async fn read_payload(
    parts: &Parts,
    body: Body,
    limit: usize,
) -> Result<GraphPayload, GspError> {
    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| GspError::BadRequest("missing Content-Type header".into()))?
        .to_string();

    let body = axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| GspError::BadRequest(format!("failed to read request body: {e}")))?;

    Ok(GraphPayload { content_type, body })
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install Ctrl+C handler: {e}");
        return;
    }
    tracing::info!("Shutdown signal received");
}
