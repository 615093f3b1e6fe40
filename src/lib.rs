//! Graph Store Protocol gateway library.
//!
//! Exposes SPARQL 1.1 Graph Store Protocol resources for named graphs,
//! routing reads to proxied dataset origins when a registered URI prefix
//! claims the request, and delegating everything else to external store
//! and update services.

pub mod config;
pub mod gsp;
pub mod http;
pub mod observability;
pub mod registry;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use registry::ContextModel;
