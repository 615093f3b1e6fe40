//! Dataset registry and request resolution.
//!
//! # Data Flow
//! ```text
//! Incoming request (absolute graph URI)
//!     → model.rs (snapshot of the RDF context model)
//!     → index.rs (collect datasets whose prefix is a proper ancestor)
//!     → resolver.rs (longest prefix wins → Local or Remote target)
//!     → rewrite.rs (swap scheme/host/port onto the proxy origin)
//!
//! Context model lifecycle:
//!     Turtle file
//!     → parsed into oxrdf::Graph at startup
//!     → swapped atomically on file change (config/watcher.rs)
//!     → read fresh on every request, never cached per component
//! ```
//!
//! # Design Decisions
//! - The candidate index is rebuilt per request; routing stays correct under
//!   runtime configuration changes without invalidation logic
//! - Exact prefix equality is not a match: a graph is only routed when it is
//!   strictly under a dataset prefix
//! - A typed dataset without a prefix is a deployment error, surfaced as a
//!   server error rather than skipped
//! - Tie between equal-length prefixes is implementation-defined (the
//!   later-observed dataset wins within a process run)

pub mod index;
pub mod model;
pub mod resolver;
pub mod rewrite;
pub mod vocab;

pub use index::{candidates_under, Dataset};
pub use model::ContextModel;
pub use resolver::{resolve_target, ResolvedTarget};
pub use rewrite::proxied_uri;

use thiserror::Error;

/// Errors raised while resolving a request against the dataset registry.
///
/// All variants indicate a broken deployment rather than a bad request and
/// map to HTTP 500.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A resource typed as a dataset declares no prefix.
    #[error("dataset resource {0} has no lapp:prefix value")]
    MissingPrefix(String),

    /// A dataset declares a prefix that is not a resource-valued IRI.
    #[error("dataset resource {0} has a non-resource lapp:prefix value")]
    NonResourcePrefix(String),

    /// The winning dataset claims routing ownership but names no destination.
    #[error("dataset resource {0} has no lapp:proxy value")]
    MissingProxy(String),

    /// A prefix or proxy value in the model is not a parseable URL.
    #[error("dataset resource {dataset} has an invalid URI <{value}>: {source}")]
    InvalidUri {
        dataset: String,
        value: String,
        source: url::ParseError,
    },

    /// The proxy origin could not be applied to the request URI.
    #[error("cannot rewrite <{request}> against proxy origin <{proxy}>")]
    Rewrite { proxy: String, request: String },
}
