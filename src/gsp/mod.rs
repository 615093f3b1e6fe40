//! Graph Store Protocol dispatch.
//!
//! # Data Flow
//! ```text
//! Inbound GSP request (verb, named graph URI)
//!     → dispatcher.rs (resolve, then branch)
//!     → GET with matching dataset → remote client (relay verbatim)
//!     → everything else           → local engine / update executor
//! ```
//!
//! # Design Decisions
//! - The local engine and the remote client are one abstract capability,
//!   "respond to GSP verbs for a graph", behind the `GraphStore` trait;
//!   concrete variants differ only in how the target URI is formed
//! - Only GET consults the resolver; mutating verbs always act locally.
//!   This asymmetry is deliberate and preserved as observed
//! - The named graph is always this resource's own URI; the protocol's
//!   `default` and `graph` parameters are accepted but never honored
//! - No retries, no fallback: delegate failures surface to the caller

pub mod backend;
pub mod dispatcher;
pub mod media;
pub mod remote;

pub use backend::{GraphPayload, GraphStore, GspError, GspResponse, RemoteGraphClient, UpdateExecutor};
pub use dispatcher::GraphStoreDispatcher;
pub use remote::{HttpGraphStore, HttpRemoteClient, HttpUpdateExecutor};
