//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, catch-all graph route)
//!     → request.rs (assign request ID)
//!     → gsp::dispatcher (resolve, then branch per verb)
//!     → response relayed or produced by the delegate
//! ```

pub mod request;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::HttpServer;
