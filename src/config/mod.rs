//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//!
//! context model file (Turtle)
//!     → registry::model (parse into oxrdf::Graph)
//!     → watcher.rs detects change → reparse → atomic swap
//!     → handlers read a fresh snapshot per request
//! ```
//!
//! # Design Decisions
//! - Gateway config is immutable once loaded; changes require a restart
//! - The dataset registry (context model) is the part that hot-reloads,
//!   since routing must stay correct under runtime changes
//! - All fields have defaults to allow minimal configs

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::GatewayConfig;
pub use watcher::ContextWatcher;
