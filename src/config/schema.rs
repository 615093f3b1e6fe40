//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files and
//! default on every field so a minimal config is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, public scheme).
    pub listener: ListenerConfig,

    /// Endpoints of the delegated store and update services.
    pub store: StoreConfig,

    /// Source of the RDF context model describing datasets.
    pub context: ContextConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Scheme used when reconstructing absolute request URIs.
    pub public_scheme: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            public_scheme: "http".to_string(),
        }
    }
}

/// Delegated service endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Graph Store Protocol endpoint of the local engine.
    pub graph_store_endpoint: String,

    /// SPARQL Update endpoint of the executor.
    pub update_endpoint: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            graph_store_endpoint: "http://127.0.0.1:3030/data".to_string(),
            update_endpoint: "http://127.0.0.1:3030/update".to_string(),
        }
    }
}

/// Context model source.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ContextConfig {
    /// Turtle file describing datasets. None means an empty model and
    /// purely local serving.
    pub model_path: Option<PathBuf>,

    /// Reload the model when the file changes.
    pub watch: bool,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// End-to-end request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitConfig {
    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Expose Prometheus metrics.
    pub metrics_enabled: bool,

    /// Address of the metrics exporter.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_deserializes_with_defaults() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.timeouts.request_secs, 30);
        assert!(config.context.model_path.is_none());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [store]
            graph_store_endpoint = "http://store.internal/data"

            [context]
            model_path = "/etc/gateway/datasets.ttl"
            watch = true
            "#,
        )
        .unwrap();

        assert_eq!(config.store.graph_store_endpoint, "http://store.internal/data");
        assert_eq!(config.store.update_endpoint, "http://127.0.0.1:3030/update");
        assert!(config.context.watch);
    }
}
