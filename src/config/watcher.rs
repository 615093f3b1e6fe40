//! Context model file watcher for hot reload.
//!
//! Dataset registrations may change at runtime; the watcher reparses the
//! Turtle file on change and swaps the new graph in atomically. Requests
//! already in flight keep their snapshot.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::registry::model::{parse_turtle, ContextModel};

/// Watches the context model file and reloads it on change.
pub struct ContextWatcher {
    path: PathBuf,
    model: Arc<ContextModel>,
}

impl ContextWatcher {
    pub fn new(path: &Path, model: Arc<ContextModel>) -> Self {
        Self {
            path: path.to_path_buf(),
            model,
        }
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned watcher must be kept alive for events to be delivered.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let path = self.path.clone();
        let model = self.model.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!("context model change detected, reloading");
                        match std::fs::read_to_string(&path).map_err(|e| e.to_string()).and_then(
                            |content| parse_turtle(&content).map_err(|e| e.to_string()),
                        ) {
                            Ok(graph) => {
                                tracing::info!(triples = graph.len(), "context model reloaded");
                                model.replace(graph);
                            }
                            Err(e) => {
                                tracing::error!(
                                    "failed to reload context model: {e}. Keeping current model."
                                );
                            }
                        }
                    }
                }
                Err(e) => tracing::error!("watch error: {e:?}"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "context model watcher started");
        Ok(watcher)
    }
}
