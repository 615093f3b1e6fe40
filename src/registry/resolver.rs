//! Longest-prefix selection.
//!
//! When several registered datasets could contain the same URI (an admin
//! application prefix nested under a broader end-user prefix, say), the
//! longer prefix is the more precise ownership claim and wins.

use oxrdf::{Graph, NamedNodeRef};
use url::Url;

use crate::registry::index::{candidates_under, Dataset};
use crate::registry::RegistryError;

/// Where a request should be served. Computed once per request, never kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTarget {
    /// No dataset claims this URI; serve from the local engine.
    Local,
    /// A dataset claims this URI; forward to its proxy origin.
    Remote(Url),
}

/// Pick the most specific candidate: maximal full-prefix length.
pub fn longest_prefix(
    candidates: std::collections::BTreeMap<usize, Dataset>,
) -> Option<Dataset> {
    candidates.into_iter().next_back().map(|(_, dataset)| dataset)
}

/// Resolve a request URI against the context model.
///
/// Returns `Remote` with the winning dataset's proxy origin, `Local` when no
/// dataset is a proper ancestor of the URI, and an error when the winner
/// declares no proxy origin.
pub fn resolve_target(
    model: &Graph,
    dataset_type: NamedNodeRef<'_>,
    request_uri: &Url,
) -> Result<ResolvedTarget, RegistryError> {
    match longest_prefix(candidates_under(model, dataset_type, request_uri)?) {
        None => Ok(ResolvedTarget::Local),
        Some(dataset) => match dataset.proxy {
            Some(proxy) => Ok(ResolvedTarget::Remote(proxy)),
            None => Err(RegistryError::MissingProxy(dataset.uri)),
        },
    }
}
