//! Candidate discovery over the context model.
//!
//! Enumerates every resource typed as a dataset and keeps the ones whose
//! declared prefix is a proper ancestor of the request URI.

use std::collections::BTreeMap;

use oxrdf::vocab::rdf;
use oxrdf::{Graph, NamedNodeRef, SubjectRef, TermRef};
use url::Url;

use crate::registry::{vocab, RegistryError};

/// A dataset descriptor read from the context model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    /// URI (or blank node label) of the describing resource, for diagnostics.
    pub uri: String,
    /// URI prefix this dataset claims ownership of.
    pub prefix: Url,
    /// Origin serving the data, when it lives elsewhere.
    pub proxy: Option<Url>,
}

/// Collect datasets whose prefix is a proper ancestor of `request_uri`,
/// keyed by the character length of the full prefix string.
///
/// The map is rebuilt from the model on every call. A typed dataset without
/// a prefix is a fatal configuration error. When two datasets share a prefix
/// length the later-observed one replaces the earlier; which one that is
/// depends on graph iteration order and is deliberately left unspecified.
pub fn candidates_under(
    model: &Graph,
    dataset_type: NamedNodeRef<'_>,
    request_uri: &Url,
) -> Result<BTreeMap<usize, Dataset>, RegistryError> {
    let type_term = TermRef::from(dataset_type);
    let mut candidates = BTreeMap::new();

    for triple in model.iter() {
        if triple.predicate != rdf::TYPE || triple.object != type_term {
            continue;
        }
        let subject = triple.subject;

        let prefix_term = object_of(model, subject, vocab::lapp::PREFIX)
            .ok_or_else(|| RegistryError::MissingPrefix(subject.to_string()))?;
        let TermRef::NamedNode(prefix_node) = prefix_term else {
            return Err(RegistryError::NonResourcePrefix(subject.to_string()));
        };
        let prefix = parse_uri(subject, prefix_node.as_str())?;

        if relativize(&prefix, request_uri).is_none() {
            continue;
        }

        let proxy = match object_of(model, subject, vocab::lapp::PROXY) {
            Some(TermRef::NamedNode(proxy_node)) => Some(parse_uri(subject, proxy_node.as_str())?),
            _ => None,
        };

        candidates.insert(
            prefix.as_str().len(),
            Dataset {
                uri: subject.to_string(),
                prefix,
                proxy,
            },
        );
    }

    Ok(candidates)
}

/// Relativize `uri` against `prefix`.
///
/// Returns the non-empty path remainder when `prefix` is a proper ancestor
/// of `uri`, and `None` otherwise. A URI exactly equal to the prefix is not
/// "under" it.
pub fn relativize(prefix: &Url, uri: &Url) -> Option<String> {
    if prefix.scheme() != uri.scheme() || prefix.authority() != uri.authority() {
        return None;
    }
    let rest = uri.path().strip_prefix(prefix.path())?;
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}

fn object_of<'a>(
    model: &'a Graph,
    subject: SubjectRef<'a>,
    predicate: NamedNodeRef<'a>,
) -> Option<TermRef<'a>> {
    model
        .iter()
        .find(|t| t.subject == subject && t.predicate == predicate)
        .map(|t| t.object)
}

fn parse_uri(subject: SubjectRef<'_>, value: &str) -> Result<Url, RegistryError> {
    Url::parse(value).map_err(|source| RegistryError::InvalidUri {
        dataset: subject.to_string(),
        value: value.to_string(),
        source,
    })
}
