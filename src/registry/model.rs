//! The system-wide context model.
//!
//! Dataset descriptions live in an RDF graph parsed from a Turtle file. The
//! graph is held behind an atomic swap so a file watcher can replace it while
//! requests are in flight; every request takes its own snapshot.

use std::io::{BufReader, Cursor};
use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use oxrdf::{BlankNode, Graph, Literal, NamedNode, Subject, Term, Triple};
use rio_api::parser::TriplesParser;
use rio_turtle::{TurtleError, TurtleParser};
use thiserror::Error;

/// Errors raised while loading the context model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read context model: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse context model: {0}")]
    Parse(#[from] TurtleError),

    #[error("invalid RDF term in context model: {0}")]
    Term(String),
}

/// Read-only accessor for the current context model.
///
/// Owned process-wide; handlers only read snapshots and never mutate it.
pub struct ContextModel {
    graph: ArcSwap<Graph>,
}

impl ContextModel {
    /// Wrap an already-parsed graph.
    pub fn new(graph: Graph) -> Self {
        Self {
            graph: ArcSwap::from_pointee(graph),
        }
    }

    /// An empty model: every request resolves to local serving.
    pub fn empty() -> Self {
        Self::new(Graph::default())
    }

    /// Load the model from a Turtle file.
    pub fn from_turtle_file(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::new(parse_turtle(&content)?))
    }

    /// Snapshot of the current model for one request.
    pub fn snapshot(&self) -> Arc<Graph> {
        self.graph.load_full()
    }

    /// Atomically replace the model, typically after a file change.
    pub fn replace(&self, graph: Graph) {
        self.graph.store(Arc::new(graph));
    }
}

/// Parse a Turtle document into a graph.
pub fn parse_turtle(input: &str) -> Result<Graph, ModelError> {
    let reader = BufReader::new(Cursor::new(input));
    let mut parser = TurtleParser::new(reader, None);

    let mut graph = Graph::default();
    parser.parse_all(&mut |t| -> Result<(), ModelError> {
        let triple = convert_triple(&t)?;
        graph.insert(&triple);
        Ok(())
    })?;

    Ok(graph)
}

fn convert_triple(t: &rio_api::model::Triple<'_>) -> Result<Triple, ModelError> {
    Ok(Triple::new(
        convert_subject(t.subject)?,
        convert_named_node(t.predicate)?,
        convert_object(t.object)?,
    ))
}

fn convert_named_node(n: rio_api::model::NamedNode<'_>) -> Result<NamedNode, ModelError> {
    NamedNode::new(n.iri).map_err(|e| ModelError::Term(e.to_string()))
}

fn convert_subject(s: rio_api::model::Subject<'_>) -> Result<Subject, ModelError> {
    match s {
        rio_api::model::Subject::NamedNode(n) => Ok(convert_named_node(n)?.into()),
        rio_api::model::Subject::BlankNode(b) => Ok(BlankNode::new(b.id)
            .map_err(|e| ModelError::Term(e.to_string()))?
            .into()),
        rio_api::model::Subject::Triple(_) => {
            Err(ModelError::Term("embedded triples are not supported".into()))
        }
    }
}

fn convert_object(o: rio_api::model::Term<'_>) -> Result<Term, ModelError> {
    match o {
        rio_api::model::Term::NamedNode(n) => Ok(convert_named_node(n)?.into()),
        rio_api::model::Term::BlankNode(b) => Ok(BlankNode::new(b.id)
            .map_err(|e| ModelError::Term(e.to_string()))?
            .into()),
        rio_api::model::Term::Literal(l) => Ok(convert_literal(l)?.into()),
        rio_api::model::Term::Triple(_) => {
            Err(ModelError::Term("embedded triples are not supported".into()))
        }
    }
}

fn convert_literal(l: rio_api::model::Literal<'_>) -> Result<Literal, ModelError> {
    match l {
        rio_api::model::Literal::Simple { value } => Ok(Literal::new_simple_literal(value)),
        rio_api::model::Literal::LanguageTaggedString { value, language } => {
            Literal::new_language_tagged_literal(value, language)
                .map_err(|e| ModelError::Term(e.to_string()))
        }
        rio_api::model::Literal::Typed { value, datatype } => Ok(Literal::new_typed_literal(
            value,
            convert_named_node(datatype)?,
        )),
    }
}
