//! Vocabulary terms used by the dataset registry.

/// LinkedDataHub application vocabulary.
pub mod lapp {
    use oxrdf::NamedNodeRef;

    /// URI prefix owned by a dataset.
    pub const PREFIX: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("https://w3id.org/atomgraph/linkeddatahub/apps#prefix");

    /// Origin that serves the data for a proxied dataset.
    pub const PROXY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("https://w3id.org/atomgraph/linkeddatahub/apps#proxy");
}

/// Vocabulary of Interlinked Datasets.
pub mod void {
    use oxrdf::NamedNodeRef;

    /// Type marker for dataset resources in the context model.
    pub const DATASET: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://rdfs.org/ns/void#Dataset");
}
