//! Per-request GSP dispatch.
//!
//! Stateless beyond "resolve, then branch": a dispatcher is built from a
//! fresh context model snapshot for every request and discarded with it.

use std::sync::Arc;

use mime::Mime;
use oxrdf::Graph;
use url::Url;

use crate::gsp::backend::{
    GraphPayload, GraphStore, GspError, GspResponse, RemoteGraphClient, UpdateExecutor,
};
use crate::registry::{proxied_uri, resolve_target, vocab, ResolvedTarget};

pub struct GraphStoreDispatcher {
    model: Arc<Graph>,
    local: Arc<dyn GraphStore>,
    remote: Arc<dyn RemoteGraphClient>,
    updater: Arc<dyn UpdateExecutor>,
}

impl GraphStoreDispatcher {
    pub fn new(
        model: Arc<Graph>,
        local: Arc<dyn GraphStore>,
        remote: Arc<dyn RemoteGraphClient>,
        updater: Arc<dyn UpdateExecutor>,
    ) -> Self {
        Self {
            model,
            local,
            remote,
            updater,
        }
    }

    /// GET is the only verb that consults the resolver: when a registered
    /// dataset claims this graph, the read is forwarded to its proxy origin
    /// and the response relayed unchanged.
    pub async fn get(&self, graph: &Url, accept: &[Mime]) -> Result<GspResponse, GspError> {
        match resolve_target(&self.model, vocab::void::DATASET, graph)? {
            ResolvedTarget::Remote(proxy) => {
                let target = proxied_uri(&proxy, graph)?;
                tracing::debug!(graph = %graph, target = %target, "relaying read to proxied dataset");
                metrics::counter!("gateway_proxied_requests_total").increment(1);
                self.remote.relay_get(&target, accept).await
            }
            ResolvedTarget::Local => self.local.get(graph, accept).await,
        }
    }

    pub async fn post(&self, graph: &Url, payload: GraphPayload) -> Result<GspResponse, GspError> {
        if is_multipart(&payload) {
            self.local.merge_multipart(graph, payload).await
        } else {
            self.local.merge(graph, payload).await
        }
    }

    pub async fn put(&self, graph: &Url, payload: GraphPayload) -> Result<GspResponse, GspError> {
        if is_multipart(&payload) {
            self.local.replace_multipart(graph, payload).await
        } else {
            self.local.replace(graph, payload).await
        }
    }

    pub async fn delete(&self, graph: &Url) -> Result<GspResponse, GspError> {
        self.local.delete(graph).await
    }

    /// Apply a SPARQL Update through the executor bound to this graph.
    ///
    /// TODO: check that the update only touches this named graph; for now
    /// the caller is trusted and no restriction is passed.
    pub async fn patch(&self, graph: &Url, update: &str) -> Result<GspResponse, GspError> {
        tracing::debug!(graph = %graph, "applying SPARQL update");
        self.updater.execute(update, &[], &[]).await?;
        Ok(GspResponse::empty_ok())
    }
}

fn is_multipart(payload: &GraphPayload) -> bool {
    payload
        .content_type
        .to_ascii_lowercase()
        .starts_with("multipart/form-data")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::model::parse_turtle;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug, PartialEq, Eq)]
    enum Call {
        Get(String),
        Merge(String),
        MergeMultipart(String),
        Replace(String),
        ReplaceMultipart(String),
        Delete(String),
        Relay(String),
        Update(String),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<Call>>,
    }

    impl Recorder {
        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }

        fn take(&self) -> Vec<Call> {
            std::mem::take(&mut self.calls.lock().unwrap())
        }
    }

    struct MockStore(Arc<Recorder>);

    #[async_trait]
    impl GraphStore for MockStore {
        async fn get(&self, graph: &Url, _accept: &[Mime]) -> Result<GspResponse, GspError> {
            self.0.record(Call::Get(graph.to_string()));
            Ok(GspResponse::empty_ok())
        }

        async fn merge(&self, graph: &Url, _: GraphPayload) -> Result<GspResponse, GspError> {
            self.0.record(Call::Merge(graph.to_string()));
            Ok(GspResponse::empty_ok())
        }

        async fn replace(&self, graph: &Url, _: GraphPayload) -> Result<GspResponse, GspError> {
            self.0.record(Call::Replace(graph.to_string()));
            Ok(GspResponse::empty_ok())
        }

        async fn delete(&self, graph: &Url) -> Result<GspResponse, GspError> {
            self.0.record(Call::Delete(graph.to_string()));
            Ok(GspResponse::empty_ok())
        }

        async fn merge_multipart(
            &self,
            graph: &Url,
            _: GraphPayload,
        ) -> Result<GspResponse, GspError> {
            self.0.record(Call::MergeMultipart(graph.to_string()));
            Ok(GspResponse::empty_ok())
        }

        async fn replace_multipart(
            &self,
            graph: &Url,
            _: GraphPayload,
        ) -> Result<GspResponse, GspError> {
            self.0.record(Call::ReplaceMultipart(graph.to_string()));
            Ok(GspResponse::empty_ok())
        }
    }

    struct MockRemote(Arc<Recorder>);

    #[async_trait]
    impl RemoteGraphClient for MockRemote {
        async fn relay_get(&self, target: &Url, _: &[Mime]) -> Result<GspResponse, GspError> {
            self.0.record(Call::Relay(target.to_string()));
            Ok(GspResponse::empty_ok())
        }
    }

    struct MockUpdater(Arc<Recorder>);

    #[async_trait]
    impl UpdateExecutor for MockUpdater {
        async fn execute(
            &self,
            update: &str,
            using: &[Url],
            using_named: &[Url],
        ) -> Result<(), GspError> {
            assert!(using.is_empty());
            assert!(using_named.is_empty());
            self.0.record(Call::Update(update.to_string()));
            Ok(())
        }
    }

    const NS: &str = r#"
        @prefix void: <http://rdfs.org/ns/void#> .
        @prefix lapp: <https://w3id.org/atomgraph/linkeddatahub/apps#> .
    "#;

    fn dispatcher(turtle: &str) -> (GraphStoreDispatcher, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let dispatcher = GraphStoreDispatcher::new(
            Arc::new(parse_turtle(turtle).unwrap()),
            Arc::new(MockStore(recorder.clone())),
            Arc::new(MockRemote(recorder.clone())),
            Arc::new(MockUpdater(recorder.clone())),
        );
        (dispatcher, recorder)
    }

    fn graph() -> Url {
        Url::parse("http://orig.example/a/b/c").unwrap()
    }

    fn rdf_payload() -> GraphPayload {
        GraphPayload {
            content_type: "text/turtle".into(),
            body: bytes::Bytes::from_static(b"<s> <p> <o> ."),
        }
    }

    #[tokio::test]
    async fn get_serves_locally_without_matching_dataset() {
        let (dispatcher, recorder) = dispatcher(NS);
        dispatcher.get(&graph(), &[]).await.unwrap();
        assert_eq!(
            recorder.take(),
            vec![Call::Get("http://orig.example/a/b/c".into())]
        );
    }

    #[tokio::test]
    async fn get_relays_to_rewritten_proxy_target() {
        let (dispatcher, recorder) = dispatcher(&format!(
            r#"{NS}
            <http://example.org/datasets/a> a void:Dataset ;
                lapp:prefix <http://orig.example/a/> ;
                lapp:proxy <https://proxy.example:8443/> .
            "#
        ));
        dispatcher.get(&graph(), &[]).await.unwrap();
        assert_eq!(
            recorder.take(),
            vec![Call::Relay("https://proxy.example:8443/a/b/c".into())]
        );
    }

    #[tokio::test]
    async fn get_fails_when_winning_dataset_has_no_proxy() {
        let (dispatcher, recorder) = dispatcher(&format!(
            r#"{NS}
            <http://example.org/datasets/a> a void:Dataset ;
                lapp:prefix <http://orig.example/a/> .
            "#
        ));
        let err = dispatcher.get(&graph(), &[]).await.unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        // no silent fallback to local serving
        assert!(recorder.take().is_empty());
    }

    #[tokio::test]
    async fn mutating_verbs_never_consult_the_resolver() {
        // The dataset matches and lacks a proxy, which makes GET fail; the
        // mutating verbs must not even notice and act on the local graph.
        let turtle = format!(
            r#"{NS}
            <http://example.org/datasets/a> a void:Dataset ;
                lapp:prefix <http://orig.example/a/> .
            "#
        );
        let (dispatcher, recorder) = dispatcher(&turtle);
        let graph = graph();

        dispatcher.post(&graph, rdf_payload()).await.unwrap();
        dispatcher.put(&graph, rdf_payload()).await.unwrap();
        dispatcher.delete(&graph).await.unwrap();
        dispatcher.patch(&graph, "DELETE WHERE { ?s ?p ?o }").await.unwrap();

        assert_eq!(
            recorder.take(),
            vec![
                Call::Merge(graph.to_string()),
                Call::Replace(graph.to_string()),
                Call::Delete(graph.to_string()),
                Call::Update("DELETE WHERE { ?s ?p ?o }".into()),
            ]
        );
    }

    #[tokio::test]
    async fn multipart_bodies_take_the_multipart_path() {
        let (dispatcher, recorder) = dispatcher(NS);
        let graph = graph();
        let multipart = GraphPayload {
            content_type: "multipart/form-data; boundary=x".into(),
            body: bytes::Bytes::new(),
        };

        dispatcher.post(&graph, multipart.clone()).await.unwrap();
        dispatcher.put(&graph, multipart).await.unwrap();

        assert_eq!(
            recorder.take(),
            vec![
                Call::MergeMultipart(graph.to_string()),
                Call::ReplaceMultipart(graph.to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn patch_returns_empty_success() {
        let (dispatcher, _) = dispatcher(NS);
        let response = dispatcher
            .patch(&graph(), "INSERT DATA { <s> <p> <o> }")
            .await
            .unwrap();
        assert_eq!(response.status, axum::http::StatusCode::OK);
        assert!(response.body.is_empty());
    }
}
