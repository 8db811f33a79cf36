use crate::Result;
use async_trait::async_trait;

/// Remote source of process-graph definitions and instance event logs.
///
/// Implementations wrap the mining service's HTTP API and own all transport,
/// authentication and retry concerns. An implementor is handed to the core as
/// an explicit capability object; the core never holds session state itself.
/// Failures surface as opaque [`crate::ProcMineError::Retrieval`] errors and
/// are never retried inside the core.
#[async_trait]
pub trait RemoteGraphSource {
    /// Fetch the raw graph-definition JSON for one process model.
    async fn fetch_graph_definition(&self, process_id: &str) -> Result<String>;

    /// Fetch the raw event-log JSON for one concrete execution.
    async fn fetch_instance_events(&self, instance_id: &str) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProcMineError;

    struct CannedSource;

    #[async_trait]
    impl RemoteGraphSource for CannedSource {
        async fn fetch_graph_definition(&self, process_id: &str) -> Result<String> {
            Ok(format!("{{\"process\":\"{}\"}}", process_id))
        }

        async fn fetch_instance_events(&self, _instance_id: &str) -> Result<String> {
            Err(ProcMineError::Retrieval(anyhow::anyhow!("503 from service")))
        }
    }

    #[tokio::test]
    async fn source_is_object_safe_and_fallible() {
        let source: Box<dyn RemoteGraphSource + Send + Sync> = Box::new(CannedSource);
        let def = source.fetch_graph_definition("p1").await.unwrap();
        assert!(def.contains("p1"));
        let err = source.fetch_instance_events("i1").await.unwrap_err();
        assert!(matches!(err, ProcMineError::Retrieval(_)));
    }
}
