use futures_util::future::join_all;
use tracing::{debug, error, info};
use crate::{
    application::batch_writer::BatchWriter,
    domain::{error::RefreshError, models::WriteBatch},
};

/// Outcome of one orchestration run.
#[derive(Debug)]
pub struct AggregateResult {
    pub batches: usize,
    pub requests_issued: u32,
    pub errors: Vec<RefreshError>,
}

impl AggregateResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Collapses the per-writer errors into a single generic failure.
    pub fn into_result(self) -> Result<(), RefreshError> {
        if self.is_success() {
            Ok(())
        } else {
            Err(RefreshError::WriteFailed {
                failed: self.errors.len(),
                total: self.batches,
            })
        }
    }
}

/// Runs one writer task per batch and waits for all of them.
pub struct WriteOrchestrator {
    writer: BatchWriter,
}

impl WriteOrchestrator {
    pub fn new(writer: BatchWriter) -> Self {
        Self { writer }
    }

    pub async fn run(&self, batches: Vec<WriteBatch>) -> AggregateResult {
        let total = batches.len();
        if total == 0 {
            info!("No batches to write");
            return AggregateResult { batches: 0, requests_issued: 0, errors: Vec::new() };
        }

        info!("Dispatching {} batch writers", total);
        let handles: Vec<_> = batches
            .into_iter()
            .enumerate()
            .map(|(index, batch)| {
                let writer = self.writer.clone();
                tokio::spawn(async move {
                    debug!("Writer {} started with {} items", index, batch.len());
                    writer.write(&batch).await
                })
            })
            .collect();

        let mut requests_issued = 0;
        let mut errors = Vec::new();
        for (index, joined) in join_all(handles).await.into_iter().enumerate() {
            match joined {
                Ok(Ok(report)) => {
                    debug!("Writer {} finished after {} requests", index, report.requests_issued);
                    requests_issued += report.requests_issued;
                }
                Ok(Err(e)) => errors.push(e),
                Err(e) => errors.push(RefreshError::TaskFailed(format!("writer {}: {}", index, e))),
            }
        }

        if errors.is_empty() {
            info!("✅ All {} batches written in {} requests", total, requests_issued);
        } else {
            for e in &errors {
                error!("Error writing objects: {}", e);
            }
            error!("{} of {} batch writers failed", errors.len(), total);
        }

        AggregateResult { batches: total, requests_issued, errors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use crate::{
        application::chunker::chunk_items,
        config::RetryPolicy,
        test_support::{batch_of, item, ScriptedStore, Step, TABLE},
    };

    fn orchestrator(store: &Arc<ScriptedStore>) -> WriteOrchestrator {
        WriteOrchestrator::new(BatchWriter::new(store.clone(), RetryPolicy::immediate(5)))
    }

    #[tokio::test]
    async fn test_empty_input_succeeds_without_writers() {
        let store = Arc::new(ScriptedStore::new());

        let result = orchestrator(&store).run(Vec::new()).await;

        assert!(result.is_success());
        assert_eq!(result.batches, 0);
        assert!(store.calls().is_empty());
        assert!(result.into_result().is_ok());
    }

    #[tokio::test]
    async fn test_all_batches_succeed() {
        let store = Arc::new(ScriptedStore::new());
        let batches = vec![batch_of("a", 25), batch_of("b", 25), batch_of("c", 3)];

        let result = orchestrator(&store).run(batches).await;

        assert!(result.is_success());
        assert_eq!(result.requests_issued, 3);
        assert_eq!(store.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_any_failure_fails_the_run() {
        let store = Arc::new(ScriptedStore::new());
        store.script("b-0", [Step::Fail("validation error")]);
        store.script("d-0", [Step::Leave(2), Step::Fail("throttled")]);
        let batches = vec![batch_of("a", 5), batch_of("b", 5), batch_of("c", 5), batch_of("d", 5)];

        let result = orchestrator(&store).run(batches).await;

        assert!(!result.is_success());
        assert_eq!(result.errors.len(), 2);
        assert_eq!(store.calls_for("a-0"), 1);
        assert_eq!(store.calls_for("c-0"), 1);
        match result.into_result() {
            Err(RefreshError::WriteFailed { failed, total }) => {
                assert_eq!(failed, 2);
                assert_eq!(total, 4);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_panicking_writer_counts_as_failure() {
        let store = Arc::new(ScriptedStore::new());
        store.script("b-0", [Step::Panic]);
        let batches = vec![batch_of("a", 5), batch_of("b", 5)];

        let result = orchestrator(&store).run(batches).await;

        assert_eq!(result.errors.len(), 1);
        assert!(matches!(result.errors[0], RefreshError::TaskFailed(_)));
        assert_eq!(store.calls_for("a-0"), 1);
        assert!(matches!(result.into_result(), Err(RefreshError::WriteFailed { failed: 1, total: 2 })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_slowest_writer() {
        let store = Arc::new(ScriptedStore::new());
        store.delay("slow-0", Duration::from_secs(30));
        store.script("fast-0", [Step::Fail("boom")]);
        let batches = vec![batch_of("fast", 2), batch_of("slow", 2), batch_of("other", 2)];

        let result = orchestrator(&store).run(batches).await;

        assert_eq!(store.calls_for("slow-0"), 1);
        assert_eq!(store.calls().last().map(|(k, _)| k.as_str()), Some("slow-0"));
        assert_eq!(result.errors.len(), 1);
    }

    #[tokio::test]
    async fn test_fifty_three_items_with_one_partial_batch() {
        let store = Arc::new(ScriptedStore::new());
        store.script("item-25", [Step::Leave(4)]);
        let items: Vec<_> = (0..53).map(|i| item(&format!("item-{}", i))).collect();
        let batches = chunk_items(&items, TABLE, 25).unwrap();

        let result = orchestrator(&store).run(batches).await;

        assert!(result.is_success());
        assert_eq!(result.batches, 3);
        assert_eq!(result.requests_issued, 4);
        assert_eq!(store.calls_for("item-0"), 1);
        assert_eq!(store.calls_for("item-25"), 2);
        assert_eq!(store.calls_for("item-50"), 1);
    }
}
