use std::sync::Arc;
use chrono::Utc;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;
use crate::{
    application::{batch_writer::BatchWriter, chunker::chunk_items, orchestrator::WriteOrchestrator},
    config::RetryPolicy,
    domain::{
        error::RefreshError,
        models::RefreshReport,
        ports::{BatchWriteStore, InventoryParser, SnapshotSource},
    },
};

pub struct RefreshService {
    snapshot_source: Arc<dyn SnapshotSource>,
    parser: Arc<dyn InventoryParser>,
    orchestrator: WriteOrchestrator,
    table_name: String,
    batch_size: usize,
}

impl RefreshService {
    pub fn new(
        snapshot_source: Arc<dyn SnapshotSource>,
        parser: Arc<dyn InventoryParser>,
        store: Arc<dyn BatchWriteStore>,
        table_name: String,
        batch_size: usize,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            snapshot_source,
            parser,
            orchestrator: WriteOrchestrator::new(BatchWriter::new(store, retry)),
            table_name,
            batch_size,
        }
    }

    /// Replaces the table contents with the items of the latest snapshot.
    pub async fn refresh(&self) -> Result<RefreshReport, RefreshError> {
        let run_id = Uuid::new_v4();
        self.refresh_inner(run_id)
            .instrument(info_span!("refresh", %run_id))
            .await
    }

    async fn refresh_inner(&self, run_id: Uuid) -> Result<RefreshReport, RefreshError> {
        let started_at = Utc::now();
        info!("Starting refresh of table {}", self.table_name);

        // Step 1: Locate the latest snapshot
        debug!("Step 1: Locating latest snapshot");
        let snapshot = self.snapshot_source.latest_snapshot().await
            .map_err(|e| {
                error!("Failed to obtain latest snapshot: {}", e);
                e
            })?;
        info!("Using snapshot {} ({} bytes)", snapshot.location, snapshot.bytes.len());

        // Step 2: Parse the inventory
        debug!("Step 2: Parsing snapshot {}", snapshot.location);
        let items = self.parser.parse(&snapshot.bytes).await
            .map_err(|e| {
                error!("Failed to parse snapshot {}: {}", snapshot.location, e);
                e
            })?;
        if items.is_empty() {
            warn!("Snapshot {} contains no items", snapshot.location);
        }

        // Step 3: Split into write batches
        debug!("Step 3: Chunking {} items into batches of {}", items.len(), self.batch_size);
        let batches = chunk_items(&items, &self.table_name, self.batch_size)?;
        let batch_count = batches.len();

        // Step 4: Write all batches concurrently
        debug!("Step 4: Writing {} batches to {}", batch_count, self.table_name);
        self.orchestrator.run(batches).await.into_result()
            .map_err(|e| {
                error!("Refresh of {} from {} failed: {}", self.table_name, snapshot.location, e);
                e
            })?;

        let finished_at = Utc::now();
        info!("✅ Refreshed {} with {} items in {} batches from {} ({} ms)",
            self.table_name, items.len(), batch_count, snapshot.location,
            (finished_at - started_at).num_milliseconds());

        Ok(RefreshReport {
            run_id,
            snapshot: snapshot.location,
            table_name: self.table_name.clone(),
            records: items.len(),
            batches: batch_count,
            started_at,
            finished_at,
        })
    }
}
