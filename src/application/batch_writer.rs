use std::sync::Arc;
use tracing::{debug, error, info, warn};
use crate::{
    config::RetryPolicy,
    domain::{
        error::RefreshError,
        models::{WriteBatch, WriteReport},
        ports::BatchWriteStore,
    },
};

/// Writes one batch and resubmits whatever the store leaves unprocessed.
#[derive(Clone)]
pub struct BatchWriter {
    store: Arc<dyn BatchWriteStore>,
    retry: RetryPolicy,
}

impl BatchWriter {
    pub fn new(store: Arc<dyn BatchWriteStore>, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    // Requests are strictly sequential; any request error is terminal.
    pub async fn write(&self, batch: &WriteBatch) -> Result<WriteReport, RefreshError> {
        let table = batch.table_name.as_str();
        debug!("Writing batch of {} items to {}", batch.len(), table);

        let mut requests_issued: u32 = 1;
        let mut unprocessed = self.store.batch_write(batch).await
            .map_err(|e| {
                error!("Batch write to {} failed: {}", table, e);
                e
            })?;

        let mut retries: u32 = 0;
        while let Some(pending) = unprocessed.into_batch(table) {
            if retries >= self.retry.max_retries {
                error!("Giving up on {} unprocessed items in {} after {} requests",
                    pending.len(), table, requests_issued);
                return Err(RefreshError::RetriesExhausted {
                    table: table.to_string(),
                    attempts: requests_issued,
                    remaining: pending.len(),
                });
            }
            retries += 1;

            info!("Unprocessed items remain ({} in {}). Processing...", pending.len(), table);
            let delay = self.retry.backoff(retries);
            if !delay.is_zero() {
                debug!("Backing off {:?} before retry {} of {}", delay, retries, self.retry.max_retries);
                tokio::time::sleep(delay).await;
            }

            requests_issued += 1;
            unprocessed = self.store.batch_write(&pending).await
                .map_err(|e| {
                    warn!("Error while processing unprocessed items in {}: {}", table, e);
                    e
                })?;
        }

        debug!("Batch of {} items written to {} in {} requests", batch.len(), table, requests_issued);
        Ok(WriteReport {
            requests_issued,
            items_written: batch.len(),
        })
    }
}
