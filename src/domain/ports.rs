use async_trait::async_trait;
use crate::domain::{
    error::RefreshError,
    models::{CatalogItem, Snapshot, UnprocessedSet, WriteBatch},
};

#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn latest_snapshot(&self) -> Result<Snapshot, RefreshError>;
}

#[async_trait]
pub trait InventoryParser: Send + Sync {
    async fn parse(&self, bytes: &[u8]) -> Result<Vec<CatalogItem>, RefreshError>;
}

/// Store that applies a batch of put requests in one call.
///
/// An empty `UnprocessedSet` means every request in the batch was applied.
#[async_trait]
pub trait BatchWriteStore: Send + Sync {
    async fn batch_write(&self, batch: &WriteBatch) -> Result<UnprocessedSet, RefreshError>;
}
