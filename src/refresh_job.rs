use std::sync::Arc;
use tracing::{debug, info};
use crate::{
    application::refresh_service::RefreshService,
    config::RefreshConfig,
    domain::{error::RefreshError, models::RefreshReport},
    infrastructure::{
        dynamodb::{batch_store::DynamoBatchWriteStore, client::build_client},
        filesystem::snapshot_source::LocalSnapshotSource,
        parsers::json_parser::JsonInventoryParser,
    },
};

/// Wires the refresh pipeline to DynamoDB and the local inventory directory.
pub struct RefreshJob {
    service: RefreshService,
}

impl RefreshJob {
    pub async fn new(config: RefreshConfig) -> Result<Self, RefreshError> {
        debug!("Initializing refresh job");

        let dynamo_client = build_client(config.endpoint_url.as_deref()).await;
        let store = Arc::new(DynamoBatchWriteStore::new(dynamo_client));
        debug!("DynamoDB store initialized");

        let snapshot_source = Arc::new(LocalSnapshotSource::new(
            config.inventory_dir.clone(),
            config.snapshot_pattern.clone(),
        ));
        let parser = Arc::new(JsonInventoryParser::new());
        debug!("Snapshot source and parser initialized");

        let service = RefreshService::new(
            snapshot_source,
            parser,
            store,
            config.table_name,
            config.batch_size,
            config.retry,
        );

        debug!("Refresh job initialization complete");
        Ok(Self { service })
    }

    pub async fn run(&self) -> Result<RefreshReport, RefreshError> {
        info!("Running catalog refresh");
        let report = self.service.refresh().await?;
        info!("Refresh {} finished: {} records in {} batches",
            report.run_id, report.records, report.batches);
        Ok(report)
    }
}
