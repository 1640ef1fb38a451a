use async_trait::async_trait;
use aws_sdk_dynamodb::{
    error::DisplayErrorContext,
    operation::batch_write_item::BatchWriteItemOutput,
    types::{PutRequest as DynamoPutRequest, WriteRequest},
    Client,
};
use tracing::{debug, error, warn};
use crate::{
    domain::{
        error::RefreshError,
        models::{PutRequest, UnprocessedSet, WriteBatch},
        ports::BatchWriteStore,
    },
    infrastructure::dynamodb::attributes::{from_attributes, to_attributes},
};

/// `BatchWriteItem`-backed store.
pub struct DynamoBatchWriteStore {
    client: Client,
}

impl DynamoBatchWriteStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BatchWriteStore for DynamoBatchWriteStore {
    async fn batch_write(&self, batch: &WriteBatch) -> Result<UnprocessedSet, RefreshError> {
        let table = batch.table_name.as_str();
        let requests = to_write_requests(&batch.requests)?;
        debug!("Sending BatchWriteItem with {} requests to {}", requests.len(), table);

        let output = self.client
            .batch_write_item()
            .request_items(table, requests)
            .send()
            .await
            .map_err(|e| {
                let message = DisplayErrorContext(&e).to_string();
                error!("BatchWriteItem on {} failed: {}", table, message);
                RefreshError::request(table, message)
            })?;

        let unprocessed = unprocessed_from_output(output, table)?;
        if !unprocessed.is_empty() {
            debug!("{} of {} requests left unprocessed in {}", unprocessed.len(), batch.len(), table);
        }
        Ok(unprocessed)
    }
}

fn to_write_requests(requests: &[PutRequest]) -> Result<Vec<WriteRequest>, RefreshError> {
    requests
        .iter()
        .map(|request| {
            DynamoPutRequest::builder()
                .set_item(Some(to_attributes(&request.item)))
                .build()
                .map(|put| WriteRequest::builder().put_request(put).build())
                .map_err(|e| RefreshError::Marshal(format!("put request for {}: {}", request.item.name, e)))
        })
        .collect()
}

fn unprocessed_from_output(output: BatchWriteItemOutput, table: &str) -> Result<UnprocessedSet, RefreshError> {
    let mut request_items = output.unprocessed_items.unwrap_or_default();
    for other in request_items.keys().filter(|name| name.as_str() != table) {
        warn!("Ignoring unprocessed items for unexpected table {}", other);
    }

    let leftovers = request_items.remove(table).unwrap_or_default();
    let requests = leftovers
        .into_iter()
        .map(|write| {
            let put = write.put_request
                .ok_or_else(|| RefreshError::Marshal(format!("unprocessed request for {} is not a put", table)))?;
            Ok(PutRequest { item: from_attributes(&put.item)? })
        })
        .collect::<Result<Vec<_>, RefreshError>>()?;

    Ok(UnprocessedSet::for_table(table, requests))
}
