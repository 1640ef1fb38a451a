use tracing::debug;
use crate::domain::{
    error::RefreshError,
    models::{CatalogItem, PutRequest, WriteBatch},
};

/// Splits `items` into batches of at most `batch_size` put requests for `table_name`.
///
/// Order is preserved and only the last batch may be short. Every request carries
/// the pipeline's category tag; `items` itself is left untouched.
pub fn chunk_items(
    items: &[CatalogItem],
    table_name: &str,
    batch_size: usize,
) -> Result<Vec<WriteBatch>, RefreshError> {
    if batch_size == 0 {
        return Err(RefreshError::Config("batch size must be at least 1".to_string()));
    }

    let batches: Vec<WriteBatch> = items
        .chunks(batch_size)
        .map(|chunk| {
            let requests = chunk
                .iter()
                .map(|item| PutRequest { item: item.tagged() })
                .collect();
            WriteBatch::new(table_name, requests)
        })
        .collect();

    debug!("Split {} items into {} batches of up to {} for table {}",
        items.len(), batches.len(), batch_size, table_name);
    Ok(batches)
}
