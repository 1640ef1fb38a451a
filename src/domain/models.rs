use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category tag stamped on every item written by the refresh job.
pub const CATALOG_ITEM_TYPE: &str = "BLEND";

/// Maximum number of write requests DynamoDB accepts in one `BatchWriteItem` call.
pub const MAX_BATCH_SIZE: usize = 25;

// Snapshot keys are matched in lower, capitalised and upper case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(rename = "Type", alias = "type", alias = "TYPE", default, skip_serializing_if = "String::is_empty")]
    pub item_type: String,
    #[serde(alias = "Name", alias = "NAME")]
    pub name: String,
    #[serde(alias = "Action", alias = "ACTION", default)]
    pub action: String,
    #[serde(rename = "Listed", alias = "listed", alias = "LISTED", default)]
    pub listed: bool,
    #[serde(alias = "Description", alias = "DESCRIPTION", default)]
    pub description: String,
    #[serde(alias = "Price", alias = "PRICE", default)]
    pub price: String,
}

impl CatalogItem {
    pub fn tagged(&self) -> Self {
        Self {
            item_type: CATALOG_ITEM_TYPE.to_string(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(rename = "Items", alias = "items", alias = "ITEMS", default)]
    pub items: Vec<CatalogItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PutRequest {
    pub item: CatalogItem,
}

/// Ordered group of put requests sent to one table in a single call.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteBatch {
    pub table_name: String,
    pub requests: Vec<PutRequest>,
}

impl WriteBatch {
    pub fn new(table_name: impl Into<String>, requests: Vec<PutRequest>) -> Self {
        Self {
            table_name: table_name.into(),
            requests,
        }
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// Requests the store accepted but did not apply, keyed by table name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnprocessedSet {
    pub request_items: HashMap<String, Vec<PutRequest>>,
}

impl UnprocessedSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn for_table(table_name: impl Into<String>, requests: Vec<PutRequest>) -> Self {
        let mut request_items = HashMap::new();
        if !requests.is_empty() {
            request_items.insert(table_name.into(), requests);
        }
        Self { request_items }
    }

    pub fn is_empty(&self) -> bool {
        self.request_items.values().all(Vec::is_empty)
    }

    pub fn len(&self) -> usize {
        self.request_items.values().map(Vec::len).sum()
    }

    /// Takes the leftovers for `table_name` as a batch to resubmit.
    pub fn into_batch(mut self, table_name: &str) -> Option<WriteBatch> {
        self.request_items
            .remove(table_name)
            .filter(|requests| !requests.is_empty())
            .map(|requests| WriteBatch::new(table_name, requests))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteReport {
    pub requests_issued: u32,
    pub items_written: usize,
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub location: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshReport {
    pub run_id: Uuid,
    pub snapshot: String,
    pub table_name: String,
    pub records: usize,
    pub batches: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}
