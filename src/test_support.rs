//! Scripted store double shared by the unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{
    error::RefreshError,
    models::{CatalogItem, PutRequest, UnprocessedSet, WriteBatch},
    ports::BatchWriteStore,
};

pub(crate) const TABLE: &str = "catalog";

#[derive(Debug, Clone)]
pub(crate) enum Step {
    Applied,
    /// Hand back the first `n` requests of the submitted batch as unprocessed.
    Leave(usize),
    Fail(&'static str),
    Panic,
}

/// Store whose responses are scripted per batch, keyed by the name of the
/// batch's first item. Unscripted calls apply everything.
#[derive(Default)]
pub(crate) struct ScriptedStore {
    scripts: Mutex<HashMap<String, VecDeque<Step>>>,
    delays: Mutex<HashMap<String, Duration>>,
    calls: Mutex<Vec<(String, usize)>>,
}

impl ScriptedStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn script(&self, key: &str, steps: impl IntoIterator<Item = Step>) {
        self.scripts.lock().unwrap()
            .insert(key.to_string(), steps.into_iter().collect());
    }

    pub(crate) fn delay(&self, key: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(key.to_string(), delay);
    }

    /// Completed calls in completion order as `(key, batch length)`.
    pub(crate) fn calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn calls_for(&self, key: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|(k, _)| k == key).count()
    }
}

#[async_trait]
impl BatchWriteStore for ScriptedStore {
    async fn batch_write(&self, batch: &WriteBatch) -> Result<UnprocessedSet, RefreshError> {
        let key = batch.requests.first()
            .map(|r| r.item.name.clone())
            .unwrap_or_default();

        let delay = self.delays.lock().unwrap().get(&key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let step = self.scripts.lock().unwrap()
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
            .unwrap_or(Step::Applied);
        self.calls.lock().unwrap().push((key, batch.len()));

        match step {
            Step::Applied => Ok(UnprocessedSet::empty()),
            Step::Leave(n) => {
                let left = batch.requests[..n.min(batch.len())].to_vec();
                Ok(UnprocessedSet::for_table(&batch.table_name, left))
            }
            Step::Fail(message) => Err(RefreshError::request(&batch.table_name, message)),
            Step::Panic => panic!("store blew up on {}", batch.table_name),
        }
    }
}

pub(crate) fn item(name: &str) -> CatalogItem {
    CatalogItem {
        item_type: String::new(),
        name: name.to_string(),
        action: "sell".to_string(),
        listed: true,
        description: format!("{} description", name),
        price: "9.99".to_string(),
    }
}

/// Batch for [`TABLE`] whose items are named `{prefix}-0`, `{prefix}-1`, ...
pub(crate) fn batch_of(prefix: &str, len: usize) -> WriteBatch {
    let requests = (0..len)
        .map(|i| PutRequest { item: item(&format!("{}-{}", prefix, i)).tagged() })
        .collect();
    WriteBatch::new(TABLE, requests)
}
