pub mod attributes;
pub mod batch_store;
pub mod client;
