pub mod snapshot_source;
