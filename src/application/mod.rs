pub mod batch_writer;
pub mod chunker;
pub mod orchestrator;
pub mod refresh_service;
