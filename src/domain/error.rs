use thiserror::Error;

#[derive(Error, Debug)]
pub enum RefreshError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("No snapshot found in {0}")]
    NoSnapshot(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Marshal error: {0}")]
    Marshal(String),

    /// The store rejected or failed to execute a write request.
    #[error("Batch write request to {table} failed: {message}")]
    Request { table: String, message: String },

    /// Items were still unprocessed when the retry budget ran out.
    #[error("{remaining} items still unprocessed in {table} after {attempts} requests")]
    RetriesExhausted {
        table: String,
        attempts: u32,
        remaining: usize,
    },

    #[error("error writing objects: {failed} of {total} batches failed")]
    WriteFailed { failed: usize, total: usize },

    #[error("Writer task failed: {0}")]
    TaskFailed(String),
}

impl RefreshError {
    pub fn request(table: &str, message: impl Into<String>) -> Self {
        Self::Request {
            table: table.to_string(),
            message: message.into(),
        }
    }
}
