use std::path::PathBuf;
use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, info, error};
use crate::domain::{error::RefreshError, models::Snapshot, ports::SnapshotSource};

/// Picks the last snapshot file, by file name, from a local inventory directory.
pub struct LocalSnapshotSource {
    directory: PathBuf,
    pattern: Regex,
}

impl LocalSnapshotSource {
    pub fn new(directory: impl Into<PathBuf>, pattern: Regex) -> Self {
        let directory = directory.into();
        debug!("Snapshot source: {} (pattern '{}')", directory.display(), pattern);
        Self { directory, pattern }
    }

    async fn latest_path(&self) -> Result<PathBuf, RefreshError> {
        let dir = self.directory.display().to_string();
        let mut entries = tokio::fs::read_dir(&self.directory).await
            .map_err(|e| {
                error!("Could not read inventory directory {}: {}", dir, e);
                RefreshError::Io(format!("could not read inventory directory {}: {}", dir, e))
            })?;

        let mut latest: Option<String> = None;
        let mut candidates = 0;
        while let Some(entry) = entries.next_entry().await
            .map_err(|e| RefreshError::Io(format!("could not list {}: {}", dir, e)))?
        {
            let file_type = entry.file_type().await
                .map_err(|e| RefreshError::Io(e.to_string()))?;
            if !file_type.is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            if !self.pattern.is_match(&name) {
                debug!("Skipping {} (does not match snapshot pattern)", name);
                continue;
            }

            candidates += 1;
            if latest.as_deref().map_or(true, |current| name.as_str() > current) {
                latest = Some(name);
            }
        }

        let name = latest.ok_or_else(|| RefreshError::NoSnapshot(dir.clone()))?;
        debug!("Selected {} out of {} snapshots in {}", name, candidates, dir);
        Ok(self.directory.join(name))
    }
}

#[async_trait]
impl SnapshotSource for LocalSnapshotSource {
    async fn latest_snapshot(&self) -> Result<Snapshot, RefreshError> {
        let path = self.latest_path().await?;
        let location = path.display().to_string();

        let bytes = tokio::fs::read(&path).await
            .map_err(|e| {
                error!("Error reading inventory file {}: {}", location, e);
                RefreshError::Io(format!("error reading inventory file {}: {}", location, e))
            })?;

        info!("Loaded snapshot {} ({} bytes)", location, bytes.len());
        Ok(Snapshot { location, bytes })
    }
}
