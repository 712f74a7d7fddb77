//! Content targets: where the content element's markup is published after
//! each render.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write stdout: {0}")]
    Stdout(#[source] std::io::Error),
}

/// Receives the full markup every time the content element changes.
#[async_trait]
pub trait ContentTarget: Send + Sync {
    async fn publish(&self, markup: &str) -> Result<(), OutputError>;
}

/// Prints each render on its own line.
#[derive(Debug, Default)]
pub struct StdoutTarget;

#[async_trait]
impl ContentTarget for StdoutTarget {
    async fn publish(&self, markup: &str) -> Result<(), OutputError> {
        let mut out = tokio::io::stdout();
        out.write_all(markup.as_bytes())
            .await
            .map_err(OutputError::Stdout)?;
        out.write_all(b"\n").await.map_err(OutputError::Stdout)?;
        out.flush().await.map_err(OutputError::Stdout)
    }
}

/// Replaces a file's contents with the latest render.
///
/// Writes go to a sibling temp file that is then renamed over the target,
/// so readers never observe a partial fragment.
#[derive(Debug, Clone)]
pub struct FileTarget {
    path: PathBuf,
}

impl FileTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn file_error(&self, source: std::io::Error) -> OutputError {
        OutputError::File {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl ContentTarget for FileTarget {
    async fn publish(&self, markup: &str) -> Result<(), OutputError> {
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, markup)
            .await
            .map_err(|e| self.file_error(e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.file_error(e))
    }
}
