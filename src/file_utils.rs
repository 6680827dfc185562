use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Append a pre-formatted line to a file, creating it if needed.
    ///
    /// The whole line goes out in one `write_all` on a freshly opened
    /// append-mode handle, flushed before returning. The parent directory
    /// must already exist.
    pub async fn append_line<P: AsRef<Path>>(path: P, line: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }

    /// Find the `{id}.json` documents in a directory, sorted by ID
    pub fn find_documents<P: AsRef<Path>>(dir: P) -> Result<Vec<(u64, PathBuf)>> {
        let dir = dir.as_ref();
        let mut result = Vec::new();

        for entry in fs::read_dir(dir).with_context(|| format!("Failed to read directory: {:?}", dir))? {
            let path = entry.context("Failed to read directory entry")?.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            if let Some(id) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<u64>().ok())
            {
                result.push((id, path));
            }
        }

        result.sort_by_key(|(id, _)| *id);
        Ok(result)
    }
}
