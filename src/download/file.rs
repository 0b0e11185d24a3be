use std::path::{Path, PathBuf};

use futures::StreamExt;
use rand::{distributions::Alphanumeric, Rng};
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::download::{display_url, HttpClient};
use crate::error::Result;

pub const CHUNK_SIZE: usize = 1024;
pub const FILENAME_LEN: usize = 12;
pub const EXTENSION: &str = "jpg";

#[derive(Debug, Clone, PartialEq)]
pub struct SavedFile {
    pub path: PathBuf,
    pub bytes: u64,
}

/// A random `[A-Za-z0-9]{12}.jpg` name. Collisions with existing files are
/// not checked.
pub fn random_filename() -> String {
    let stem: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(FILENAME_LEN)
        .map(char::from)
        .collect();

    format!("{}.{}", stem, EXTENSION)
}

/// Create `dir` if it is missing. Returns whether it had to be created.
pub fn ensure_output_dir(dir: &Path) -> std::io::Result<bool> {
    if dir.is_dir() {
        return Ok(false);
    }

    match std::fs::create_dir_all(dir) {
        Ok(_) => {
            tracing::info!("Created directory: {}", dir.display());
            Ok(true)
        }
        Err(err) => {
            tracing::error!("Error creating directory {}: {}", dir.display(), err);
            Err(err)
        }
    }
}

async fn write_stream(http: &dyn HttpClient, url: &Url, output: &Path) -> Result<SavedFile> {
    let mut stream = http.get_stream(url).await?;

    let mut file = tokio::fs::File::create(output).await?;
    let mut bytes = 0;

    while let Some(frame) = stream.next().await {
        let frame = frame?;
        for chunk in frame.chunks(CHUNK_SIZE) {
            file.write_all(chunk).await?;
            bytes += chunk.len() as u64;
        }
    }

    file.flush().await?;

    Ok(SavedFile {
        path: output.to_path_buf(),
        bytes,
    })
}

/// Stream `url` into `output`, replacing whatever was there.
///
/// A failure part way through leaves the truncated file behind.
pub async fn download_thumbnail(http: &dyn HttpClient, url: &Url, output: &Path) -> Result<SavedFile> {
    let result = write_stream(http, url, output).await;

    match &result {
        Ok(saved) => tracing::info!("Thumbnail saved to {} ({} bytes).", saved.path.display(), saved.bytes),
        Err(err) if err.is_network() => {
            tracing::error!("Network error downloading thumbnail from {}: {}", display_url(url), err)
        }
        Err(err) => tracing::error!("Unexpected error downloading thumbnail to {}: {}", output.display(), err),
    }

    result
}
