use std::io;
use std::path::Path;

use tokio::fs;

use crate::error::{Result, ServeError};
use crate::http::mime;
use crate::site::resolver::{ResolvedTarget, TargetKind};

/// Separator between entries in a directory listing.
const LISTING_SEPARATOR: &str = ", ";

/// Body and content type for a resolved target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPayload {
    pub body: Vec<u8>,
    pub mime_type: &'static str,
}

/// Loads the content behind `target`.
///
/// Files come back byte for byte with a type guessed from the extension.
/// Directories come back as a sorted plain-text listing of their immediate
/// entries, subdirectories marked with a trailing `/`.
pub async fn load(target: &ResolvedTarget) -> Result<ContentPayload> {
    match target.kind() {
        TargetKind::File => read_file(target.path()).await,
        TargetKind::Directory => list_directory(target.path()).await,
    }
}

async fn read_file(path: &Path) -> Result<ContentPayload> {
    // fs::read opens, reads and closes; the handle is gone on every return path
    let body = fs::read(path).await.map_err(|e| io_failure(path, e))?;

    Ok(ContentPayload {
        body,
        mime_type: mime::from_path(path),
    })
}

async fn list_directory(path: &Path) -> Result<ContentPayload> {
    let mut dir = fs::read_dir(path).await.map_err(|e| io_failure(path, e))?;
    let mut entries = Vec::new();

    while let Some(entry) = dir.next_entry().await.map_err(|e| io_failure(path, e))? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry
            .file_type()
            .await
            .map(|t| t.is_dir())
            .unwrap_or(false);
        entries.push((name, is_dir));
    }

    entries.sort();

    let listing = entries
        .into_iter()
        .map(|(name, is_dir)| if is_dir { format!("{name}/") } else { name })
        .collect::<Vec<_>>()
        .join(LISTING_SEPARATOR);

    Ok(ContentPayload {
        body: listing.into_bytes(),
        mime_type: mime::TEXT_PLAIN,
    })
}

fn io_failure(path: &Path, source: io::Error) -> ServeError {
    ServeError::IoFailure {
        path: path.to_path_buf(),
        source,
    }
}
