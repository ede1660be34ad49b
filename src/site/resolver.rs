//! Maps request paths onto the document root.
//!
//! Containment is decided on canonical paths only. The joined path goes
//! through `canonicalize`, which resolves `.`, `..` and symlinks, and the
//! result must still start with the canonical root. Raw request strings are
//! never compared.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use percent_encoding::percent_decode_str;
use tokio::fs;

use crate::error::{Result, ServeError};

/// The directory all content is served from, held in canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRoot {
    path: PathBuf,
}

impl DocumentRoot {
    /// Canonicalizes `path` and checks that it is a directory.
    pub fn new(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let canonical = std::fs::canonicalize(path)
            .with_context(|| format!("document root {} is not accessible", path.display()))?;

        if !canonical.is_dir() {
            anyhow::bail!("document root {} is not a directory", canonical.display());
        }

        Ok(Self { path: canonical })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when `candidate` is the root itself or lies beneath it.
    ///
    /// `Path::starts_with` compares whole components, so `/srv/www-old` is
    /// not inside `/srv/www`.
    pub fn contains(&self, candidate: &Path) -> bool {
        candidate.starts_with(&self.path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    File,
    Directory,
}

/// A location that passed the containment check.
///
/// Only [`resolve`] builds these, so holding one means the path is inside
/// the document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    absolute_path: PathBuf,
    kind: TargetKind,
}

impl ResolvedTarget {
    pub fn path(&self) -> &Path {
        &self.absolute_path
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }
}

/// Resolves a request path against `root`.
///
/// `url_path` is the raw, still percent-encoded path from the request line.
pub async fn resolve(root: &DocumentRoot, url_path: &str) -> Result<ResolvedTarget> {
    let decoded = percent_decode_str(url_path)
        .decode_utf8()
        .map_err(|_| ServeError::NotFound(url_path.to_string()))?;

    // Every leading slash goes, otherwise join() would swap the root for an absolute path
    let relative = decoded.trim_start_matches('/');
    let joined = root.path().join(relative);

    let canonical = match fs::canonicalize(&joined).await {
        Ok(p) => p,
        Err(e) if is_missing(&e) => {
            return Err(ServeError::NotFound(url_path.to_string()));
        }
        Err(source) => {
            return Err(ServeError::IoFailure {
                path: joined,
                source,
            });
        }
    };

    if !root.contains(&canonical) {
        tracing::warn!(
            requested = %url_path,
            resolved = %canonical.display(),
            "Rejected path outside document root"
        );
        return Err(ServeError::PathTraversal(url_path.to_string()));
    }

    let metadata = fs::metadata(&canonical)
        .await
        .map_err(|source| ServeError::IoFailure {
            path: canonical.clone(),
            source,
        })?;

    let kind = if metadata.is_dir() {
        TargetKind::Directory
    } else if metadata.is_file() {
        TargetKind::File
    } else {
        // sockets, fifos, devices
        return Err(ServeError::NotFound(url_path.to_string()));
    };

    Ok(ResolvedTarget {
        absolute_path: canonical,
        kind,
    })
}

fn is_missing(err: &io::Error) -> bool {
    // "a.txt/b" walks through a regular file
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}
