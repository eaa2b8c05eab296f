//! Image storage for recipe pictures.
//!
//! Uploads are written below the public directory in a tree partitioned by the
//! local date of the upload, `uploads/YYYY/M/D/<unix-millis>-<file name>`, so the
//! returned path can be served as a static file and stored on the recipe as is.
//! Month and day are not zero-padded.

use crate::errors::{Error, Result};
use chrono::{DateTime, Datelike, Local, NaiveDate};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, error, info};

/// Directory below the public root that holds every upload.
pub const UPLOADS_DIR: &str = "uploads";

const FALLBACK_FILE_NAME: &str = "upload";

/// Result of removing an uploaded file. Deletion never fails the request; the
/// outcome is reported back to the client as a soft status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The file was removed
    Deleted,
    /// There was no file at that path
    NotFound,
    /// Removal failed for another reason
    Failed(String),
}

impl DeleteOutcome {
    /// Status string sent to the client: `"ok"`, `"error"` or the failure text.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Deleted => "ok",
            Self::NotFound => "error",
            Self::Failed(message) => message,
        }
    }
}

/// Upload directory for `date`, relative to the public root (`uploads/2024/3/5`).
#[must_use]
pub fn upload_dir_for(date: NaiveDate) -> String {
    format!(
        "{UPLOADS_DIR}/{}/{}/{}",
        date.year(),
        date.month(),
        date.day()
    )
}

/// Creates the upload directory for `date` below `public_dir` if needed and returns
/// its relative path. Safe to call repeatedly and from concurrent requests.
pub async fn resolve_upload_directory(public_dir: &Path, date: NaiveDate) -> Result<String> {
    let relative = upload_dir_for(date);
    tokio::fs::create_dir_all(public_dir.join(&relative)).await?;
    Ok(relative)
}

/// Name a file is stored under: upload time in milliseconds, a dash, and the last
/// component of the client-supplied name.
#[must_use]
pub fn stored_file_name(original_name: &str, now: DateTime<Local>) -> String {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .replace('\0', "");
    let base = match base.trim() {
        "" | "." | ".." => FALLBACK_FILE_NAME,
        name => name,
    };
    format!("{}-{base}", now.timestamp_millis())
}

/// Writes an uploaded file and returns its path relative to `public_dir`.
pub async fn store(
    public_dir: &Path,
    original_name: &str,
    bytes: &[u8],
    now: DateTime<Local>,
) -> Result<String> {
    let directory = resolve_upload_directory(public_dir, now.date_naive()).await?;
    let relative = format!("{directory}/{}", stored_file_name(original_name, now));

    tokio::fs::write(public_dir.join(&relative), bytes)
        .await
        .inspect_err(|e| error!("Failed to write upload {}: {}", relative, e))?;

    info!("Stored upload {} ({} bytes)", relative, bytes.len());
    Ok(relative)
}

/// Maps a client-supplied relative path onto the public directory.
///
/// A leading `/` is ignored; absolute paths and `..` components are refused.
pub fn resolve_public_path(public_dir: &Path, relative: &str) -> Result<PathBuf> {
    let trimmed = relative.trim_start_matches('/');
    let path = Path::new(trimmed);
    let contained = !trimmed.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));

    if contained {
        Ok(public_dir.join(path))
    } else {
        Err(Error::InvalidPath {
            path: relative.to_string(),
        })
    }
}

/// Removes an uploaded file. A missing file is reported as [`DeleteOutcome::NotFound`].
pub async fn delete(public_dir: &Path, relative: &str) -> DeleteOutcome {
    let path = match resolve_public_path(public_dir, relative) {
        Ok(path) => path,
        Err(e) => return DeleteOutcome::Failed(e.to_string()),
    };

    match tokio::fs::remove_file(&path).await {
        Ok(()) => {
            info!("Removed {}", relative);
            DeleteOutcome::Deleted
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("File {} doesn't exist", relative);
            DeleteOutcome::NotFound
        }
        Err(e) => {
            error!("Error occurred while trying to remove {}: {}", relative, e);
            DeleteOutcome::Failed(e.to_string())
        }
    }
}
