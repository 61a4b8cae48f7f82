//! Filesystem storage for uploaded route images.
//!
//! Files live flat under one upload directory and are addressed publicly through a URL prefix
//! (`/static/uploads/<file>`). Only URLs under that prefix are ever deleted.

use axum::body::Bytes;
use chrono::Utc;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error as ThisError;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

/// Attempts at a unique name before giving up on a save.
const MAX_NAME_ATTEMPTS: u32 = 100;

#[derive(Debug, ThisError)]
pub enum AssetError {
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to remove {}: {source}", .path.display())]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no free file name for {0}")]
    NameExhausted(String),
}

/// A file received in a form submission.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Outcome of [`AssetStore::delete_if_owned`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    /// The file was already gone.
    Missing,
    /// The URL is outside the managed prefix; nothing was touched.
    NotOwned,
}

#[derive(Debug, Clone)]
pub struct AssetStore {
    upload_dir: PathBuf,
    url_prefix: String,
}

impl AssetStore {
    pub fn new(upload_dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        let mut url_prefix = url_prefix.into();
        if !url_prefix.ends_with('/') {
            url_prefix.push('/');
        }
        Self {
            upload_dir: upload_dir.into(),
            url_prefix,
        }
    }

    /// Store an upload and return its public URL, or `None` when no file was chosen.
    pub async fn save(&self, upload: &ImageUpload) -> Result<Option<String>, AssetError> {
        if upload.file_name.trim().is_empty() {
            return Ok(None);
        }

        let safe = secure_filename(&upload.file_name);
        let timestamp = Utc::now().format("%Y%m%d%H%M%S").to_string();
        let (stem, ext) = split_extension(&safe);

        fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|source| AssetError::Write {
                path: self.upload_dir.clone(),
                source,
            })?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let file_name = match attempt {
                0 => format!("{stem}_{timestamp}{ext}"),
                n => format!("{stem}_{timestamp}_{n}{ext}"),
            };
            let path = self.upload_dir.join(&file_name);

            let opened = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;
            let mut file = match opened {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(source) => return Err(AssetError::Write { path, source }),
            };

            let written = async {
                file.write_all(&upload.bytes).await?;
                file.flush().await
            }
            .await;
            if let Err(source) = written {
                // leave no truncated file behind
                let _ = fs::remove_file(&path).await;
                return Err(AssetError::Write { path, source });
            }

            debug!(path = %path.display(), bytes = upload.bytes.len(), "stored upload");
            return Ok(Some(format!("{}{}", self.url_prefix, file_name)));
        }

        Err(AssetError::NameExhausted(safe))
    }

    /// Delete the file behind `url` if it lives in the upload directory.
    pub async fn delete_if_owned(&self, url: &str) -> Result<Removal, AssetError> {
        let Some(path) = self.owned_path(url) else {
            return Ok(Removal::NotOwned);
        };
        match fs::remove_file(&path).await {
            Ok(()) => Ok(Removal::Removed),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Removal::Missing),
            Err(source) => Err(AssetError::Remove { path, source }),
        }
    }

    /// Map a public URL to a path inside the upload dir; anything but one plain file name is refused.
    pub fn owned_path(&self, url: &str) -> Option<PathBuf> {
        let name = url.strip_prefix(&self.url_prefix)?;
        let is_plain = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\'])
            && !name.contains('\0');
        is_plain.then(|| self.upload_dir.join(name))
    }
}

/// Reduce a client-supplied file name to `[A-Za-z0-9._-]`, with no path parts or leading dots.
/// Accented letters keep their base letter (NFKD).
pub fn secure_filename(raw: &str) -> String {
    let spaced: String = raw
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Split `name` into stem and extension (with its dot); a leading dot is not an extension.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}
