//! ImageStore — writes uploaded images beneath the upload directory and
//! hands back the public `/uploads/...` path they are served from.
//!
//! Stored names are `{unix_nanos}_{sanitized_stem}{.ext}`. The timestamp
//! prefix is what makes names unique; two uploads sharing a sanitized stem
//! in the same nanosecond are separated by bumping the timestamp.

use bytes::Bytes;
use chrono::Utc;
use std::{
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};
use tokio::{
    fs::{self, OpenOptions},
    io::AsyncWriteExt,
};
use tracing::debug;

use crate::errors::CatalogResult;

/// Public mount point for stored uploads.
pub const UPLOADS_PREFIX: &str = "/uploads";

/// Stem used when the original name has nothing left after sanitizing.
const FALLBACK_STEM: &str = "upload";

#[derive(Clone, Debug)]
pub struct ImageStore {
    /// Directory on disk holding the uploaded files.
    pub root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Persist `data` and return its public path (e.g. `/uploads/1712_roof.jpg`).
    ///
    /// The directory is created on first use. The file is flushed and synced
    /// before the path is returned; a failed write removes the partial file.
    pub async fn save(&self, data: Bytes, original_name: &str) -> CatalogResult<String> {
        fs::create_dir_all(&self.root).await?;

        let (stem, ext) = split_original_name(original_name);
        let mut stamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();

        let (file_name, path, mut file) = loop {
            let file_name = format!("{stamp}_{stem}{ext}");
            let path = self.root.join(&file_name);
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => break (file_name, path, file),
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                    debug!("upload name {} taken, bumping timestamp", file_name);
                    stamp += 1;
                }
                Err(err) => return Err(err.into()),
            }
        };

        if let Err(err) = write_all_synced(&mut file, &data).await {
            let _ = fs::remove_file(&path).await;
            return Err(err.into());
        }

        debug!(
            "stored upload {} ({} bytes) at {}",
            original_name,
            data.len(),
            path.display()
        );
        Ok(format!("{UPLOADS_PREFIX}/{file_name}"))
    }

    /// Remove a file written by [`save`](Self::save) during a create that
    /// later failed. Only paths under [`UPLOADS_PREFIX`] are touched.
    pub(crate) async fn discard(&self, public_path: &str) {
        let Some(path) = self.local_path(public_path) else {
            return;
        };
        match fs::remove_file(&path).await {
            Ok(_) => debug!("discarded upload {}", path.display()),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => debug!("failed to discard upload {}: {}", path.display(), err),
        }
    }

    /// Resolve a public path to its location on disk.
    pub fn local_path(&self, public_path: &str) -> Option<PathBuf> {
        let file_name = public_path.strip_prefix(UPLOADS_PREFIX)?.strip_prefix('/')?;
        if file_name.is_empty() || file_name.contains('/') || file_name.contains("..") {
            return None;
        }
        Some(self.root.join(file_name))
    }
}

async fn write_all_synced(file: &mut fs::File, data: &[u8]) -> io::Result<()> {
    file.write_all(data).await?;
    file.flush().await?;
    file.sync_all().await
}

/// Split an uploaded file name into a sanitized stem and its original
/// extension (dot included, case preserved).
///
/// Any directory components sent by the client are dropped. Characters
/// outside `[A-Za-z0-9]` become `_` and the stem is lowercased.
fn split_original_name(original_name: &str) -> (String, String) {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);
    let base_path = Path::new(base);

    let ext = base_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    let stem = base_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    let sanitized: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() {
        (FALLBACK_STEM.to_string(), ext)
    } else {
        (sanitized, ext)
    }
}
