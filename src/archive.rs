//! Zip extraction for downloaded archive payloads.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use zip::ZipArchive;

/// Errors that can occur while extracting an archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The archive could not be opened or read.
    #[error("cannot read archive {path}: {detail}")]
    Corrupted {
        /// Path to the archive.
        path: PathBuf,
        /// What the zip reader reported.
        detail: String,
    },

    /// An entry name would escape the extraction directory.
    #[error("archive {path} contains an unsafe entry name: {name}")]
    UnsafeEntry {
        /// Path to the archive.
        path: PathBuf,
        /// The offending entry name.
        name: String,
    },

    /// File system error while writing extracted entries.
    #[error("IO error extracting to {path}: {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Extracts a zip archive into `target_dir`, creating it on demand.
///
/// Entry names are validated with `enclosed_name` so entries cannot write
/// outside the target directory.
///
/// # Returns
///
/// The number of files written (directories excluded).
///
/// # Errors
///
/// Returns [`ArchiveError`] when the archive is unreadable, contains an
/// unsafe entry name, or extraction hits a filesystem error.
pub fn extract_zip(archive_path: &Path, target_dir: &Path) -> Result<usize, ArchiveError> {
    let file = File::open(archive_path).map_err(|e| ArchiveError::Io {
        path: archive_path.to_path_buf(),
        source: e,
    })?;
    let mut archive = ZipArchive::new(file).map_err(|e| ArchiveError::Corrupted {
        path: archive_path.to_path_buf(),
        detail: e.to_string(),
    })?;

    std::fs::create_dir_all(target_dir).map_err(|e| ArchiveError::Io {
        path: target_dir.to_path_buf(),
        source: e,
    })?;

    let mut files_written = 0;
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|e| ArchiveError::Corrupted {
            path: archive_path.to_path_buf(),
            detail: e.to_string(),
        })?;

        let Some(relative) = entry.enclosed_name() else {
            return Err(ArchiveError::UnsafeEntry {
                path: archive_path.to_path_buf(),
                name: entry.name().to_string(),
            });
        };
        let out_path = target_dir.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&out_path).map_err(|e| ArchiveError::Io {
                path: out_path.clone(),
                source: e,
            })?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ArchiveError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut out_file = File::create(&out_path).map_err(|e| ArchiveError::Io {
            path: out_path.clone(),
            source: e,
        })?;
        io::copy(&mut entry, &mut out_file).map_err(|e| ArchiveError::Io {
            path: out_path.clone(),
            source: e,
        })?;
        debug!(entry = %out_path.display(), "extracted");
        files_written += 1;
    }

    info!(
        archive = %archive_path.display(),
        target = %target_dir.display(),
        files = files_written,
        "archive extracted"
    );
    Ok(files_written)
}
