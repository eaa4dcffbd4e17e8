//! Result archive storage and extraction
//!
//! Archives are written through a temporary sibling file that is renamed
//! into place, so a failed write never leaves a usable-looking file at the
//! destination. Extraction unpacks ZIP entries one by one and refuses
//! entries whose names would escape the target directory. Archive integrity
//! is only checked implicitly, by reading it.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::constants::files;
use crate::errors::{ClientError, ClientResult};

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Write `bytes` to `destination` atomically
///
/// With `overwrite` false an existing destination yields `ArtifactExists`,
/// even if the file appeared after the caller's own existence check.
pub async fn store_archive(
    destination: &Path,
    bytes: Vec<u8>,
    overwrite: bool,
) -> ClientResult<()> {
    let destination = destination.to_path_buf();
    let join_path = destination.clone();
    tokio::task::spawn_blocking(move || write_atomically(&destination, &bytes, overwrite))
        .await
        .map_err(|e| ClientError::storage(join_path, std::io::Error::other(e)))?
}

fn write_atomically(destination: &Path, bytes: &[u8], overwrite: bool) -> ClientResult<()> {
    let dir = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    // Dropping the temp file on any early return removes it
    let mut temp = tempfile::Builder::new()
        .prefix(".")
        .suffix(files::TEMP_FILE_SUFFIX)
        .tempfile_in(dir)
        .map_err(|e| ClientError::storage(dir, e))?;

    temp.write_all(bytes)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| ClientError::storage(temp.path(), e))?;

    let persisted = if overwrite {
        temp.persist(destination)
    } else {
        temp.persist_noclobber(destination)
    };

    persisted.map_err(|e| {
        if e.error.kind() == std::io::ErrorKind::AlreadyExists {
            ClientError::ArtifactExists {
                path: destination.to_path_buf(),
            }
        } else {
            ClientError::storage(destination, e.error)
        }
    })?;

    debug!(path = %destination.display(), bytes = bytes.len(), "archive written");
    Ok(())
}

/// Unpack `archive` into `dest`, off the async runtime
pub async fn extract_archive(archive: &Path, dest: &Path) -> ClientResult<Vec<PathBuf>> {
    let archive = archive.to_path_buf();
    let dest = dest.to_path_buf();
    let join_path = dest.clone();
    tokio::task::spawn_blocking(move || extract_zip(&archive, &dest))
        .await
        .map_err(|e| ClientError::storage(join_path, std::io::Error::other(e)))?
}

/// Unpack a ZIP archive into `dest`, creating it if needed
///
/// Entries are streamed to disk. Read failures and entries whose content
/// does not match their declared size are reported as `ArchiveCorrupt`,
/// filesystem failures as `Storage`.
pub fn extract_zip(archive_path: &Path, dest: &Path) -> ClientResult<Vec<PathBuf>> {
    debug!(archive = %archive_path.display(), dest = %dest.display(), "extracting ZIP archive");

    std::fs::create_dir_all(dest).map_err(|e| ClientError::storage(dest, e))?;

    let file =
        std::fs::File::open(archive_path).map_err(|e| ClientError::storage(archive_path, e))?;
    let corrupt = |reason: String| ClientError::ArchiveCorrupt {
        path: archive_path.to_path_buf(),
        reason,
    };

    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| corrupt(format!("failed to read ZIP archive: {}", e)))?;

    let mut extracted = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| corrupt(format!("failed to read ZIP entry {}: {}", index, e)))?;

        let relative = match entry.enclosed_name() {
            Some(path) => path.to_path_buf(),
            None => {
                warn!(entry = entry.name(), "skipping entry with unsafe path");
                continue;
            }
        };
        let target = dest.join(&relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| ClientError::storage(&target, e))?;
            continue;
        }

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ClientError::storage(parent, e))?;
        }

        let declared = entry.size();
        let written = match copy_entry(&mut entry, &target) {
            Ok(written) => written,
            Err(EntryCopyError::Read(e)) => {
                let _ = std::fs::remove_file(&target);
                return Err(corrupt(format!("failed to read {}: {}", relative.display(), e)));
            }
            Err(EntryCopyError::Write(e)) => return Err(ClientError::storage(&target, e)),
        };

        if written != declared {
            let _ = std::fs::remove_file(&target);
            return Err(corrupt(format!(
                "{} declares {} bytes but holds {}",
                relative.display(),
                declared,
                written
            )));
        }
        extracted.push(target);
    }

    info!(
        archive = %archive_path.display(),
        extracted_count = extracted.len(),
        "ZIP extraction successful"
    );
    Ok(extracted)
}

enum EntryCopyError {
    Read(std::io::Error),
    Write(std::io::Error),
}

/// Stream one entry to `target`, keeping read and write failures apart
fn copy_entry(entry: &mut impl Read, target: &Path) -> Result<u64, EntryCopyError> {
    let mut out = std::fs::File::create(target).map_err(EntryCopyError::Write)?;
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    let mut written = 0u64;

    loop {
        let n = match entry.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(EntryCopyError::Read(e)),
        };
        out.write_all(&buf[..n]).map_err(EntryCopyError::Write)?;
        written += n as u64;
    }

    out.flush().map_err(EntryCopyError::Write)?;
    Ok(written)
}
