//! Result retrieval pipeline
//!
//! 1. Re-check the job status; anything but `completed` is `JobNotReady`.
//! 2. Ensure the save directory exists and compute
//!    `{save_dir}/{job_id}_{YYYYmmddHHMMSS}.zip`.
//! 3. Refuse an existing archive unless overwrite was requested, before
//!    any bytes are transferred.
//! 4. Download and store the archive atomically.
//! 5. Optionally unpack it into `{save_dir}/{job_id}`.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{error, info};

use crate::app::archive;
use crate::app::client::http::HttpHandler;
use crate::app::client::jobs::JobsHandler;
use crate::app::models::{DownloadOptions, DownloadOutcome};
use crate::constants::{endpoints, files};
use crate::errors::{ClientError, ClientResult};

/// Result retrieval handler
pub struct DownloadHandler<'a> {
    http_handler: &'a HttpHandler,
}

impl<'a> DownloadHandler<'a> {
    /// Creates a new DownloadHandler with the given HTTP handler
    pub fn new(http_handler: &'a HttpHandler) -> Self {
        Self { http_handler }
    }

    /// Run the retrieval pipeline, stamping the archive name with `timestamp`
    pub async fn download_result(
        &self,
        job_id: &str,
        options: &DownloadOptions,
        timestamp: NaiveDateTime,
    ) -> ClientResult<DownloadOutcome> {
        let state = JobsHandler::new(self.http_handler).status(job_id).await?;
        if !state.status.is_completed() {
            let err = ClientError::JobNotReady {
                job_id: job_id.to_string(),
                status: state.status.to_string(),
            };
            error!("{}", err);
            return Err(err);
        }

        tokio::fs::create_dir_all(&options.save_dir)
            .await
            .map_err(|e| ClientError::storage(&options.save_dir, e))?;

        let archive_path = archive_path(&options.save_dir, job_id, timestamp);
        if !options.overwrite {
            let exists = tokio::fs::try_exists(&archive_path)
                .await
                .map_err(|e| ClientError::storage(&archive_path, e))?;
            if exists {
                let err = ClientError::ArtifactExists { path: archive_path };
                error!("{}", err);
                return Err(err);
            }
        }

        info!(job_id, path = %archive_path.display(), "downloading job result");
        let url = self
            .http_handler
            .endpoint(&[endpoints::DOWNLOAD, job_id])?;
        let bytes = self.http_handler.get_bytes(&url).await?;
        archive::store_archive(&archive_path, bytes, options.overwrite).await?;
        info!(job_id, path = %archive_path.display(), "result downloaded");

        let extract_dir = if options.extract {
            let dir = options.save_dir.join(fs_safe_name(job_id));
            archive::extract_archive(&archive_path, &dir).await?;
            info!(job_id, dir = %dir.display(), "result extracted");
            Some(dir)
        } else {
            None
        };

        Ok(DownloadOutcome {
            archive_path,
            extract_dir,
        })
    }
}

/// `{save_dir}/{job_id}_{timestamp}.zip`, timestamp at second resolution
pub fn archive_path(save_dir: &Path, job_id: &str, timestamp: NaiveDateTime) -> PathBuf {
    save_dir.join(format!(
        "{}_{}.{}",
        fs_safe_name(job_id),
        timestamp.format(files::ARCHIVE_TIMESTAMP_FORMAT),
        files::ARCHIVE_EXTENSION
    ))
}

/// Job id reduced to characters safe in a single path component
///
/// Service-issued ids pass through unchanged; separators and other
/// unexpected characters become `_` so an id can never point outside the
/// save directory.
pub fn fs_safe_name(job_id: &str) -> String {
    let cleaned: String = job_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        cleaned.replace('.', "_") + "_"
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_archive_path_format() {
        let path = archive_path(Path::new("out"), "abc123", at(12, 30, 5));
        assert_eq!(path, Path::new("out").join("abc123_20240101123005.zip"));
    }

    #[test]
    fn test_archive_paths_differ_across_seconds() {
        let first = archive_path(Path::new("out"), "abc123", at(12, 0, 0));
        let second = archive_path(Path::new("out"), "abc123", at(12, 0, 1));
        assert_ne!(first, second);
    }

    #[test]
    fn test_fs_safe_name() {
        assert_eq!(fs_safe_name("abc123"), "abc123");
        assert_eq!(
            fs_safe_name("3f2c9a1e-77b0-4c1d-9c57-1d2e3f4a5b6c"),
            "3f2c9a1e-77b0-4c1d-9c57-1d2e3f4a5b6c"
        );
        assert_eq!(fs_safe_name("../etc/passwd"), ".._etc_passwd");
        assert_eq!(fs_safe_name(".."), "___");
        assert_eq!(fs_safe_name(""), "_");
    }
}
