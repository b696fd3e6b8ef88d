//! Archive transfer of a saved export.
//!
//! The export is staged in a private temporary directory under the staging
//! dir, handed to an [`ArchiveTransfer`], and the directory is removed
//! afterwards whatever happened. Staging never touches files outside that
//! directory, so a staging dir shared with the export dir is safe. Nothing
//! here can fail the request: problems become log events or report warnings.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, error, info, warn};

use mgm_model::Report;

use crate::error::TransferError;

/// Warning pushed when no destination or credential is configured.
pub const MISSING_TRANSFER_CONFIG: &str = "Set META_KEY_PATH and/or META_REMOTE_PATH.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferSettings {
    /// `scp` destination, e.g. `archive@host:/srv/metadata/`.
    pub remote_path: Option<String>,
    /// Identity file passed to `scp -i`.
    pub key_path: Option<PathBuf>,
}

impl TransferSettings {
    pub fn is_configured(&self) -> bool {
        self.remote_path.as_deref().is_some_and(|r| !r.trim().is_empty())
            && self.key_path.is_some()
    }
}

/// Moves a staged export to long-term storage.
pub trait ArchiveTransfer {
    fn transfer(&self, local_path: &Path, target_name: &str) -> Result<(), TransferError>;
}

/// Copies with `scp -i <key> <local> <remote>`.
#[derive(Debug, Clone)]
pub struct ScpTransfer {
    remote: String,
    key_path: PathBuf,
}

impl ScpTransfer {
    pub fn new(remote: impl Into<String>, key_path: impl Into<PathBuf>) -> Self {
        Self {
            remote: remote.into(),
            key_path: key_path.into(),
        }
    }

    pub fn from_settings(settings: &TransferSettings) -> Option<Self> {
        if !settings.is_configured() {
            return None;
        }
        let remote = settings.remote_path.clone()?;
        let key_path = settings.key_path.clone()?;
        Some(Self::new(remote, key_path))
    }
}

impl ArchiveTransfer for ScpTransfer {
    fn transfer(&self, local_path: &Path, target_name: &str) -> Result<(), TransferError> {
        debug!(target = target_name, remote = %self.remote, "running scp");
        let output = Command::new("scp")
            .arg("-i")
            .arg(&self.key_path)
            .arg(local_path)
            .arg(&self.remote)
            .output()
            .map_err(|source| TransferError::Spawn {
                program: "scp".to_string(),
                source,
            })?;
        if output.status.success() {
            Ok(())
        } else {
            Err(TransferError::Failed {
                program: "scp".to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveStatus {
    /// Not configured; a warning was added to the report.
    Skipped,
    /// Staging the file failed; nothing was sent.
    StagingFailed,
    Failed,
    Transferred,
}

pub fn archive_export(
    csv_text: &str,
    file_name: &str,
    staging_dir: &Path,
    settings: &TransferSettings,
    transfer: &dyn ArchiveTransfer,
    report: &mut Report,
) -> ArchiveStatus {
    if !settings.is_configured() {
        warn!("archive transfer not configured");
        report.push_warning(MISSING_TRANSFER_CONFIG);
        return ArchiveStatus::Skipped;
    }

    if let Err(e) = fs::create_dir_all(staging_dir) {
        error!(dir = %staging_dir.display(), error = %e, "cannot create staging directory");
        return ArchiveStatus::StagingFailed;
    }
    // removed with everything in it when dropped, including a partial write
    let staged = match tempfile::Builder::new()
        .prefix(".staging-")
        .tempdir_in(staging_dir)
    {
        Ok(dir) => dir,
        Err(e) => {
            error!(dir = %staging_dir.display(), error = %e, "cannot create staging area");
            return ArchiveStatus::StagingFailed;
        }
    };
    let path = staged.path().join(file_name);
    if let Err(e) = fs::write(&path, csv_text) {
        error!(path = %path.display(), error = %e, "cannot stage export");
        return ArchiveStatus::StagingFailed;
    }

    let status = match transfer.transfer(&path, file_name) {
        Ok(()) => {
            info!(file = file_name, "export archived");
            ArchiveStatus::Transferred
        }
        Err(e) => {
            error!(file = file_name, error = %e, "archive transfer failed");
            ArchiveStatus::Failed
        }
    };
    if let Err(e) = staged.close() {
        warn!(error = %e, "failed to remove staged export");
    }
    status
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Records what it saw while the staged file still existed.
    #[derive(Default)]
    struct Recorder {
        seen: RefCell<Vec<(String, String)>>,
        fail: bool,
    }

    impl ArchiveTransfer for Recorder {
        fn transfer(&self, local_path: &Path, target_name: &str) -> Result<(), TransferError> {
            let contents = fs::read_to_string(local_path).unwrap();
            self.seen
                .borrow_mut()
                .push((target_name.to_string(), contents));
            if self.fail {
                Err(TransferError::Failed {
                    program: "fake".into(),
                    status: "exit status: 1".into(),
                    stderr: "denied".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn configured() -> TransferSettings {
        TransferSettings {
            remote_path: Some("archive@host:/srv/".into()),
            key_path: Some(PathBuf::from("/keys/id")),
        }
    }

    #[test]
    fn unconfigured_transfer_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = Recorder::default();
        let mut report = Report::new();
        let status = archive_export(
            "a\n",
            "x.csv",
            dir.path(),
            &TransferSettings {
                remote_path: Some("host:/srv".into()),
                key_path: None,
            },
            &recorder,
            &mut report,
        );
        assert_eq!(status, ArchiveStatus::Skipped);
        assert_eq!(report.warnings, vec![MISSING_TRANSFER_CONFIG]);
        assert!(!report.has_fatal());
        assert!(recorder.seen.borrow().is_empty());
    }

    #[test]
    fn staged_file_is_removed_after_transfer() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = Recorder::default();
        let mut report = Report::new();
        let status = archive_export("a\n1\n", "x.csv", dir.path(), &configured(), &recorder, &mut report);
        assert_eq!(status, ArchiveStatus::Transferred);
        assert_eq!(recorder.seen.borrow()[0], ("x.csv".to_string(), "a\n1\n".to_string()));
        assert!(!dir.path().join("x.csv").exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn staging_leaves_same_named_files_alone() {
        let dir = tempfile::tempdir().unwrap();
        let export = dir.path().join("x.csv");
        fs::write(&export, "sampleID\nS1\n").unwrap();
        let recorder = Recorder::default();
        let mut report = Report::new();
        let status = archive_export("sampleID\nS1\n", "x.csv", dir.path(), &configured(), &recorder, &mut report);
        assert_eq!(status, ArchiveStatus::Transferred);
        assert_eq!(fs::read_to_string(&export).unwrap(), "sampleID\nS1\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn staged_file_is_removed_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = Recorder {
            fail: true,
            ..Recorder::default()
        };
        let mut report = Report::new();
        let status = archive_export("a\n", "x.csv", dir.path(), &configured(), &recorder, &mut report);
        assert_eq!(status, ArchiveStatus::Failed);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
        assert!(!report.has_fatal());
    }

    #[test]
    fn staging_errors_skip_the_transfer() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_dir = dir.path().join("occupied");
        fs::write(&not_a_dir, "").unwrap();
        let recorder = Recorder::default();
        let mut report = Report::new();
        let status = archive_export("a\n", "x.csv", &not_a_dir, &configured(), &recorder, &mut report);
        assert_eq!(status, ArchiveStatus::StagingFailed);
        assert!(recorder.seen.borrow().is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn scp_needs_both_settings() {
        assert!(ScpTransfer::from_settings(&configured()).is_some());
        assert!(ScpTransfer::from_settings(&TransferSettings::default()).is_none());
    }
}
