use crate::error::MaintError;
use chrono::Local;
use nix::unistd::{access, AccessFlags};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

const BACKUP_DIR: &str = "/var/backups";

/// Creates timestamped tar.gz archives in a fixed backup directory.
pub struct BackupManager {
    backup_dir: PathBuf,
}

impl BackupManager {
    pub fn new() -> Self {
        Self {
            backup_dir: PathBuf::from(BACKUP_DIR),
        }
    }

    /// Manager writing into a custom directory; tests use this.
    pub fn with_dir(backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            backup_dir: backup_dir.into(),
        }
    }

    /// Archive a file or directory as
    /// `backup_<basename>_<YYYY-MM-DD_HH-MM-SS>.tar.gz` and return the
    /// archive path.
    pub fn create(&self, source: &Path) -> Result<PathBuf, MaintError> {
        if !source.exists() {
            return Err(MaintError::MissingPath(source.to_path_buf()));
        }
        let basename = source
            .file_name()
            .ok_or_else(|| {
                MaintError::InvalidInput("source path has no final component".to_string())
            })?
            .to_string_lossy()
            .into_owned();

        std::fs::create_dir_all(&self.backup_dir).map_err(permission_or_io)?;
        if access(&self.backup_dir, AccessFlags::W_OK).is_err() {
            return Err(MaintError::PermissionDenied);
        }

        let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let archive = self
            .backup_dir
            .join(format!("backup_{}_{}.tar.gz", basename, stamp));

        // -C into the parent keeps archive members relative to the source
        let parent = source
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let output = Command::new("tar")
            .arg("-czf")
            .arg(&archive)
            .arg("-C")
            .arg(parent)
            .arg(&basename)
            .output()?;
        if !output.status.success() {
            return Err(MaintError::CommandFailed {
                command: "tar".to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        info!(archive = %archive.display(), "backup created");
        Ok(archive)
    }
}

impl Default for BackupManager {
    fn default() -> Self {
        Self::new()
    }
}

fn permission_or_io(err: std::io::Error) -> MaintError {
    if err.kind() == std::io::ErrorKind::PermissionDenied {
        MaintError::PermissionDenied
    } else {
        MaintError::Io(err)
    }
}
