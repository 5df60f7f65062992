use crate::error::MaintError;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

const LOG_DIR: &str = "/var/log";

/// One matching line from a scanned log file.
#[derive(Debug, Clone)]
pub struct LogMatch {
    pub file: PathBuf,
    pub line: String,
}

/// Keyword search across a log and its rotated variants.
pub struct LogScanner {
    log_dir: PathBuf,
}

impl LogScanner {
    pub fn new() -> Self {
        Self {
            log_dir: PathBuf::from(LOG_DIR),
        }
    }

    /// Scanner over a custom directory; tests use this.
    pub fn with_dir(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
        }
    }

    /// Case-insensitive search for `keyword` across every file whose name
    /// starts with `base` (`syslog`, `syslog.1`, `syslog.2.gz`, ...).
    /// Compressed rotations go through `zgrep`, the rest through `grep`.
    pub fn scan(&self, base: &str, keyword: &str) -> Result<Vec<LogMatch>, MaintError> {
        let base = base.trim();
        let keyword = keyword.trim();
        if base.is_empty() || keyword.is_empty() {
            return Err(MaintError::InvalidInput(
                "log name and keyword must not be empty".to_string(),
            ));
        }

        let entries = std::fs::read_dir(&self.log_dir).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                MaintError::MissingPath(self.log_dir.clone())
            } else {
                MaintError::Io(err)
            }
        })?;

        let mut files: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .file_name()
                        .map(|name| name.to_string_lossy().starts_with(base))
                        .unwrap_or(false)
            })
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(MaintError::MissingPath(self.log_dir.join(base)));
        }

        let mut matches = Vec::new();
        for file in files {
            let grep = if file.extension().map_or(false, |ext| ext == "gz") {
                "zgrep"
            } else {
                "grep"
            };
            let output = Command::new(grep)
                .arg("-i")
                .arg("--")
                .arg(keyword)
                .arg(&file)
                .output()?;
            // exit status 1 just means no lines matched
            if output.status.success() {
                for line in String::from_utf8_lossy(&output.stdout).lines() {
                    matches.push(LogMatch {
                        file: file.clone(),
                        line: line.to_string(),
                    });
                }
            } else if output.status.code() != Some(1) {
                debug!(file = %file.display(), status = %output.status, "file skipped");
            }
        }
        Ok(matches)
    }
}

impl Default for LogScanner {
    fn default() -> Self {
        Self::new()
    }
}
