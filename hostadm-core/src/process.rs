use crate::error::MaintError;
use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use serde::{Deserialize, Serialize};
use std::fs;
use sysinfo::{ProcessRefreshKind, RefreshKind, System};

/// One row of the process monitor listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
    pub user: String,
    pub cpu_usage: f32,
    pub memory_bytes: u64,
}

pub struct ProcessManager {
    system: System,
}

impl ProcessManager {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }

    /// Rebuild the process table from scratch; sysinfo can otherwise keep
    /// terminated PIDs around between refreshes.
    pub fn refresh(&mut self) {
        self.system = System::new_with_specifics(
            RefreshKind::new().with_processes(ProcessRefreshKind::everything()),
        );
    }

    /// Snapshot of the process table sorted by CPU usage, highest first.
    pub fn top_by_cpu(&self, limit: usize) -> Vec<ProcessEntry> {
        let mut entries: Vec<ProcessEntry> = self
            .system
            .processes()
            .iter()
            .map(|(pid, process)| ProcessEntry {
                pid: pid.as_u32(),
                name: process.name().to_string_lossy().to_string(),
                user: process_user(pid.as_u32()),
                cpu_usage: process.cpu_usage(),
                memory_bytes: process.memory(),
            })
            .collect();
        entries.sort_by(|a, b| {
            b.cpu_usage
                .partial_cmp(&a.cpu_usage)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        entries.truncate(limit);
        entries
    }

    /// Deliver SIGTERM (or SIGKILL when `force`) to a process. A PID that is
    /// already gone is reported as such, not treated as fatal.
    pub fn terminate(&self, pid: u32, force: bool) -> Result<(), MaintError> {
        // pid 0 would signal our own process group
        let target = match i32::try_from(pid) {
            Ok(value) if value > 0 => value,
            _ => return Err(MaintError::NoSuchProcess(pid)),
        };
        let signal = if force {
            Signal::SIGKILL
        } else {
            Signal::SIGTERM
        };
        match kill(Pid::from_raw(target), signal) {
            Ok(()) => Ok(()),
            Err(Errno::ESRCH) => Err(MaintError::NoSuchProcess(pid)),
            Err(Errno::EPERM) => Err(MaintError::PermissionDenied),
            Err(err) => Err(MaintError::Io(std::io::Error::from_raw_os_error(err as i32))),
        }
    }
}

impl Default for ProcessManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve the owning user of a PID through /proc and /etc/passwd.
fn process_user(pid: u32) -> String {
    let status_path = format!("/proc/{}/status", pid);
    if let Ok(content) = fs::read_to_string(&status_path) {
        for line in content.lines() {
            if line.starts_with("Uid:") {
                if let Some(uid) = line
                    .split_whitespace()
                    .nth(1)
                    .and_then(|v| v.parse::<u32>().ok())
                {
                    return uid_to_username(uid);
                }
            }
        }
    }
    "unknown".to_string()
}

fn uid_to_username(uid: u32) -> String {
    if let Ok(content) = fs::read_to_string("/etc/passwd") {
        for line in content.lines() {
            let parts: Vec<&str> = line.split(':').collect();
            if parts.len() >= 3 {
                if let Ok(line_uid) = parts[2].parse::<u32>() {
                    if line_uid == uid {
                        return parts[0].to_string();
                    }
                }
            }
        }
    }
    format!("uid:{}", uid)
}
