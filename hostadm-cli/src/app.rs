use anyhow::Result;
use hostadm_core::{
    evaluate_all, BackupManager, HealthReport, LogScanner, MaintError, MetricCollector,
    ProcessManager, ThresholdConfig, UserManager,
};
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::ui;

/// Session state: the only mutable threshold configuration plus the
/// OS-facing managers. One synchronous action per menu iteration.
pub struct App {
    thresholds: ThresholdConfig,
    collector: MetricCollector,
    processes: ProcessManager,
    users: UserManager,
    backups: BackupManager,
    logs: LogScanner,
}

impl App {
    pub fn new() -> Self {
        Self {
            thresholds: ThresholdConfig::default(),
            collector: MetricCollector::new(),
            processes: ProcessManager::new(),
            users: UserManager::new(),
            backups: BackupManager::new(),
            logs: LogScanner::new(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        ui::banner();
        if !self.users.effective_root() {
            ui::warn("not running as root; user management and some backups will be refused");
        }
        loop {
            ui::main_menu();
            let choice = match prompt("> ") {
                Ok(choice) => choice,
                Err(_) => break, // stdin closed
            };
            let outcome = match choice.as_str() {
                "1" => self.health_report(),
                "2" => self.user_management(),
                "3" => self.process_monitor(),
                "4" => self.backup(),
                "5" => self.log_scan(),
                "6" => self.configure_thresholds(),
                "0" | "q" => break,
                "" => Ok(()),
                other => {
                    ui::warn(&format!("unknown selection '{}'", other));
                    Ok(())
                }
            };
            if let Err(err) = outcome {
                match err {
                    MaintError::PermissionDenied => {
                        ui::error(&format!("{} (re-run as root)", err))
                    }
                    other => ui::error(&other.to_string()),
                }
            }
        }
        Ok(())
    }

    fn health_report(&self) -> Result<(), MaintError> {
        let metrics = self.collector.collect();
        let results = evaluate_all(metrics, &self.thresholds);
        let report = HealthReport::new(results, self.thresholds);
        print!("{}", report.render());
        Ok(())
    }

    fn user_management(&self) -> Result<(), MaintError> {
        ui::user_menu();
        let choice = prompt("> ")?;
        match choice.as_str() {
            "1" => {
                let name = prompt("username to add: ")?;
                self.users.add_user(&name)?;
                ui::ok(&format!("user '{}' created", name));
            }
            "2" => {
                let name = prompt("username to remove: ")?;
                self.users.remove_user(&name)?;
                ui::ok(&format!("user '{}' removed", name));
            }
            "3" => {
                let name = prompt("username for password change: ")?;
                self.users.set_password(&name)?;
                ui::ok("password updated");
            }
            "0" | "" => {}
            other => ui::warn(&format!("unknown selection '{}'", other)),
        }
        Ok(())
    }

    fn process_monitor(&mut self) -> Result<(), MaintError> {
        self.processes.refresh();
        let entries = self.processes.top_by_cpu(15);
        println!(
            "{:>7}  {:<24} {:<12} {:>6} {:>9}",
            "PID", "NAME", "USER", "CPU%", "MEM(MB)"
        );
        for entry in &entries {
            println!(
                "{:>7}  {:<24} {:<12} {:>6.1} {:>9}",
                entry.pid,
                truncate(&entry.name, 24),
                truncate(&entry.user, 12),
                entry.cpu_usage,
                entry.memory_bytes / (1024 * 1024),
            );
        }
        let input = prompt("PID to terminate (blank to skip): ")?;
        if input.is_empty() {
            return Ok(());
        }
        let pid: u32 = input
            .parse()
            .map_err(|_| MaintError::InvalidInput(format!("'{}' is not a numeric PID", input)))?;
        let force = prompt("send SIGKILL instead of SIGTERM? [y/N]: ")?.eq_ignore_ascii_case("y");
        self.processes.terminate(pid, force)?;
        ui::ok(&format!("signal sent to {}", pid));
        Ok(())
    }

    fn backup(&self) -> Result<(), MaintError> {
        let input = prompt("path to back up: ")?;
        if input.is_empty() {
            return Err(MaintError::InvalidInput(
                "backup path must not be empty".to_string(),
            ));
        }
        let archive = self.backups.create(Path::new(&input))?;
        ui::ok(&format!("archive written to {}", archive.display()));
        Ok(())
    }

    fn log_scan(&self) -> Result<(), MaintError> {
        let base = prompt("log name (e.g. syslog): ")?;
        let keyword = prompt("keyword: ")?;
        let matches = self.logs.scan(&base, &keyword)?;
        if matches.is_empty() {
            println!("no lines matching '{}' in {}*", keyword, base);
            return Ok(());
        }
        for hit in &matches {
            println!("{}: {}", hit.file.display(), hit.line);
        }
        println!("{} matching line(s)", matches.len());
        Ok(())
    }

    fn configure_thresholds(&mut self) -> Result<(), MaintError> {
        println!(
            "current limits: cpu {}%, memory {}%, disk {}%",
            self.thresholds.cpu_limit, self.thresholds.memory_limit, self.thresholds.disk_limit
        );
        self.thresholds.cpu_limit = prompt_limit("cpu", self.thresholds.cpu_limit)?;
        self.thresholds.memory_limit = prompt_limit("memory", self.thresholds.memory_limit)?;
        self.thresholds.disk_limit = prompt_limit("disk", self.thresholds.disk_limit)?;
        Ok(())
    }
}

fn prompt_limit(label: &str, current: u8) -> Result<u8, MaintError> {
    let input = prompt(&format!("{} limit [{}]: ", label, current))?;
    if input.is_empty() {
        return Ok(current);
    }
    let (value, accepted) = ThresholdConfig::parse_limit(&input, current);
    if !accepted {
        ui::warn(&format!(
            "'{}' is not a percentage 0-100; keeping {}",
            input, current
        ));
    }
    Ok(value)
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
    }
    Ok(line.trim().to_string())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
