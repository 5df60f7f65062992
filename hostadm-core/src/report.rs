use crate::metrics::{AlertResult, ThresholdConfig};
use chrono::{DateTime, Local};
use colored::Colorize;
use std::fmt::Write;

/// One health snapshot: classification results in collection order plus the
/// capture time and the thresholds they were judged against.
pub struct HealthReport {
    pub results: Vec<AlertResult>,
    pub taken_at: DateTime<Local>,
    pub thresholds: ThresholdConfig,
}

impl HealthReport {
    pub fn new(results: Vec<AlertResult>, thresholds: ThresholdConfig) -> Self {
        Self {
            results,
            taken_at: Local::now(),
            thresholds,
        }
    }

    pub fn alerts(&self) -> impl Iterator<Item = &AlertResult> {
        self.results.iter().filter(|r| r.exceeded)
    }

    pub fn has_alerts(&self) -> bool {
        self.results.iter().any(|r| r.exceeded)
    }

    /// Render the usage section (every metric, OK and ALERT alike) followed
    /// by the alert section (exceeded metrics only).
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "health report taken {}",
            self.taken_at.format("%Y-%m-%d %H:%M:%S")
        );
        let _ = writeln!(out, "resource usage:");
        if self.results.is_empty() {
            let _ = writeln!(out, "  (no metrics could be collected)");
        }
        for result in &self.results {
            let status = if result.exceeded {
                "ALERT".red().bold().to_string()
            } else {
                "ok".green().to_string()
            };
            let _ = writeln!(
                out,
                "  {:<14} {:>5.1}%  {}",
                result.metric.kind.label(),
                result.metric.value,
                status
            );
        }
        let _ = writeln!(out, "alerts:");
        if !self.has_alerts() {
            let _ = writeln!(out, "  none, all metrics below their limits");
        }
        for result in self.alerts() {
            let limit = self.thresholds.limit_for(&result.metric.kind);
            let _ = writeln!(
                out,
                "  {} usage {:.1}% >= limit {}%",
                result.metric.kind.label(),
                result.metric.value,
                limit
            );
        }
        out
    }
}
