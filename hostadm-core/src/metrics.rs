use serde::{Deserialize, Serialize};
use tracing::warn;

/// Which resource a metric measures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetricKind {
    Cpu,
    Memory,
    Disk { mount: String },
}

impl MetricKind {
    pub fn label(&self) -> String {
        match self {
            MetricKind::Cpu => "cpu".to_string(),
            MetricKind::Memory => "memory".to_string(),
            MetricKind::Disk { mount } => format!("disk {}", mount),
        }
    }
}

/// A single named percentage measurement of system resource usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub kind: MetricKind,
    pub value: f32,
}

impl Metric {
    /// Build a metric, rejecting values outside 0..=100. Readings above 100%
    /// only come from garbled command output, so the sample is dropped
    /// rather than clamped.
    pub fn new(kind: MetricKind, value: f32) -> Option<Self> {
        if !(0.0..=100.0).contains(&value) {
            warn!(label = %kind.label(), value, "dropping out-of-range sample");
            return None;
        }
        Some(Self { kind, value })
    }
}

/// Alert trigger percentages for each metric kind. Session-lived; mutated
/// only through the configure-thresholds menu action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub cpu_limit: u8,
    pub memory_limit: u8,
    pub disk_limit: u8,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            cpu_limit: 80,
            memory_limit: 80,
            disk_limit: 80,
        }
    }
}

impl ThresholdConfig {
    /// All disk metrics share the single disk limit.
    pub fn limit_for(&self, kind: &MetricKind) -> u8 {
        match kind {
            MetricKind::Cpu => self.cpu_limit,
            MetricKind::Memory => self.memory_limit,
            MetricKind::Disk { .. } => self.disk_limit,
        }
    }

    /// Parse one configure-thresholds input. A valid integer in 0..=100
    /// replaces `current`; anything else retains it. The bool reports
    /// whether the input was accepted.
    pub fn parse_limit(input: &str, current: u8) -> (u8, bool) {
        match input.trim().parse::<u8>() {
            Ok(value) if value <= 100 => (value, true),
            _ => (current, false),
        }
    }
}

/// Outcome of comparing one metric against its threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertResult {
    pub metric: Metric,
    pub exceeded: bool,
}
