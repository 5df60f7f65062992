//! Threshold classification, kept pure so it tests without the collector.

use crate::metrics::{AlertResult, Metric, ThresholdConfig};

/// Classify one metric: at or above its limit is an alert (`>=`, not `>`).
pub fn evaluate(metric: Metric, config: &ThresholdConfig) -> AlertResult {
    let exceeded = metric.value >= f32::from(config.limit_for(&metric.kind));
    AlertResult { metric, exceeded }
}

/// Classify a collected metric list, preserving its order.
pub fn evaluate_all(metrics: Vec<Metric>, config: &ThresholdConfig) -> Vec<AlertResult> {
    metrics.into_iter().map(|m| evaluate(m, config)).collect()
}
