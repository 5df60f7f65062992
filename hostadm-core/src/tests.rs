#[cfg(test)]
mod tests {
    use crate::backup::BackupManager;
    use crate::collector::{MetricCollector, MetricProvider};
    use crate::error::MaintError;
    use crate::evaluator::{evaluate, evaluate_all};
    use crate::logscan::LogScanner;
    use crate::metrics::{Metric, MetricKind, ThresholdConfig};
    use crate::process::ProcessManager;
    use crate::report::HealthReport;
    use std::fs;

    fn metric(kind: MetricKind, value: f32) -> Metric {
        Metric::new(kind, value).unwrap()
    }

    fn disk(mount: &str, value: f32) -> Metric {
        metric(
            MetricKind::Disk {
                mount: mount.to_string(),
            },
            value,
        )
    }

    #[test]
    fn value_at_threshold_is_an_alert() {
        let config = ThresholdConfig::default();
        assert!(evaluate(metric(MetricKind::Cpu, 80.0), &config).exceeded);
        assert!(!evaluate(metric(MetricKind::Cpu, 79.9), &config).exceeded);
        assert!(evaluate(metric(MetricKind::Cpu, 80.1), &config).exceeded);
    }

    #[test]
    fn memory_at_eighty_percent_alerts() {
        // used 4000 of 5000 bytes -> 80%
        let pct = crate::parsers::percent_round_half_up(4000, 5000).unwrap();
        assert_eq!(pct, 80);
        let result = evaluate(
            metric(MetricKind::Memory, pct as f32),
            &ThresholdConfig::default(),
        );
        assert!(result.exceeded);
    }

    #[test]
    fn cpu_from_idle_below_threshold_is_ok() {
        // idle 25.0 -> usage 75%
        let result = evaluate(
            metric(MetricKind::Cpu, 100.0 - 25.0),
            &ThresholdConfig::default(),
        );
        assert!(!result.exceeded);
    }

    #[test]
    fn disks_evaluate_independently_against_one_limit() {
        let config = ThresholdConfig::default();
        let results = evaluate_all(vec![disk("/", 45.0), disk("/data", 92.0)], &config);
        assert!(!results[0].exceeded);
        assert!(results[1].exceeded);
    }

    #[test]
    fn classification_is_deterministic_for_pinned_values() {
        let config = ThresholdConfig::default();
        let metrics = vec![
            metric(MetricKind::Cpu, 75.0),
            metric(MetricKind::Memory, 80.0),
            disk("/", 45.0),
        ];
        let first = evaluate_all(metrics.clone(), &config);
        let second = evaluate_all(metrics, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn out_of_range_samples_are_rejected() {
        assert!(Metric::new(MetricKind::Cpu, 130.0).is_none());
        assert!(Metric::new(MetricKind::Cpu, -5.0).is_none());
        assert!(Metric::new(MetricKind::Cpu, 0.0).is_some());
        assert!(Metric::new(MetricKind::Cpu, 100.0).is_some());
    }

    #[test]
    fn threshold_input_abc_keeps_previous_value() {
        let (value, accepted) = ThresholdConfig::parse_limit("abc", 80);
        assert_eq!(value, 80);
        assert!(!accepted);

        let (value, accepted) = ThresholdConfig::parse_limit("-5", 80);
        assert_eq!(value, 80);
        assert!(!accepted);

        let (value, accepted) = ThresholdConfig::parse_limit("150", 80);
        assert_eq!(value, 80);
        assert!(!accepted);

        let (value, accepted) = ThresholdConfig::parse_limit(" 90 ", 80);
        assert_eq!(value, 90);
        assert!(accepted);
    }

    #[test]
    fn report_shows_all_usage_but_only_exceeded_alerts() {
        colored::control::set_override(false);
        let config = ThresholdConfig::default();
        let results = evaluate_all(vec![disk("/", 45.0), disk("/data", 92.0)], &config);
        let report = HealthReport::new(results, config);
        let rendered = report.render();

        let (usage, alerts) = rendered.split_once("alerts:").unwrap();
        assert!(usage.contains("disk /data"));
        assert!(usage.contains("45.0%"));
        assert!(alerts.contains("disk /data usage 92.0% >= limit 80%"));
        assert!(!alerts.contains("45.0"));
    }

    #[test]
    fn empty_report_still_renders() {
        colored::control::set_override(false);
        let report = HealthReport::new(Vec::new(), ThresholdConfig::default());
        let rendered = report.render();
        assert!(rendered.contains("no metrics could be collected"));
        assert!(!report.has_alerts());
    }

    struct Canned(Vec<Metric>);

    impl MetricProvider for Canned {
        fn name(&self) -> &str {
            "canned"
        }
        fn collect(&self) -> Vec<Metric> {
            self.0.clone()
        }
    }

    struct Empty;

    impl MetricProvider for Empty {
        fn name(&self) -> &str {
            "empty"
        }
        fn collect(&self) -> Vec<Metric> {
            Vec::new()
        }
    }

    #[test]
    fn collector_falls_through_to_later_providers() {
        let collector = MetricCollector::with_providers(
            vec![
                Box::new(Empty),
                Box::new(Canned(vec![metric(MetricKind::Cpu, 50.0)])),
            ],
            vec![Box::new(Empty)],
            vec![Box::new(Canned(vec![disk("/", 45.0), disk("/data", 92.0)]))],
        );
        let metrics = collector.collect();

        // the memory chain was exhausted, so that metric is omitted
        assert_eq!(metrics.len(), 3);
        assert_eq!(metrics[0].kind, MetricKind::Cpu);
        assert_eq!(
            metrics[1].kind,
            MetricKind::Disk {
                mount: "/".to_string()
            }
        );
        assert_eq!(
            metrics[2].kind,
            MetricKind::Disk {
                mount: "/data".to_string()
            }
        );
    }

    #[test]
    fn exhausted_chains_produce_an_empty_renderable_report() {
        colored::control::set_override(false);
        let collector =
            MetricCollector::with_providers(vec![Box::new(Empty)], vec![], vec![Box::new(Empty)]);
        let results = evaluate_all(collector.collect(), &ThresholdConfig::default());
        let report = HealthReport::new(results, ThresholdConfig::default());
        assert!(report.render().contains("no metrics"));
    }

    #[test]
    fn terminating_unknown_pid_fails_cleanly() {
        let manager = ProcessManager::new();

        // beyond pid_t entirely
        let err = manager.terminate(3_999_999_999, false).unwrap_err();
        assert!(matches!(err, MaintError::NoSuchProcess(_)));

        // valid pid_t range, far above any real pid_max
        let err = manager.terminate(2_000_000_000, false).unwrap_err();
        assert!(matches!(err, MaintError::NoSuchProcess(_)));

        // pid 0 would signal our own process group
        let err = manager.terminate(0, true).unwrap_err();
        assert!(matches!(err, MaintError::NoSuchProcess(0)));
    }

    #[test]
    fn process_listing_is_sorted_by_cpu() {
        let mut manager = ProcessManager::new();
        manager.refresh();
        let entries = manager.top_by_cpu(10);
        assert!(entries.len() <= 10);
        for pair in entries.windows(2) {
            assert!(pair[0].cpu_usage >= pair[1].cpu_usage);
        }
    }

    #[test]
    fn backup_creates_timestamped_archive() {
        let source_dir = tempfile::tempdir().unwrap();
        fs::write(source_dir.path().join("notes.txt"), "keep me").unwrap();
        let dest_dir = tempfile::tempdir().unwrap();

        let manager = BackupManager::with_dir(dest_dir.path());
        let archive = manager.create(source_dir.path()).unwrap();

        let name = archive.file_name().unwrap().to_string_lossy().into_owned();
        let basename = source_dir
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        assert!(name.starts_with(&format!("backup_{}_", basename)));
        assert!(name.ends_with(".tar.gz"));
        assert!(archive.metadata().unwrap().len() > 0);
    }

    #[test]
    fn backup_of_missing_source_is_reported() {
        let dest_dir = tempfile::tempdir().unwrap();
        let manager = BackupManager::with_dir(dest_dir.path());
        let err = manager
            .create(std::path::Path::new("/no/such/path"))
            .unwrap_err();
        assert!(matches!(err, MaintError::MissingPath(_)));
    }

    #[test]
    fn log_scan_covers_rotated_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("app.log"),
            "boot ok\ndisk FAILURE imminent\n",
        )
        .unwrap();
        fs::write(dir.path().join("app.log.1"), "earlier failure recorded\n").unwrap();
        fs::write(dir.path().join("other.log"), "failure elsewhere\n").unwrap();

        let scanner = LogScanner::with_dir(dir.path());
        let matches = scanner.scan("app.log", "failure").unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches
            .iter()
            .all(|m| m.line.to_lowercase().contains("failure")));
    }

    #[test]
    fn log_scan_with_no_hits_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("app.log"), "all quiet\n").unwrap();

        let scanner = LogScanner::with_dir(dir.path());
        let matches = scanner.scan("app.log", "panic").unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn log_scan_unknown_base_is_missing_resource() {
        let dir = tempfile::tempdir().unwrap();
        let scanner = LogScanner::with_dir(dir.path());
        let err = scanner.scan("nothing", "kernel").unwrap_err();
        assert!(matches!(err, MaintError::MissingPath(_)));
    }

    #[test]
    fn empty_keyword_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let scanner = LogScanner::with_dir(dir.path());
        let err = scanner.scan("app.log", "   ").unwrap_err();
        assert!(matches!(err, MaintError::InvalidInput(_)));
    }
}
