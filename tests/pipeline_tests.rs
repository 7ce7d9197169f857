// End-to-end pipeline tests: real filesystem queries against temp
// directories, a recording notifier in place of the Pushover transport.

use chrono::NaiveDate;
use dfmon::config::Config;
use dfmon::error::Error;
use dfmon::history::HistoryStore;
use dfmon::notify::Notifier;
use dfmon::pipeline::{self, VolumeOutcome};
use std::cell::RefCell;
use std::fs;
use std::path::Path;

struct RecordingNotifier {
    sent: RefCell<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingNotifier {
    fn new() -> Self {
        Self { sent: RefCell::new(Vec::new()), fail: false }
    }

    fn failing() -> Self {
        Self { sent: RefCell::new(Vec::new()), fail: true }
    }

    fn sent_count(&self) -> usize {
        self.sent.borrow().len()
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, title: &str, message: &str) -> Result<(), Error> {
        if self.fail {
            return Err(Error::Notify("simulated transport failure".into()));
        }
        self.sent.borrow_mut().push((title.to_string(), message.to_string()));
        Ok(())
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
}

/// Build a validated config whose data dir lives under `base`.
fn test_config(base: &Path, volumes: &[(&str, &str)], max_per_day: Option<u32>) -> Config {
    let mut text = String::from("[pushover]\ntoken = \"t\"\nuser = \"u\"\n\n");
    if let Some(n) = max_per_day {
        text.push_str(&format!("[notifications]\nmax_per_day = {n}\n\n"));
    }
    text.push_str(&format!(
        "[storage]\ndata_dir = {:?}\n\n",
        base.join("data").to_str().unwrap()
    ));
    for (path, minimum) in volumes {
        text.push_str(&format!(
            "[[volumes]]\npath = {path:?}\nminimum_free = {minimum:?}\n\n"
        ));
    }
    Config::load_from_str(&text, base).expect("test settings must validate")
}

#[test]
fn below_threshold_notifies_and_logs_history() {
    let dir = tempfile::tempdir().unwrap();
    let vol = dir.path().to_str().unwrap().to_string();
    // No real filesystem has 1000 TB free, so the volume is below threshold.
    let config = test_config(dir.path(), &[(&vol, "1000TB")], None);
    let notifier = RecordingNotifier::new();

    let report = pipeline::run(&config, &notifier, today());

    assert_eq!(notifier.sent_count(), 1);
    let sent = notifier.sent.borrow();
    assert!(sent[0].0.contains("Low Disk Space Alert"));
    assert!(sent[0].1.contains("Minimum threshold"));

    match &report.volumes[0].outcome {
        VolumeOutcome::Checked { below_threshold, notified, suppressed, .. } => {
            assert!(*below_threshold);
            assert!(*notified);
            assert!(!*suppressed);
        }
        other => panic!("expected Checked, got {other:?}"),
    }

    let history = HistoryStore::new(&config.data_dir);
    assert_eq!(history.read_all(&vol).len(), 1);
}

#[test]
fn above_threshold_appends_history_without_notifying() {
    let dir = tempfile::tempdir().unwrap();
    let vol = dir.path().to_str().unwrap().to_string();
    let config = test_config(dir.path(), &[(&vol, "1B")], Some(5));
    let notifier = RecordingNotifier::new();

    let report = pipeline::run(&config, &notifier, today());

    assert_eq!(notifier.sent_count(), 0);
    match &report.volumes[0].outcome {
        VolumeOutcome::Checked { below_threshold, notified, .. } => {
            assert!(!*below_threshold);
            assert!(!*notified);
        }
        other => panic!("expected Checked, got {other:?}"),
    }

    let history = HistoryStore::new(&config.data_dir);
    assert_eq!(history.read_all(&vol).len(), 1);

    // The rate limiter was never consulted, so no tracking file appears.
    assert!(!config.data_dir.join("notification_tracking.json").exists());
}

#[test]
fn unreadable_volume_does_not_block_the_others() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().to_str().unwrap().to_string();
    let config = test_config(
        dir.path(),
        &[("/nonexistent/dfmon-missing-volume", "10GB"), (&good, "1B")],
        None,
    );
    let notifier = RecordingNotifier::new();

    let report = pipeline::run(&config, &notifier, today());

    assert_eq!(report.volumes.len(), 2);
    assert_eq!(report.processed(), 1);
    assert_eq!(report.failed(), 1);
    assert!(!report.all_failed());
    assert!(matches!(report.volumes[0].outcome, VolumeOutcome::Unreadable(_)));

    let history = HistoryStore::new(&config.data_dir);
    assert_eq!(history.read_all(&good).len(), 1);
    assert!(history.read_all("/nonexistent/dfmon-missing-volume").is_empty());
}

#[test]
fn daily_limit_is_shared_across_volumes() {
    let dir = tempfile::tempdir().unwrap();
    let subs: Vec<String> = (0..3)
        .map(|i| {
            let p = dir.path().join(format!("vol{i}"));
            fs::create_dir(&p).unwrap();
            p.to_str().unwrap().to_string()
        })
        .collect();
    let volumes: Vec<(&str, &str)> = subs.iter().map(|p| (p.as_str(), "1000TB")).collect();
    let config = test_config(dir.path(), &volumes, Some(2));
    let notifier = RecordingNotifier::new();

    let report = pipeline::run(&config, &notifier, today());

    // Three volumes below threshold, one global cap of two.
    assert_eq!(notifier.sent_count(), 2);
    let suppressed: usize = report
        .volumes
        .iter()
        .filter(|v| matches!(v.outcome, VolumeOutcome::Checked { suppressed: true, .. }))
        .count();
    assert_eq!(suppressed, 1);
}

#[test]
fn failed_send_still_consumes_the_daily_slot() {
    let dir = tempfile::tempdir().unwrap();
    let vol = dir.path().to_str().unwrap().to_string();
    let config = test_config(dir.path(), &[(&vol, "1000TB")], Some(3));
    let notifier = RecordingNotifier::failing();

    let report = pipeline::run(&config, &notifier, today());

    match &report.volumes[0].outcome {
        VolumeOutcome::Checked { below_threshold, notified, suppressed, .. } => {
            assert!(*below_threshold);
            assert!(!*notified);
            assert!(!*suppressed);
        }
        other => panic!("expected Checked, got {other:?}"),
    }

    let text = fs::read_to_string(config.data_dir.join("notification_tracking.json")).unwrap();
    assert!(text.contains("\"count\":1"), "slot not consumed: {text}");
}

#[test]
fn chart_appears_once_history_has_two_samples() {
    let dir = tempfile::tempdir().unwrap();
    let vol = dir.path().to_str().unwrap().to_string();
    let config = test_config(dir.path(), &[(&vol, "1B")], None);
    let notifier = RecordingNotifier::new();
    let chart = dfmon::chart::chart_path(&config.data_dir, &vol);

    pipeline::run(&config, &notifier, today());
    assert!(!chart.exists(), "one sample is not a trend");

    pipeline::run(&config, &notifier, today());
    assert!(chart.exists());
}
