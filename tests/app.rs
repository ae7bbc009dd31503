use std::fs;
use std::path::Path;

use gift_shuffle::app::{self, Settings};
use gift_shuffle::error::NotifyError;
use gift_shuffle::{Error, Mode, TieBreak};

const THREE_UNITS: &str = r#"{
    "members": [
        {"group": ["Ann"], "email": "ann@example.com"},
        {"group": ["Bob"], "email": "bob@example.com"},
        {"group": ["Cid"], "email": "cid@example.com"}
    ]
}"#;

const TWO_UNITS: &str = r#"{
    "members": [
        {"group": ["Ann"], "email": "ann@example.com"},
        {"group": ["Bob"], "email": "bob@example.com"}
    ]
}"#;

fn settings(root: &Path, year: i32) -> Settings {
    Settings {
        config: root.join("config.json"),
        history_dir: root.join("history"),
        outbox: root.join("outbox"),
        year,
        mode: Mode::Commit,
        tie_break: TieBreak::InputOrder,
    }
}

fn file_count(dir: &Path) -> usize {
    fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

#[test]
fn commit_saves_history_and_queues_messages() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("config.json"), THREE_UNITS).unwrap();
    let mut out = Vec::new();
    app::run(&settings(tmp.path(), 2025), &mut out).unwrap();

    assert!(tmp.path().join("history/2025.json").is_file());
    assert_eq!(file_count(&tmp.path().join("outbox/2025")), 3);
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("No compromises made"));
    assert!(out.contains("Queued 3 messages"));
}

#[test]
fn broken_template_leaves_no_history_behind() {
    let tmp = tempfile::tempdir().unwrap();
    let config = THREE_UNITS.replacen(
        "]\n}",
        "],\n    \"email_templates\": {\"subject\": \"Draw {{ year \"}\n}",
        1,
    );
    fs::write(tmp.path().join("config.json"), config).unwrap();
    let err = app::run(&settings(tmp.path(), 2025), &mut Vec::new()).unwrap_err();
    assert!(matches!(err, Error::Notify(NotifyError::Template(_))));
    assert_eq!(file_count(&tmp.path().join("history")), 0);
    assert_eq!(file_count(&tmp.path().join("outbox")), 0);

    // fixing the template lets the same year run
    fs::write(tmp.path().join("config.json"), THREE_UNITS).unwrap();
    app::run(&settings(tmp.path(), 2025), &mut Vec::new()).unwrap();
    assert!(tmp.path().join("history/2025.json").is_file());
}

#[test]
fn consecutive_years_get_separate_outboxes() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("config.json"), THREE_UNITS).unwrap();
    app::run(&settings(tmp.path(), 2025), &mut Vec::new()).unwrap();
    fs::write(tmp.path().join("config.json"), TWO_UNITS).unwrap();
    app::run(&settings(tmp.path(), 2026), &mut Vec::new()).unwrap();

    assert_eq!(file_count(&tmp.path().join("outbox/2025")), 3);
    assert_eq!(file_count(&tmp.path().join("outbox/2026")), 2);
    let last = fs::read_to_string(tmp.path().join("outbox/2026/002.eml")).unwrap();
    assert!(last.starts_with("To: bob@example.com\n"));
}

#[test]
fn used_outbox_is_refused_before_history_is_written() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("config.json"), THREE_UNITS).unwrap();
    fs::create_dir_all(tmp.path().join("outbox/2025")).unwrap();
    fs::write(tmp.path().join("outbox/2025/001.eml"), "To: old@example.com\n").unwrap();

    let err = app::run(&settings(tmp.path(), 2025), &mut Vec::new()).unwrap_err();
    assert!(matches!(err, Error::Notify(NotifyError::OutboxNotEmpty { .. })));
    assert_eq!(file_count(&tmp.path().join("history")), 0);
}

#[test]
fn year_held_by_a_renamed_file_is_already_drawn() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("config.json"), THREE_UNITS).unwrap();
    fs::create_dir_all(tmp.path().join("history")).unwrap();
    fs::write(
        tmp.path().join("history/backup.json"),
        r#"{"year": 2025, "pairs": [["Ann", "Bob"]]}"#,
    ).unwrap();

    let err = app::run(&settings(tmp.path(), 2025), &mut Vec::new()).unwrap_err();
    assert!(matches!(err, Error::AlreadyDrawn { year: 2025, ref path } if path.ends_with("backup.json")));
    assert!(!tmp.path().join("history/2025.json").exists());
}

#[test]
fn trial_run_prints_and_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("config.json"), THREE_UNITS).unwrap();
    let mut out = Vec::new();
    let trial = Settings { mode: Mode::Trial, ..settings(tmp.path(), 2025) };
    app::run(&trial, &mut out).unwrap();

    let out = String::from_utf8(out).unwrap();
    assert_eq!(out.matches("[DRY RUN] Email to").count(), 3);
    assert_eq!(file_count(&tmp.path().join("history")), 0);
    assert!(!tmp.path().join("outbox").exists());
}
