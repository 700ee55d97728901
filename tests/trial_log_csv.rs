use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::TimeZone;
use speechtask::records::{TrialLog, TrialRecord};

fn make_temp_dir(tag: &str) -> PathBuf {
    static NEXT_ID: AtomicU64 = AtomicU64::new(1);
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let seq = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "speechtask_{tag}_{}_{}_{}",
        std::process::id(),
        now_ms,
        seq
    ));
    std::fs::create_dir_all(&dir).expect("create temp test dir");
    dir
}

fn record(trial: usize, outcome: u8) -> TrialRecord {
    TrialRecord {
        subject: "999".into(),
        condition: "Quiet".into(),
        list_numbers: "1".into(),
        trial,
        sentence_num: trial as u32 + 10,
        presentation_level: 65.0 - trial as f32,
        adjusted_presentation_level: -55.0,
        raw_level: -50.0,
        slm_reading: 70.0,
        step_right_db: 2.0,
        step_wrong_db: 4.0,
        words_correct: "Dog Barn".into(),
        words_incorrect: "White".into(),
        num_words_correct: 2,
        outcome,
    }
}

#[test]
fn file_name_is_datestamp_condition_subject() {
    let dir = make_temp_dir("log_name");
    let started = chrono::Local.with_ymd_and_hms(2026, 8, 28, 14, 30, 0).unwrap();
    let log = TrialLog::new(&dir, "999", "Quiet", started);
    assert_eq!(
        log.path().file_name().and_then(|s| s.to_str()),
        Some("2026_Aug_28_1430_Quiet_999.csv")
    );
}

#[test]
fn header_is_written_once_and_rows_append() {
    let dir = make_temp_dir("log_append");
    let log = TrialLog::new(&dir, "999", "Quiet", chrono::Local::now());
    log.append(&record(1, 1)).expect("append first");
    log.append(&record(2, 0)).expect("append second");
    log.append(&record(3, 1)).expect("append third");

    let raw = std::fs::read_to_string(log.path()).expect("read log");
    let lines: Vec<&str> = raw.lines().collect();
    assert_eq!(lines.len(), 4, "one header plus three rows: {raw}");
    assert!(lines[0].starts_with("subject,condition,list_numbers,trial,"));
    assert_eq!(
        lines.iter().filter(|l| l.starts_with("subject,")).count(),
        1,
        "header must not repeat on append"
    );
}

#[test]
fn rows_read_back_with_their_values() {
    let dir = make_temp_dir("log_readback");
    let log = TrialLog::new(&dir, "042", "Noise", chrono::Local::now());
    log.append(&record(1, 0)).expect("append");

    let mut reader = csv::Reader::from_path(log.path()).expect("open log");
    let headers = reader.headers().expect("headers").clone();
    let row = reader
        .records()
        .next()
        .expect("one row")
        .expect("valid row");
    let get = |name: &str| {
        let idx = headers.iter().position(|h| h == name).unwrap_or_else(|| panic!("column {name}"));
        row.get(idx).unwrap_or("")
    };
    assert_eq!(get("trial"), "1");
    assert_eq!(get("sentence_num"), "11");
    assert_eq!(get("step_right_db"), "2.0");
    assert_eq!(get("step_wrong_db"), "4.0");
    assert_eq!(get("words_correct"), "Dog Barn");
    assert_eq!(get("words_incorrect"), "White");
    assert_eq!(get("num_words_correct"), "2");
    assert_eq!(get("outcome"), "0");
}
