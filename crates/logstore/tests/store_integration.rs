//! End-to-end tests against an on-disk `SQLite` database.

use std::sync::Arc;
use std::thread;

use chrono::{Duration, Utc};
use logstore::{
    format_time, Dialect, LogEntry, LogLevel, LogQuery, LogStore, SqliteExecutor, StoreConfig,
    StoreError,
};
use tempfile::TempDir;

fn open_store(dir: &TempDir, table: &str) -> LogStore {
    let executor = SqliteExecutor::open(dir.path().join("logs.db")).expect("open database");
    LogStore::new(
        StoreConfig::new(table)
            .with_executor(Arc::new(executor))
            .with_automigrate(true),
    )
    .expect("create store")
}

#[test]
fn entries_survive_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");

    let id = {
        let store = open_store(&dir, "logs");
        let mut entry = LogEntry::new()
            .with_level(LogLevel::Warning)
            .with_message("cache miss rate high")
            .with_context(r#"{"rate":0.4}"#);
        store.create(&mut entry).expect("create");
        entry.id().to_string()
    };

    let store = open_store(&dir, "logs");
    let found = store.find_by_id(&id).expect("find").expect("present");
    assert_eq!(found.level(), "warning");
    assert_eq!(found.message(), "cache miss rate high");
    assert_eq!(found.context(), r#"{"rate":0.4}"#);
    assert!(found.time().is_some());
}

#[test]
fn automigrate_is_repeatable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = open_store(&dir, "logs");
    store.auto_migrate().expect("second migrate");
    store.auto_migrate().expect("third migrate");
    assert_eq!(store.count(None).expect("count"), 0);
}

#[test]
fn tables_are_independent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = open_store(&dir, "app_logs");
    let audit = open_store(&dir, "audit log");

    app.info("request served").expect("write");
    app.info("request served").expect("write");
    audit.info("user signed in").expect("write");

    assert_eq!(app.count(None).expect("count"), 2);
    assert_eq!(audit.count(None).expect("count"), 1);
}

#[test]
fn query_without_table_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = open_store(&dir, "logs");
    store.info("before drop").expect("write");

    let executor = SqliteExecutor::open(dir.path().join("logs.db")).expect("open");
    let missing = LogStore::new(StoreConfig::new("missing").with_executor(Arc::new(executor)))
        .expect("create store");
    assert!(matches!(missing.list(None), Err(StoreError::Execution(_))));
}

#[test]
fn full_filter_set_narrows_results() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = open_store(&dir, "logs");
    let base = Utc::now();

    let rows = [
        ("error", "payment failed: card declined", r#"{"user":"u1"}"#, 0),
        ("error", "payment failed: timeout", r#"{"user":"u2","debug":true}"#, 1),
        ("warning", "payment slow", r#"{"user":"u1"}"#, 2),
        ("error", "payment failed: card declined", r#"{"user":"u3"}"#, 48),
    ];
    for (level, message, context, hours) in rows {
        let mut entry = LogEntry::new()
            .with_level(level)
            .with_message(message)
            .with_context(context)
            .with_time(base + Duration::hours(hours));
        store.create(&mut entry).expect("create");
    }

    let query = LogQuery::new()
        .with_level_in(["error", "fatal"])
        .with_message_contains("failed")
        .with_context_contains("user")
        .with_context_not_contains("debug")
        .with_time_gte(format_time(&base))
        .with_time_lte_at(base + Duration::hours(24));

    let found = store.list(Some(&query)).expect("list");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].context(), r#"{"user":"u1"}"#);
    assert_eq!(store.count(Some(&query)).expect("count"), 1);
}

#[test]
fn id_set_filter() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = open_store(&dir, "logs");

    let mut ids = Vec::new();
    for i in 0..4 {
        let mut entry = LogEntry::new().with_message(format!("m{i}"));
        store.create(&mut entry).expect("create");
        ids.push(entry.id().to_string());
    }

    let query = LogQuery::new().with_id_in([ids[0].clone(), ids[2].clone(), "unknown".into()]);
    let found = store.list(Some(&query)).expect("list");
    let mut messages: Vec<&str> = found.iter().map(LogEntry::message).collect();
    messages.sort_unstable();
    assert_eq!(messages, vec!["m0", "m2"]);
}

#[test]
fn prune_oldest_entries() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = open_store(&dir, "logs");
    let base = Utc::now();

    for i in 0..10 {
        let mut entry = LogEntry::new()
            .with_message(format!("m{i}"))
            .with_time(base + Duration::seconds(i));
        store.create(&mut entry).expect("create");
    }

    let oldest = LogQuery::new()
        .with_order_by("time")
        .with_order_direction("asc")
        .with_limit(3);
    assert_eq!(store.delete_matching(&oldest).expect("prune"), 3);

    let remaining = store
        .list(Some(&LogQuery::new().with_order_by("time").with_order_direction("asc")))
        .expect("list");
    assert_eq!(remaining.len(), 7);
    assert_eq!(remaining[0].message(), "m3");
}

#[test]
fn concurrent_writers_share_a_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(open_store(&dir, "logs"));

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..25 {
                    store
                        .debug_with_context("tick", &serde_json::json!({"worker": worker, "i": i}))
                        .expect("write");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("join");
    }

    assert_eq!(store.count(None).expect("count"), 100);
    let first = LogQuery::new().with_context_contains(r#""worker":0"#);
    assert_eq!(store.count(Some(&first)).expect("count"), 25);
}

#[test]
fn explicit_dialect_overrides_executor() {
    let dir = tempfile::tempdir().expect("tempdir");
    let executor = SqliteExecutor::open(dir.path().join("logs.db")).expect("open");
    let store = LogStore::new(
        StoreConfig::new("logs")
            .with_executor(Arc::new(executor))
            .with_dialect(Dialect::Postgres),
    )
    .expect("create store");
    assert_eq!(store.dialect(), Dialect::Postgres);
}
