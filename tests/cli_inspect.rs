//! CLI Command Tests
//!
//! Runs commands end to end against a real store directory:
//! open, dispatch, render, close.

mod fixture;

use fixture::{mixed_fixture, Fixture};
use tokenmap_inspect::cli::{
    inspect, render, CliErrorCode, Command, Config, OutputFormat, Report,
};
use tokenmap_inspect::storage::RepairPolicy;

fn run(fixture: &Fixture, command: Command) -> Report {
    inspect(
        fixture.path(),
        &Config::default(),
        RepairPolicy::Delete,
        &command,
    )
    .unwrap()
}

fn text(report: &Report) -> String {
    let mut buf = Vec::new();
    render(report, OutputFormat::Text, &mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn test_missing_store_fails_with_store_unavailable() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("leveldb");

    let err = inspect(
        &path,
        &Config::default(),
        RepairPolicy::Delete,
        &Command::All,
    )
    .unwrap_err();

    assert_eq!(err.code(), &CliErrorCode::StoreUnavailable);
    assert!(!path.exists());
}

#[test]
fn test_store_is_released_after_each_command() {
    let fixture = mixed_fixture();

    run(&fixture, Command::All);
    run(&fixture, Command::Keys);

    let handle = fixture.open();
    handle.close().unwrap();
}

#[test]
fn test_store_is_released_after_failed_command() {
    let fixture = mixed_fixture();

    let err = inspect(
        fixture.path(),
        &Config::default(),
        RepairPolicy::Delete,
        &Command::Token {
            root_chain_type: "polygon".to_string(),
            root_token: "B1".to_string(),
        },
    )
    .unwrap_err();
    assert_eq!(err.code(), &CliErrorCode::QueryFailed);

    let handle = fixture.open();
    handle.close().unwrap();
}

#[test]
fn test_non_repairing_commands_do_not_need_the_lock() {
    let fixture = mixed_fixture();
    let holder = fixture.open();

    let keys = run(&fixture, Command::Keys);
    assert!(matches!(keys, Report::Keys(ref k) if k.len() == 3));
    run(&fixture, Command::Metadata);
    run(
        &fixture,
        Command::Token {
            root_chain_type: "ethereum".to_string(),
            root_token: "A1".to_string(),
        },
    );

    let counted = inspect(
        fixture.path(),
        &Config::default(),
        RepairPolicy::ReportOnly,
        &Command::Count,
    )
    .unwrap();
    assert!(matches!(counted, Report::Count(ref c) if c.repairs.len() == 1));

    let err = inspect(
        fixture.path(),
        &Config::default(),
        RepairPolicy::Delete,
        &Command::All,
    )
    .unwrap_err();
    assert_eq!(err.code(), &CliErrorCode::StoreUnavailable);

    holder.close().unwrap();
}

#[test]
fn test_all_then_keys() {
    let fixture = mixed_fixture();

    let all = text(&run(&fixture, Command::All));
    assert!(all.contains("Chain Type: ethereum (2 items)"));
    assert!(!all.contains("Chain Type: polygon"));
    assert!(all.contains("Removed invalid entry tmp-polygonB1"));

    let keys = text(&run(&fixture, Command::Keys));
    assert_eq!(
        keys,
        "=== All TokenMap Keys ===\n[1] tmp-ethereumA1\n[2] tmp-ethereumA2\nTotal: 2 keys\n"
    );
}

#[test]
fn test_chain_and_token() {
    let fixture = mixed_fixture();

    let chain = text(&run(
        &fixture,
        Command::Chain {
            root_chain_type: "ethereum".to_string(),
        },
    ));
    assert!(chain.starts_with("=== TokenMap for Chain: ethereum ===\n"));
    assert!(chain.contains("[2] EventID: 7, RootToken: A2, ChildToken: child-A2"));

    let token = text(&run(
        &fixture,
        Command::Token {
            root_chain_type: "ethereum".to_string(),
            root_token: "A1".to_string(),
        },
    ));
    assert_eq!(
        token,
        "=== TokenMap for ethereum:A1 ===\nEventID: 5, RootToken: A1, ChildToken: child-A1\n"
    );
}

#[test]
fn test_count_and_metadata() {
    let fixture = mixed_fixture();
    fixture.put_raw(b"tm-last-event-id", b"9");

    let count = text(&run(&fixture, Command::Count));
    assert!(count.contains("ethereum: 2 items\nTotal: 2 items\n"));

    let metadata = text(&run(&fixture, Command::Metadata));
    assert_eq!(metadata, "=== Metadata ===\nlastEventID: 9\n");
}

#[test]
fn test_report_only_from_config() {
    let fixture = mixed_fixture();
    let config = Config::from_json(r#"{"repair": false}"#).unwrap();

    let report = inspect(
        fixture.path(),
        &config,
        config.repair_policy(),
        &Command::Count,
    )
    .unwrap();
    let rendered = text(&report);
    assert!(rendered.contains("Found invalid entry tmp-polygonB1"));

    let keys = run(&fixture, Command::Keys);
    assert!(matches!(keys, Report::Keys(ref k) if k.len() == 3));
}
