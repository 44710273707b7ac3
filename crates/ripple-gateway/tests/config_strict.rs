#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use ripple_gateway::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
gateway:
  listen: "0.0.0.0:8080"
  outbound_queu: 64 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.gateway.outbound_queue, 256);
    assert_eq!(cfg.gateway.max_message_bytes, 512 * 1024);
    assert!(cfg.auth.tickets.is_empty());

    let p = cfg.gateway.pump_config();
    assert_eq!(p.ping_interval, Duration::from_secs(30));
    assert_eq!(p.read_deadline, Duration::from_secs(60));
    assert_eq!(p.write_timeout, Duration::from_secs(10));
}

#[test]
fn tickets_are_loaded() {
    let ok = r#"
version: 1
auth:
  tickets:
    dev: "user:dev"
    qa: "user:qa"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.auth.tickets.get("qa").map(String::as_str), Some("user:qa"));
}

#[test]
fn rejects_unsupported_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn read_deadline_must_exceed_ping_interval() {
    let bad = r#"
version: 1
gateway:
  ping_interval_ms: 30000
  read_deadline_ms: 30000
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("read_deadline_ms"), "{err}");
}

#[test]
fn write_timeout_must_be_below_ping_interval() {
    let bad = r#"
version: 1
gateway:
  ping_interval_ms: 10000
  read_deadline_ms: 20000
  write_timeout_ms: 10000
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("write_timeout_ms"), "{err}");
}

#[test]
fn queue_must_not_be_zero() {
    let bad = r#"
version: 1
gateway:
  outbound_queue: 0
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("outbound_queue"), "{err}");
}
