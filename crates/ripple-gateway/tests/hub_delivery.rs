#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use serde_json::{json, Value};
use tokio::sync::mpsc::error::TryRecvError;

use ripple_core::protocol::Envelope;
use ripple_gateway::realtime::{ConnState, Connection, Hub, HubStats, Outbound, Outbox};

fn connect(hub: &Hub, user: &str, capacity: usize) -> (Arc<Connection>, Outbox) {
    let (conn, outbox) = Connection::new(user, capacity);
    hub.register(Arc::clone(&conn));
    (conn, outbox)
}

fn next_json(outbox: &mut Outbox) -> Value {
    match outbox.try_recv() {
        Ok(Outbound::Frame(f)) => serde_json::from_str(f.as_str()).unwrap(),
        other => panic!("expected text frame, got {other:?}"),
    }
}

fn event(kind: &str, payload: Value) -> Envelope {
    Envelope::new(kind, payload)
}

#[test]
fn unicast_reaches_the_single_connection_once() {
    let hub = Hub::new();
    let (_c1, mut rx) = connect(&hub, "u1", 8);

    let report = hub.deliver_to_user("u1", &event("ping", json!({"n": 1})));

    assert_eq!(report.delivered, 1);
    assert_eq!(next_json(&mut rx), json!({"type": "ping", "payload": {"n": 1}}));
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[test]
fn unicast_reaches_every_tab_of_the_user() {
    let hub = Hub::new();
    let (_c1, mut rx1) = connect(&hub, "u1", 8);
    let (_c2, mut rx2) = connect(&hub, "u1", 8);
    let (_c3, mut rx3) = connect(&hub, "u2", 8);

    let report = hub.deliver_to_user("u1", &event("follow_update", json!({"x": true})));

    assert_eq!(report.delivered, 2);
    assert_eq!(next_json(&mut rx1)["type"], "follow_update");
    assert_eq!(next_json(&mut rx2)["type"], "follow_update");
    assert!(matches!(rx3.try_recv(), Err(TryRecvError::Empty)));
    assert_eq!(hub.connection_count("u1"), 2);
}

#[test]
fn broadcast_reaches_everyone_and_presence_misses_strangers() {
    let hub = Hub::new();
    let (_c1, mut rx1) = connect(&hub, "u1", 8);
    let (_c2, mut rx2) = connect(&hub, "u2", 8);

    let report = hub.deliver_to_all(&event("post_created", json!({"postId": 9})));

    assert_eq!(report.delivered, 2);
    assert_eq!(next_json(&mut rx1)["payload"]["postId"], 9);
    assert_eq!(next_json(&mut rx2)["payload"]["postId"], 9);
    assert!(hub.has_live_connection("u1"));
    assert!(!hub.has_live_connection("u3"));
}

#[test]
fn unknown_user_is_a_silent_noop() {
    let hub = Hub::new();
    let report = hub.deliver_to_user("nobody", &event("ping", Value::Null));
    assert_eq!(report.delivered + report.dropped, 0);
}

#[test]
fn deregistered_user_is_unreachable() {
    let hub = Hub::new();
    let (c1, mut rx) = connect(&hub, "u1", 8);

    assert!(hub.deregister(&c1));

    let report = hub.deliver_to_user("u1", &event("ping", Value::Null));
    assert_eq!(report.delivered, 0);
    assert!(!hub.has_live_connection("u1"));
    assert_eq!(hub.stats(), HubStats::default());
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Disconnected)));
}

#[test]
fn deregister_twice_is_harmless() {
    let hub = Hub::new();
    let (c1, mut rx) = connect(&hub, "u1", 8);
    let (_c2, _rx2) = connect(&hub, "u2", 8);
    hub.deliver_to_user("u1", &event("last", Value::Null));

    assert!(hub.deregister(&c1));
    assert!(!hub.deregister(&c1));

    assert_eq!(c1.state(), ConnState::Closing);
    assert_eq!(hub.stats(), HubStats { connections: 1, users: 1 });
    // queued frames survive the close and drain before the end-of-queue
    assert_eq!(next_json(&mut rx)["type"], "last");
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Disconnected)));
}

#[test]
fn racing_deregisters_remove_exactly_once() {
    let hub = Arc::new(Hub::new());
    let (c1, _rx) = connect(&hub, "u1", 8);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let hub = Arc::clone(&hub);
            let c1 = Arc::clone(&c1);
            thread::spawn(move || hub.deregister(&c1))
        })
        .collect();
    let removed = handles.into_iter().map(|h| h.join().unwrap()).filter(|r| *r).count();

    assert_eq!(removed, 1);
    assert_eq!(hub.metrics().connections_active.get(), 0);
}

#[test]
fn full_queue_drops_without_blocking_the_producer() {
    let hub = Hub::new();
    let (_slow, mut slow_rx) = connect(&hub, "u1", 2);
    let (_fast, mut fast_rx) = connect(&hub, "u2", 8);

    hub.deliver_to_user("u1", &event("e1", Value::Null));
    hub.deliver_to_user("u1", &event("e2", Value::Null));

    let started = Instant::now();
    let report = hub.deliver_to_user("u1", &event("e3", Value::Null));
    assert!(started.elapsed() < Duration::from_millis(100));
    assert_eq!(report.dropped, 1);

    // the stalled consumer does not hold anyone else up
    let report = hub.deliver_to_all(&event("e4", Value::Null));
    assert_eq!(report.delivered, 1);
    assert_eq!(report.dropped, 1);
    assert_eq!(next_json(&mut fast_rx)["type"], "e4");

    // slow connection keeps its place; cleanup is left to its pumps
    assert!(hub.has_live_connection("u1"));
    assert_eq!(next_json(&mut slow_rx)["type"], "e1");
    assert_eq!(next_json(&mut slow_rx)["type"], "e2");
    assert!(matches!(slow_rx.try_recv(), Err(TryRecvError::Empty)));
}

#[test]
fn each_producer_sees_its_own_order_preserved() {
    let hub = Arc::new(Hub::new());
    let (_c1, mut rx) = connect(&hub, "u1", 4096);

    let producers: Vec<_> = (0..4)
        .map(|p| {
            let hub = Arc::clone(&hub);
            thread::spawn(move || {
                for seq in 0..200 {
                    hub.deliver_to_user("u1", &event("tick", json!({"p": p, "seq": seq})));
                }
            })
        })
        .collect();
    for h in producers {
        h.join().unwrap();
    }

    let mut last = [-1i64; 4];
    let mut total = 0;
    while let Ok(Outbound::Frame(f)) = rx.try_recv() {
        let v: Value = serde_json::from_str(f.as_str()).unwrap();
        let p = v["payload"]["p"].as_u64().unwrap() as usize;
        let seq = v["payload"]["seq"].as_i64().unwrap();
        assert!(seq > last[p], "producer {p} reordered: {seq} after {}", last[p]);
        last[p] = seq;
        total += 1;
    }
    assert_eq!(total, 800);
}

#[test]
fn fan_out_to_listed_users_serializes_once_and_skips_offline() {
    let hub = Hub::new();
    let (_a, mut rx_a) = connect(&hub, "a", 8);
    let (_b, mut rx_b) = connect(&hub, "b", 8);
    let (_c, mut rx_c) = connect(&hub, "c", 8);

    let report = hub.deliver_to_users(&["a", "c", "offline"], &event("group_updated", json!({})));

    assert_eq!(report.delivered, 2);
    assert_eq!(next_json(&mut rx_a)["type"], "group_updated");
    assert_eq!(next_json(&mut rx_c)["type"], "group_updated");
    assert!(matches!(rx_b.try_recv(), Err(TryRecvError::Empty)));
}

#[test]
fn close_user_retires_every_connection_of_that_user() {
    let hub = Hub::new();
    let (c1, mut rx1) = connect(&hub, "u1", 8);
    let (c2, mut rx2) = connect(&hub, "u1", 8);
    let (_c3, _rx3) = connect(&hub, "u2", 8);

    assert_eq!(hub.close_user("u1"), 2);
    assert_eq!(hub.close_user("u1"), 0);

    assert!(!hub.has_live_connection("u1"));
    assert_eq!(hub.stats(), HubStats { connections: 1, users: 1 });
    assert_eq!(c1.state(), ConnState::Closing);
    assert_eq!(c2.state(), ConnState::Closing);
    assert!(!hub.deregister(&c1));
    assert!(matches!(rx1.try_recv(), Err(TryRecvError::Disconnected)));
    assert!(matches!(rx2.try_recv(), Err(TryRecvError::Disconnected)));
}

#[test]
fn broadcast_targets_share_one_serialized_frame() {
    let hub = Hub::new();
    let (_a, mut rx_a) = connect(&hub, "u1", 4);
    let (_b, mut rx_b) = connect(&hub, "u2", 4);
    let (_c, mut rx_c) = connect(&hub, "u2", 4);

    hub.deliver_to_all(&event("post_created", json!({"id": 1})));

    let frames: Vec<Outbound> = [&mut rx_a, &mut rx_b, &mut rx_c]
        .into_iter()
        .map(|rx| rx.try_recv().unwrap())
        .collect();
    let first = frames[0].as_text().unwrap();
    for f in &frames[1..] {
        assert_eq!(f, &frames[0]);
        assert!(std::ptr::eq(f.as_text().unwrap().as_ptr(), first.as_ptr()));
    }
}
