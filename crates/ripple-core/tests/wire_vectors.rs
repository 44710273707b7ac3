//! Outbound wire contract tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::{json, Value};

use ripple_core::protocol::event::{
    FollowAction, FollowUpdate, GroupMessage, GroupMessageAuthor, PostLiked, StatsType, UserStatsUpdated,
};
use ripple_core::protocol::{Envelope, Event, PreparedFrame};

mod vector_loader;
use vector_loader::{load, WireVector};

#[test]
fn typed_events_match_wire_vectors() {
    let cases = [
        (
            "wire_post_liked.json",
            Event::PostLiked(PostLiked {
                post_id: 42,
                user_id: "u1".into(),
                user_name: "Ada L".into(),
                is_liked: true,
                likes_count: 7,
            }),
        ),
        (
            "wire_follow_update.json",
            Event::FollowUpdate(FollowUpdate {
                follower_id: "u2".into(),
                follower_name: "Grace H".into(),
                avatar: "/a/u2.png".into(),
                action: FollowAction::Unfollowed,
                timestamp: "1700000000".into(),
            }),
        ),
        (
            "wire_user_stats_updated.json",
            Event::UserStatsUpdated(UserStatsUpdated {
                user_id: "u3".into(),
                stats_type: StatsType::FollowersCount,
                count: 12,
            }),
        ),
        (
            "wire_group_message.json",
            Event::GroupMessage(GroupMessage {
                id: 9,
                content: "meeting at 5".into(),
                user: GroupMessageAuthor {
                    id: "u1".into(),
                    first_name: "Ada".into(),
                    avatar: "/a/u1.png".into(),
                },
                created_at: "2024-05-01T10:00:00Z".into(),
                group_id: "g1".into(),
            }),
        ),
    ];

    for (file, ev) in cases {
        let v: WireVector = load(file);
        let env = Envelope::try_from(&ev).unwrap();
        assert_eq!(env.msg_type, ev.kind(), "vector={}", v.description);

        let frame = PreparedFrame::prepare(&env).unwrap();
        let got: Value = serde_json::from_str(frame.as_str()).unwrap();
        assert_eq!(got, v.wire, "vector={}", v.description);
    }
}

#[test]
fn wire_vector_decodes_into_typed_event() {
    let v: WireVector = load("wire_user_status_update.json");
    let ev: Event = serde_json::from_value(v.wire).unwrap();
    match ev {
        Event::UserStatusUpdate(u) => {
            assert_eq!(u.user_id, "u1");
            assert!(!u.is_online);
            assert_eq!(u.timestamp, 1_700_000_000);
        }
        other => panic!("unexpected event: {}", other.kind()),
    }
}

#[test]
fn frame_is_exactly_type_then_payload() {
    let env = Envelope::new("ping", json!({"n": 1}));
    let frame = PreparedFrame::prepare(&env).unwrap();
    assert_eq!(frame.as_str(), r#"{"type":"ping","payload":{"n":1}}"#);
}

#[test]
fn pong_has_null_payload() {
    let frame = PreparedFrame::prepare(&Envelope::pong()).unwrap();
    assert_eq!(frame.as_str(), r#"{"type":"pong","payload":null}"#);
}

#[test]
fn missing_payload_decodes_as_null() {
    let env: Envelope = serde_json::from_str(r#"{"type":"broadcast"}"#).unwrap();
    assert_eq!(env.msg_type, "broadcast");
    assert!(env.payload.is_null());
}
