//! Client frame vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use ripple_core::protocol::InboundEnvelope;

mod vector_loader;
use vector_loader::{load, InboundVector};

#[test]
fn inbound_vectors() {
    let files = [
        "inbound_ping.json",
        "inbound_with_payload.json",
        "inbound_missing_type.json",
        "inbound_not_json.json",
    ];

    for f in files {
        let v: InboundVector = load(f);
        let res = InboundEnvelope::parse(&v.frame);

        if let Some(err) = v.expect_error {
            let e = res.expect_err("expected error");
            assert_eq!(e.client_code().as_str(), err.code, "vector={}", v.description);
            continue;
        }

        let env = res.expect("expected ok envelope");
        let ex = v.expect.expect("missing expect block");
        assert_eq!(env.msg_type, ex.msg_type, "vector={}", v.description);
        assert_eq!(env.is_ping(), ex.is_ping, "vector={}", v.description);

        match ex.payload {
            Some(p) => {
                let raw = env.payload.expect("payload kept");
                let got: serde_json::Value = serde_json::from_str(raw.get()).unwrap();
                assert_eq!(got, p, "vector={}", v.description);
            }
            None => assert!(env.payload.is_none(), "vector={}", v.description),
        }
    }
}
