//! End-to-end operation semantics through the byte-level service

mod common;

use chainstore_common::{FailureCode, MessageFactory, Payload, StoreResponse};
use common::{chain_of_longs, longs_of, send, send_for_chain, service_with};
use proptest::prelude::*;

#[test]
fn test_append_then_get() {
    let service = service_with(&["test"]);
    let factory = MessageFactory::new("test");

    for value in 1..=3 {
        assert_eq!(
            send(&service, &factory.append_operation(1, Payload::from_i64(value))),
            StoreResponse::Success
        );
    }

    let chain = send_for_chain(&service, &factory.get_operation(1));
    assert_eq!(longs_of(&chain), [1, 2, 3]);
}

#[test]
fn test_get_and_append_returns_pre_state() {
    let service = service_with(&["test"]);
    let factory = MessageFactory::new("test");

    let first = send_for_chain(&service, &factory.get_and_append_operation(7, Payload::from_i64(1)));
    assert!(first.is_empty());

    let second = send_for_chain(&service, &factory.get_and_append_operation(7, Payload::from_i64(2)));
    assert_eq!(longs_of(&second), [1]);

    let now = send_for_chain(&service, &factory.get_operation(7));
    assert_eq!(longs_of(&now), [1, 2]);
}

#[test]
fn test_replace_at_head_success_and_conflict() {
    let service = service_with(&["test"]);
    let factory = MessageFactory::new("test");
    send(&service, &factory.append_operation(1, Payload::from_i64(1)));
    send(&service, &factory.append_operation(1, Payload::from_i64(2)));

    // Compact [1, 2] into a single element
    let observed = send_for_chain(&service, &factory.get_operation(1));
    let compact = factory.replace_at_head_operation(1, observed.clone(), chain_of_longs(&[3]));
    assert_eq!(send(&service, &compact), StoreResponse::Success);

    // Replaying the same swap must now lose
    assert_eq!(send(&service, &compact), StoreResponse::CasConflict);
    assert_eq!(longs_of(&send_for_chain(&service, &factory.get_operation(1))), [3]);
}

#[test]
fn test_stale_snapshot_after_append_conflicts() {
    let service = service_with(&["test"]);
    let factory = MessageFactory::new("test");
    send(&service, &factory.append_operation(1, Payload::from_i64(1)));

    let snapshot = send_for_chain(&service, &factory.get_operation(1));
    send(&service, &factory.append_operation(1, Payload::from_i64(2)));

    let swap = factory.replace_at_head_operation(1, snapshot, chain_of_longs(&[9]));
    assert_eq!(send(&service, &swap), StoreResponse::CasConflict);
    assert_eq!(longs_of(&send_for_chain(&service, &factory.get_operation(1))), [1, 2]);
}

#[test]
fn test_clear_only_affects_its_cache() {
    let service = service_with(&["a", "b"]);
    let a = MessageFactory::new("a");
    let b = MessageFactory::new("b");

    for key in 0..4 {
        send(&service, &a.append_operation(key, Payload::from_i64(key)));
        send(&service, &b.append_operation(key, Payload::from_i64(key)));
    }

    assert_eq!(send(&service, &a.clear_operation()), StoreResponse::Success);

    for key in 0..4 {
        assert!(send_for_chain(&service, &a.get_operation(key)).is_empty());
        assert_eq!(longs_of(&send_for_chain(&service, &b.get_operation(key))), [key]);
    }
}

#[test]
fn test_keys_are_independent() {
    let service = service_with(&["test"]);
    let factory = MessageFactory::new("test");
    send(&service, &factory.append_operation(-1, Payload::from_i64(10)));
    send(&service, &factory.append_operation(i64::MAX, Payload::from_i64(20)));

    assert_eq!(longs_of(&send_for_chain(&service, &factory.get_operation(-1))), [10]);
    assert_eq!(longs_of(&send_for_chain(&service, &factory.get_operation(i64::MAX))), [20]);
    assert!(send_for_chain(&service, &factory.get_operation(0)).is_empty());
}

#[test]
fn test_opaque_payloads_are_preserved() {
    let service = service_with(&["test"]);
    let factory = MessageFactory::new("test");
    let payloads = [
        Payload::empty(),
        Payload::from(&b"\x00\xff binary"[..]),
        Payload::from("text"),
    ];

    for payload in &payloads {
        send(&service, &factory.append_operation(1, payload.clone()));
    }

    let chain = send_for_chain(&service, &factory.get_operation(1));
    let stored: Vec<Payload> = chain.payloads().cloned().collect();
    assert_eq!(stored, payloads);
}

#[test]
fn test_failed_operation_leaves_state_untouched() {
    let service = service_with(&["test"]);
    let factory = MessageFactory::new("test");
    send(&service, &factory.append_operation(1, Payload::from_i64(1)));

    let reply = send(&service, &MessageFactory::new("unknown").clear_operation());
    assert!(matches!(
        reply,
        StoreResponse::Failure {
            code: FailureCode::UnknownCache,
            ..
        }
    ));

    // Truncated append for a known cache
    let mut request = chainstore_common::OpCodec::new()
        .encode(&factory.append_operation(1, Payload::from_i64(2)))
        .expect("Should encode")
        .to_vec();
    request.truncate(request.len() - 3);
    let reply = chainstore_common::ResponseCodec::new()
        .decode(service.handle_slice(&request))
        .expect("Should decode reply");
    assert!(matches!(
        reply,
        StoreResponse::Failure {
            code: FailureCode::MalformedMessage,
            ..
        }
    ));

    assert_eq!(longs_of(&send_for_chain(&service, &factory.get_operation(1))), [1]);
}

/// One step against a single slot
#[derive(Debug, Clone)]
enum SlotOp {
    Append(i64),
    Get,
    GetAndAppend(i64),
    /// `None` expects whatever the slot currently holds
    ReplaceAtHead {
        expect: Option<Vec<i64>>,
        update: Vec<i64>,
    },
}

fn arb_slot_op() -> impl Strategy<Value = SlotOp> {
    prop_oneof![
        (0..4_i64).prop_map(SlotOp::Append),
        Just(SlotOp::Get),
        (0..4_i64).prop_map(SlotOp::GetAndAppend),
        (
            prop::option::of(prop::collection::vec(0..4_i64, 0..3)),
            prop::collection::vec(0..4_i64, 0..3),
        )
            .prop_map(|(expect, update)| SlotOp::ReplaceAtHead { expect, update }),
    ]
}

proptest! {
    #[test]
    fn prop_single_slot_matches_model(ops in prop::collection::vec(arb_slot_op(), 1..40)) {
        const KEY: i64 = 5;
        let service = service_with(&["model"]);
        let factory = MessageFactory::new("model");
        let mut model: Vec<i64> = Vec::new();

        for op in ops {
            match op {
                SlotOp::Append(value) => {
                    let reply = send(&service, &factory.append_operation(KEY, Payload::from_i64(value)));
                    prop_assert_eq!(reply, StoreResponse::Success);
                    model.push(value);
                }
                SlotOp::Get => {
                    let chain = send_for_chain(&service, &factory.get_operation(KEY));
                    prop_assert_eq!(longs_of(&chain), model.clone());
                }
                SlotOp::GetAndAppend(value) => {
                    let op = factory.get_and_append_operation(KEY, Payload::from_i64(value));
                    let previous = send_for_chain(&service, &op);
                    prop_assert_eq!(longs_of(&previous), model.clone());
                    model.push(value);
                }
                SlotOp::ReplaceAtHead { expect, update } => {
                    let expect = expect.unwrap_or_else(|| model.clone());
                    let op = factory.replace_at_head_operation(
                        KEY,
                        chain_of_longs(&expect),
                        chain_of_longs(&update),
                    );
                    let reply = send(&service, &op);
                    if expect == model {
                        prop_assert_eq!(reply, StoreResponse::Success);
                        model = update;
                    } else {
                        prop_assert_eq!(reply, StoreResponse::CasConflict);
                    }
                }
            }
        }

        let chain = send_for_chain(&service, &factory.get_operation(KEY));
        prop_assert_eq!(longs_of(&chain), model);
        let untouched = send_for_chain(&service, &factory.get_operation(KEY + 1));
        prop_assert!(untouched.is_empty());
    }
}
