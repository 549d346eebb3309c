//! Common test utilities and proptest strategies for the codec tests

#![allow(dead_code)]

use chainstore_common::{CacheId, Chain, Payload, ServerStoreOp, StoreResponse};
use proptest::prelude::*;

/// Build a chain of 8-byte long payloads
pub fn chain_of_longs(values: &[i64]) -> Chain {
    values.iter().copied().map(Payload::from_i64).collect()
}

/// Assert that `chain` holds exactly the given longs, in order
pub fn assert_chain_has(chain: &Chain, expected: &[i64]) {
    let actual: Vec<Option<i64>> = chain.payloads().map(Payload::to_i64).collect();
    let expected: Vec<Option<i64>> = expected.iter().copied().map(Some).collect();
    assert_eq!(actual, expected, "chain contents differ");
}

pub fn arb_payload() -> impl Strategy<Value = Payload> {
    prop_oneof![
        // Empty payloads must survive the wire
        Just(Payload::empty()),
        any::<i64>().prop_map(Payload::from_i64),
        prop::collection::vec(any::<u8>(), 0..256).prop_map(Payload::from),
    ]
}

pub fn arb_chain() -> impl Strategy<Value = Chain> {
    prop::collection::vec(arb_payload(), 0..8).prop_map(Chain::from_iter)
}

pub fn arb_cache_id() -> impl Strategy<Value = CacheId> {
    prop_oneof![
        Just(String::new()),
        "[a-zA-Z0-9_-]{1,32}",
        // Arbitrary unicode text
        "\\PC{0,16}",
    ]
    .prop_map(CacheId::from)
}

pub fn arb_op() -> impl Strategy<Value = ServerStoreOp> {
    prop_oneof![
        (arb_cache_id(), any::<i64>(), arb_payload()).prop_map(|(cache_id, key, payload)| {
            ServerStoreOp::Append {
                cache_id,
                key,
                payload,
            }
        }),
        (arb_cache_id(), any::<i64>())
            .prop_map(|(cache_id, key)| ServerStoreOp::Get { cache_id, key }),
        (arb_cache_id(), any::<i64>(), arb_payload()).prop_map(|(cache_id, key, payload)| {
            ServerStoreOp::GetAndAppend {
                cache_id,
                key,
                payload,
            }
        }),
        (arb_cache_id(), any::<i64>(), arb_chain(), arb_chain()).prop_map(
            |(cache_id, key, expect, update)| ServerStoreOp::ReplaceAtHead {
                cache_id,
                key,
                expect,
                update,
            }
        ),
        arb_cache_id().prop_map(|cache_id| ServerStoreOp::Clear { cache_id }),
    ]
}

pub fn arb_response() -> impl Strategy<Value = StoreResponse> {
    use chainstore_common::FailureCode;

    prop_oneof![
        Just(StoreResponse::Success),
        Just(StoreResponse::CasConflict),
        arb_chain().prop_map(StoreResponse::chain),
        (
            prop_oneof![
                Just(FailureCode::UnknownCache),
                Just(FailureCode::MalformedMessage),
                Just(FailureCode::MessageTooLarge),
                Just(FailureCode::Internal),
            ],
            "\\PC{0,32}"
        )
            .prop_map(|(code, message)| StoreResponse::failure(code, message)),
    ]
}
