//! Shared helpers for the server integration tests

#![allow(dead_code)]

use bytes::Bytes;
use chainstore_common::{Chain, OpCodec, Payload, ResponseCodec, ServerStoreOp, StoreResponse};
use chainstore_server::{ServerConfigBuilder, StoreService};

/// Build a chain of 8-byte long payloads
pub fn chain_of_longs(values: &[i64]) -> Chain {
    values.iter().copied().map(Payload::from_i64).collect()
}

/// Read a chain of longs back into integers
pub fn longs_of(chain: &Chain) -> Vec<i64> {
    chain
        .payloads()
        .map(|payload| payload.to_i64().expect("Should be an 8-byte long"))
        .collect()
}

/// A service with the given caches registered
pub fn service_with(caches: &[&str]) -> StoreService {
    let config = caches
        .iter()
        .fold(ServerConfigBuilder::new(), |builder, cache| builder.with_cache(*cache))
        .build()
        .expect("Should build config");
    StoreService::new(&config).expect("Should build service")
}

/// Encode `op`, pass it through the service and decode the reply
pub fn send(service: &StoreService, op: &ServerStoreOp) -> StoreResponse {
    let request: Bytes = OpCodec::new().encode(op).expect("Should encode operation");
    ResponseCodec::new()
        .decode(service.handle(request))
        .expect("Should decode reply")
}

/// Send `op` and expect a chain in reply
pub fn send_for_chain(service: &StoreService, op: &ServerStoreOp) -> Chain {
    let reply = send(service, op);
    reply
        .clone()
        .into_chain()
        .unwrap_or_else(|| panic!("Expected a chain reply, got {reply:?}"))
}
