//! Parsing of hex and payload arguments

use anyhow::{Context, Result};
use chainstore_common::Payload;

/// Prefix marking a payload given as a signed 64-bit integer
pub const LONG_PREFIX: &str = "long:";

/// Decode hex text, ignoring whitespace and an optional `0x` prefix
pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let compact: String = text.split_whitespace().collect();
    let digits = compact
        .strip_prefix("0x")
        .or_else(|| compact.strip_prefix("0X"))
        .unwrap_or(&compact);
    hex::decode(digits).with_context(|| format!("'{text}' is not valid hex"))
}

/// Parse a payload argument
///
/// `long:<n>` becomes the 8-byte big-endian encoding of `n`; anything else
/// is read as hex. An empty argument is the empty payload.
pub fn parse_payload(text: &str) -> Result<Payload> {
    if let Some(value) = text.strip_prefix(LONG_PREFIX) {
        let value: i64 = value
            .trim()
            .parse()
            .with_context(|| format!("'{value}' is not a 64-bit integer"))?;
        return Ok(Payload::from_i64(value));
    }
    Ok(Payload::from(parse_hex(text)?))
}

/// `clap` value parser wrapper around [`parse_payload`]
pub fn payload_arg(text: &str) -> std::result::Result<Payload, String> {
    parse_payload(text).map_err(|e| format!("{e:#}"))
}
