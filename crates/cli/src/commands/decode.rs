use crate::input::parse_hex;
use anyhow::{Context, Result};
use chainstore_common::{OpCodec, ResponseCodec};
use clap::Args;
use std::io::Write;

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Hex-encoded message
    pub hex: String,

    /// Decode a server response instead of an operation
    #[arg(short, long)]
    pub response: bool,

    /// Print JSON on a single line
    #[arg(long)]
    pub compact: bool,
}

impl DecodeArgs {
    pub fn execute<W: Write>(self, out: &mut W) -> Result<()> {
        let bytes = parse_hex(&self.hex)?;

        let value = if self.response {
            let response = ResponseCodec::new()
                .decode_slice(&bytes)
                .context("Failed to decode response")?;
            serde_json::to_value(&response)?
        } else {
            let op = OpCodec::new()
                .decode_slice(&bytes)
                .context("Failed to decode operation")?;
            serde_json::to_value(&op)?
        };

        let text = if self.compact {
            serde_json::to_string(&value)?
        } else {
            serde_json::to_string_pretty(&value)?
        };
        writeln!(out, "{text}")?;
        Ok(())
    }
}
