use crate::input::payload_arg;
use anyhow::{Context, Result};
use chainstore_common::{Chain, Key, MessageFactory, OpCodec, Payload, ServerStoreOp};
use clap::{Args, Subcommand};
use std::io::Write;

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Cache the operation is addressed to
    #[arg(short, long)]
    pub cache: String,

    #[command(subcommand)]
    pub op: OpArgs,
}

/// Payloads are hex, or `long:<n>` for an 8-byte big-endian integer
#[derive(Subcommand, Debug)]
pub enum OpArgs {
    /// Append one payload to a key's chain
    Append {
        #[arg(short, long, allow_negative_numbers = true)]
        key: Key,
        #[arg(value_parser = payload_arg)]
        payload: Payload,
    },
    /// Read a key's chain
    Get {
        #[arg(short, long, allow_negative_numbers = true)]
        key: Key,
    },
    /// Append one payload and read the chain as it was before
    GetAndAppend {
        #[arg(short, long, allow_negative_numbers = true)]
        key: Key,
        #[arg(value_parser = payload_arg)]
        payload: Payload,
    },
    /// Swap a key's chain if it still equals the expected one
    ReplaceAtHead {
        #[arg(short, long, allow_negative_numbers = true)]
        key: Key,
        /// Element of the expected chain, repeat in order
        #[arg(long = "expect", value_parser = payload_arg)]
        expect: Vec<Payload>,
        /// Element of the replacement chain, repeat in order
        #[arg(long = "update", value_parser = payload_arg)]
        update: Vec<Payload>,
    },
    /// Remove every key in the cache
    Clear,
}

impl EncodeArgs {
    pub fn operation(&self) -> ServerStoreOp {
        let factory = MessageFactory::new(self.cache.as_str());
        match &self.op {
            OpArgs::Append { key, payload } => factory.append_operation(*key, payload.clone()),
            OpArgs::Get { key } => factory.get_operation(*key),
            OpArgs::GetAndAppend { key, payload } => {
                factory.get_and_append_operation(*key, payload.clone())
            }
            OpArgs::ReplaceAtHead {
                key,
                expect,
                update,
            } => factory.replace_at_head_operation(
                *key,
                Chain::of(expect.iter().cloned()),
                Chain::of(update.iter().cloned()),
            ),
            OpArgs::Clear => factory.clear_operation(),
        }
    }

    pub fn execute<W: Write>(self, out: &mut W) -> Result<()> {
        let op = self.operation();
        let encoded = OpCodec::new()
            .encode(&op)
            .with_context(|| format!("Failed to encode {} operation", op.kind()))?;

        tracing::debug!(op = %op.kind(), bytes = encoded.len(), "encoded operation");
        writeln!(out, "{}", hex::encode(&encoded))?;
        Ok(())
    }
}
