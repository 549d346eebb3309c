use crate::input::parse_hex;
use anyhow::{Context, Result};
use bytes::Bytes;
use chainstore_common::{ResponseCodec, StoreResponse};
use chainstore_server::{
    ConfigSource, LoadedConfig, ServerConfigLoader, ServiceStats, StoreService,
};
use clap::Args;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// File with one hex-encoded operation per line; blank lines and `#` comments are skipped
    pub file: PathBuf,

    /// JSON config file, instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Register a cache, repeatable; replaces caches from config and environment
    #[arg(long = "cache")]
    pub caches: Vec<String>,

    /// Create stores for unknown caches on first use
    #[arg(long)]
    pub auto_create: bool,

    /// Reject messages larger than this many bytes
    #[arg(long)]
    pub max_message_bytes: Option<usize>,
}

/// One line of replay output
#[derive(Debug, Serialize)]
struct ReplayRecord<'a> {
    line: usize,
    response: &'a StoreResponse,
}

impl ReplayArgs {
    fn load_config(&self) -> Result<LoadedConfig> {
        let loaded = match &self.config {
            Some(path) => LoadedConfig {
                config: ServerConfigLoader::load_file(path)?,
                source: ConfigSource::ConfigFile(path.clone()),
            },
            None => ServerConfigLoader::load()?,
        };

        let loaded = ServerConfigLoader::apply_cli_args(
            loaded,
            self.caches.clone(),
            self.auto_create.then_some(true),
            self.max_message_bytes,
        )?;
        tracing::debug!(source = ?loaded.source, config = ?loaded.config, "resolved configuration");
        Ok(loaded)
    }

    pub fn execute<W: Write>(self, out: &mut W) -> Result<()> {
        let loaded = self.load_config()?;
        let service = StoreService::new(&loaded.config)?;

        let file = File::open(&self.file)
            .with_context(|| format!("Failed to open {}", self.file.display()))?;
        let stats = replay(&service, BufReader::new(file), out)?;

        tracing::info!(
            messages = stats.messages,
            decode_failures = stats.decode_failures,
            rejected = stats.rejected,
            cas_conflicts = stats.cas_conflicts,
            "replay finished"
        );
        Ok(())
    }
}

/// Feed every message in `input` through `service`, writing one JSON reply per line
pub fn replay<R: BufRead, W: Write>(
    service: &StoreService,
    input: R,
    out: &mut W,
) -> Result<ServiceStats> {
    let codec = ResponseCodec::new();

    for (index, line) in input.lines().enumerate() {
        let line_number = index + 1;
        let line = line.with_context(|| format!("Failed to read line {line_number}"))?;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let message = parse_hex(text).with_context(|| format!("Line {line_number}"))?;
        let reply = service.handle(Bytes::from(message));
        let response = codec
            .decode(reply)
            .with_context(|| format!("Service produced an undecodable reply for line {line_number}"))?;

        let record = ReplayRecord {
            line: line_number,
            response: &response,
        };
        serde_json::to_writer(&mut *out, &record)?;
        writeln!(out)?;
    }

    Ok(service.stats())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainstore_common::{MessageFactory, OpCodec, Payload};
    use chainstore_server::ServerConfigBuilder;

    fn hex_line(op: &chainstore_common::ServerStoreOp) -> String {
        hex::encode(OpCodec::new().encode(op).unwrap())
    }

    #[test]
    fn test_replay_applies_in_order() {
        let config = ServerConfigBuilder::new().with_cache("test").build().unwrap();
        let service = StoreService::new(&config).unwrap();
        let factory = MessageFactory::new("test");

        let input = [
            "# seed".to_string(),
            hex_line(&factory.append_operation(1, Payload::from_i64(1))),
            String::new(),
            hex_line(&factory.get_and_append_operation(1, Payload::from_i64(2))),
            "ff00".to_string(),
        ]
        .join("\n");

        let mut out = Vec::new();
        let stats = replay(&service, input.as_bytes(), &mut out).unwrap();

        let records: Vec<serde_json::Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["line"], 2);
        assert_eq!(records[0]["response"]["response"], "success");
        assert_eq!(records[1]["line"], 4);
        assert_eq!(records[1]["response"]["chain"][0], "0000000000000001");
        assert_eq!(records[2]["response"]["code"], "malformed_message");
        assert_eq!(stats.decode_failures, 1);
    }

    #[test]
    fn test_replay_rejects_bad_hex() {
        let config = ServerConfigBuilder::new().build().unwrap();
        let service = StoreService::new(&config).unwrap();

        let error = replay(&service, "zz".as_bytes(), &mut Vec::new()).unwrap_err();
        assert!(format!("{error:#}").contains("Line 1"));
    }
}
