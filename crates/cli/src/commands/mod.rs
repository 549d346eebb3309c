use anyhow::Result;
use clap::Subcommand;
use std::io::Write;

pub mod decode;
pub mod encode;
pub mod replay;

use self::decode::DecodeArgs;
use self::encode::EncodeArgs;
use self::replay::ReplayArgs;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build an operation and print its wire encoding as hex
    #[command(visible_alias = "enc")]
    Encode(EncodeArgs),

    /// Decode a hex-encoded operation or response and print it as JSON
    #[command(visible_alias = "dec")]
    Decode(DecodeArgs),

    /// Apply a file of hex-encoded operations to an in-process store
    Replay(ReplayArgs),
}

impl Commands {
    pub fn execute<W: Write>(self, out: &mut W) -> Result<()> {
        match self {
            Commands::Encode(args) => args.execute(out),
            Commands::Decode(args) => args.execute(out),
            Commands::Replay(args) => args.execute(out),
        }
    }
}
