use crate::toon::Delimiter;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "toon-verify",
    version,
    about = "Verify that a TOON codec round-trips JSON losslessly"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(long, global = true, help = "TOML config file ([codec], [artifacts])")]
    pub config: Option<PathBuf>,
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Log more (-v info, -vv debug); RUST_LOG overrides"
    )]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode-equivalence and round-trip checks against a JSON ground truth.
    Verify {
        #[arg(long, help = "Trusted JSON document")]
        reference: PathBuf,
        #[arg(long, help = "Pre-existing TOON document to check against the reference")]
        compact: Option<PathBuf>,
        #[arg(long, help = "Where artifacts are written (default: current dir)")]
        artifacts_dir: Option<PathBuf>,
        #[command(flatten)]
        codec: CodecArgs,
    },
    /// Encode a JSON document as TOON.
    Encode {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        codec: CodecArgs,
    },
    /// Decode a TOON document into JSON.
    Decode {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        codec: CodecArgs,
    },
    /// Structurally compare two JSON documents.
    Compare { left: PathBuf, right: PathBuf },
}

#[derive(Args, Debug, Clone, Default)]
pub struct CodecArgs {
    #[arg(long, help = "Spaces per indentation level for the built-in codec")]
    pub indent: Option<usize>,
    #[arg(long, value_enum, help = "Array delimiter for the built-in codec")]
    pub delimiter: Option<Delimiter>,
    #[arg(long, help = "External encoder command (JSON on stdin, TOON on stdout)")]
    pub encoder_cmd: Option<String>,
    #[arg(long, help = "External decoder command (TOON on stdin, JSON on stdout)")]
    pub decoder_cmd: Option<String>,
}
