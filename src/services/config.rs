use crate::cli::CodecArgs;
use crate::domain::constants::DEFAULT_INDENT;
use crate::domain::models::{ArtifactsSection, CodecSection, ConfigFile};
use crate::services::codec::{Codec, CommandCodec, ToonCodec};
use crate::toon::EncodeOptions;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("indent must be at least 1")]
    ZeroIndent,
    #[error("encoder and decoder commands must be given together")]
    HalfExternalCodec,
    #[error("external codec command is empty")]
    EmptyCommand,
}

/// Missing `--config` means defaults; a named file that cannot be read is an
/// error.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    let p = match path {
        Some(p) => p,
        None => return Ok(ConfigFile::default()),
    };
    let raw = std::fs::read_to_string(p).map_err(|source| ConfigError::Read {
        path: p.display().to_string(),
        source,
    })?;
    let cfg = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: p.display().to_string(),
        source,
    })?;
    tracing::debug!(config = %p.display(), "loaded config");
    Ok(cfg)
}

fn split_command(cmd: &str) -> Result<Vec<String>, ConfigError> {
    let argv: Vec<String> = cmd.split_whitespace().map(str::to_string).collect();
    if argv.is_empty() {
        return Err(ConfigError::EmptyCommand);
    }
    Ok(argv)
}

/// CLI flags win over the config file.
pub fn build_codec(args: &CodecArgs, file: &CodecSection) -> Result<Box<dyn Codec>, ConfigError> {
    let encoder = args.encoder_cmd.as_ref().or(file.encoder_cmd.as_ref());
    let decoder = args.decoder_cmd.as_ref().or(file.decoder_cmd.as_ref());
    match (encoder, decoder) {
        (Some(enc), Some(dec)) => {
            return Ok(Box::new(CommandCodec {
                encoder: split_command(enc)?,
                decoder: split_command(dec)?,
            }))
        }
        (None, None) => {}
        _ => return Err(ConfigError::HalfExternalCodec),
    }

    let indent = args.indent.or(file.indent).unwrap_or(DEFAULT_INDENT);
    if indent == 0 {
        return Err(ConfigError::ZeroIndent);
    }
    let delimiter = args.delimiter.or(file.delimiter).unwrap_or_default();
    Ok(Box::new(ToonCodec::new(EncodeOptions { indent, delimiter })))
}

pub fn artifacts_dir(flag: Option<&Path>, file: &ArtifactsSection) -> PathBuf {
    flag.map(Path::to_path_buf)
        .or_else(|| file.dir.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}
