use crate::toon::{self, DecodeError, DecodeOptions, EncodeOptions};
use serde_json::Value;
use std::io::Write;
use std::process::{Command, Stdio};

#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("failed to serialize tree for `{command}`: {source}")]
    Serialize {
        command: String,
        source: serde_json::Error,
    },
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
    #[error("`{command}` wrote non-UTF-8 output")]
    NonUtf8 { command: String },
    #[error("`{command}` wrote invalid JSON: {source}")]
    InvalidJson {
        command: String,
        source: serde_json::Error,
    },
}

/// Compact-format encoder/decoder under verification.
pub trait Codec {
    fn describe(&self) -> String;
    fn encode(&self, tree: &Value) -> Result<String, CodecError>;
    fn decode(&self, doc: &str) -> Result<Value, CodecError>;
}

#[derive(Debug, Clone, Default)]
pub struct ToonCodec {
    pub encode_opts: EncodeOptions,
    pub decode_opts: DecodeOptions,
}

impl ToonCodec {
    pub fn new(encode_opts: EncodeOptions) -> Self {
        Self {
            encode_opts,
            decode_opts: DecodeOptions {
                indent: encode_opts.indent,
            },
        }
    }
}

impl Codec for ToonCodec {
    fn describe(&self) -> String {
        format!(
            "builtin (indent={}, delimiter={:?})",
            self.encode_opts.indent, self.encode_opts.delimiter
        )
        .to_lowercase()
    }

    fn encode(&self, tree: &Value) -> Result<String, CodecError> {
        Ok(toon::encode(tree, &self.encode_opts))
    }

    fn decode(&self, doc: &str) -> Result<Value, CodecError> {
        Ok(toon::decode(doc, &self.decode_opts)?)
    }
}

/// Pipes documents through external encoder/decoder programs: the encoder
/// reads minified JSON on stdin and writes the compact document, the decoder
/// reads the compact document and writes JSON.
#[derive(Debug, Clone)]
pub struct CommandCodec {
    pub encoder: Vec<String>,
    pub decoder: Vec<String>,
}

impl CommandCodec {
    fn run(argv: &[String], input: Vec<u8>) -> Result<String, CodecError> {
        let command = argv.join(" ");
        let (program, args) = match argv.split_first() {
            Some(split) => split,
            None => {
                return Err(CodecError::Spawn {
                    command,
                    source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
                })
            }
        };
        tracing::debug!(%command, bytes = input.len(), "running external codec");

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| CodecError::Spawn {
                command: command.clone(),
                source,
            })?;

        // Feed stdin from a thread so a chatty child cannot fill its stdout
        // pipe while we are still writing.
        let writer = child.stdin.take().map(|mut stdin| {
            let command = command.clone();
            std::thread::spawn(move || {
                if let Err(e) = stdin.write_all(&input) {
                    tracing::debug!(%command, error = %e, "external codec closed stdin early");
                }
            })
        });
        let out = child.wait_with_output().map_err(|source| CodecError::Spawn {
            command: command.clone(),
            source,
        })?;
        if let Some(handle) = writer {
            if handle.join().is_err() {
                tracing::debug!(%command, "stdin writer thread panicked");
            }
        }

        if !out.status.success() {
            return Err(CodecError::CommandFailed {
                command,
                status: out.status.to_string(),
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }
        String::from_utf8(out.stdout).map_err(|_| CodecError::NonUtf8 { command })
    }
}

impl Codec for CommandCodec {
    fn describe(&self) -> String {
        format!(
            "external (encoder: {}, decoder: {})",
            self.encoder.join(" "),
            self.decoder.join(" ")
        )
    }

    fn encode(&self, tree: &Value) -> Result<String, CodecError> {
        let input = serde_json::to_vec(tree).map_err(|source| CodecError::Serialize {
            command: self.encoder.join(" "),
            source,
        })?;
        Self::run(&self.encoder, input)
    }

    fn decode(&self, doc: &str) -> Result<Value, CodecError> {
        let raw = Self::run(&self.decoder, doc.as_bytes().to_vec())?;
        serde_json::from_str(&raw).map_err(|source| CodecError::InvalidJson {
            command: self.decoder.join(" "),
            source,
        })
    }
}
