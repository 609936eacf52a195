//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `verify.rs` — the two-phase verification run.
//! - `tools.rs` — single-step encode/decode/compare.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate comparison, codec and pipeline logic to `services/*`.
//! - A handler returns `Ok(None)` when the command is not its own.

pub mod tools;
pub mod verify;

pub use tools::handle_tool_commands;
pub use verify::handle_verify_commands;

/// Result of a handled command, mapped to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    Failed,
}

impl Verdict {
    pub fn from_ok(ok: bool) -> Self {
        if ok {
            Verdict::Passed
        } else {
            Verdict::Failed
        }
    }
}
