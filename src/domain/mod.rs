//! Shared data model layer (structs/constants only).
//!
//! ## Files
//! - `tree.rs` — kinds, paths and mismatch reports for data tree comparison.
//! - `models.rs` — phase/size/verify report structs and config file shape.
//! - `constants.rs` — artifact file names and defaults.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem or process side effects.
//!
//! ## Compatibility note
//! Changes in these structs affect `--json` output.
//! Keep them synchronized with `docs/contracts/*`.

pub mod constants;
pub mod models;
pub mod tree;
