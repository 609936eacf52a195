//! Service layer containing comparison, codec and pipeline logic.
//!
//! ## Service map
//! - `compare.rs` — structural comparator over JSON data trees.
//! - `codec.rs` — `Codec` trait, built-in TOON codec and external-command codec.
//! - `pipeline.rs` — Phase A/B verification run and size accounting.
//! - `artifacts.rs` — artifact directory writes.
//! - `config.rs` — TOML config loading and codec selection.
//! - `report.rs` — human-readable renderings of reports.
//! - `output.rs` — JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod artifacts;
pub mod codec;
pub mod compare;
pub mod config;
pub mod output;
pub mod pipeline;
pub mod report;
