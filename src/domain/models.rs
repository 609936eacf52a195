use crate::domain::tree::MismatchReport;
use crate::toon::Delimiter;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    DecodeEquivalence,
    Roundtrip,
}

impl Phase {
    pub fn title(self) -> &'static str {
        match self {
            Phase::DecodeEquivalence => "Phase A: decode-equivalence",
            Phase::Roundtrip => "Phase B: roundtrip (encode -> decode)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PhaseOutcome {
    Passed,
    Failed { mismatch: MismatchReport },
    Skipped { reason: String },
    Error { message: String },
}

impl PhaseOutcome {
    /// Skipped phases do not count against the run.
    pub fn is_ok(&self) -> bool {
        matches!(self, PhaseOutcome::Passed | PhaseOutcome::Skipped { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PhaseReport {
    pub phase: Phase,
    #[serde(flatten)]
    pub outcome: PhaseOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeReport {
    pub original_size: usize,
    pub encoded_size: usize,
    pub compact_json_size: usize,
    pub reduction_vs_file: f64,
    pub reduction_vs_compact: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyReport {
    pub overall: String,
    pub reference: String,
    pub compact: Option<String>,
    pub artifacts_dir: String,
    pub codec: String,
    pub phases: Vec<PhaseReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizes: Option<SizeReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoded_sha256: Option<String>,
}

impl VerifyReport {
    pub fn passed(&self) -> bool {
        self.phases.iter().all(|p| p.outcome.is_ok())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CompareReport {
    pub equal: bool,
    pub left: String,
    pub right: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mismatch: Option<MismatchReport>,
}

/// Shape of the optional `--config` TOML file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub codec: CodecSection,
    #[serde(default)]
    pub artifacts: ArtifactsSection,
}

#[derive(Debug, Deserialize, Default)]
pub struct CodecSection {
    #[serde(default)]
    pub indent: Option<usize>,
    #[serde(default)]
    pub delimiter: Option<Delimiter>,
    #[serde(default)]
    pub encoder_cmd: Option<String>,
    #[serde(default)]
    pub decoder_cmd: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ArtifactsSection {
    #[serde(default)]
    pub dir: Option<String>,
}
