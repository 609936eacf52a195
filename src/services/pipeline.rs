//! Decode-equivalence and round-trip checks over one ground-truth document.
//!
//! Phases run in order and independently: a failing or erroring Phase A
//! never prevents Phase B. Only I/O on the ground truth and artifact writes
//! abort the run.

use crate::domain::constants::{DECODED_FAIL_ARTIFACT, ENCODED_ARTIFACT, ROUNDTRIP_FAIL_ARTIFACT};
use crate::domain::models::{Phase, PhaseOutcome, PhaseReport, SizeReport, VerifyReport};
use crate::services::artifacts::ArtifactStore;
use crate::services::codec::Codec;
use crate::services::compare::compare_root;
use anyhow::Context;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SizeError {
    #[error("size reduction is undefined: {which} is empty")]
    DivisionUndefined { which: &'static str },
}

/// Built once from CLI/config at startup.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub reference: PathBuf,
    pub compact: Option<PathBuf>,
    pub artifacts: ArtifactStore,
}

#[derive(Debug)]
pub struct GroundTruth {
    /// Byte length of the document as stored, formatting included.
    pub raw_len: usize,
    pub tree: Value,
}

pub fn load_ground_truth(path: &Path) -> anyhow::Result<GroundTruth> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read reference document {}", path.display()))?;
    let tree = serde_json::from_str(&raw)
        .with_context(|| format!("parse reference document {}", path.display()))?;
    tracing::info!(reference = %path.display(), bytes = raw.len(), "loaded ground truth");
    Ok(GroundTruth {
        raw_len: raw.len(),
        tree,
    })
}

pub fn size_report(
    original_size: usize,
    encoded_size: usize,
    compact_json_size: usize,
) -> Result<SizeReport, SizeError> {
    if original_size == 0 {
        return Err(SizeError::DivisionUndefined {
            which: "reference document",
        });
    }
    if compact_json_size == 0 {
        return Err(SizeError::DivisionUndefined {
            which: "minified reference",
        });
    }
    let reduction = |base: usize| (base as f64 - encoded_size as f64) / base as f64 * 100.0;
    Ok(SizeReport {
        original_size,
        encoded_size,
        compact_json_size,
        reduction_vs_file: reduction(original_size),
        reduction_vs_compact: reduction(compact_json_size),
    })
}

pub fn run_verification(cfg: &PipelineConfig, codec: &dyn Codec) -> anyhow::Result<VerifyReport> {
    let truth = load_ground_truth(&cfg.reference)?;

    let decode_phase = run_decode_phase(cfg, codec, &truth.tree)?;
    let roundtrip = run_roundtrip_phase(cfg, codec, &truth)?;

    let mut report = VerifyReport {
        overall: String::new(),
        reference: cfg.reference.display().to_string(),
        compact: cfg.compact.as_ref().map(|p| p.display().to_string()),
        artifacts_dir: cfg.artifacts.dir().display().to_string(),
        codec: codec.describe(),
        phases: vec![decode_phase, roundtrip.phase],
        sizes: None,
        size_note: None,
        encoded_sha256: roundtrip.encoded_sha256,
    };
    match roundtrip.sizes {
        Some(Ok(sizes)) => report.sizes = Some(sizes),
        Some(Err(e)) => report.size_note = Some(e.to_string()),
        None => {}
    }
    report.overall = if report.passed() { "passed" } else { "failed" }.to_string();
    Ok(report)
}

fn finish(phase: Phase, started: Instant, outcome: PhaseOutcome, artifact: Option<PathBuf>) -> PhaseReport {
    let elapsed_ms = started.elapsed().as_millis() as u64;
    match &outcome {
        PhaseOutcome::Passed => tracing::info!(?phase, elapsed_ms, "phase passed"),
        PhaseOutcome::Failed { mismatch } => {
            tracing::warn!(?phase, elapsed_ms, %mismatch, "phase failed")
        }
        PhaseOutcome::Skipped { reason } => tracing::info!(?phase, %reason, "phase skipped"),
        PhaseOutcome::Error { message } => {
            tracing::error!(?phase, elapsed_ms, %message, "phase errored")
        }
    }
    PhaseReport {
        phase,
        outcome,
        artifact: artifact.map(|p| p.display().to_string()),
    }
}

fn run_decode_phase(
    cfg: &PipelineConfig,
    codec: &dyn Codec,
    truth: &Value,
) -> anyhow::Result<PhaseReport> {
    let phase = Phase::DecodeEquivalence;
    let started = Instant::now();

    let compact_path = match &cfg.compact {
        Some(p) => p,
        None => {
            let reason = "no compact document given".to_string();
            return Ok(finish(phase, started, PhaseOutcome::Skipped { reason }, None));
        }
    };
    if !compact_path.exists() {
        let reason = format!("compact document not found: {}", compact_path.display());
        return Ok(finish(phase, started, PhaseOutcome::Skipped { reason }, None));
    }

    let bytes = std::fs::read(compact_path)
        .with_context(|| format!("read compact document {}", compact_path.display()))?;
    let doc = match String::from_utf8(bytes) {
        Ok(doc) => doc,
        Err(e) => {
            let message = format!("compact document is not UTF-8: {}", e.utf8_error());
            return Ok(finish(phase, started, PhaseOutcome::Error { message }, None));
        }
    };
    let decoded = match codec.decode(&doc) {
        Ok(tree) => tree,
        Err(e) => {
            let message = format!("decode failed: {}", e);
            return Ok(finish(phase, started, PhaseOutcome::Error { message }, None));
        }
    };

    match compare_root(truth, &decoded) {
        Ok(()) => Ok(finish(phase, started, PhaseOutcome::Passed, None)),
        Err(mismatch) => {
            let artifact = cfg.artifacts.write_tree(DECODED_FAIL_ARTIFACT, &decoded)?;
            Ok(finish(
                phase,
                started,
                PhaseOutcome::Failed { mismatch },
                Some(artifact),
            ))
        }
    }
}

struct RoundTrip {
    phase: PhaseReport,
    sizes: Option<Result<SizeReport, SizeError>>,
    encoded_sha256: Option<String>,
}

fn run_roundtrip_phase(
    cfg: &PipelineConfig,
    codec: &dyn Codec,
    truth: &GroundTruth,
) -> anyhow::Result<RoundTrip> {
    let phase = Phase::Roundtrip;
    let started = Instant::now();

    let encoded = match codec.encode(&truth.tree) {
        Ok(doc) => doc,
        Err(e) => {
            let message = format!("encode failed: {}", e);
            return Ok(RoundTrip {
                phase: finish(phase, started, PhaseOutcome::Error { message }, None),
                sizes: None,
                encoded_sha256: None,
            });
        }
    };
    let encoded_path = cfg.artifacts.write_text(ENCODED_ARTIFACT, &encoded)?;
    let encoded_sha256 = Some(hex::encode(Sha256::digest(encoded.as_bytes())));

    let roundtrip = match codec.decode(&encoded) {
        Ok(tree) => tree,
        Err(e) => {
            let message = format!("decode failed: {}", e);
            return Ok(RoundTrip {
                phase: finish(
                    phase,
                    started,
                    PhaseOutcome::Error { message },
                    Some(encoded_path),
                ),
                sizes: None,
                encoded_sha256,
            });
        }
    };

    match compare_root(&truth.tree, &roundtrip) {
        Ok(()) => {
            let minified = serde_json::to_string(&truth.tree)?;
            let sizes = size_report(truth.raw_len, encoded.len(), minified.len());
            Ok(RoundTrip {
                phase: finish(phase, started, PhaseOutcome::Passed, Some(encoded_path)),
                sizes: Some(sizes),
                encoded_sha256,
            })
        }
        Err(mismatch) => {
            let artifact = cfg.artifacts.write_tree(ROUNDTRIP_FAIL_ARTIFACT, &roundtrip)?;
            Ok(RoundTrip {
                phase: finish(phase, started, PhaseOutcome::Failed { mismatch }, Some(artifact)),
                sizes: None,
                encoded_sha256,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{run_verification, size_report, PipelineConfig, SizeError};
    use crate::domain::models::{Phase, PhaseOutcome};
    use crate::domain::tree::MismatchKind;
    use crate::services::artifacts::ArtifactStore;
    use crate::services::codec::{Codec, CodecError, ToonCodec};
    use serde_json::{json, Value};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Decodes correctly but drops the last element of every array.
    struct LossyCodec;

    fn truncate(v: &Value) -> Value {
        match v {
            Value::Array(items) => {
                let keep = items.len().saturating_sub(1);
                Value::Array(items[..keep].iter().map(truncate).collect())
            }
            Value::Object(m) => Value::Object(m.iter().map(|(k, v)| (k.clone(), truncate(v))).collect()),
            other => other.clone(),
        }
    }

    impl Codec for LossyCodec {
        fn describe(&self) -> String {
            "lossy".to_string()
        }
        fn encode(&self, tree: &Value) -> Result<String, CodecError> {
            ToonCodec::default().encode(tree)
        }
        fn decode(&self, doc: &str) -> Result<Value, CodecError> {
            Ok(truncate(&ToonCodec::default().decode(doc)?))
        }
    }

    /// Fails in one direction, delegates to the built-in codec otherwise.
    enum BrokenCodec {
        Encode,
        Decode,
    }

    impl Codec for BrokenCodec {
        fn describe(&self) -> String {
            "broken".to_string()
        }
        fn encode(&self, tree: &Value) -> Result<String, CodecError> {
            match self {
                BrokenCodec::Encode => Err(CodecError::NonUtf8 {
                    command: "toon-enc".to_string(),
                }),
                BrokenCodec::Decode => ToonCodec::default().encode(tree),
            }
        }
        fn decode(&self, doc: &str) -> Result<Value, CodecError> {
            match self {
                BrokenCodec::Encode => ToonCodec::default().decode(doc),
                BrokenCodec::Decode => Err(CodecError::NonUtf8 {
                    command: "toon-dec".to_string(),
                }),
            }
        }
    }

    fn setup(reference: &str, compact: Option<&str>) -> (TempDir, PipelineConfig) {
        let tmp = TempDir::new().expect("temp dir");
        let reference_path = tmp.path().join("test.json");
        fs::write(&reference_path, reference).expect("write reference");
        let compact_path = compact.map(|body| {
            let p = tmp.path().join("test.toon");
            fs::write(&p, body).expect("write compact");
            p
        });
        let cfg = PipelineConfig {
            reference: reference_path,
            compact: compact_path,
            artifacts: ArtifactStore::new(tmp.path().join("artifacts")),
        };
        (tmp, cfg)
    }

    fn artifact(cfg: &PipelineConfig, name: &str) -> std::path::PathBuf {
        cfg.artifacts.path_of(name)
    }

    #[test]
    fn end_to_end_round_trip_reports_sizes() {
        let reference = serde_json::to_string_pretty(&json!({"x": [1, 2, 3], "y": {"z": "hi"}})).unwrap();
        let (_tmp, cfg) = setup(&reference, None);

        let report = run_verification(&cfg, &ToonCodec::default()).unwrap();
        assert!(report.passed());
        assert_eq!(report.overall, "passed");
        assert!(matches!(report.phases[0].outcome, PhaseOutcome::Skipped { .. }));
        assert_eq!(report.phases[1].outcome, PhaseOutcome::Passed);

        let sizes = report.sizes.expect("sizes on success");
        assert_eq!(sizes.original_size, reference.len());
        assert_eq!(sizes.encoded_size, "x[3]: 1,2,3\ny:\n  z: hi".len());
        assert_eq!(sizes.compact_json_size, r#"{"x":[1,2,3],"y":{"z":"hi"}}"#.len());
        assert!(sizes.reduction_vs_file <= 100.0);
        assert!(sizes.reduction_vs_compact <= 100.0);
        assert!(artifact(&cfg, "encoded.toon").exists());
        assert_eq!(report.encoded_sha256.as_deref().map(str::len), Some(64));
    }

    #[test]
    fn matching_compact_document_passes_phase_a() {
        let (_tmp, cfg) = setup(r#"{"a": [1, 2], "b": "x"}"#, Some("a[2]: 1,2\nb: x"));
        let report = run_verification(&cfg, &ToonCodec::default()).unwrap();
        assert_eq!(report.phases[0].phase, Phase::DecodeEquivalence);
        assert_eq!(report.phases[0].outcome, PhaseOutcome::Passed);
        assert!(report.passed());
    }

    #[test]
    fn mismatching_compact_document_fails_and_keeps_artifact() {
        let (_tmp, cfg) = setup(r#"{"a": [1, 2]}"#, Some("a[2]: 1,3"));
        let report = run_verification(&cfg, &ToonCodec::default()).unwrap();

        match &report.phases[0].outcome {
            PhaseOutcome::Failed { mismatch } => assert_eq!(mismatch.path.to_string(), "$.a[1]"),
            other => panic!("expected failure, got {other:?}"),
        }
        let saved = artifact(&cfg, "decoded_from_compact.json");
        let saved: Value = serde_json::from_str(&fs::read_to_string(saved).unwrap()).unwrap();
        assert_eq!(saved, json!({"a": [1, 3]}));
        // Phase B is independent of Phase A.
        assert_eq!(report.phases[1].outcome, PhaseOutcome::Passed);
        assert!(!report.passed());
        assert_eq!(report.overall, "failed");
    }

    #[test]
    fn undecodable_compact_document_errors_but_roundtrip_runs() {
        let (_tmp, cfg) = setup(r#"{"a": 1}"#, Some("a[3]: 1"));
        let report = run_verification(&cfg, &ToonCodec::default()).unwrap();
        assert!(matches!(report.phases[0].outcome, PhaseOutcome::Error { .. }));
        assert_eq!(report.phases[1].outcome, PhaseOutcome::Passed);
        assert!(!report.passed());
    }

    #[test]
    fn missing_compact_document_is_skipped_not_failed() {
        let (tmp, mut cfg) = setup(r#"{"a": 1}"#, None);
        cfg.compact = Some(tmp.path().join("absent.toon"));
        let report = run_verification(&cfg, &ToonCodec::default()).unwrap();
        assert!(matches!(report.phases[0].outcome, PhaseOutcome::Skipped { .. }));
        assert!(report.passed());
    }

    #[test]
    fn lossy_codec_fails_roundtrip_without_sizes() {
        let (_tmp, cfg) = setup(r#"{"x": [1, 2, 3]}"#, None);
        let report = run_verification(&cfg, &LossyCodec).unwrap();

        match &report.phases[1].outcome {
            PhaseOutcome::Failed { mismatch } => {
                assert_eq!(mismatch.path.to_string(), "$.x");
                assert_eq!(
                    mismatch.kind,
                    MismatchKind::SequenceLength {
                        left_len: 3,
                        right_len: 2
                    }
                );
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(report.sizes.is_none());
        assert!(artifact(&cfg, "roundtrip_fail.json").exists());
        assert!(artifact(&cfg, "encoded.toon").exists());
    }

    #[test]
    fn unreadable_reference_is_fatal() {
        let cfg = PipelineConfig {
            reference: Path::new("/nonexistent/test.json").to_path_buf(),
            compact: None,
            artifacts: ArtifactStore::new("/nonexistent/artifacts"),
        };
        assert!(run_verification(&cfg, &ToonCodec::default()).is_err());
    }

    #[test]
    fn size_report_guards_empty_documents() {
        assert_eq!(
            size_report(0, 3, 5),
            Err(SizeError::DivisionUndefined {
                which: "reference document"
            })
        );
        assert!(size_report(5, 3, 0).is_err());

        let grew = size_report(10, 20, 8).unwrap();
        assert_eq!(grew.reduction_vs_file, -100.0);
        assert_eq!(grew.reduction_vs_compact, -150.0);

        let shrank = size_report(200, 50, 100).unwrap();
        assert_eq!(shrank.reduction_vs_file, 75.0);
        assert_eq!(shrank.reduction_vs_compact, 50.0);
    }

    #[test]
    fn encode_failure_is_a_roundtrip_error() {
        let (_tmp, cfg) = setup(r#"{"a": [1, 2]}"#, None);
        let report = run_verification(&cfg, &BrokenCodec::Encode).unwrap();

        match &report.phases[1].outcome {
            PhaseOutcome::Error { message } => assert!(message.starts_with("encode failed")),
            other => panic!("expected error, got {other:?}"),
        }
        assert!(report.sizes.is_none());
        assert!(report.encoded_sha256.is_none());
        assert!(!report.passed());
        assert!(!artifact(&cfg, "encoded.toon").exists());
    }

    #[test]
    fn decode_failure_keeps_encoded_artifact() {
        let (_tmp, cfg) = setup(r#"{"a": [1, 2]}"#, None);
        let report = run_verification(&cfg, &BrokenCodec::Decode).unwrap();

        match &report.phases[1].outcome {
            PhaseOutcome::Error { message } => assert!(message.starts_with("decode failed")),
            other => panic!("expected error, got {other:?}"),
        }
        assert!(report.sizes.is_none());
        assert!(!report.passed());
        assert_eq!(report.overall, "failed");
        assert_eq!(
            fs::read_to_string(artifact(&cfg, "encoded.toon")).unwrap(),
            "a[2]: 1,2"
        );
        assert!(report.phases[1].artifact.is_some());
    }

    #[test]
    fn non_utf8_compact_document_errors_phase_a_only() {
        let (tmp, mut cfg) = setup(r#"{"a": 1}"#, None);
        let compact = tmp.path().join("test.toon");
        fs::write(&compact, [b'a', b':', b' ', 0xff, 0xfe]).unwrap();
        cfg.compact = Some(compact);

        let report = run_verification(&cfg, &ToonCodec::default()).unwrap();
        match &report.phases[0].outcome {
            PhaseOutcome::Error { message } => assert!(message.contains("not UTF-8")),
            other => panic!("expected error, got {other:?}"),
        }
        assert_eq!(report.phases[1].outcome, PhaseOutcome::Passed);
        assert!(!report.passed());
    }
}
