use crate::domain::models::{CompareReport, PhaseOutcome, PhaseReport, SizeReport, VerifyReport};

pub fn render_phase(p: &PhaseReport) -> Vec<String> {
    let mut out = vec![format!("--- {} ---", p.phase.title())];
    match &p.outcome {
        PhaseOutcome::Passed => out.push("PASS".to_string()),
        PhaseOutcome::Failed { mismatch } => {
            out.push(format!("FAIL: {}", mismatch));
        }
        PhaseOutcome::Skipped { reason } => out.push(format!("SKIP: {}", reason)),
        PhaseOutcome::Error { message } => out.push(format!("ERROR: {}", message)),
    }
    if let Some(artifact) = &p.artifact {
        let label = match p.outcome {
            PhaseOutcome::Failed { .. } => "saved for inspection",
            _ => "artifact",
        };
        out.push(format!("{}: {}", label, artifact));
    }
    out
}

pub fn render_sizes(s: &SizeReport) -> Vec<String> {
    vec![
        format!("Reference size (as stored): {} bytes", s.original_size),
        format!("Minified reference size: {} bytes", s.compact_json_size),
        format!("Encoded size: {} bytes", s.encoded_size),
        format!("Reduction vs stored reference: {:.2}%", s.reduction_vs_file),
        format!("Reduction vs minified reference: {:.2}%", s.reduction_vs_compact),
    ]
}

pub fn render_verify(r: &VerifyReport) -> String {
    let mut out = vec![
        format!("reference: {}", r.reference),
        format!("codec: {}", r.codec),
    ];
    for p in &r.phases {
        out.push(String::new());
        out.extend(render_phase(p));
    }
    if let Some(sizes) = &r.sizes {
        out.extend(render_sizes(sizes));
    }
    if let Some(note) = &r.size_note {
        out.push(format!("sizes omitted: {}", note));
    }
    if let Some(digest) = &r.encoded_sha256 {
        out.push(format!("encoded sha256: {}", digest));
    }
    out.push(String::new());
    out.push(format!("overall: {}", r.overall));
    out.join("\n")
}

pub fn render_compare(r: &CompareReport) -> String {
    match &r.mismatch {
        None => format!("equal: {} and {}", r.left, r.right),
        Some(m) => format!("not equal: {}", m),
    }
}
