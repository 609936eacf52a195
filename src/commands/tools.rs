use crate::cli::{Cli, Commands};
use crate::commands::Verdict;
use crate::domain::models::{CompareReport, ConfigFile};
use crate::services::compare::compare_root;
use crate::services::config::build_codec;
use crate::services::output::{emit_document, print_one};
use crate::services::pipeline::load_ground_truth;
use crate::services::report::render_compare;
use anyhow::Context;

pub fn handle_tool_commands(cli: &Cli, config: &ConfigFile) -> anyhow::Result<Option<Verdict>> {
    match &cli.command {
        Commands::Encode {
            input,
            output,
            codec,
        } => {
            let codec = build_codec(codec, &config.codec)?;
            let truth = load_ground_truth(input)?;
            let doc = codec
                .encode(&truth.tree)
                .with_context(|| format!("encode {}", input.display()))?;
            emit_document(output.as_deref(), &doc)?;
        }
        Commands::Decode {
            input,
            output,
            codec,
        } => {
            let codec = build_codec(codec, &config.codec)?;
            let doc = std::fs::read_to_string(input)
                .with_context(|| format!("read compact document {}", input.display()))?;
            let tree = codec
                .decode(&doc)
                .with_context(|| format!("decode {}", input.display()))?;
            emit_document(output.as_deref(), &serde_json::to_string_pretty(&tree)?)?;
        }
        Commands::Compare { left, right } => {
            let a = load_ground_truth(left)?;
            let b = load_ground_truth(right)?;
            let mismatch = compare_root(&a.tree, &b.tree).err();
            let report = CompareReport {
                equal: mismatch.is_none(),
                left: left.display().to_string(),
                right: right.display().to_string(),
                mismatch,
            };
            print_one(cli.json, report.equal, &report, render_compare)?;
            return Ok(Some(Verdict::from_ok(report.equal)));
        }
        _ => return Ok(None),
    }
    Ok(Some(Verdict::Passed))
}
