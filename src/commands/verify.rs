use crate::cli::{Cli, Commands};
use crate::commands::Verdict;
use crate::domain::models::ConfigFile;
use crate::services::artifacts::ArtifactStore;
use crate::services::config::{artifacts_dir, build_codec};
use crate::services::output::print_one;
use crate::services::pipeline::{run_verification, PipelineConfig};
use crate::services::report::render_verify;

pub fn handle_verify_commands(cli: &Cli, config: &ConfigFile) -> anyhow::Result<Option<Verdict>> {
    let Commands::Verify {
        reference,
        compact,
        artifacts_dir: dir_flag,
        codec,
    } = &cli.command
    else {
        return Ok(None);
    };

    let codec = build_codec(codec, &config.codec)?;
    let pipeline = PipelineConfig {
        reference: reference.clone(),
        compact: compact.clone(),
        artifacts: ArtifactStore::new(artifacts_dir(dir_flag.as_deref(), &config.artifacts)),
    };
    tracing::info!(codec = %codec.describe(), reference = %reference.display(), "starting verification");

    let report = run_verification(&pipeline, codec.as_ref())?;
    let passed = report.passed();
    print_one(cli.json, passed, &report, render_verify)?;
    Ok(Some(Verdict::from_ok(passed)))
}
