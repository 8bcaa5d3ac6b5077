//! Clarion assessment report generator CLI
//!
//! Builds a report pipeline from session data, report configs and an output
//! directory, then runs one command against it. Listings and previews are
//! printed as JSON on stdout.
//!
//! Usage:
//!   cargo run -p cli -- sessions
//!   cargo run -p cli -- configs as_hr_02
//!   cargo run -p cli -- preview session_001
//!   cargo run -p cli -- --out-dir ./out generate session_001
//!   cargo run -p cli -- --manifest verify report-session_001-1736942400000.html

use std::path::PathBuf;

use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use clarion_archive::{FsArtifactMedium, ManifestArtifactMedium};
use clarion_config::FileConfigRegistry;
use clarion_contracts::error::{ClarionError, ClarionResult};
use clarion_core::{
    traits::{ArtifactMedium, ConfigRegistry, SessionRepository},
    ReportPipeline,
};
use clarion_ref_assessments::{builtin_registry, HtmlRenderer, InMemorySessionRepository};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Clarion: configuration-driven assessment reports.
#[derive(Parser)]
#[command(
    name = "clarion",
    about = "Generate assessment reports from session data and report configs",
    long_about = "Generates HTML assessment reports by extracting values from session\n\
                  records according to a report configuration, and lists the reports\n\
                  already generated."
)]
struct Cli {
    /// JSON array of session records. Defaults to the bundled sample sessions.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Report configuration file (.toml or .json). Defaults to the bundled config.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory generated reports are written to and listed from.
    #[arg(long, global = true, default_value = "./generated-reports")]
    out_dir: PathBuf,

    /// Record each report in a report-metadata.json manifest with its digest.
    #[arg(long, global = true)]
    manifest: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every session with its assessment name.
    Sessions,
    /// Summarize all report configs, or print one in full.
    Configs {
        assessment_id: Option<String>,
    },
    /// Print one session record and the config that applies to it.
    Session { session_id: String },
    /// Print the assembled report model without rendering it.
    Preview { session_id: String },
    /// Render and store a report for one session.
    Generate { session_id: String },
    /// List generated reports, newest first.
    Reports,
    /// Check a generated report against its manifest digest (requires --manifest).
    Verify { filename: String },
}

impl Cli {
    /// Cross-argument rules clap cannot express for global flags.
    fn validate(&self) -> Result<(), clap::Error> {
        if matches!(self.command, Command::Verify { .. }) && !self.manifest {
            return Err(Cli::command().error(
                ErrorKind::MissingRequiredArgument,
                "verify requires --manifest: plain report directories keep no digests",
            ));
        }
        Ok(())
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug to see per-field extraction.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    if let Err(e) = cli.validate() {
        e.exit();
    }

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> ClarionResult<()> {
    let pipeline = || build_pipeline(cli);

    match &cli.command {
        Command::Sessions => print_json(&json!({
            "sessions": pipeline()?.sessions()
        })),
        Command::Configs { assessment_id: None } => print_json(&json!({
            "configurations": pipeline()?.config_summaries()
        })),
        Command::Configs {
            assessment_id: Some(id),
        } => {
            let pipeline = pipeline()?;
            print_json(&json!({
                "assessment_id": id,
                "config": pipeline.config(id)?
            }))
        }
        Command::Session { session_id } => {
            let pipeline = pipeline()?;
            let (record, config) = pipeline.session_detail(session_id)?;
            print_json(&json!({
                "session": record,
                "config": config,
                "config_available": config.is_some()
            }))
        }
        Command::Preview { session_id } => print_json(&pipeline()?.preview_assembly(session_id)?),
        Command::Generate { session_id } => {
            let artifact = pipeline()?.generate(session_id)?;
            info!(filename = %artifact.filename, "report written");
            print_json(&artifact)
        }
        Command::Reports => print_json(&json!({
            "reports": pipeline()?.list_artifacts()?
        })),
        Command::Verify { filename } => {
            let intact = ManifestArtifactMedium::new(&cli.out_dir).verify(filename)?;
            print_json(&json!({
                "filename": filename,
                "intact": intact
            }))
        }
    }
}

// ── Wiring ────────────────────────────────────────────────────────────────────

fn build_pipeline(cli: &Cli) -> ClarionResult<ReportPipeline> {
    let sessions: Box<dyn SessionRepository> = match &cli.data {
        Some(path) => Box::new(InMemorySessionRepository::from_file(path)?),
        None => Box::new(InMemorySessionRepository::sample()),
    };

    let configs: Box<dyn ConfigRegistry> = match &cli.config {
        Some(path) => Box::new(FileConfigRegistry::from_file(path)?),
        None => Box::new(builtin_registry()?),
    };

    let medium: Box<dyn ArtifactMedium> = if cli.manifest {
        Box::new(ManifestArtifactMedium::new(&cli.out_dir))
    } else {
        Box::new(FsArtifactMedium::new(&cli.out_dir))
    };

    Ok(ReportPipeline::new(
        sessions,
        configs,
        Box::new(HtmlRenderer::new()),
        medium,
    ))
}

// ── Output ────────────────────────────────────────────────────────────────────

fn print_json<T: Serialize>(value: &T) -> ClarionResult<()> {
    let text = serde_json::to_string_pretty(value).map_err(|e| ClarionError::RenderFailed {
        reason: format!("failed to encode output as JSON: {}", e),
    })?;
    println!("{}", text);
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
