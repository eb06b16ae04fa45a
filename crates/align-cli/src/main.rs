//! ALIGN CLI - Command-line interface for the ethics decision engine

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use align_core::{
    BasicGovernance, DecisionRecord, Engine, EngineConfig, GovernanceSink, Intervention,
    JsonDirSource, PresetSource, RequestContext, UserRole, WeightProfile, WeightProfileSource,
};
use anyhow::{bail, Context};
use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "align")]
#[command(about = "ALIGN - Ethics decision support for assistant requests")]
struct Cli {
    /// Engine configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Decide on a single request
    Decide {
        /// Request text
        text: String,
        /// Weight profile name
        #[arg(short, long, default_value = "default")]
        profile: String,
        /// Directory with <name>.json weight profiles (presets if unset)
        #[arg(long)]
        profiles_dir: Option<PathBuf>,
        /// Simulation depth for this request
        #[arg(long)]
        max_depth: Option<usize>,
        /// Role used for the governance review
        #[arg(long, default_value = "user")]
        role: UserRole,
        /// Print the full decision record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Decide on every line of a file, concurrently
    Batch {
        /// Input file, one request per line
        #[arg(short, long)]
        input: PathBuf,
        /// Weight profile name
        #[arg(short, long, default_value = "default")]
        profile: String,
        /// Directory with <name>.json weight profiles (presets if unset)
        #[arg(long)]
        profiles_dir: Option<PathBuf>,
    },
    /// Validate a weight profile file
    CheckProfile {
        /// Profile file (JSON map of principle to weight)
        #[arg(short, long)]
        file: PathBuf,
    },
    /// List the conflict categories in use
    Categories,
}

/// One line of batch output.
#[derive(Serialize)]
struct BatchLine {
    line: usize,
    record: DecisionRecord,
    intervention: Intervention,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let engine = load_engine(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Decide {
            text,
            profile,
            profiles_dir,
            max_depth,
            role,
            json,
        }) => {
            let profile = load_profile(&profile, profiles_dir)?;
            let mut ctx = RequestContext::new();
            if let Some(depth) = max_depth {
                ctx = ctx.with_max_depth(depth);
            }

            let record = engine.decide(&text, &profile, &ctx);
            let intervention = BasicGovernance::new().review(&record, role);

            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print_record(&record, &intervention);
            }
        }
        Some(Commands::Batch {
            input,
            profile,
            profiles_dir,
        }) => {
            let profile = load_profile(&profile, profiles_dir)?;
            run_batch(Arc::new(engine), profile, &input).await?;
        }
        Some(Commands::CheckProfile { file }) => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let raw: BTreeMap<String, f64> =
                serde_json::from_str(&json).context("profile must be a JSON object of numbers")?;
            match WeightProfile::from_named(&raw) {
                Ok(profile) => {
                    println!("Profile OK: {}", file.display());
                    for (principle, weight) in profile.iter() {
                        println!("  {:<12} {:.2}", principle, weight);
                    }
                }
                Err(e) => bail!("invalid profile {}: {}", file.display(), e),
            }
        }
        Some(Commands::Categories) => {
            for category in engine.categories().iter() {
                let principles = category
                    .principles()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join("+");
                println!(
                    "{:<16} {:<22} risk {:.2}  {} triggers",
                    category.name,
                    principles,
                    category.risk_weight,
                    category.triggers.len()
                );
            }
        }
        None => {
            println!("ALIGN v{} - Use --help for commands", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn load_engine(path: Option<&Path>) -> anyhow::Result<Engine> {
    let config = match path {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    Ok(Engine::new(config)?)
}

fn load_profile(name: &str, dir: Option<PathBuf>) -> anyhow::Result<WeightProfile> {
    let profile = match dir {
        Some(dir) => JsonDirSource::new(dir).load(name)?,
        None => PresetSource.load(name)?,
    };
    debug!(profile = name, "weight profile resolved");
    Ok(profile)
}

async fn run_batch(engine: Arc<Engine>, profile: WeightProfile, input: &Path) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("reading {}", input.display()))?;

    let mut handles = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let engine = Arc::clone(&engine);
        let text = line.to_string();
        handles.push(tokio::task::spawn_blocking(move || {
            let record = engine.decide(&text, &profile, &RequestContext::new());
            let intervention = BasicGovernance::new().review(&record, UserRole::User);
            BatchLine {
                line: index + 1,
                record,
                intervention,
            }
        }));
    }

    let total = handles.len();
    for handle in handles {
        let line = handle.await.context("batch worker failed")?;
        println!("{}", serde_json::to_string(&line)?);
    }
    info!(requests = total, "batch finished");
    Ok(())
}

fn print_record(record: &DecisionRecord, intervention: &Intervention) {
    println!("Path:         {}", record.path);
    println!("Confidence:   {:.2}", record.confidence);
    println!("Tone:         {}", record.tone);
    if let Some(ethics) = &record.ethics {
        println!("Overall:      {:.2}", ethics.overall_score);
        for (principle, score) in &ethics.scores {
            println!("  {:<12} {:.2}", principle, score);
        }
    }
    if let Some(risk) = &record.risk {
        println!("Risk:         {:.2}", risk.weighted_risk);
        println!("              {}", risk.explanation);
    }
    if !record.violations.is_empty() {
        let violations = record
            .violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        println!("Violations:   {}", violations);
    }
    if record.fallback {
        println!("Fallback:     yes");
    }
    println!("Governance:   {}", intervention);
    println!();
    println!("{}", record.response);
}
