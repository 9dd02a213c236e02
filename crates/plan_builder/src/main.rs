//! Plan Builder CLI
//!
//! Roster (CSV/JSON) → single-bowler plan or multi-bowler spell

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use bp_core::engine::{GenerationParams, PlanEngine, PlannerConfig, SpellParams};
#[cfg(feature = "cli")]
use bp_core::models::{Phase, Pitch};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use plan_builder::ExportFormat;
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "plan_builder", version = bp_core::VERSION)]
#[command(about = "Build deterministic bowling plans from a roster file", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// List (or search) the bowlers in a roster file
    Roster {
        /// Roster file (.csv or .json)
        #[arg(long)]
        roster: PathBuf,

        /// Case-insensitive filter on id, name, style and strengths
        #[arg(long)]
        search: Option<String>,
    },

    /// Plan one or more overs for a single bowler
    Plan {
        /// Roster file (.csv or .json)
        #[arg(long)]
        roster: PathBuf,

        /// Bowler id from the roster
        #[arg(long)]
        bowler: String,

        /// powerplay, middle or death
        #[arg(long, default_value = "middle")]
        phase: Phase,

        /// flat (normal), green, dusty or dry
        #[arg(long, default_value = "flat")]
        pitch: Pitch,

        /// Overs to plan (1-10)
        #[arg(long, default_value_t = 1)]
        overs: u32,

        /// Variation salt; same salt = same plan
        #[arg(long)]
        salt: Option<String>,

        /// table, csv or json
        #[arg(long, default_value = "table")]
        format: ExportFormat,

        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Planner tuning JSON
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Interleave several bowlers into a spell
    Spell {
        /// Roster file (.csv or .json)
        #[arg(long)]
        roster: PathBuf,

        /// <bowler_id>:<overs>, repeat in bowling order
        #[arg(long = "item", required = true)]
        items: Vec<String>,

        /// powerplay, middle or death
        #[arg(long, default_value = "middle")]
        phase: Phase,

        /// flat (normal), green, dusty or dry
        #[arg(long, default_value = "flat")]
        pitch: Pitch,

        /// Prefix for every over's salt
        #[arg(long)]
        salt: Option<String>,

        /// Deterministically shuffle the bowling order first
        #[arg(long, default_value = "false")]
        shuffle: bool,

        /// table, csv or json
        #[arg(long, default_value = "table")]
        format: ExportFormat,

        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Planner tuning JSON
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Roster { roster, search } => {
            let (roster, stats) = plan_builder::load_roster(&roster)?;
            let hits = roster.search(search.as_deref().unwrap_or(""));
            for b in &hits {
                println!(
                    "{:<16} {:<24} {:<6} {:<24} {}",
                    b.id,
                    b.name,
                    b.handedness.to_string(),
                    b.archetype.label(),
                    b.strengths.join(", ")
                );
            }
            println!("\n{} of {} bowlers ({} rows skipped)", hits.len(), roster.len(), stats.failed);
        }

        Commands::Plan { roster, bowler, phase, pitch, overs, salt, format, out, config } => {
            let engine = engine_from(config.as_deref())?;
            let (roster, _) = plan_builder::load_roster(&roster)?;
            let mut params = GenerationParams::new(phase, pitch, overs);
            params.salt = salt;

            let output = plan_builder::build_plan(&engine, &roster, &bowler, &params, format)?;
            emit(&output, out.as_deref())?;
        }

        Commands::Spell { roster, items, phase, pitch, salt, shuffle, format, out, config } => {
            let engine = engine_from(config.as_deref())?;
            let (roster, _) = plan_builder::load_roster(&roster)?;
            let items = items
                .iter()
                .map(|arg| plan_builder::parse_spell_item(arg))
                .collect::<Result<Vec<_>>>()?;
            let params = SpellParams { phase, pitch, salt: salt.unwrap_or_default(), shuffle_order: shuffle };

            let output = plan_builder::build_spell(&engine, &roster, &items, &params, format)?;
            emit(&output, out.as_deref())?;
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn engine_from(config: Option<&Path>) -> Result<PlanEngine> {
    let config = match config {
        Some(path) => plan_builder::load_config(path)?,
        None => PlannerConfig::default(),
    };
    Ok(PlanEngine::with_config(config))
}

#[cfg(feature = "cli")]
fn emit(output: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, output)?;
            tracing::info!(path = %path.display(), bytes = output.len(), "plan written");
        }
        None => print!("{}", output),
    }
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("plan_builder CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
