use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use steady_core::Tracker;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod state;

use state::FileStore;

#[derive(Parser, Debug)]
#[command(name = "steady", version, about = "Steady: recovery tools, achievements and your journey")]
struct Cli {
    /// More log output (-v debug, -vv trace); overrides the config level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage ~/.steady/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    #[command(flatten)]
    Tracked(TrackedCommand),
}

/// Commands that open the data store.
#[derive(Subcommand, Debug)]
enum TrackedCommand {
    /// Record an entry in one of the tools
    Log {
        /// Local time of the entry, "YYYY-MM-DD HH:MM" (default: now)
        #[arg(long, global = true)]
        at: Option<String>,

        #[command(subcommand)]
        entry: commands::LogCommand,
    },

    /// Set, update and review goals
    Goal {
        #[command(subcommand)]
        command: commands::GoalCommand,
    },

    /// Edit or print a plan
    Plan {
        #[command(subcommand)]
        command: commands::PlanCommand,
    },

    /// Print a plan as plain text for sharing
    Share { plan: PlanArg },

    /// Update your profile (only the given fields change)
    Profile(commands::ProfileArgs),

    /// Open a learning page, e.g. `cognitive-distortions`
    Learn { topic: String },

    /// Record a login
    Login,

    /// Show the achievements gallery
    Achievements {
        /// Only list unlocked achievements
        #[arg(long)]
        unlocked: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show every tool's entries as one timeline, newest first
    Journey {
        #[arg(long, default_value_t = 20)]
        limit: usize,

        #[arg(long)]
        json: bool,
    },

    /// Delete all data, including unlocked achievements
    Reset {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,
    /// Print the effective configuration
    Show,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum PlanArg {
    Safety,
    Relapse,
}

impl From<PlanArg> for steady_tools::PlanKind {
    fn from(p: PlanArg) -> Self {
        match p {
            PlanArg::Safety => steady_tools::PlanKind::Safety,
            PlanArg::Relapse => steady_tools::PlanKind::RelapsePrevention,
        }
    }
}

fn init_tracing(verbose: u8, config_level: &str) {
    let level = match verbose {
        0 => config_level,
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("steady={level},steady_core={level},steady_tools={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    init_tracing(cli.verbose, &cfg.log.level);
    debug!(
        "steady v{} ({}) tz={}",
        env!("CARGO_PKG_VERSION"),
        env!("STEADY_BUILD_SHA"),
        cfg.engine.timezone
    );

    match cli.command {
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(),
            ConfigCommand::Show => config::show_config(),
        },
        Command::Tracked(command) => run(command, &cfg),
    }
}

fn run(command: TrackedCommand, cfg: &config::Config) -> Result<()> {
    let data = state::data_dir()?;
    let store = FileStore::open(&data).with_context(|| format!("open data dir {}", data.display()))?;
    let mut tracker = Tracker::new(store, &cfg.engine);
    let tz = cfg.engine.timezone;

    match command {
        TrackedCommand::Log { at, entry } => commands::log_entry(&mut tracker, entry, at.as_deref(), tz)?,
        TrackedCommand::Goal { command } => commands::goal(&mut tracker, command, tz)?,
        TrackedCommand::Plan { command } => commands::plan(&mut tracker, command)?,
        TrackedCommand::Share { plan } => {
            let text = steady_tools::share_plan(&mut tracker, plan.into())?;
            println!("{text}");
        }
        TrackedCommand::Profile(args) => commands::profile(&mut tracker, args)?,
        TrackedCommand::Learn { topic } => {
            let event = format!("visited_{}", topic.trim().to_lowercase().replace(['-', ' '], "_"));
            tracker.record_event(&event)?;
            println!("Opened {topic}");
        }
        TrackedCommand::Login => {
            tracker.record_login(steady_core::Timestamp::now())?;
            println!("Welcome back.");
        }
        TrackedCommand::Achievements { unlocked, json } => commands::achievements(&tracker, unlocked, json)?,
        TrackedCommand::Journey { limit, json } => commands::journey(&tracker, limit, tz, json)?,
        TrackedCommand::Reset { yes } => {
            if !yes {
                bail!("this deletes all data; re-run with --yes to confirm");
            }
            tracker.reset()?;
            println!("All data cleared.");
        }
    }

    let report = tracker.dispatch()?;
    debug!(passes = report.passes, dropped = report.dropped, "dispatch complete");
    while let Some(toast) = tracker.next_toast() {
        println!("🏆 Achievement unlocked: {} {}", toast.icon, toast.title);
    }

    Ok(())
}
