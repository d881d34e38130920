use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use deploy_orchestration::{ConflictAction, DirectionChoice};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod output;
mod resolver;

#[derive(Parser)]
#[command(name = "flowops")]
#[command(about = "Flowops - deployment console for the flow-orchestration platform")]
#[command(version)]
struct Cli {
    /// Console configuration file path
    #[arg(short, long, global = true, default_value = "flowops.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy selected flows onto their target instances
    Deploy {
        /// Flow ids or names to deploy
        flows: Vec<String>,

        /// Which side of each flow to deploy
        #[arg(short, long, value_enum, default_value = "both")]
        direction: DirectionArg,

        /// Version to deploy (latest when omitted)
        #[arg(long)]
        version: Option<i64>,

        /// Parameter context bound to the deployed groups
        #[arg(long)]
        parameter_context: Option<String>,

        /// How to handle an existing process group at the target location
        #[arg(long, value_enum, default_value = "ask")]
        on_conflict: OnConflict,

        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show or change deployment settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },

    /// List runtime instances
    Instances {
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show the naming hierarchy
    Hierarchy {
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show background jobs
    Jobs {
        /// Keep polling while any job is active
        #[arg(short, long)]
        watch: bool,

        /// Output format (table or json); watch mode always renders tables
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Show the persisted deployment settings
    Show {
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Change and persist deployment settings
    Set(commands::settings::SetArgs),
}

/// Which side of a flow to deploy.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum DirectionArg {
    Source,
    Destination,
    Both,
}

impl From<DirectionArg> for DirectionChoice {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Source => DirectionChoice::Source,
            DirectionArg::Destination => DirectionChoice::Destination,
            DirectionArg::Both => DirectionChoice::Both,
        }
    }
}

/// Conflict handling mode for non-interactive runs.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OnConflict {
    /// Prompt for every conflict.
    Ask,
    /// Skip every conflicting config.
    Skip,
    /// Delete the existing group and redeploy.
    Delete,
    /// Move the existing group to the selected version.
    Update,
}

impl OnConflict {
    fn fixed_action(self) -> Option<ConflictAction> {
        match self {
            OnConflict::Ask => None,
            OnConflict::Skip => Some(ConflictAction::Skip),
            OnConflict::Delete => Some(ConflictAction::Delete),
            OnConflict::Update => Some(ConflictAction::Update),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::ConsoleConfig::load(&cli.config)?;

    match cli.command {
        Commands::Deploy {
            flows,
            direction,
            version,
            parameter_context,
            on_conflict,
            format,
        } => {
            commands::deploy::run(
                &config,
                commands::deploy::DeployArgs {
                    flows,
                    direction: direction.into(),
                    version,
                    parameter_context,
                    fixed_action: on_conflict.fixed_action(),
                    format,
                },
            )
            .await
        }
        Commands::Settings { command } => match command {
            SettingsCommands::Show { format } => commands::settings::show(&config, &format).await,
            SettingsCommands::Set(args) => commands::settings::set(&config, args).await,
        },
        Commands::Instances { format } => commands::instances::run(&config, &format).await,
        Commands::Hierarchy { format } => commands::hierarchy::run(&config, &format).await,
        Commands::Jobs { watch, format } => commands::jobs::run(&config, watch, &format).await,
    }
}
