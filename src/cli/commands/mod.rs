//! CLI parser and command dispatch.

mod claimants;
mod config_cmd;
mod services;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "servicefinder")]
#[command(about = "Browse and edit services and claimants on the service finder backend")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config and environment)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Manage services
    Services {
        #[command(subcommand)]
        command: ServiceCommands,
    },

    /// Manage claimants
    Claimants {
        #[command(subcommand)]
        command: ClaimantCommands,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ServiceCommands {
    /// List services, optionally filtered or limited to a claimant's travel area
    List {
        /// Category filter
        #[arg(long)]
        category: Option<String>,
        /// Fees filter
        #[arg(long)]
        fees: Option<String>,
        /// Only services within this claimant's travel extent
        #[arg(long, conflicts_with_all = ["category", "fees"])]
        claimant: Option<i64>,
    },
    /// Add a service
    Create {
        #[command(flatten)]
        fields: ServiceArgs,
    },
    /// Edit a service (unspecified fields keep their current values)
    Edit {
        id: i64,
        #[command(flatten)]
        fields: ServiceArgs,
        /// Remove the service's location
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        clear_location: bool,
    },
    /// Delete a service
    Delete {
        id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServiceArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    url: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    fees: Option<String>,
    /// Latitude
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<String>,
    /// Longitude
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<String>,
}

#[derive(Subcommand)]
enum ClaimantCommands {
    /// List claimants
    List,
    /// Show one claimant
    Show { id: i64 },
    /// Add a claimant
    Create {
        #[command(flatten)]
        fields: ClaimantArgs,
    },
    /// Edit a claimant (unspecified fields keep their current values)
    Edit {
        id: i64,
        #[command(flatten)]
        fields: ClaimantArgs,
    },
    /// Delete a claimant
    Delete {
        id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ClaimantArgs {
    #[arg(long)]
    name: Option<String>,
    /// Home latitude
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<String>,
    /// Home longitude
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<String>,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,
}

/// Run the CLI. Exits with status 1 when a load or mutation failed.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_with(cli.config.as_deref()).await?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }

    let succeeded = match cli.command {
        Commands::Services { command } => match command {
            ServiceCommands::List {
                category,
                fees,
                claimant,
            } => {
                services::cmd_services_list(&config, category.as_deref(), fees.as_deref(), claimant)
                    .await?
            }
            ServiceCommands::Create { fields } => {
                services::cmd_services_create(&config, fields).await?
            }
            ServiceCommands::Edit {
                id,
                fields,
                clear_location,
            } => services::cmd_services_edit(&config, id, fields, clear_location).await?,
            ServiceCommands::Delete { id, yes } => {
                services::cmd_services_delete(&config, id, yes).await?
            }
        },
        Commands::Claimants { command } => match command {
            ClaimantCommands::List => claimants::cmd_claimants_list(&config).await?,
            ClaimantCommands::Show { id } => claimants::cmd_claimants_show(&config, id).await?,
            ClaimantCommands::Create { fields } => {
                claimants::cmd_claimants_create(&config, fields).await?
            }
            ClaimantCommands::Edit { id, fields } => {
                claimants::cmd_claimants_edit(&config, id, fields).await?
            }
            ClaimantCommands::Delete { id, yes } => {
                claimants::cmd_claimants_delete(&config, id, yes).await?
            }
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show => config_cmd::cmd_config_show(&config)?,
        },
    };

    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}
