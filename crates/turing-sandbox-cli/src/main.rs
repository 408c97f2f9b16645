//! Turing Sandbox CLI: run and grade Turing machines, browse the level
//! catalog, manage saved machines and host the collaboration relay.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{config as config_cmd, eval, levels, machines, run, serve};
use config::Config;

/// Turing Sandbox CLI.
#[derive(Parser, Debug)]
#[command(
    name = "tsb",
    author,
    version,
    about = "Turing Sandbox: build, run and grade Turing machines",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a machine once on an input and print the result.
    Run {
        /// Machine file, or the name of a saved machine.
        machine: String,

        /// Input word written to tape 1.
        #[arg(short, long, default_value = "")]
        input: String,

        /// Print every step with the tapes.
        #[arg(long)]
        trace: bool,

        /// Stop after this many steps (defaults to the transform step cap).
        #[arg(long)]
        max_steps: Option<usize>,
    },

    /// Grade a machine against a level.
    Eval {
        /// Machine file, or the name of a saved machine.
        machine: String,

        /// Built-in level name, or a level / share-string file.
        #[arg(short, long)]
        level: String,

        /// Record the level as completed, with this machine as its solution.
        #[arg(long)]
        save_progress: bool,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List built-in levels, or show one.
    Levels {
        /// Level to describe.
        #[arg(long)]
        show: Option<String>,

        /// With --show, print the level's share string instead.
        #[arg(long, requires = "show")]
        share: bool,
    },

    /// Manage saved machines.
    #[command(subcommand)]
    Machines(MachineCommands),

    /// Host the session relay.
    Serve {
        /// Port to listen on (defaults to the configured relay port).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Inspect CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum MachineCommands {
    /// List saved machines.
    List,

    /// Describe a machine.
    Show {
        /// Saved machine name or machine file.
        name: String,
    },

    /// Delete a saved machine.
    Delete {
        name: String,
    },

    /// Copy a machine file into the save directory.
    Import {
        path: PathBuf,

        /// Save under this name instead of the document's own.
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the effective configuration.
    Show,
    /// Print the config file path.
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing based on verbosity; RUST_LOG takes precedence
    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Run {
            machine,
            input,
            trace,
            max_steps,
        } => run::execute(
            &config,
            &run::RunOptions {
                machine,
                input,
                trace,
                max_steps,
            },
        ),
        Commands::Eval {
            machine,
            level,
            save_progress,
            json,
        } => eval::execute(&config, &machine, &level, save_progress, json),
        Commands::Levels { show, share } => match show {
            Some(name) => levels::show(&name, share),
            None => levels::list(&config),
        },
        Commands::Machines(cmd) => match cmd {
            MachineCommands::List => machines::list(&config),
            MachineCommands::Show { name } => machines::show(&config, &name),
            MachineCommands::Delete { name } => machines::delete(&config, &name),
            MachineCommands::Import { path, name } => machines::import(&config, &path, name.as_deref()),
        },
        Commands::Serve { port } => serve::execute(port.unwrap_or(config.relay_port)).await,
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => config_cmd::show(&config),
            ConfigCommands::Path => config_cmd::path(),
        },
    }
}
