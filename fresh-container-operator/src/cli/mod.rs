//! Command line of the fresh container operator.
//!
//! # Examples
//!
//! ```bash
//! # Install the FreshContainerMonitor resource definition
//! fresh-container-operator crd | kubectl apply -f -
//!
//! # Start the controller
//! fresh-container-operator run
//!
//! # Ask a fresh container server about one image
//! fresh-container-operator evaluate --server http://fresh-container:8080 \
//!     --image registry.example.com/app:1.0 --constraint '>= 1.0, < 2'
//!
//! # Show what the operator recorded on deployments
//! fresh-container-operator status --namespace shop
//! ```

mod crd;
pub mod error;
mod evaluate;
mod run;
mod status;

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use clap::{CommandFactory, Parser, Subcommand};
use snafu::ResultExt;
use tokio::runtime::Runtime;

pub use self::error::Error;
use self::{evaluate::EvaluateCommand, run::RunCommand, status::StatusCommand};
use crate::{config::Config, shadow};

/// Entry point of the command line.
#[derive(Parser)]
#[command(
    name = fresh_container_base::CLI_PROGRAM_NAME,
    author,
    version,
    long_version = shadow::CLAP_LONG_VERSION,
    about = "Kubernetes operator keeping container images of deployments fresh.",
    long_about = "Watches FreshContainerMonitor resources and, for every deployment whose pod \
                  template declares version constraints, asks a fresh container server whether \
                  a newer compliant image tag exists. Findings are recorded as annotations and \
                  labels on the deployment, and images are rewritten when the deployment opts \
                  in to autopilot.",
    color = clap::ColorChoice::Always
)]
pub struct Cli {
    #[clap(subcommand)]
    commands: Option<Commands>,

    /// Path to the configuration file.
    #[clap(
        long = "config",
        short = 'c',
        env = "FRESH_CONTAINER_CONFIG_FILE_PATH",
        help = "Specify a configuration file. Defaults to ~/.config/fresh-container/config.yaml \
                or FRESH_CONTAINER_CONFIG_FILE_PATH env var."
    )]
    config_file: Option<PathBuf>,

    #[clap(
        long = "log-level",
        env = "FRESH_CONTAINER_LOG_LEVEL",
        help = "Set the logging level (e.g., info, debug, trace)."
    )]
    log_level: Option<tracing::Level>,
}

#[derive(Clone, Subcommand)]
pub enum Commands {
    #[command(about = "Display client and server version information")]
    Version {
        #[clap(long = "client", help = "If true, shows client version only (no server required).")]
        client: bool,
    },

    #[command(about = "Generate shell completion script for the specified shell (bash, zsh, fish)")]
    Completions { shell: clap_complete::Shell },

    #[command(about = "Output the default configuration in YAML format")]
    DefaultConfig,

    #[command(about = "Output the FreshContainerMonitor CustomResourceDefinition in YAML format")]
    Crd,

    /// Starts the controller; this is also what happens without a subcommand.
    #[command(alias = "r", about = "Watch FreshContainerMonitor resources and check deployments")]
    Run(RunCommand),

    #[command(
        aliases = ["e", "eval"],
        about = "Ask a fresh container server whether an image can be upgraded"
    )]
    Evaluate(EvaluateCommand),

    #[command(alias = "s", about = "Show the freshness state recorded on deployments")]
    Status(StatusCommand),
}

impl Default for Cli {
    fn default() -> Self { Self::parse() }
}

impl Cli {
    /// Loads the configuration, applying the overrides given on the command
    /// line.
    ///
    /// Also returns the searched path when no configuration file was found
    /// there and the defaults apply.
    fn load_config(&self) -> Result<(Config, Option<PathBuf>), Error> {
        let (mut config, missing_file) =
            load_config_file(self.config_file.as_deref(), Config::search_config_file_path)?;

        if let Some(log_level) = self.log_level {
            config.log.level = log_level;
        }

        Ok((config, missing_file))
    }

    /// Executes the parsed command and returns the process exit code.
    ///
    /// # Errors
    ///
    /// Returns an `Error` when the configuration cannot be loaded, the
    /// Kubernetes client or the Tokio runtime cannot be initialized, or the
    /// command itself fails.
    ///
    /// # Panics
    ///
    /// Panics when writing to `stdout` fails.
    pub fn run(self) -> Result<i32, Error> {
        let client_version = Self::command().get_version().unwrap_or_default().to_string();
        match self.commands {
            Some(Commands::Version { client }) if client => {
                std::io::stdout()
                    .write_all(Self::command().render_long_version().as_bytes())
                    .expect("Failed to write to stdout");
                std::io::stdout()
                    .write_all(format!("Client Version: {client_version}\n").as_bytes())
                    .expect("Failed to write to stdout");

                return Ok(0);
            }
            Some(Commands::Completions { shell }) => {
                let mut app = Self::command();
                let bin_name = app.get_name().to_string();
                clap_complete::generate(shell, &mut app, bin_name, &mut std::io::stdout());
                return Ok(0);
            }
            Some(Commands::DefaultConfig) => {
                std::io::stdout()
                    .write_all(Config::template_basic().as_slice())
                    .expect("Failed to write to stdout");
                return Ok(0);
            }
            Some(Commands::Crd) => {
                std::io::stdout()
                    .write_all(crd::render()?.as_bytes())
                    .expect("Failed to write to stdout");
                return Ok(0);
            }
            _ => {}
        }

        let (config, missing_config_file) = self.load_config()?;
        config.log.registry();
        if let Some(path) = missing_config_file {
            tracing::info!("No configuration file found at {}, using defaults", path.display());
        }

        let fut = async move {
            if let Some(Commands::Evaluate(cmd)) = self.commands {
                cmd.run().await?;
                return Ok(0);
            }

            let kube_client = kube::Client::try_default().await.context(error::KubeConfigSnafu)?;
            match self.commands {
                Some(Commands::Version { .. }) => {
                    let server_version = kube_client.apiserver_version().await.map_or_else(
                        |_| "unknown".to_string(),
                        |info| format!("{}.{}", info.major, info.minor),
                    );
                    let info = format!(
                        "Client Version: {client_version}\nServer Version: {server_version}\n",
                    );
                    std::io::stdout()
                        .write_all(Self::command().render_long_version().as_bytes())
                        .expect("Failed to write to stdout");
                    std::io::stdout()
                        .write_all(info.as_bytes())
                        .expect("Failed to write to stdout");
                }
                Some(Commands::Status(cmd)) => cmd.run(kube_client).await?,
                Some(Commands::Run(cmd)) => cmd.run(kube_client, config).await?,
                _ => RunCommand::default().run(kube_client, config).await?,
            }

            Ok(0)
        };

        Runtime::new().context(error::InitializeTokioRuntimeSnafu)?.block_on(fut)
    }
}

/// An explicitly given file must exist; the searched location may be absent,
/// in which case the defaults apply and the searched path is returned.
fn load_config_file<F>(
    config_file: Option<&Path>,
    search: F,
) -> Result<(Config, Option<PathBuf>), Error>
where
    F: FnOnce() -> PathBuf,
{
    if let Some(path) = config_file {
        return Ok((Config::load(path)?, None));
    }

    let path = search();
    match Config::load_if_exists(&path)? {
        Some(config) => Ok((config, None)),
        None => Ok((Config::default(), Some(path))),
    }
}
