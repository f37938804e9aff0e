use crate::cli::{commands::Commands, handlers};
use crate::error::Result;
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::path::PathBuf;

/// Control bus deploy - register applications with a control bus
#[derive(Parser, Debug)]
#[command(
    name = "controlbus-deploy",
    author = "Control Bus Team",
    version,
    about = "Register JVM applications with a control bus",
    long_about = "Registers a JVM application with a control bus service.

The classpath is assembled from the build output (jar file or classes
directory) plus either a library directory or the artifacts given with
--artifact. Credentials are exchanged for a token before the application
descriptor is submitted.

EXAMPLES:
  controlbus-deploy deploy --output-directory target/classes --lib-dir target/lib
  controlbus-deploy deploy --jar-file target/app.jar --artifact runtime=lib/db.jar
  controlbus-deploy config show
  controlbus-deploy config example > controlbus.toml

CONFIGURATION:
  Values come from controlbus.toml, then CONTROLBUS_* environment variables
  (e.g. CONTROLBUS_CONTROL_BUS__HOST), then command-line flags."
)]
pub struct Args {
    /// Configuration file path [default: controlbus.toml]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Args {
    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        let config_path = self.config.as_deref();

        match self.command {
            Commands::Deploy(options) => {
                handlers::deploy::handle_deploy(options, config_path, self.json).await
            }
            Commands::Config { action } => {
                handlers::config::handle_config(action, config_path, self.json)
            }
        }
    }
}
