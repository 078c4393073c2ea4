use clap::{Parser, Subcommand};
use figment::providers::Serialized;
use std::path::PathBuf;
use url::Url;

use crate::config::Config;
use crate::error::SchemaPushError;

/// Send a SQL schema script to a hosted database's management API.
///
/// The access token and project reference come from `schemapush.toml` or
/// the `SCHEMAPUSH_ACCESS_TOKEN` / `SCHEMAPUSH_PROJECT_REF` variables
/// (a `.env` file is honoured).
#[derive(Parser, Debug)]
#[command(name = "schemapush")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the management API base URL
    #[arg(long, global = true, value_name = "URL")]
    pub api_base: Option<Url>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply a schema script in a single request
    ///
    /// EXAMPLES:
    ///   schemapush apply sql/studio_schema.sql
    ///   cat schema.sql | schemapush apply -
    ///   schemapush apply schema.sql --dry-run
    Apply {
        /// SQL file to send, or `-` for standard input
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Target project reference (overrides config)
        #[arg(long, value_name = "REF")]
        project_ref: Option<String>,

        /// Print the request instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Check connectivity and token validity by listing organizations
    Check,
}

impl Cli {
    /// Resolve config with command-line overrides layered on top.
    pub fn resolve_config(&self) -> Result<Config, SchemaPushError> {
        let mut figment = Config::figment(self.config.as_deref())?;
        if let Some(api_base) = self.api_base.as_ref() {
            figment = figment.merge(Serialized::default("api_base", api_base.as_str()));
        }
        if let Commands::Apply {
            project_ref: Some(project_ref),
            ..
        } = &self.command
        {
            figment = figment.merge(Serialized::default("project_ref", project_ref));
        }
        Ok(figment.extract()?)
    }
}
