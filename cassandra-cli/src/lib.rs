//! The Cassandra planning CLI.

mod cmd;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cassandra_core::config::EnvOverrides;
use cassandra_core::{Inventory, PlanConfig, Planner, ProviderRegistry};
use structopt::StructOpt;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// The Cassandra planning CLI.
#[derive(StructOpt)]
#[structopt(name = "cassandra-plan")]
pub struct CassandraPlan {
    #[structopt(subcommand)]
    action: CassandraPlanSubcommands,
    /// Enable debug logging.
    #[structopt(short)]
    verbose: bool,
    /// The path to the plan config YAML file.
    ///
    /// When omitted, the default config is used. `CASSANDRA_` prefixed environment variables
    /// override values of the config in both cases.
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,
}

impl CassandraPlan {
    pub fn run(self) -> Result<()> {
        // Initialize logging based on CLI config. Logs go to stderr, leaving stdout for output.
        let fmt_layer = fmt::layer().with_target(true).with_writer(io::stderr);
        let filter_layer;
        let level_filter;
        if self.verbose {
            filter_layer = EnvFilter::new("debug");
            level_filter = LevelFilter::DEBUG;
        } else {
            filter_layer = EnvFilter::new("info");
            level_filter = LevelFilter::INFO;
        }
        tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .with(level_filter)
            .init();

        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.execute(&mut out)
    }

    /// Execute the selected subcommand, writing its output to the given writer.
    pub fn execute(&self, out: &mut dyn Write) -> Result<()> {
        match &self.action {
            CassandraPlanSubcommands::Plan(inner) => inner.run(self, out),
            CassandraPlanSubcommands::Tokens(inner) => inner.run(out),
            CassandraPlanSubcommands::Seeds(inner) => inner.run(self, out),
            CassandraPlanSubcommands::Repair(inner) => inner.run(self, out),
            CassandraPlanSubcommands::Topology(inner) => inner.run(out),
        }
    }

    /// Load the plan config based on runtime config.
    pub fn load_config(&self) -> Result<PlanConfig> {
        match &self.config {
            Some(path) => PlanConfig::load(path),
            None => {
                let mut config = PlanConfig::default();
                config.apply_env(EnvOverrides::from_env()?);
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Build a new planner based on runtime config.
    pub fn planner(&self) -> Result<Planner> {
        Planner::new(self.load_config()?, ProviderRegistry::default())
    }
}

/// Load an inventory snapshot from the given YAML file.
pub(crate) fn load_inventory(path: &Path) -> Result<Inventory> {
    let yaml = std::fs::read_to_string(path).with_context(|| format!("error reading inventory {:?}", path))?;
    Inventory::from_yaml_str(&yaml).with_context(|| format!("error loading inventory {:?}", path))
}

#[derive(StructOpt)]
pub enum CassandraPlanSubcommands {
    /// Plan the members of a group.
    #[structopt(name = "plan")]
    Plan(cmd::plan::Plan),
    /// Compute evenly spaced ring tokens.
    #[structopt(name = "tokens")]
    Tokens(cmd::tokens::Tokens),
    /// Select the seed list of a group.
    #[structopt(name = "seeds")]
    Seeds(cmd::seeds::Seeds),
    /// Build the repair crontab line of a member.
    #[structopt(name = "repair")]
    Repair(cmd::repair::Repair),
    /// Render the property-file snitch topology of a group.
    #[structopt(name = "topology")]
    Topology(cmd::topology::Topology),
}
