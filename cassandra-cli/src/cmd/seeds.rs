//! Select the seed list of a group.

use std::io::Write;

use anyhow::Result;
use cassandra_core::seeds::select_seeds;
use structopt::StructOpt;

use super::GroupArgs;
use crate::CassandraPlan;

/// Select the seed list of a group.
#[derive(StructOpt)]
#[structopt(name = "seeds")]
pub struct Seeds {
    #[structopt(flatten)]
    group: GroupArgs,
    /// The maximum number of seeds, overriding the plan config.
    #[structopt(long)]
    max: Option<usize>,
}

impl Seeds {
    pub fn run(&self, base: &CassandraPlan, out: &mut dyn Write) -> Result<()> {
        let config = base.load_config()?;
        let inventory = self.group.load()?;
        let group = self.group.select(&inventory)?;

        let seeds = select_seeds(self.max.unwrap_or(config.max_seeds), config.seeds.as_deref(), &group.members)?;
        writeln!(out, "{}", seeds)?;
        Ok(())
    }
}
