//! Build the repair crontab line of a member.

use std::io::Write;

use anyhow::Result;
use cassandra_core::repair::build_repair_cron_expression;
use structopt::StructOpt;

use crate::CassandraPlan;

/// Build the repair crontab line of a member.
#[derive(StructOpt)]
#[structopt(name = "repair")]
pub struct Repair {
    /// The index of the member within its group.
    #[structopt(long)]
    index: usize,
    /// The number of members in the group.
    #[structopt(long)]
    size: usize,
    /// The cron day of week, overriding the plan config.
    #[structopt(long)]
    day: Option<u8>,
    /// The keyspace to repair, overriding the plan config.
    #[structopt(long)]
    keyspace: Option<String>,
}

impl Repair {
    pub fn run(&self, base: &CassandraPlan, out: &mut dyn Write) -> Result<()> {
        let config = base.load_config()?;
        let day = self.day.or(config.repair_day);
        let keyspace = self.keyspace.as_deref().or_else(|| config.repair_keyspace.as_deref());

        let line = build_repair_cron_expression(self.index, self.size, day, keyspace)?;
        writeln!(out, "{}", line)?;
        Ok(())
    }
}
