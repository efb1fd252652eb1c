//! Render the property-file snitch topology of a group.

use std::io::Write;

use anyhow::Result;
use cassandra_core::topology::render_topology_properties;
use structopt::StructOpt;

use super::GroupArgs;

/// Render the property-file snitch topology of a group.
#[derive(StructOpt)]
#[structopt(name = "topology")]
pub struct Topology {
    #[structopt(flatten)]
    group: GroupArgs,
}

impl Topology {
    pub fn run(&self, out: &mut dyn Write) -> Result<()> {
        let inventory = self.group.load()?;
        let group = self.group.select(&inventory)?;
        writeln!(out, "{}", render_topology_properties(&group.members))?;
        Ok(())
    }
}
