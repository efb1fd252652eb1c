//! Plan the members of a group.

use std::io::Write;

use anyhow::{Context, Result};
use structopt::StructOpt;

use super::GroupArgs;
use crate::CassandraPlan;

/// Plan the members of a group.
#[derive(StructOpt)]
#[structopt(name = "plan")]
pub struct Plan {
    #[structopt(flatten)]
    group: GroupArgs,
    /// Plan only the member with the given ID.
    #[structopt(short, long)]
    member: Option<String>,
    /// Print only the rendered `cassandra.yaml` of the member, requires `--member`.
    #[structopt(long, requires("member"))]
    server_yaml: bool,
}

impl Plan {
    pub fn run(&self, base: &CassandraPlan, out: &mut dyn Write) -> Result<()> {
        let planner = base.planner()?;
        let inventory = self.group.load()?;

        let yaml = match &self.member {
            Some(member) => {
                let plan = planner.plan_member(&inventory, self.group.name(), member)?;
                if self.server_yaml {
                    plan.settings.server_yaml()?
                } else {
                    serde_yaml::to_string(&plan).context("error serializing node plan to YAML")?
                }
            }
            None => {
                let plans = planner.plan_group(&inventory, self.group.name())?;
                tracing::info!(group = self.group.name(), members = plans.len(), "planned group");
                serde_yaml::to_string(&plans).context("error serializing node plans to YAML")?
            }
        };
        writeln!(out, "{}", yaml.trim_end())?;
        Ok(())
    }
}
