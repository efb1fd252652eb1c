pub mod plan;
pub mod repair;
pub mod seeds;
pub mod tokens;
pub mod topology;

use std::path::PathBuf;

use anyhow::Result;
use cassandra_core::{Group, Inventory};
use structopt::StructOpt;

/// Arguments selecting a group of an inventory snapshot.
#[derive(StructOpt)]
pub struct GroupArgs {
    /// The path to the inventory snapshot YAML file.
    #[structopt(short, long, parse(from_os_str))]
    inventory: PathBuf,
    /// The name of the group to operate on.
    #[structopt(short, long, default_value = "cassandra")]
    group: String,
}

impl GroupArgs {
    /// Load the inventory snapshot.
    pub fn load(&self) -> Result<Inventory> {
        crate::load_inventory(&self.inventory)
    }

    /// The name of the selected group.
    pub fn name(&self) -> &str {
        &self.group
    }

    /// Look up the selected group within the given inventory.
    pub fn select<'a>(&self, inventory: &'a Inventory) -> Result<&'a Group> {
        inventory.group(&self.group)
    }
}
