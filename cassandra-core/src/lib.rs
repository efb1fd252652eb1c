//! Cluster topology and resource-sizing calculations for Cassandra deployments.
//!
//! Everything in this crate is pure computation over an immutable inventory snapshot. The
//! rendering of config files, package installation and service supervision are performed by
//! the collaborators which consume the [`NodePlan`] produced by the [`Planner`].

pub mod config;
pub mod error;
#[cfg(test)]
mod fixtures;
pub mod inventory;
pub mod merge;
#[cfg(test)]
mod merge_test;
pub mod plan;
pub mod repair;
#[cfg(test)]
mod repair_test;
pub mod seeds;
pub mod settings;
pub mod sizing;
#[cfg(test)]
mod sizing_test;
pub mod token;
pub mod topology;
pub mod version;

pub use config::PlanConfig;
pub use error::PlanError;
pub use inventory::{ClusterMember, Group, Inventory};
pub use plan::{NodePlan, Planner};
pub use settings::Settings;
pub use topology::{ProviderRegistry, ProviderStrategy, RpcAddressMode, TopologyChoice};
