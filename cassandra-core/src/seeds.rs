//! Seed selection.

use anyhow::{ensure, Result};

use crate::error::PlanError;
use crate::inventory::ClusterMember;

/// The default maximum number of seeds selected from a group.
pub const DEFAULT_MAX_SEEDS: usize = 3;

/// Select the bootstrap seed list, returned as a comma-joined list of IPs.
///
/// Explicit seeds are used verbatim and are never truncated to `max_seeds`. Otherwise the first
/// `max_seeds` members of the group are used, in inventory order, each contributing its private
/// IP, falling back to its primary IP.
pub fn select_seeds(max_seeds: usize, explicit_seeds: Option<&[String]>, group_members: &[ClusterMember]) -> Result<String> {
    ensure!(
        max_seeds > 0,
        PlanError::PreconditionViolation("max seeds must be greater than 0".into())
    );
    if let Some(seeds) = explicit_seeds {
        return Ok(seeds.join(","));
    }
    Ok(group_members
        .iter()
        .take(max_seeds)
        .map(|member| member.private_or_primary_ip().to_string())
        .collect::<Vec<_>>()
        .join(","))
}
