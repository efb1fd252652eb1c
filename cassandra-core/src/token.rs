//! Token allocation.
//!
//! Tokens are positions on the `RandomPartitioner` ring, which spans `[0, 2^127)`. A cluster of
//! N members splits the ring into N arcs of equal length, with the member at index `i` of its
//! group owning the token `i * (2^127 / N)`. All arithmetic is exact integer arithmetic; the
//! whole token space fits in a `u128`.

use std::collections::BTreeMap;
use std::net::IpAddr;

use anyhow::{bail, ensure, Result};

use crate::error::PlanError;
use crate::inventory::ClusterMember;

/// The size of the token ring, `2^127`.
pub const TOKEN_SPACE: u128 = 1 << 127;

/// The token used when an explicit token map has no entry for a member.
pub const DEFAULT_TOKEN: &str = "0";

/// Compute `count` evenly spaced tokens, in ring order.
pub fn compute_tokens(count: usize) -> Result<Vec<u128>> {
    ensure!(
        count > 0,
        PlanError::PreconditionViolation("token count must be greater than 0".into())
    );
    let spacing = TOKEN_SPACE / count as u128;
    Ok((0..count as u128).map(|idx| idx * spacing).collect())
}

/// Derive the initial token of the given member.
///
/// When an explicit token map is supplied it is authoritative: the member's primary IP is
/// looked up in it, and a miss yields [`DEFAULT_TOKEN`] rather than an error.
///
/// Otherwise the member's rank within `group_members` selects its token. The rank is shifted by
/// `token_index_offset` and wraps around the group, so the token always remains on the ring.
#[tracing::instrument(level = "debug", skip(supplied_tokens, member, group_members), fields(member = member.id()))]
pub fn derive_initial_token(
    supplied_tokens: Option<&BTreeMap<IpAddr, String>>, member: &ClusterMember, group_members: &[ClusterMember], token_index_offset: Option<i64>,
) -> Result<String> {
    let ip = member.primary_ip();
    if let Some(tokens) = supplied_tokens {
        return Ok(match tokens.get(&ip) {
            Some(token) => token.clone(),
            None => {
                tracing::warn!(%ip, "no token supplied for member, falling back to default token");
                DEFAULT_TOKEN.into()
            }
        });
    }

    let rank = match group_members.iter().position(|candidate| candidate.primary_ip() == ip) {
        Some(rank) => rank,
        None => bail!(PlanError::PreconditionViolation(format!(
            "member `{}` with IP {} is not a member of the given group",
            member.id(),
            ip
        ))),
    };
    let tokens = compute_tokens(group_members.len())?;
    let count = tokens.len() as i64;
    let shift = token_index_offset.unwrap_or(0).rem_euclid(count);
    let idx = ((rank as i64 + shift) % count) as usize;
    let token = tokens[idx];
    tracing::debug!(rank, idx, %token, "derived initial token");
    Ok(token.to_string())
}

/// Parse & validate a token string, ensuring it falls within the token ring.
pub fn parse_token(token: &str) -> Result<u128> {
    let parsed: u128 = match token.trim().parse() {
        Ok(parsed) => parsed,
        Err(err) => bail!(PlanError::InvalidInput(format!("token `{}` is not a valid integer: {}", token, err))),
    };
    ensure!(
        parsed < TOKEN_SPACE,
        PlanError::InvalidInput(format!("token `{}` is outside of the token ring [0, 2^127)", token))
    );
    Ok(parsed)
}
