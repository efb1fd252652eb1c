//! Repair scheduling.
//!
//! `nodetool repair -pr` must not run on every node at the same time. Members are spread over
//! 23 hour slots by their index within the group; once a group outgrows those slots, further
//! members cycle through minute buckets within each hour.
//!
//! ```text
//! maxq   = n / 23 + 1
//! minute = (60 / maxq) * (index / 23)
//! hour   = index % 23
//! ```
//!
//! NOTE: `maxq` counts one bucket more than is used whenever `n` is a multiple of 23, so for
//! those group sizes the minute step is narrower than the number of used buckets requires.

use anyhow::{ensure, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// The number of distinct hour slots used for staggering.
pub const HOUR_SLOTS: usize = 23;
/// The default day of week on which repairs run, Sunday.
pub const DEFAULT_REPAIR_DAY: u8 = 0;

lazy_static! {
    /// Regular expression used to validate keyspace names.
    static ref RE_KEYSPACE: Regex = Regex::new(r"^[a-zA-Z0-9_]{1,48}$").expect("failed to compile RE_KEYSPACE regex");
}

/// The time of day at which a member's repair job runs.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct CronTime {
    pub minute: usize,
    pub hour: usize,
}

/// Compute the staggered repair time of the member at `index` within a group of `n` members.
pub fn compute_cron_time(index: usize, n: usize) -> Result<CronTime> {
    ensure!(n > 0, PlanError::PreconditionViolation("group size must be greater than 0".into()));
    ensure!(
        index < n,
        PlanError::PreconditionViolation(format!("member index {} must be less than group size {}", index, n))
    );
    let maxq = n / HOUR_SLOTS + 1;
    Ok(CronTime {
        minute: (60 / maxq) * (index / HOUR_SLOTS),
        hour: index % HOUR_SLOTS,
    })
}

/// Build the crontab line which runs a primary-range repair for the member at `index`.
///
/// `day` is the cron day of week (0 is Sunday). When `keyspace` is `None` all keyspaces are
/// repaired.
pub fn build_repair_cron_expression(index: usize, n: usize, day: Option<u8>, keyspace: Option<&str>) -> Result<String> {
    let time = compute_cron_time(index, n)?;
    let day = day.unwrap_or(DEFAULT_REPAIR_DAY);
    validate_repair_day(day)?;
    let mut line = format!("{} {} * * {} nodetool repair -pr", time.minute, time.hour, day);
    if let Some(keyspace) = keyspace {
        validate_keyspace(keyspace)?;
        line.push(' ');
        line.push_str(keyspace);
    }
    Ok(line)
}

/// Validate a cron day of week.
pub fn validate_repair_day(day: u8) -> Result<()> {
    ensure!(
        day <= 6,
        PlanError::PreconditionViolation(format!("repair day must be a day of week within 0..=6, got {}", day))
    );
    Ok(())
}

/// Validate a keyspace name.
pub fn validate_keyspace(keyspace: &str) -> Result<()> {
    ensure!(
        RE_KEYSPACE.is_match(keyspace),
        PlanError::InvalidInput(format!(
            "keyspace name `{}` is invalid, must match the pattern `{}`",
            keyspace,
            RE_KEYSPACE.as_str()
        ))
    );
    Ok(())
}
