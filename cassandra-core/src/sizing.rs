//! JVM resource sizing.
//!
//! Two JVM processes share each host, so a single process may be given at most half of the
//! usable memory. The RAM fraction is held in basis points so that all sizing arithmetic is
//! exact integer arithmetic.

use anyhow::{bail, ensure, Result};
use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::inventory::ClusterMember;

/// Memory reserved for the operating system, in megabytes.
pub const OS_RESERVED_MB: u64 = 100;
/// The JVM thread stack size, in kilobytes.
pub const STACK_SIZE_KB: u64 = 200;
/// The largest RAM fraction which may be given to a single JVM process.
pub const MAX_RAM_FRACTION: f64 = 0.5;

const BASIS_POINTS: u64 = 10_000;
const BYTES_PER_MB: u64 = 1024 * 1024;

/// JVM sizing for one member.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ResourceSizing {
    /// Maximum heap size, e.g. `3160M`.
    pub max_heap: String,
    /// New generation heap size.
    pub heap_new: String,
    /// Young generation size.
    pub young_gen_size: String,
    /// Thread stack size, e.g. `200K`.
    pub stack_size: String,
}

impl ResourceSizing {
    /// Compute the sizing for the given member from its installed memory.
    pub fn for_member(member: &ClusterMember, ram_fraction: f64) -> Result<Self> {
        compute_sizing(member.memory_bytes() / BYTES_PER_MB, ram_fraction)
    }
}

/// Compute the JVM sizing for a host with the given total memory in megabytes.
pub fn compute_sizing(total_memory_mb: u64, ram_fraction: f64) -> Result<ResourceSizing> {
    let fraction_bp = validate_ram_fraction(ram_fraction)?;
    ensure!(
        total_memory_mb > OS_RESERVED_MB,
        PlanError::PreconditionViolation(format!(
            "total memory of {}M does not exceed the {}M reserved for the OS",
            total_memory_mb, OS_RESERVED_MB
        ))
    );

    let usable_mb = total_memory_mb - OS_RESERVED_MB;
    let scaled = match usable_mb.checked_mul(fraction_bp) {
        Some(scaled) => scaled,
        None => bail!(PlanError::PreconditionViolation(format!(
            "total memory of {}M is too large to size",
            total_memory_mb
        ))),
    };
    let max_heap = scaled / BASIS_POINTS;
    let heap_new = scaled / (BASIS_POINTS * 5);
    let young_gen = scaled / (BASIS_POINTS * 10);
    tracing::debug!(total_memory_mb, usable_mb, max_heap, heap_new, young_gen, "computed JVM sizing");

    Ok(ResourceSizing {
        max_heap: format!("{}M", max_heap),
        heap_new: format!("{}M", heap_new),
        young_gen_size: format!("{}M", young_gen),
        stack_size: format!("{}K", STACK_SIZE_KB),
    })
}

/// Validate the given RAM fraction, returning it in basis points.
pub fn validate_ram_fraction(ram_fraction: f64) -> Result<u64> {
    ensure!(
        ram_fraction.is_finite() && ram_fraction > 0.0 && ram_fraction <= MAX_RAM_FRACTION,
        PlanError::PreconditionViolation(format!(
            "ram fraction must be within (0, {}] as two JVM processes share each host, got {}",
            MAX_RAM_FRACTION, ram_fraction
        ))
    );
    let fraction_bp = (ram_fraction * BASIS_POINTS as f64).round() as u64;
    ensure!(
        fraction_bp > 0,
        PlanError::PreconditionViolation(format!(
            "ram fraction {} rounds to zero at a precision of 1/{}",
            ram_fraction, BASIS_POINTS
        ))
    );
    Ok(fraction_bp)
}
