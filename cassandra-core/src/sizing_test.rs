use anyhow::{Context, Result};

use crate::error::PlanError;
use crate::fixtures;
use crate::sizing::{compute_sizing, validate_ram_fraction, ResourceSizing};

#[test]
fn compute_sizing_exact_values() -> Result<()> {
    let sizing = compute_sizing(8000, 0.4)?;

    assert!(sizing.max_heap == "3160M", "expected max_heap 3160M got {}", sizing.max_heap);
    assert!(sizing.heap_new == "632M", "expected heap_new 632M got {}", sizing.heap_new);
    assert!(sizing.young_gen_size == "316M", "expected young_gen_size 316M got {}", sizing.young_gen_size);
    assert!(sizing.stack_size == "200K", "expected stack_size 200K got {}", sizing.stack_size);
    Ok(())
}

#[test]
fn compute_sizing_truncates_to_whole_megabytes() -> Result<()> {
    // (1123 - 100) * 0.25 = 255.75, * 0.2 = 51.15, * 0.1 = 25.575.
    let sizing = compute_sizing(1123, 0.25)?;

    assert!(sizing.max_heap == "255M", "expected max_heap 255M got {}", sizing.max_heap);
    assert!(sizing.heap_new == "51M", "expected heap_new 51M got {}", sizing.heap_new);
    assert!(sizing.young_gen_size == "25M", "expected young_gen_size 25M got {}", sizing.young_gen_size);
    Ok(())
}

#[test]
fn compute_sizing_accepts_half_fraction() -> Result<()> {
    let sizing = compute_sizing(2100, 0.5)?;
    assert!(sizing.max_heap == "1000M", "expected max_heap 1000M got {}", sizing.max_heap);
    Ok(())
}

#[test]
fn compute_sizing_err_with_invalid_fraction() -> Result<()> {
    for fraction in [0.6, 0.0, -0.1, f64::NAN, f64::INFINITY] {
        let err = compute_sizing(8000, fraction)
            .err()
            .with_context(|| format!("expected an error for ram fraction {}", fraction))?;
        let plan_err = err.downcast::<PlanError>().context("unexpected error type")?;
        assert!(
            matches!(plan_err, PlanError::PreconditionViolation(_)),
            "unexpected error returned for ram fraction {}: {:?}",
            fraction,
            plan_err
        );
    }
    Ok(())
}

#[test]
fn compute_sizing_err_when_memory_below_os_reservation() -> Result<()> {
    let err = compute_sizing(100, 0.4).err().context("expected an error for 100M of memory")?;
    let plan_err = err.downcast::<PlanError>().context("unexpected error type")?;
    assert!(matches!(plan_err, PlanError::PreconditionViolation(_)), "unexpected error returned: {:?}", plan_err);
    Ok(())
}

#[test]
fn compute_sizing_err_with_fraction_below_precision() -> Result<()> {
    let err = compute_sizing(8000, 0.00001).err().context("expected an error for ram fraction 0.00001")?;
    let plan_err = err.downcast::<PlanError>().context("unexpected error type")?;
    assert!(matches!(plan_err, PlanError::PreconditionViolation(_)), "unexpected error returned: {:?}", plan_err);
    Ok(())
}

#[test]
fn compute_sizing_err_when_memory_overflows() -> Result<()> {
    let err = compute_sizing(u64::MAX, 0.5).err().context("expected an error for u64::MAX of memory")?;
    let plan_err = err.downcast::<PlanError>().context("unexpected error type")?;
    assert!(matches!(plan_err, PlanError::PreconditionViolation(_)), "unexpected error returned: {:?}", plan_err);
    Ok(())
}

#[test]
fn validate_ram_fraction_to_basis_points() -> Result<()> {
    let bp = validate_ram_fraction(0.4)?;
    assert!(bp == 4000, "expected 4000 basis points got {}", bp);
    let bp = validate_ram_fraction(0.125)?;
    assert!(bp == 1250, "expected 1250 basis points got {}", bp);
    Ok(())
}

#[test]
fn sizing_for_member_converts_bytes_to_megabytes() -> Result<()> {
    // 8 GiB is 8192M, leaving 8092M usable.
    let sizing = ResourceSizing::for_member(&fixtures::member(0), 0.25)?;
    assert!(sizing.max_heap == "2023M", "expected max_heap 2023M got {}", sizing.max_heap);
    assert!(sizing.heap_new == "404M", "expected heap_new 404M got {}", sizing.heap_new);
    assert!(sizing.young_gen_size == "202M", "expected young_gen_size 202M got {}", sizing.young_gen_size);
    Ok(())
}
