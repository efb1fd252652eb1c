use std::collections::HashSet;

use anyhow::{Context, Result};

use crate::error::PlanError;
use crate::repair::{build_repair_cron_expression, compute_cron_time, CronTime};

#[test]
fn compute_cron_time_small_groups_use_index_as_hour() -> Result<()> {
    let first = compute_cron_time(0, 3)?;
    let second = compute_cron_time(1, 3)?;

    assert!(first != second, "expected distinct cron times, got {:?} twice", first);
    assert!(first == CronTime { minute: 0, hour: 0 }, "unexpected cron time for index 0: {:?}", first);
    assert!(second == CronTime { minute: 0, hour: 1 }, "unexpected cron time for index 1: {:?}", second);
    for index in 0..23 {
        let time = compute_cron_time(index, 23)?;
        assert!(time.hour == index, "expected hour {} got {}", index, time.hour);
        assert!(time.minute == 0, "expected minute 0 got {}", time.minute);
    }
    Ok(())
}

#[test]
fn compute_cron_time_cycles_minute_buckets_for_large_groups() -> Result<()> {
    let cases = vec![
        ((23, 24), CronTime { minute: 30, hour: 0 }),
        ((45, 46), CronTime { minute: 20, hour: 22 }),
        ((46, 47), CronTime { minute: 40, hour: 0 }),
        ((99, 100), CronTime { minute: 48, hour: 7 }),
    ];
    for ((index, n), expected) in cases {
        let time = compute_cron_time(index, n)?;
        assert!(time == expected, "expected {:?} for index {} of {}, got {:?}", expected, index, n, time);
    }
    Ok(())
}

#[test]
fn compute_cron_time_is_collision_free() -> Result<()> {
    for n in 1..=200 {
        let mut seen = HashSet::new();
        for index in 0..n {
            let time = compute_cron_time(index, n)?;
            assert!(time.hour < 23, "expected hour within 0..23 got {}", time.hour);
            assert!(time.minute < 60, "expected minute within 0..60 got {}", time.minute);
            assert!(seen.insert(time), "duplicate cron time {:?} for index {} of {}", time, index, n);
        }
    }
    Ok(())
}

/// Known quirk: for group sizes which are multiples of 23, `maxq` includes a bucket which is
/// never used, so the minute step is 60 / 3 rather than 60 / 2 for a group of 46.
#[test]
fn compute_cron_time_multiple_of_23_leaves_last_bucket_unused() -> Result<()> {
    let minutes: HashSet<usize> = (0..46).map(|index| compute_cron_time(index, 46).map(|time| time.minute)).collect::<Result<_>>()?;
    let expected: HashSet<usize> = [0, 20].iter().copied().collect();
    assert!(minutes == expected, "expected minute buckets {:?} got {:?}", expected, minutes);
    Ok(())
}

#[test]
fn compute_cron_time_err_with_index_out_of_range() -> Result<()> {
    for (index, n) in [(3, 3), (5, 2), (0, 0)] {
        let err = compute_cron_time(index, n)
            .err()
            .with_context(|| format!("expected an error for index {} of {}", index, n))?;
        let plan_err = err.downcast::<PlanError>().context("unexpected error type")?;
        assert!(matches!(plan_err, PlanError::PreconditionViolation(_)), "unexpected error returned: {:?}", plan_err);
    }
    Ok(())
}

#[test]
fn build_repair_cron_expression_with_defaults() -> Result<()> {
    let line = build_repair_cron_expression(2, 3, None, None)?;
    assert!(line == "0 2 * * 0 nodetool repair -pr", "unexpected cron line: {}", line);
    Ok(())
}

#[test]
fn build_repair_cron_expression_with_day_and_keyspace() -> Result<()> {
    let line = build_repair_cron_expression(24, 30, Some(3), Some("events"))?;
    assert!(line == "30 1 * * 3 nodetool repair -pr events", "unexpected cron line: {}", line);
    Ok(())
}

#[test]
fn build_repair_cron_expression_err_with_invalid_inputs() -> Result<()> {
    let err = build_repair_cron_expression(0, 3, Some(7), None).err().context("expected an error for day 7")?;
    let plan_err = err.downcast::<PlanError>().context("unexpected error type")?;
    assert!(matches!(plan_err, PlanError::PreconditionViolation(_)), "unexpected error returned: {:?}", plan_err);

    let err = build_repair_cron_expression(0, 3, None, Some("bad keyspace; rm -rf"))
        .err()
        .context("expected an error for an invalid keyspace")?;
    let plan_err = err.downcast::<PlanError>().context("unexpected error type")?;
    assert!(matches!(plan_err, PlanError::InvalidInput(_)), "unexpected error returned: {:?}", plan_err);

    assert!(build_repair_cron_expression(3, 3, None, None).is_err(), "expected an error for index 3 of 3");
    Ok(())
}
