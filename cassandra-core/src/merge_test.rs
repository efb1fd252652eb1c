use anyhow::Result;
use serde_yaml::Value;

use crate::merge::{deep_merge, deep_merge_all};

fn yaml(doc: &str) -> Result<Value> {
    Ok(serde_yaml::from_str(doc)?)
}

#[test]
fn scalar_replaces_scalar() -> Result<()> {
    let mut base = yaml("cluster_name: base\nnum_tokens: 1")?;
    deep_merge(&mut base, yaml("cluster_name: overlay")?);

    let expected = yaml("cluster_name: overlay\nnum_tokens: 1")?;
    assert!(base == expected, "unexpected merge output: {:?}", base);
    Ok(())
}

#[test]
fn mapping_merges_recursively() -> Result<()> {
    let mut base = yaml("server:\n  ports:\n    storage: 7000\n    native: 9042\n  cluster_name: base")?;
    deep_merge(&mut base, yaml("server:\n  ports:\n    native: 9142\n  concurrent_reads: 32")?);

    let expected = yaml("server:\n  ports:\n    storage: 7000\n    native: 9142\n  cluster_name: base\n  concurrent_reads: 32")?;
    assert!(base == expected, "unexpected merge output: {:?}", base);
    Ok(())
}

#[test]
fn sequence_replaces_sequence() -> Result<()> {
    let mut base = yaml("data_file_directories: [/a, /b]")?;
    deep_merge(&mut base, yaml("data_file_directories: [/c]")?);

    let expected = yaml("data_file_directories: [/c]")?;
    assert!(base == expected, "expected sequences to be replaced, not concatenated: {:?}", base);
    Ok(())
}

#[test]
fn mismatched_types_are_replaced() -> Result<()> {
    let mut base = yaml("a: {nested: 1}\nb: 2")?;
    deep_merge(&mut base, yaml("a: flat\nb: {nested: 3}")?);

    let expected = yaml("a: flat\nb: {nested: 3}")?;
    assert!(base == expected, "unexpected merge output: {:?}", base);
    Ok(())
}

#[test]
fn null_overlay_replaces_value() -> Result<()> {
    let mut base = yaml("initial_token: '0'")?;
    deep_merge(&mut base, yaml("initial_token: ~")?);

    let expected = yaml("initial_token: ~")?;
    assert!(base == expected, "unexpected merge output: {:?}", base);
    Ok(())
}

#[test]
fn deep_merge_all_applies_increasing_precedence() -> Result<()> {
    let merged = deep_merge_all(vec![yaml("a: 1\nb: 1\nc: 1")?, yaml("b: 2\nc: 2")?, yaml("c: 3")?]);

    let expected = yaml("a: 1\nb: 2\nc: 3")?;
    assert!(merged == expected, "unexpected merge output: {:?}", merged);
    Ok(())
}

#[test]
fn deep_merge_all_does_not_mutate_inputs() -> Result<()> {
    let docs = vec![yaml("a: {b: 1}")?, yaml("a: {c: 2}")?];

    let first = deep_merge_all(docs.clone());
    let second = deep_merge_all(docs.clone());

    assert!(first == second, "expected identical merges, got {:?} and {:?}", first, second);
    assert!(docs[0] == yaml("a: {b: 1}")?, "expected input to be untouched, got {:?}", docs[0]);
    Ok(())
}

#[test]
fn deep_merge_all_skips_empty_documents() -> Result<()> {
    let merged = deep_merge_all(vec![yaml("a: 1")?, Value::Null, yaml("b: 2")?]);

    let expected = yaml("a: 1\nb: 2")?;
    assert!(merged == expected, "unexpected merge output: {:?}", merged);
    Ok(())
}
