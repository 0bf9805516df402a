// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn binding(value: &str, source: BindingSource) -> VariableBinding {
    VariableBinding {
        name: "x".to_string(),
        r#type: "string".to_string(),
        value: ScalarValue::String(value.to_string()),
        source,
        line_num: 1,
        is_input: false,
    }
}

#[test]
fn set_then_get_roundtrips() {
    let mut table = VariableTable::new();
    table.set("工号", binding("E-1", BindingSource::Step { name: "step1".into() }));
    assert_eq!(
        table.value("工号"),
        Some(&ScalarValue::String("E-1".to_string()))
    );
}

#[test]
fn set_overwrites_last_write_wins() {
    let mut table = VariableTable::new();
    table.set("v", binding("first", BindingSource::Assignment));
    table.set("v", binding("second", BindingSource::Assignment));
    assert_eq!(table.len(), 1);
    assert_eq!(
        table.value("v"),
        Some(&ScalarValue::String("second".to_string()))
    );
}

#[test]
fn alias_shares_the_same_binding() {
    let mut table = VariableTable::new();
    table.set(
        "step1Err",
        binding("nil", BindingSource::Step { name: "step1".into() }),
    );
    assert!(table.alias("err", "step1Err"));
    assert_eq!(table.value("err"), table.value("step1Err"));
}

#[test]
fn alias_of_unknown_name_fails() {
    let mut table = VariableTable::new();
    assert!(!table.alias("err", "missing"));
    assert!(!table.contains("err"));
}

#[test]
fn rebinding_the_primary_name_is_seen_through_every_alias() {
    // spec P3: "both original err names alias the most-recent one" —
    // re-pointing the alias (as the renaming rule does per call) means an
    // older alias is NOT retroactively updated; only the alias that is
    // re-inserted observes the new target.
    let mut table = VariableTable::new();
    table.set(
        "step1Err",
        binding("first", BindingSource::Step { name: "step1".into() }),
    );
    table.alias("err", "step1Err");
    table.set(
        "step2Err",
        binding("second", BindingSource::Step { name: "step2".into() }),
    );
    table.alias("err", "step2Err");
    assert_eq!(
        table.value("err"),
        Some(&ScalarValue::String("second".to_string()))
    );
    assert_eq!(
        table.value("step1Err"),
        Some(&ScalarValue::String("first".to_string()))
    );
}

#[test]
fn names_preserve_insertion_order() {
    let mut table = VariableTable::new();
    table.set("工号", binding("a", BindingSource::Assignment));
    table.set("用户名", binding("b", BindingSource::Assignment));
    assert_eq!(table.names().collect::<Vec<_>>(), vec!["工号", "用户名"]);
}
