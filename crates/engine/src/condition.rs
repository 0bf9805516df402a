// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The condition language of spec.md §4.2 / §9 ("Open question —
//! condition language"): exactly five recognized patterns, plus an
//! `Unrecognized` fallback that always evaluates to `false`. Parsed once
//! per `if` statement rather than re-matched against the raw string on
//! every evaluation.

use wf_core::VariableTable;

/// One of the five comparisons the executor understands, or an opaque
/// form that evaluates to `false` (spec §9: "An implementer MAY extend
/// this table, but the spec requires exactly these").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    NotNil { var: String },
    IsNil { var: String },
    IsTrue { var: String },
    IsFalse { var: String },
    IsNotTrue { var: String },
    /// Any other form (`x == "literal"`, `x.(int) == 1`, garbage, ...).
    Unrecognized,
}

impl Condition {
    /// Parses a raw `if`/`else if` condition string (spec §4.2's table).
    /// Unknown forms never fail to parse; they become `Unrecognized`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(var) = raw.strip_suffix("!= nil") {
            return Condition::NotNil { var: var.trim().to_string() };
        }
        if let Some(var) = raw.strip_suffix("== nil") {
            return Condition::IsNil { var: var.trim().to_string() };
        }
        if let Some(var) = raw.strip_suffix("== true") {
            return Condition::IsTrue { var: var.trim().to_string() };
        }
        if let Some(var) = raw.strip_suffix("== false") {
            return Condition::IsFalse { var: var.trim().to_string() };
        }
        if let Some(var) = raw.strip_suffix("!= true") {
            return Condition::IsNotTrue { var: var.trim().to_string() };
        }
        Condition::Unrecognized
    }

    /// Evaluates the condition against the current variable environment
    /// (spec §4.2). An unresolved variable name is treated as `Null`.
    pub fn eval(&self, variables: &VariableTable) -> bool {
        match self {
            Condition::NotNil { var } => !resolved_null(variables, var),
            Condition::IsNil { var } => resolved_null(variables, var),
            Condition::IsTrue { var } => variables.value(var).and_then(|v| v.as_bool()) == Some(true),
            Condition::IsFalse { var } => variables.value(var).and_then(|v| v.as_bool()) == Some(false),
            Condition::IsNotTrue { var } => {
                variables.value(var).and_then(|v| v.as_bool()) != Some(true)
            }
            Condition::Unrecognized => false,
        }
    }
}

fn resolved_null(variables: &VariableTable, var: &str) -> bool {
    match variables.value(var) {
        Some(value) => value.is_null(),
        None => true,
    }
}

#[cfg(test)]
#[path = "condition_tests.rs"]
mod tests;
