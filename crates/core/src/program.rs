// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The parsed workflow (spec §3.1).

use crate::id::FlowId;
use crate::log::LogRecord;
use crate::metadata::ScalarValue;
use crate::statement::Statement;
use crate::step::Step;
use crate::variable::VariableTable;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The body of `func main() { ... }`.
pub type Procedure = Vec<Statement>;

/// The parsed workflow. Round-trips through JSON in full (spec §6
/// "Persisted shape"): every field here is serializable, and the
/// executor never depends on anything that wouldn't survive that
/// round-trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    /// Set by the host before execution; identifies a run for
    /// persistence and for the executor's running-flows registry.
    /// `None` until the host assigns one (e.g. right after parse).
    pub flow_id: Option<FlowId>,
    /// Populated once from the `var input = { ... }` literal; never
    /// written to by the executor (spec §3.4 invariant 3).
    pub input_vars: IndexMap<String, ScalarValue>,
    /// Ordered, uniquely-named (spec §3.4 invariant 2).
    pub steps: Vec<Step>,
    pub main: Procedure,
    pub variables: VariableTable,
    pub global_logs: Vec<LogRecord>,
}

impl Program {
    pub fn new() -> Self {
        Self {
            flow_id: None,
            input_vars: IndexMap::new(),
            steps: Vec::new(),
            main: Vec::new(),
            variables: VariableTable::new(),
            global_logs: Vec::new(),
        }
    }

    /// Look up a step by name (spec §4.2 call dispatch step 1).
    pub fn step(&self, name: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.name == name)
    }

    pub fn step_mut(&mut self, name: &str) -> Option<&mut Step> {
        self.steps.iter_mut().find(|s| s.name == name)
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "program_tests.rs"]
mod tests;
