// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The variable environment and the renaming/aliasing discipline of
//! spec §4.1 and §9 ("Back-referential variables vs. arenas").
//!
//! Bindings live in an arena (`Vec<VariableBinding>`); names — including
//! aliases created by the `err` → `<stepName>Err` renaming rule — map to
//! arena indices in an order-preserving `IndexMap`. Renaming never
//! duplicates a binding and never creates a reference cycle: an alias is
//! just a second name pointing at the same index.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::metadata::ScalarValue;

/// Where a [`VariableBinding`]'s value came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BindingSource {
    Input,
    Assignment,
    Step { name: String },
}

/// `{ name, type, value, source, line_num, is_input }` (spec §3.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableBinding {
    pub name: String,
    pub r#type: String,
    pub value: ScalarValue,
    pub source: BindingSource,
    pub line_num: usize,
    pub is_input: bool,
}

/// The `variables` table: an arena of bindings plus a name→index index,
/// so renamed/aliased names can share one binding (spec §3.4 invariant 5).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariableTable {
    bindings: Vec<VariableBinding>,
    names: IndexMap<String, usize>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the binding for `name` (last-write-wins, per
    /// spec §4.1 rule 3 for non-`err` names). Returns the arena index.
    pub fn set(&mut self, name: impl Into<String>, binding: VariableBinding) -> usize {
        let name = name.into();
        match self.names.get(&name).copied() {
            Some(idx) => {
                self.bindings[idx] = binding;
                idx
            }
            None => {
                let idx = self.bindings.len();
                self.bindings.push(binding);
                self.names.insert(name, idx);
                idx
            }
        }
    }

    /// Point `alias` at the same binding `name` currently resolves to,
    /// without copying or re-inserting the binding (spec §4.1 rule 2, §9).
    pub fn alias(&mut self, alias: impl Into<String>, name: &str) -> bool {
        let Some(&idx) = self.names.get(name) else {
            return false;
        };
        self.names.insert(alias.into(), idx);
        true
    }

    pub fn get(&self, name: &str) -> Option<&VariableBinding> {
        self.names.get(name).map(|&idx| &self.bindings[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn value(&self, name: &str) -> Option<&ScalarValue> {
        self.get(name).map(|b| &b.value)
    }

    /// Iterate names in insertion order (first-seen order, including aliases).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
#[path = "variable_tests.rs"]
mod tests;
