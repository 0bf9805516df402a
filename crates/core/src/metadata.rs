// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scalar value and per-call metadata (spec §3.3).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar value as it flows through input vars, variable bindings, and
/// call metadata. Strings, integers, floats, and bools are the only
/// shapes the DSL's lexical model produces (spec §4.1's literal
/// classification rules).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// No value bound yet, or a callback output key that was absent.
    Null,
}

impl ScalarValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ScalarValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::String(s) => write!(f, "{s}"),
            ScalarValue::Int(i) => write!(f, "{i}"),
            ScalarValue::Float(x) => write!(f, "{x}"),
            ScalarValue::Bool(b) => write!(f, "{b}"),
            ScalarValue::Null => write!(f, ""),
        }
    }
}

/// Per-call metadata (spec §3.3): a flat, order-preserving string→scalar
/// map parsed from a `{k:v, ...}` trailer. Unknown keys are preserved and
/// forwarded to the host verbatim; the executor only interprets
/// `err_continue`, `retry`, and `timeout`.
pub type Metadata = indexmap::IndexMap<String, ScalarValue>;

/// Read the `err_continue` metadata flag (spec §3.3, §4.2 call dispatch).
pub fn err_continue(metadata: &Metadata) -> bool {
    metadata
        .get("err_continue")
        .and_then(ScalarValue::as_bool)
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "metadata_tests.rs"]
mod tests;
