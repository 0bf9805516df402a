// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step declarations (spec §3.1).

use crate::log::LogRecord;
use serde::{Deserialize, Serialize};

/// One formal parameter (input or output) of a [`Step`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDecl {
    pub name: String,
    /// Opaque type string (`"string"`, `"int"`, `"error"`, ...); the
    /// executor never interprets this beyond echoing it into bindings.
    pub r#type: String,
    pub desc: String,
}

impl ParamDecl {
    pub fn new(name: impl Into<String>, r#type: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            r#type: r#type.into(),
            desc: desc.into(),
        }
    }
}

/// STATIC steps reference a fixed case ID and take no formal parameters;
/// DYNAMIC steps declare an ordered parameter list (spec §3.1, §4.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepKind {
    Static { case_id: String },
    Dynamic,
}

/// Declaration of a callable unit (spec §3.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    /// Dotted path (e.g. `beiluo.test1.user.create_user`); opaque to the
    /// executor, forwarded to the host's `FunctionCall` callback.
    pub qualified_function: String,
    pub kind: StepKind,
    pub input_params: Vec<ParamDecl>,
    pub output_params: Vec<ParamDecl>,
    #[serde(default)]
    pub logs: Vec<LogRecord>,
}

impl Step {
    pub fn is_static(&self) -> bool {
        matches!(self.kind, StepKind::Static { .. })
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self.kind, StepKind::Dynamic)
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
