// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Statements of a workflow's `main` procedure (spec §3.1, §3.2, §9).
//!
//! `Statement` is a tagged variant, not a single record with mostly-empty
//! fields (spec §9 "Statement tree polymorphism" names this explicitly as
//! the anti-pattern to avoid).

use crate::metadata::{Metadata, ScalarValue};
use serde::{Deserialize, Serialize};

/// Per-statement lifecycle status (spec §3.2).
///
/// ```text
/// PENDING --start--> RUNNING --ok--> COMPLETED
///                        |
///                        +--err---> FAILED      (terminal)
///                        +--cancel-> CANCELLED  (terminal)
///                        +--skip---> SKIPPED    (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
    Skipped,
}

impl StatementStatus {
    /// COMPLETED, FAILED, CANCELLED, and SKIPPED are terminal (spec §3.2, Glossary).
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            StatementStatus::Completed
                | StatementStatus::Failed
                | StatementStatus::Cancelled
                | StatementStatus::Skipped
        )
    }
}

/// Wall-clock timing for one statement's execution (spec §9 "Per-call timing").
/// Set before the host's `WorkflowUpdate` callback fires so persistence
/// observes the final values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    pub start_epoch_ms: u64,
    pub end_epoch_ms: Option<u64>,
    pub duration_ms: Option<u64>,
}

impl Timing {
    pub fn started(start_epoch_ms: u64) -> Self {
        Self {
            start_epoch_ms,
            end_epoch_ms: None,
            duration_ms: None,
        }
    }

    pub fn finish(&mut self, end_epoch_ms: u64) {
        self.end_epoch_ms = Some(end_epoch_ms);
        self.duration_ms = Some(end_epoch_ms.saturating_sub(self.start_epoch_ms));
    }
}

/// Fields every statement carries regardless of its kind (spec §3.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementMeta {
    pub line_number: usize,
    /// The `//desc:` comment attached to this statement, if any (spec §4.1).
    pub desc: String,
    pub status: StatementStatus,
    /// Host-advisory; the executor never acts on this itself (spec §5).
    pub retry_count: u32,
    pub timing: Option<Timing>,
}

impl StatementMeta {
    pub fn new(line_number: usize) -> Self {
        Self {
            line_number,
            desc: String::new(),
            status: StatementStatus::Pending,
            retry_count: 0,
            timing: None,
        }
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }
}

/// A call-site argument, classified during parse (spec §3.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArgExpr {
    /// `input["KEY"]` — resolved by looking up `KEY` in `input_vars`.
    InputRef { key: String },
    /// Bare identifier that must resolve in `variables` at call time.
    VariableRef { name: String },
    StringLiteral { value: String },
    NumericLiteral { value: ScalarValue },
}

/// A call-site return binding (spec §3.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSlot {
    /// The name written at the call site (after the §4.1 renaming rule
    /// has already been applied — e.g. `step1Err`, not the literal `err`).
    pub name: String,
    /// Copied from the step's positional `output_params[i].type`.
    pub declared_type: String,
    pub source_step: String,
    pub line_number: usize,
}

/// One executable unit of `main` (spec §3.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statement {
    Print {
        /// Literal content, may contain `{{var}}` templates.
        content: String,
        /// e.g. `Some("step1")` for `step1.Printf(...)`; `None` for `sys.Print`/`fmt.Print`.
        step_scope: Option<String>,
        meta: StatementMeta,
    },
    Var {
        name: String,
        /// Raw right-hand-side text, not yet template-expanded.
        rhs: String,
        meta: StatementMeta,
    },
    Call {
        step_name: String,
        args: Vec<ArgExpr>,
        returns: Vec<ReturnSlot>,
        metadata: Metadata,
        meta: StatementMeta,
    },
    If {
        condition: String,
        children: Vec<Statement>,
        /// Explicit else-branch (spec §9 REDESIGN: an explicit field
        /// instead of folding `else` into sibling statements).
        #[serde(default)]
        else_children: Vec<Statement>,
        meta: StatementMeta,
    },
    Return {
        meta: StatementMeta,
    },
    /// Inert at runtime; preserved for round-tripping and diagnostics.
    Other {
        text: String,
        meta: StatementMeta,
    },
}

impl Statement {
    pub fn meta(&self) -> &StatementMeta {
        match self {
            Statement::Print { meta, .. }
            | Statement::Var { meta, .. }
            | Statement::Call { meta, .. }
            | Statement::If { meta, .. }
            | Statement::Return { meta }
            | Statement::Other { meta, .. } => meta,
        }
    }

    pub fn meta_mut(&mut self) -> &mut StatementMeta {
        match self {
            Statement::Print { meta, .. }
            | Statement::Var { meta, .. }
            | Statement::Call { meta, .. }
            | Statement::If { meta, .. }
            | Statement::Return { meta }
            | Statement::Other { meta, .. } => meta,
        }
    }

    pub fn status(&self) -> StatementStatus {
        self.meta().status
    }

    pub fn line_number(&self) -> usize {
        self.meta().line_number
    }

    /// A short tag for tracing spans (`"print"`, `"call"`, ...), matching
    /// the teacher's `Effect::name()` helper.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Statement::Print { .. } => "print",
            Statement::Var { .. } => "var",
            Statement::Call { .. } => "call",
            Statement::If { .. } => "if",
            Statement::Return { .. } => "return",
            Statement::Other { .. } => "other",
        }
    }
}

#[cfg(test)]
#[path = "statement_tests.rs"]
mod tests;
