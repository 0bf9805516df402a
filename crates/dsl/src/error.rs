// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parser error types (spec.md §4.1 "Failure modes", §7 `ParseError`).

use thiserror::Error;

/// Errors that can occur while lifting workflow source text into a
/// [`wf_core::Program`](wf_core::Program).
///
/// Returned synchronously from [`crate::parse`]; no run occurs on a
/// parse failure (spec §7).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing `func main() {{` declaration")]
    MissingMain,

    #[error("unmatched braces in {location}")]
    UnmatchedBraces { location: String },

    #[error("malformed step declaration on line {line}: {reason} ({src:?})")]
    MalformedStepDecl {
        line: usize,
        reason: String,
        src: String,
    },

    #[error("duplicate step name {name:?} (first declared on line {first_line}, redeclared on line {line})")]
    DuplicateStep {
        name: String,
        first_line: usize,
        line: usize,
    },

    #[error("malformed input declaration on line {line}: {reason}")]
    MalformedInputDecl { line: usize, reason: String },

    #[error("unterminated block starting on line {line}")]
    UnterminatedBlock { line: usize },
}
