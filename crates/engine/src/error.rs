// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the engine (spec.md §7).

use thiserror::Error;
use wf_core::FlowId;

/// Errors raised while executing a single statement or a whole run
/// (spec §7's `UnknownStep`/`CallbackTransport`/`CallbackLogical`/
/// `PersistenceError`/`Cancelled` kinds).
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("step not found: {0}")]
    UnknownStep(String),
    #[error(
        "call to {step} declares {declared} return(s) but the step has {expected} output param(s)"
    )]
    ArityMismatch {
        step: String,
        declared: usize,
        expected: usize,
    },
    #[error(
        "call to {step} passes {declared} argument(s) but the step declares {expected} input param(s)"
    )]
    ArgArityMismatch {
        step: String,
        declared: usize,
        expected: usize,
    },
    #[error("function call transport error for step {step}: {message}")]
    CallbackTransport { step: String, message: String },
    #[error("function call reported failure for step {step}: {message}")]
    CallbackLogical { step: String, message: String },
    #[error("host persistence error: {0}")]
    Persistence(#[from] HostError),
    #[error("run cancelled")]
    Cancelled,
}

/// Errors a [`crate::host::Host`] implementation may return from any of
/// its four callbacks (spec §6).
#[derive(Debug, Error)]
pub enum HostError {
    #[error("host error: {0}")]
    Message(String),
}

/// Errors raised by [`crate::runtime::Runtime::start`]/`stop` (spec §5, §7).
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("execute error: {0}")]
    Execute(#[from] ExecuteError),
    #[error("flow already running: {0}")]
    AlreadyRunning(FlowId),
    #[error("flow not running: {0}")]
    NotRunning(FlowId),
}
