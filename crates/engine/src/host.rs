// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The host callback interface (spec.md §6): the contract between the
//! executor and the embedding application. The executor never performs
//! I/O itself; every step invocation and every persistence/termination
//! notification is delegated through this trait.

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio_util::sync::CancellationToken;
use wf_core::{Metadata, Program, ScalarValue, Step};

use crate::error::HostError;

/// Input to [`Host::function_call`] (spec §6's `in` shape). `cancel` is
/// the same cancellation signal passed into `Executor::run` (spec §4.2:
/// "A long-running FunctionCall callback receives the same context and
/// is expected to return a cancellation error promptly"); a host may
/// poll or race on it, or ignore it and rely on the executor's own race
/// against the callback future.
pub struct FunctionCallRequest<'a> {
    pub step_name: &'a str,
    pub step_desc: &'a str,
    pub real_input: IndexMap<String, ScalarValue>,
    pub metadata: &'a Metadata,
    pub cancel: CancellationToken,
}

/// Output of [`Host::function_call`] (spec §6's `out` shape). A `success:
/// false` response is a *logical* failure, distinct from `Err` which is
/// a transport-level failure — both are subject to the `err_continue`
/// metadata rule (spec §4.2 "Handle the response").
#[derive(Debug, Clone, Default)]
pub struct FunctionCallResponse {
    pub success: bool,
    pub want_output: IndexMap<String, ScalarValue>,
    pub error: String,
    pub logs: Vec<String>,
}

/// The four callback seams the host implements (spec §6).
#[async_trait]
pub trait Host: Send + Sync {
    /// Invoke the concrete semantics of one step (spec §1: "the executor
    /// never performs I/O; it delegates to a `FunctionCall` callback").
    /// `Err` signals a transport-level failure.
    async fn function_call(
        &self,
        step: &Step,
        request: FunctionCallRequest<'_>,
    ) -> Result<FunctionCallResponse, HostError>;

    /// Fired after every statement status transition. The host is
    /// expected to persist `program`; an `Err` here aborts the run
    /// immediately with no further callbacks (spec §7 `PersistenceError`).
    async fn workflow_update(&self, program: &Program) -> Result<(), HostError>;

    /// Fired exactly once when `main` completes without a `return`
    /// statement or a failure.
    async fn workflow_exit(&self, program: &Program) -> Result<(), HostError>;

    /// Fired exactly once when `main` terminates via an explicit
    /// `return`, a failure, or cancellation.
    async fn workflow_return(&self, program: &Program) -> Result<(), HostError>;
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeHost;

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{FunctionCallRequest, FunctionCallResponse, Host, HostError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;
    use wf_core::{Program, Step};

    #[derive(Debug, Default)]
    struct FakeHostState {
        /// Canned responses keyed by step name, consumed in order.
        responses: HashMap<String, Vec<Result<FunctionCallResponse, String>>>,
        calls: Vec<String>,
        updates: Vec<Program>,
        exits: Vec<Program>,
        returns: Vec<Program>,
    }

    /// An in-memory [`Host`] for tests: step responses are pre-programmed
    /// per step name and consumed FIFO; every callback invocation is
    /// recorded for later assertion, matching the `FakeAgentAdapter`
    /// shape (`Arc<Mutex<State>>` plus setter methods).
    #[derive(Debug, Clone, Default)]
    pub struct FakeHost {
        state: Arc<Mutex<FakeHostState>>,
    }

    impl FakeHost {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue the next `function_call` response for `step_name`.
        pub fn push_response(&self, step_name: impl Into<String>, response: FunctionCallResponse) {
            self.state
                .lock()
                .responses
                .entry(step_name.into())
                .or_default()
                .push(Ok(response));
        }

        /// Queue a transport-level error for `step_name`'s next call.
        pub fn push_transport_error(&self, step_name: impl Into<String>, message: impl Into<String>) {
            self.state
                .lock()
                .responses
                .entry(step_name.into())
                .or_default()
                .push(Err(message.into()));
        }

        pub fn calls(&self) -> Vec<String> {
            self.state.lock().calls.clone()
        }

        pub fn update_count(&self) -> usize {
            self.state.lock().updates.len()
        }

        pub fn exit_count(&self) -> usize {
            self.state.lock().exits.len()
        }

        pub fn return_count(&self) -> usize {
            self.state.lock().returns.len()
        }

        pub fn last_update(&self) -> Option<Program> {
            self.state.lock().updates.last().cloned()
        }
    }

    #[async_trait]
    impl Host for FakeHost {
        async fn function_call(
            &self,
            step: &Step,
            _request: FunctionCallRequest<'_>,
        ) -> Result<FunctionCallResponse, HostError> {
            let mut state = self.state.lock();
            state.calls.push(step.name.clone());
            match state.responses.get_mut(&step.name).and_then(|queue| {
                if queue.is_empty() {
                    None
                } else {
                    Some(queue.remove(0))
                }
            }) {
                Some(Ok(response)) => Ok(response),
                Some(Err(message)) => Err(HostError::Message(message)),
                // Steps with no programmed response default to success/no-output.
                None => Ok(FunctionCallResponse {
                    success: true,
                    ..Default::default()
                }),
            }
        }

        async fn workflow_update(&self, program: &Program) -> Result<(), HostError> {
            self.state.lock().updates.push(program.clone());
            Ok(())
        }

        async fn workflow_exit(&self, program: &Program) -> Result<(), HostError> {
            self.state.lock().exits.push(program.clone());
            Ok(())
        }

        async fn workflow_return(&self, program: &Program) -> Result<(), HostError> {
            self.state.lock().returns.push(program.clone());
            Ok(())
        }
    }
}
