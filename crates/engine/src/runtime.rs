// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The running-flows registry (spec.md §5 "Multiple runs").
//!
//! Mirrors the teacher's `Runtime` struct holding several
//! `Mutex<HashMap<...>>`-guarded caches (`agent_owners`, `runbook_cache`,
//! `worker_states`): here, one map from [`FlowId`] to the
//! [`CancellationToken`] that lets a live run be [`Runtime::stop`]ped.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use wf_core::{Clock, FlowId, Program};

use crate::error::RuntimeError;
use crate::executor::{Executor, RunOutcome};
use crate::host::Host;

/// Coordinates concurrent workflow runs: one [`Executor`] shared across
/// every run, plus a registry mapping each live `flow_id` to the
/// cancellation handle [`Runtime::stop`] signals (spec §5).
pub struct Runtime<H: Host, C: Clock> {
    executor: Executor<H, C>,
    running: Mutex<HashMap<FlowId, CancellationToken>>,
}

impl<H: Host, C: Clock> Runtime<H, C> {
    pub fn new(host: Arc<H>, clock: C) -> Self {
        Self {
            executor: Executor::new(host, clock),
            running: Mutex::new(HashMap::new()),
        }
    }

    /// Registers `program.flow_id` and drives it to completion (spec
    /// §4.2 "Entry", §5 "Multiple runs"). Rejects a `flow_id` that is
    /// already live with [`RuntimeError::AlreadyRunning`], returned
    /// synchronously before any statement executes.
    pub async fn start(&self, program: &mut Program) -> Result<RunOutcome, RuntimeError> {
        let flow_id = program
            .flow_id
            .clone()
            .unwrap_or_else(|| FlowId::new(String::new()));

        let cancel = {
            let mut running = self.running.lock();
            if running.contains_key(&flow_id) {
                return Err(RuntimeError::AlreadyRunning(flow_id));
            }
            let token = CancellationToken::new();
            running.insert(flow_id.clone(), token.clone());
            token
        };

        let result = self.executor.run(program, &cancel).await;
        self.running.lock().remove(&flow_id);
        Ok(result?)
    }

    /// Signals cancellation for a live run; a no-op race with the run's
    /// own completion is resolved by [`RuntimeError::NotRunning`] (the
    /// run already removed itself from the registry).
    pub fn stop(&self, flow_id: &FlowId) -> Result<(), RuntimeError> {
        match self.running.lock().get(flow_id) {
            Some(token) => {
                token.cancel();
                Ok(())
            }
            None => Err(RuntimeError::NotRunning(flow_id.clone())),
        }
    }

    pub fn is_running(&self, flow_id: &FlowId) -> bool {
        self.running.lock().contains_key(flow_id)
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
