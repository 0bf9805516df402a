// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The statement-by-statement interpreter (spec.md §4.2).
//!
//! A run walks `main` strictly sequentially (spec §5: "no intra-workflow
//! parallelism"), driving each statement through PENDING → RUNNING →
//! {COMPLETED, FAILED, CANCELLED, SKIPPED}, firing `WorkflowUpdate`
//! after every transition the way the teacher's `Executor::execute`
//! wraps every effect in an `info_span!` with elapsed-time logging.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use wf_core::{
    ArgExpr, BindingSource, Clock, LogRecord, Metadata, Program, ScalarValue, Statement,
    StatementStatus, Step, Timing, VariableBinding,
};

use crate::condition::Condition;
use crate::error::ExecuteError;
use crate::host::{FunctionCallRequest, Host};
use crate::template;

/// Which branch of an `If` a nested block belongs to, used to address
/// into the statement tree without holding an overlapping borrow of the
/// whole [`Program`] for the run's entire duration.
#[derive(Debug, Clone, Copy)]
enum Branch {
    Then,
    Else,
}

/// How execution of a block terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Ran every statement in the block to completion.
    Continue,
    /// Hit an explicit `return` somewhere in the block (spec §4.2's
    /// "run ends cleanly but via the return path, not the exit path").
    Returned,
}

/// Outcome of [`Executor::run`], reported back to [`crate::runtime::Runtime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// `main` completed without an explicit `return` (`WorkflowExit` fired).
    Exited,
    /// `main` terminated via an explicit `return` (`WorkflowReturn` fired).
    Returned,
}

/// Walks a `Program`'s `main` procedure, invoking `H` for every step
/// call and every lifecycle transition (spec §4.2, §6).
pub struct Executor<H: Host, C: Clock> {
    host: Arc<H>,
    clock: C,
}

impl<H: Host, C: Clock> Executor<H, C> {
    pub fn new(host: Arc<H>, clock: C) -> Self {
        Self { host, clock }
    }

    /// Drives `program.main` to completion, returning once the run
    /// exits, returns, is cancelled, or a statement fails (spec §4.2).
    pub async fn run(
        &self,
        program: &mut Program,
        cancel: &CancellationToken,
    ) -> Result<RunOutcome, ExecuteError> {
        let path: Vec<(usize, Branch)> = Vec::new();
        let result = self.execute_block(program, &path, cancel).await;
        match result {
            Ok(Flow::Continue) => {
                self.host.workflow_exit(program).await?;
                Ok(RunOutcome::Exited)
            }
            Ok(Flow::Returned) => {
                self.host.workflow_return(program).await?;
                Ok(RunOutcome::Returned)
            }
            Err(err) => {
                // spec §7: a PersistenceError aborts the run immediately
                // with no further callbacks — firing WorkflowReturn on
                // top of an already-failed persistence write would be
                // exactly the extra callback the spec forbids.
                if matches!(err, ExecuteError::Persistence(_)) {
                    return Err(err);
                }
                self.host.workflow_return(program).await?;
                Err(err)
            }
        }
    }

    async fn execute_block(
        &self,
        program: &mut Program,
        path: &[(usize, Branch)],
        cancel: &CancellationToken,
    ) -> Result<Flow, ExecuteError> {
        let len = block_mut(program, path).len();
        for i in 0..len {
            // Resume (spec §8 P6, S6): a statement already in a terminal
            // status was persisted from a prior run and is not re-executed.
            // The host clears FAILED back to PENDING before resuming, so
            // only a statement that truly finished is skipped here.
            if block_mut(program, path)[i].status().is_terminal() {
                continue;
            }

            if cancel.is_cancelled() {
                block_mut(program, path)[i].meta_mut().status = StatementStatus::Cancelled;
                self.host.workflow_update(program).await?;
                return Err(ExecuteError::Cancelled);
            }

            let start_ms = self.clock.epoch_ms();
            {
                let stmt = &mut block_mut(program, path)[i];
                stmt.meta_mut().status = StatementStatus::Running;
                stmt.meta_mut().timing = Some(Timing::started(start_ms));
            }
            self.host.workflow_update(program).await?;

            let kind = block_mut(program, path)[i].kind_name();
            let line = block_mut(program, path)[i].line_number();
            let span = tracing::info_span!("statement", kind, line);
            let _guard = span.enter();

            let outcome = self.dispatch(program, path, i, cancel).await;

            let end_ms = self.clock.epoch_ms();
            match outcome {
                Ok(flow) => {
                    let stmt = &mut block_mut(program, path)[i];
                    stmt.meta_mut().status = StatementStatus::Completed;
                    if let Some(timing) = stmt.meta_mut().timing.as_mut() {
                        timing.finish(end_ms);
                    }
                    self.host.workflow_update(program).await?;
                    if flow == Flow::Returned {
                        return Ok(Flow::Returned);
                    }
                }
                Err(err) => {
                    // spec §7: a PersistenceError already failed to
                    // persist downstream (e.g. a failing statement
                    // inside an `if` branch); don't attempt another
                    // callback on top of it.
                    if matches!(err, ExecuteError::Persistence(_)) {
                        return Err(err);
                    }
                    let status = if matches!(err, ExecuteError::Cancelled) {
                        StatementStatus::Cancelled
                    } else if kind == "if" {
                        // spec §4.2 `if` row: the IF statement itself
                        // always terminates COMPLETED; the failing
                        // child inside its branch carries the FAILED
                        // status instead.
                        StatementStatus::Completed
                    } else {
                        StatementStatus::Failed
                    };
                    let stmt = &mut block_mut(program, path)[i];
                    stmt.meta_mut().status = status;
                    if let Some(timing) = stmt.meta_mut().timing.as_mut() {
                        timing.finish(end_ms);
                    }
                    self.host.workflow_update(program).await?;
                    return Err(err);
                }
            }
        }
        Ok(Flow::Continue)
    }

    async fn dispatch(
        &self,
        program: &mut Program,
        path: &[(usize, Branch)],
        i: usize,
        cancel: &CancellationToken,
    ) -> Result<Flow, ExecuteError> {
        // Snapshot the pieces dispatch needs; the statement itself stays
        // borrowed from `program` only for the duration of this match.
        let line_number = block_mut(program, path)[i].line_number();
        let kind = match &block_mut(program, path)[i] {
            Statement::Print { content, step_scope, .. } => {
                DispatchKind::Print(content.clone(), step_scope.clone())
            }
            Statement::Var { name, rhs, .. } => DispatchKind::Var(name.clone(), rhs.clone()),
            Statement::Call { step_name, args, returns, metadata, meta } => DispatchKind::Call {
                step_name: step_name.clone(),
                args: args.clone(),
                returns: returns.clone(),
                metadata: metadata.clone(),
                desc: meta.desc.clone(),
            },
            Statement::If { condition, .. } => DispatchKind::If(condition.clone()),
            Statement::Return { .. } => DispatchKind::Return,
            Statement::Other { .. } => DispatchKind::Other,
        };

        match kind {
            DispatchKind::Print(content, step_scope) => {
                self.dispatch_print(program, &content, step_scope.as_deref());
                Ok(Flow::Continue)
            }
            DispatchKind::Var(name, rhs) => {
                self.dispatch_var(program, &name, &rhs, line_number);
                Ok(Flow::Continue)
            }
            DispatchKind::Call { step_name, args, returns, metadata, desc } => {
                self.dispatch_call(program, &step_name, &args, &returns, &metadata, &desc, cancel)
                    .await?;
                Ok(Flow::Continue)
            }
            DispatchKind::If(condition) => {
                self.dispatch_if(program, path, i, &condition, cancel).await
            }
            DispatchKind::Return => Ok(Flow::Returned),
            DispatchKind::Other => Ok(Flow::Continue),
        }
    }

    fn dispatch_print(&self, program: &mut Program, content: &str, step_scope: Option<&str>) {
        let expanded = template::expand(content, &program.variables);
        let timestamp = self.clock.epoch_ms();
        match step_scope {
            Some(name) => {
                let source = format!("{name}.Printf");
                let record = LogRecord::info(timestamp, expanded, source);
                match program.step_mut(name) {
                    Some(step) => step.logs.push(record),
                    None => program.global_logs.push(record),
                }
            }
            None => {
                program
                    .global_logs
                    .push(LogRecord::info(timestamp, expanded, "sys.Print"));
            }
        }
    }

    fn dispatch_var(&self, program: &mut Program, name: &str, rhs: &str, line_number: usize) {
        let stripped = strip_quotes(rhs);
        let expanded = template::expand(stripped, &program.variables);
        let binding = VariableBinding {
            name: name.to_string(),
            r#type: "string".to_string(),
            value: ScalarValue::String(expanded),
            source: BindingSource::Assignment,
            line_num: line_number,
            is_input: false,
        };
        program.variables.set(name.to_string(), binding);
    }

    async fn dispatch_call(
        &self,
        program: &mut Program,
        step_name: &str,
        args: &[ArgExpr],
        returns: &[wf_core::ReturnSlot],
        metadata: &Metadata,
        desc: &str,
        cancel: &CancellationToken,
    ) -> Result<(), ExecuteError> {
        let step: Step = program
            .step(step_name)
            .cloned()
            .ok_or_else(|| ExecuteError::UnknownStep(step_name.to_string()))?;

        if returns.len() != step.output_params.len() {
            return Err(ExecuteError::ArityMismatch {
                step: step.name.clone(),
                declared: returns.len(),
                expected: step.output_params.len(),
            });
        }
        if args.len() != step.input_params.len() {
            return Err(ExecuteError::ArgArityMismatch {
                step: step.name.clone(),
                declared: args.len(),
                expected: step.input_params.len(),
            });
        }

        let mut real_input = indexmap::IndexMap::new();
        for (idx, param) in step.input_params.iter().enumerate() {
            let value = match args.get(idx) {
                Some(ArgExpr::InputRef { key }) => program
                    .input_vars
                    .get(key)
                    .cloned()
                    .unwrap_or_else(|| ScalarValue::String(format!("input[\"{key}\"]"))),
                Some(ArgExpr::VariableRef { name }) => program
                    .variables
                    .value(name)
                    .cloned()
                    .unwrap_or_else(|| ScalarValue::String(name.clone())),
                Some(ArgExpr::StringLiteral { value }) => ScalarValue::String(value.clone()),
                Some(ArgExpr::NumericLiteral { value }) => value.clone(),
                None => ScalarValue::Null,
            };
            real_input.insert(param.name.clone(), value);
        }

        let request = FunctionCallRequest {
            step_name: &step.name,
            step_desc: desc,
            real_input,
            metadata,
            cancel: cancel.clone(),
        };

        // Race the callback against cancellation so a signal arriving
        // while a call is in flight lands the statement in CANCELLED
        // promptly rather than waiting out the callback (spec §4.2
        // "Cancellation").
        let response = tokio::select! {
            response = self.host.function_call(&step, request) => response,
            _ = cancel.cancelled() => return Err(ExecuteError::Cancelled),
        };

        let response = match response {
            Ok(response) if response.success => response,
            Ok(response) => {
                if wf_core::err_continue(metadata) {
                    return Ok(());
                }
                return Err(ExecuteError::CallbackLogical {
                    step: step.name.clone(),
                    message: response.error,
                });
            }
            Err(host_err) => {
                if wf_core::err_continue(metadata) {
                    return Ok(());
                }
                return Err(ExecuteError::CallbackTransport {
                    step: step.name.clone(),
                    message: host_err.to_string(),
                });
            }
        };

        if !response.logs.is_empty() {
            let timestamp = self.clock.epoch_ms();
            if let Some(step_mut) = program.step_mut(&step.name) {
                for message in &response.logs {
                    step_mut
                        .logs
                        .push(LogRecord::info(timestamp, message.clone(), step.name.clone()));
                }
            }
        }

        for (idx, output_param) in step.output_params.iter().enumerate() {
            let value = response
                .want_output
                .get(&output_param.name)
                .cloned()
                .unwrap_or(ScalarValue::Null);
            let slot = &returns[idx];
            program.variables.set(
                slot.name.clone(),
                VariableBinding {
                    name: slot.name.clone(),
                    r#type: output_param.r#type.clone(),
                    value,
                    source: BindingSource::Step { name: step.name.clone() },
                    line_num: slot.line_number,
                    is_input: false,
                },
            );
        }

        Ok(())
    }

    async fn dispatch_if(
        &self,
        program: &mut Program,
        path: &[(usize, Branch)],
        i: usize,
        condition: &str,
        cancel: &CancellationToken,
    ) -> Result<Flow, ExecuteError> {
        let taken = Condition::parse(condition).eval(&program.variables);

        let mut child_path = path.to_vec();
        child_path.push((i, if taken { Branch::Then } else { Branch::Else }));
        let (run_len, skip_len) = {
            let stmt = &block_mut(program, path)[i];
            match stmt {
                Statement::If { children, else_children, .. } => {
                    if taken {
                        (children.len(), else_children.len())
                    } else {
                        (else_children.len(), children.len())
                    }
                }
                _ => unreachable!("path addresses an If statement"),
            }
        };

        // Mark the untaken branch's immediate statements SKIPPED without
        // running them (spec §3.2's skip transition).
        let skip_branch = if taken { Branch::Else } else { Branch::Then };
        let mut skip_path = path.to_vec();
        skip_path.push((i, skip_branch));
        for j in 0..skip_len {
            block_mut(program, &skip_path)[j].meta_mut().status = StatementStatus::Skipped;
        }
        if skip_len > 0 {
            self.host.workflow_update(program).await?;
        }

        if run_len == 0 {
            return Ok(Flow::Continue);
        }
        self.execute_block(program, &child_path, cancel).await
    }
}

enum DispatchKind {
    Print(String, Option<String>),
    Var(String, String),
    Call {
        step_name: String,
        args: Vec<ArgExpr>,
        returns: Vec<wf_core::ReturnSlot>,
        metadata: Metadata,
        desc: String,
    },
    If(String),
    Return,
    Other,
}

/// Navigates from `program.main` down through a chain of `If`
/// branch selections, returning a mutable reference to the addressed
/// block. Keeps statement traversal from requiring a borrow of the
/// whole `Program` for the run's entire duration.
fn block_mut<'p>(program: &'p mut Program, path: &[(usize, Branch)]) -> &'p mut Vec<Statement> {
    let mut block = &mut program.main;
    for (idx, branch) in path {
        let stmt = &mut block[*idx];
        block = match stmt {
            Statement::If { children, else_children, .. } => match branch {
                Branch::Then => children,
                Branch::Else => else_children,
            },
            _ => unreachable!("path addresses an If statement"),
        };
    }
    block
}

/// Strips one layer of surrounding double quotes, if present (spec
/// §4.2's `var` dispatch: "strip surrounding double quotes from rhs").
fn strip_quotes(s: &str) -> &str {
    let trimmed = s.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
