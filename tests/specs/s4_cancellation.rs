//! S4 — cancellation while a step is in flight (spec.md §8).

use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use tokio::sync::Notify;
use wf_core::{FakeClock, Program, Step};
use wf_engine::{ExecuteError, FunctionCallRequest, FunctionCallResponse, Host, HostError, RuntimeError};

/// A host whose `step2` call blocks forever, so the only way `Executor`
/// observes it finishing is through the cancellation race in `dispatch_call`.
struct BlockingAtStep2 {
    gate: Notify,
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl Host for BlockingAtStep2 {
    async fn function_call(
        &self,
        step: &Step,
        _request: FunctionCallRequest<'_>,
    ) -> Result<FunctionCallResponse, HostError> {
        self.calls.lock().unwrap().push(step.name.clone());
        if step.name == "step2" {
            self.gate.notified().await;
        }
        Ok(FunctionCallResponse { success: true, ..Default::default() })
    }

    async fn workflow_update(&self, _program: &Program) -> Result<(), HostError> {
        Ok(())
    }

    async fn workflow_exit(&self, _program: &Program) -> Result<(), HostError> {
        Ok(())
    }

    async fn workflow_return(&self, _program: &Program) -> Result<(), HostError> {
        Ok(())
    }
}

const SRC: &str = r#"
step1 = beiluo.test1.a() -> ();
step2 = beiluo.test1.b() -> ();
step3 = beiluo.test1.c() -> ();

func main() {
    step1()
    step2()
    step3()
}
"#;

#[tokio::test]
async fn mid_flight_cancel_marks_the_in_flight_statement_cancelled() {
    let mut program = wf_dsl::parse(SRC).unwrap();
    program.flow_id = Some(wf_core::FlowId::new("s4"));
    let host = Arc::new(BlockingAtStep2 { gate: Notify::new(), calls: Mutex::new(Vec::new()) });
    let runtime = Arc::new(wf_engine::Runtime::new(host.clone(), FakeClock::new(0)));

    let runtime_clone = runtime.clone();
    let handle = tokio::spawn(async move {
        let result = runtime_clone.start(&mut program).await;
        (result, program)
    });

    // Wait until step2's call has actually started.
    for _ in 0..200 {
        if host.calls.lock().last().map(String::as_str) == Some("step2") {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(host.calls.lock().as_slice(), ["step1", "step2"]);

    runtime.stop(&wf_core::FlowId::new("s4")).unwrap();

    let (result, program) = handle.await.unwrap();
    let err = result.unwrap_err();
    assert!(matches!(err, RuntimeError::Execute(ExecuteError::Cancelled)));

    // step3 is never reached: the gate is never notified, so step2's
    // callback never returns and the run stops at the cancellation race.
    assert_eq!(host.calls.lock().as_slice(), ["step1", "step2"]);

    assert_eq!(program.main[0].status(), wf_core::StatementStatus::Completed);
    assert_eq!(program.main[1].status(), wf_core::StatementStatus::Cancelled);
    assert_eq!(program.main[2].status(), wf_core::StatementStatus::Pending);
}
