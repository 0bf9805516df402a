//! S5 — metadata round-trip (spec.md §8).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use wf_core::{FakeClock, Metadata, Program, ScalarValue, Step};
use wf_engine::{FunctionCallRequest, FunctionCallResponse, Host, HostError, RunOutcome};

/// Records the metadata observed on its single `function_call` so the
/// test can assert every key/type survived the parse → dispatch trip
/// (spec §3.3: "Unknown keys MUST be preserved and forwarded").
#[derive(Default)]
struct RecordingHost {
    observed: Mutex<Option<Metadata>>,
}

#[async_trait]
impl Host for RecordingHost {
    async fn function_call(
        &self,
        _step: &Step,
        request: FunctionCallRequest<'_>,
    ) -> Result<FunctionCallResponse, HostError> {
        *self.observed.lock().unwrap() = Some(request.metadata.clone());
        Ok(FunctionCallResponse {
            success: true,
            ..Default::default()
        })
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
step1 = beiluo.test1.notify(username: string "用户名") -> (err: error);

func main() {
    err := step1(input["用户名"]){retry:3, timeout:5000, priority:"high", debug:true}
}
"#;

#[tokio::test]
async fn call_metadata_survives_parse_and_dispatch_with_correct_types() {
    let mut program = wf_dsl::parse(SRC).unwrap();
    program.input_vars.insert("用户名".to_string(), ScalarValue::String("张三".to_string()));

    let host = Arc::new(RecordingHost::default());
    let clock = FakeClock::new(0);
    let runtime = wf_engine::Runtime::new(host.clone(), clock);

    let outcome = runtime.start(&mut program).await.unwrap();
    assert_eq!(outcome, RunOutcome::Exited);

    let observed = host.observed.lock().unwrap().clone().expect("function_call was invoked");
    assert_eq!(observed.len(), 4);
    assert_eq!(observed.get("retry"), Some(&ScalarValue::Int(3)));
    assert_eq!(observed.get("timeout"), Some(&ScalarValue::Int(5000)));
    assert_eq!(
        observed.get("priority"),
        Some(&ScalarValue::String("high".to_string()))
    );
    assert_eq!(observed.get("debug"), Some(&ScalarValue::Bool(true)));

    // The renamed `err` binding is still reachable under its alias too.
    assert!(program.variables.contains("step1Err"));
    assert!(program.variables.contains("err"));
}
