//! S6 — resume after a persisted failure (spec.md §8).
//!
//! Resume is a host-level operation (spec.md §8 S6, DESIGN.md's Open
//! Question decision): the host clears a FAILED statement back to
//! PENDING and re-invokes `Runtime::start` on the same `Program`.
//! `Executor::run` always starts at index 0 and skips statements that
//! are already terminal, so the step1 binding that survived the first,
//! failed run is still visible to step2 on the second.

use std::sync::Arc;

use wf_core::{FakeClock, ScalarValue, StatementStatus};
use wf_engine::{FakeHost, FunctionCallResponse, Runtime};

const SRC: &str = r#"
step1 = beiluo.test1.user.create_user(username: string "用户名") -> (userId: string "用户ID", err: error);
step2 = beiluo.test1.provision(userId: string "用户ID") -> (ok: string "结果", err: error);

func main() {
    用户ID, err := step1(input["用户名"])
    结果, err := step2(用户ID)
}
"#;

#[tokio::test]
async fn step2_failure_is_persisted_then_resumed_with_step1s_binding_intact() {
    let mut program = wf_dsl::parse(SRC).unwrap();
    program.input_vars.insert("用户名".to_string(), ScalarValue::String("张三".to_string()));
    program.flow_id = Some(wf_core::FlowId::new("s6"));

    let host = Arc::new(FakeHost::new());
    host.push_response(
        "step1",
        FunctionCallResponse {
            success: true,
            want_output: [
                ("userId".to_string(), ScalarValue::String("U-1".to_string())),
                ("err".to_string(), ScalarValue::Null),
            ]
            .into_iter()
            .collect(),
            ..Default::default()
        },
    );
    host.push_response(
        "step2",
        FunctionCallResponse {
            success: false,
            error: "provisioning backend unavailable".to_string(),
            ..Default::default()
        },
    );

    let runtime = Runtime::new(host.clone(), FakeClock::new(0));

    // First run: step1 completes and is persisted, step2 fails and the
    // run terminates via WorkflowReturn.
    let err = runtime.start(&mut program).await.unwrap_err();
    assert!(matches!(err, wf_engine::RuntimeError::Execute(_)));
    assert_eq!(program.main[0].status(), StatementStatus::Completed);
    assert_eq!(program.main[1].status(), StatementStatus::Failed);
    assert_eq!(program.variables.value("用户ID"), Some(&ScalarValue::String("U-1".to_string())));
    assert_eq!(host.calls(), vec!["step1", "step2"]);
    assert_eq!(host.return_count(), 1);

    // The host clears the FAILED statement back to PENDING and queues a
    // successful response, then resumes on the same Program.
    program.main[1].meta_mut().status = StatementStatus::Pending;
    host.push_response(
        "step2",
        FunctionCallResponse {
            success: true,
            want_output: [
                ("ok".to_string(), ScalarValue::String("provisioned".to_string())),
                ("err".to_string(), ScalarValue::Null),
            ]
            .into_iter()
            .collect(),
            ..Default::default()
        },
    );

    let outcome = runtime.start(&mut program).await.unwrap();
    assert_eq!(outcome, wf_engine::RunOutcome::Exited);

    // step1 is never re-invoked: its statement was already terminal.
    assert_eq!(host.calls(), vec!["step1", "step2", "step2"]);
    assert_eq!(program.main[0].status(), StatementStatus::Completed);
    assert_eq!(program.main[1].status(), StatementStatus::Completed);
    assert_eq!(
        program.variables.value("结果"),
        Some(&ScalarValue::String("provisioned".to_string()))
    );
    // step1's binding, never cleared between runs, was still visible to
    // step2's real_input on resume (spec S6's "must surface the prior
    // bindings... to step2's real_input").
    assert_eq!(program.variables.value("用户ID"), Some(&ScalarValue::String("U-1".to_string())));
}
