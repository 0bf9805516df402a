//! S2 — dynamic workflow with `err` renaming (spec.md §8).

use std::sync::Arc;
use wf_core::{FakeClock, ScalarValue};
use wf_engine::{FakeHost, FunctionCallResponse, Runtime};

const SRC: &str = r#"
var input = map[string]interface{}{
    "用户名": "张三",
    "手机号": 13800000000,
}

step1 = beiluo.test1.user.create_user(username: string "用户名", phone: int "手机号") -> (workId: string "工号", username: string "用户名", err: error);
step2 = beiluo.test1.interview(username: string "用户名") -> (time: string "面试时间", interviewer: string "面试官", err: error);

func main() {
    工号, 用户名, err := step1(input["用户名"], input["手机号"])
    if err != nil {
        return
    }
    面试时间, 面试官, err := step2(用户名)
}
"#;

#[test]
fn parse_renames_collisions_and_aliases_err() {
    let program = wf_dsl::parse(SRC).unwrap();
    for name in ["工号", "用户名", "step1Err", "面试时间", "面试官", "step2Err", "err"] {
        assert!(program.variables.contains(name), "missing variable {name}");
    }
    assert_eq!(program.variables.value("err"), program.variables.value("step2Err"));
}

#[tokio::test]
async fn happy_path_runs_both_steps_and_exits() {
    let mut program = wf_dsl::parse(SRC).unwrap();
    let host = Arc::new(FakeHost::new());

    host.push_response(
        "step1",
        FunctionCallResponse {
            success: true,
            want_output: [
                ("workId".to_string(), ScalarValue::String("W-1".to_string())),
                ("username".to_string(), ScalarValue::String("张三".to_string())),
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
            success: true,
            want_output: [
                ("time".to_string(), ScalarValue::String("2024-01-15 14:00".to_string())),
                ("interviewer".to_string(), ScalarValue::String("李四".to_string())),
                ("err".to_string(), ScalarValue::Null),
            ]
            .into_iter()
            .collect(),
            ..Default::default()
        },
    );

    let runtime = Runtime::new(host.clone(), FakeClock::new(0));
    let outcome = runtime.start(&mut program).await.unwrap();

    assert_eq!(outcome, wf_engine::RunOutcome::Exited);
    assert_eq!(host.calls(), vec!["step1", "step2"]);
    assert_eq!(program.variables.value("step1Err"), Some(&ScalarValue::Null));
    assert_eq!(
        program.variables.value("面试时间"),
        Some(&ScalarValue::String("2024-01-15 14:00".to_string()))
    );
}
