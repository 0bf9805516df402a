//! S3 — `{{var}}` template expansion (spec.md §8).

use std::sync::Arc;
use wf_core::{FakeClock, ScalarValue};
use wf_engine::{FakeHost, FunctionCallResponse, Runtime};

const SRC: &str = r#"
step1 = beiluo.test1.user.lookup(username: string "username") -> (用户名: string "姓名", err: error);
step2 = beiluo.test1.interview_slot(username: string "username") -> (面试时间: string "时间", err: error);

func main() {
    用户名, err := step1("张三")
    面试时间, err := step2("张三")
    通知信息 := "你收到了:{{用户名}},时间：{{面试时间}}的面试安排"
}
"#;

#[tokio::test]
async fn expands_every_placeholder_from_bound_variables() {
    let mut program = wf_dsl::parse(SRC).unwrap();
    let host = Arc::new(FakeHost::new());
    host.push_response(
        "step1",
        FunctionCallResponse {
            success: true,
            want_output: [("用户名".to_string(), ScalarValue::String("张三".to_string()))]
                .into_iter()
                .collect(),
            ..Default::default()
        },
    );
    host.push_response(
        "step2",
        FunctionCallResponse {
            success: true,
            want_output: [(
                "面试时间".to_string(),
                ScalarValue::String("2024-01-15 14:00".to_string()),
            )]
            .into_iter()
            .collect(),
            ..Default::default()
        },
    );

    let runtime = Runtime::new(host, FakeClock::new(0));
    runtime.start(&mut program).await.unwrap();

    assert_eq!(
        program.variables.value("通知信息"),
        Some(&ScalarValue::String(
            "你收到了:张三,时间：2024-01-15 14:00的面试安排".to_string()
        ))
    );
}

#[tokio::test]
async fn unresolved_placeholder_is_left_literal() {
    let src = r#"
func main() {
    通知信息 := "hello {{未绑定}}"
}
"#;
    let mut program = wf_dsl::parse(src).unwrap();
    let host = Arc::new(FakeHost::new());
    let runtime = Runtime::new(host, FakeClock::new(0));
    runtime.start(&mut program).await.unwrap();

    assert_eq!(
        program.variables.value("通知信息"),
        Some(&ScalarValue::String("hello {{未绑定}}".to_string()))
    );
}
