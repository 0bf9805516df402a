//! S1 — static workflow happy path (spec.md §8).

use std::sync::Arc;
use wf_core::{FakeClock, StatementStatus};
use wf_engine::{FakeHost, Runtime};

const SRC: &str = r#"
step1 = beiluo.test1.case[用例001] -> ();
step2 = beiluo.test1.case[用例002] -> ();
step3 = beiluo.test1.case[用例003] -> ();
step4 = beiluo.test1.case[用例004] -> ();

func main() {
    sys.Println("starting")
    step1()
    step1.Printf("done with case 1")
    step2()
    step3()
    step4()
}
"#;

#[tokio::test]
async fn four_static_steps_complete_and_fire_exit_once() {
    let mut program = wf_dsl::parse(SRC).unwrap();
    let host = Arc::new(FakeHost::new());
    let runtime = Runtime::new(host.clone(), FakeClock::new(0));

    let outcome = runtime.start(&mut program).await.unwrap();

    assert_eq!(outcome, wf_engine::RunOutcome::Exited);
    assert_eq!(host.exit_count(), 1);
    assert_eq!(host.return_count(), 0);
    assert_eq!(host.calls(), vec!["step1", "step2", "step3", "step4"]);

    for statement in &program.main {
        assert_eq!(statement.status(), StatementStatus::Completed);
    }

    // One sys.Println plus one step1.Printf.
    assert_eq!(program.global_logs.len(), 1);
    assert_eq!(program.step("step1").unwrap().logs.len(), 1);
    assert!(program.step("step2").unwrap().logs.is_empty());

    // STATIC steps declare no output params; no `err` binding is created.
    assert!(!program.variables.contains("err"));
}
