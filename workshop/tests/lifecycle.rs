//! Lifecycle tests driving the controller through select / run / verify.
//!
//! Exercises are `kind = "scripted"`: their entry files decide what each hook
//! returns, and every hook call is recorded so tests can assert which parts of
//! the lifecycle ran.

use std::fs;

use serde_json::json;
use workshop::core::types::{ExecuteOutcome, Mode};
use workshop::error::WorkshopError;
use workshop::io::progress_store::{COMPLETED, CURRENT, Progress};
use workshop::test_support::{Shown, TestWorkshop, scripted};

fn three_exercises() -> TestWorkshop {
    TestWorkshop::new(&[
        ("A", &scripted("")),
        ("B", &scripted("")),
        ("C", &scripted("")),
    ])
    .expect("fixture")
}

fn args() -> Vec<String> {
    vec!["program.sh".to_string()]
}

fn error_kind(err: &anyhow::Error) -> &WorkshopError {
    err.downcast_ref::<WorkshopError>()
        .unwrap_or_else(|| panic!("expected WorkshopError, got {err:#}"))
}

fn select(fixture: &mut TestWorkshop, name: &str) {
    fixture.workshop.select(name).expect("select");
    fixture.reset_recordings();
}

#[test]
fn select_saves_current_and_presents_instructions() {
    let mut fixture = TestWorkshop::new(&[
        ("Hello World", &scripted("")),
        ("Baby Steps", &scripted("")),
        ("My First IO", &scripted("")),
    ])
    .expect("fixture");

    fixture.workshop.select("  baby STEPS ").expect("select");

    assert_eq!(fixture.store().current().as_deref(), Some("Baby Steps"));
    assert_eq!(
        fixture.calls(),
        vec!["init:Baby Steps:2", "prepare:Baby Steps", "text:Baby Steps"]
    );
    assert_eq!(
        fixture.shown(),
        [
            Shown::Header {
                name: "Baby Steps".to_string(),
                number: 2,
                total: 3,
            },
            Shown::Text("Instructions for Baby Steps".to_string()),
        ]
    );
}

#[test]
fn reselecting_completed_exercise_keeps_completed() {
    let mut fixture = three_exercises();
    select(&mut fixture, "A");
    fixture.workshop.execute(Mode::Verify, &args()).expect("verify");

    fixture.workshop.select("b").expect("select b");
    fixture.workshop.select("a").expect("select a again");

    assert_eq!(fixture.store().current().as_deref(), Some("A"));
    assert_eq!(fixture.store().completed(), vec!["A"]);
}

#[test]
fn unknown_name_is_rejected_without_touching_current() {
    let mut fixture = three_exercises();
    select(&mut fixture, "A");
    let writes = fixture.store().writes;

    let err = fixture.workshop.select("Z").unwrap_err();

    assert!(matches!(error_kind(&err), WorkshopError::Resolution(name) if name == "Z"));
    assert_eq!(err.to_string(), "No such exercise: Z");
    assert_eq!(fixture.store().current().as_deref(), Some("A"));
    assert_eq!(fixture.store().writes, writes);
    assert!(fixture.calls().is_empty());
    assert!(fixture.shown().is_empty());
}

#[test]
fn partial_names_do_not_resolve() {
    let mut fixture = TestWorkshop::new(&[("Baby Steps", &scripted(""))]).expect("fixture");
    let err = fixture.workshop.select("Baby").unwrap_err();
    assert!(matches!(error_kind(&err), WorkshopError::Resolution(_)));
    assert_eq!(fixture.store().current(), None);
}

#[test]
fn broken_exercise_is_a_config_error_not_a_resolution_error() {
    let mut fixture = TestWorkshop::new(&[
        ("A", &scripted("")),
        ("Broken", "kind = \"mystery\"\n"),
    ])
    .expect("fixture");

    let err = fixture.workshop.select("broken").unwrap_err();

    assert!(matches!(error_kind(&err), WorkshopError::Config(_)));
    assert!(format!("{err:#}").contains("is not a workshop exercise"));
    assert_eq!(fixture.store().current(), None);
}

#[test]
fn missing_exercise_directory_is_a_config_error() {
    let mut fixture = three_exercises();
    fs::remove_dir_all(fixture.exercise_path("B")).expect("remove");

    let err = fixture.workshop.select("B").unwrap_err();

    assert!(matches!(error_kind(&err), WorkshopError::Config(_)));
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn prepare_failure_stops_before_instructions() {
    let mut fixture =
        TestWorkshop::new(&[("A", &scripted("prepare_error = true\n"))]).expect("fixture");

    let err = fixture.workshop.select("A").unwrap_err();

    assert!(matches!(error_kind(&err), WorkshopError::Execution { .. }));
    assert_eq!(
        err.to_string(),
        "Error preparing exercise: scripted prepare error"
    );
    assert_eq!(fixture.calls(), vec!["init:A:1", "prepare:A"]);
    assert!(!fixture.shown().iter().any(|shown| matches!(shown, Shown::Text(_))));
}

#[test]
fn instructions_failure_is_an_execution_error() {
    let mut fixture =
        TestWorkshop::new(&[("A", &scripted("text_error = true\n"))]).expect("fixture");

    let err = fixture.workshop.select("A").unwrap_err();

    assert!(matches!(error_kind(&err), WorkshopError::Execution { .. }));
    assert!(err.to_string().starts_with("Error loading exercise text"));
}

#[test]
fn print_without_name_redisplays_current() {
    let mut fixture = three_exercises();
    select(&mut fixture, "C");

    fixture.workshop.print(None).expect("print");

    assert_eq!(
        fixture.shown().last(),
        Some(&Shown::Text("Instructions for C".to_string()))
    );
}

#[test]
fn print_without_current_is_a_usage_error() {
    let mut fixture = three_exercises();
    let err = fixture.workshop.print(None).unwrap_err();
    assert!(matches!(error_kind(&err), WorkshopError::Usage(_)));
    assert_eq!(
        err.to_string(),
        "No active exercise. Select one from the menu."
    );
}

#[test]
fn verify_pass_records_completion_and_reports_remaining() {
    let mut fixture = three_exercises();
    select(&mut fixture, "B");

    let outcome = fixture.workshop.execute(Mode::Verify, &args()).expect("verify");

    assert_eq!(outcome, ExecuteOutcome::Passed { remaining: 2 });
    assert_eq!(fixture.store().completed(), vec!["B"]);
    assert_eq!(fixture.calls(), vec!["init:B:2", "verify:B", "end:B:verify:true"]);
    assert_eq!(
        fixture.shown(),
        [
            Shown::Passed("B".to_string()),
            Shown::Solutions(Vec::new()),
            Shown::Progress(2),
        ]
    );
}

#[test]
fn completion_order_follows_pass_order() {
    let mut fixture = three_exercises();
    let mut outcomes = Vec::new();
    for name in ["B", "A", "C"] {
        fixture.workshop.select(name).expect("select");
        outcomes.push(fixture.workshop.execute(Mode::Verify, &args()).expect("verify"));
    }

    assert_eq!(fixture.store().completed(), vec!["B", "A", "C"]);
    assert_eq!(
        fixture.store().docs.get(COMPLETED),
        Some(&json!(["B", "A", "C"]))
    );
    assert_eq!(
        outcomes,
        vec![
            ExecuteOutcome::Passed { remaining: 2 },
            ExecuteOutcome::Passed { remaining: 1 },
            ExecuteOutcome::Passed { remaining: 0 },
        ]
    );
    assert_eq!(fixture.shown().last(), Some(&Shown::Progress(0)));
}

#[test]
fn passing_twice_does_not_duplicate_completion() {
    let mut fixture = three_exercises();
    select(&mut fixture, "A");

    let first = fixture.workshop.execute(Mode::Verify, &args()).expect("first");
    let second = fixture.workshop.execute(Mode::Verify, &args()).expect("second");

    assert_eq!(first, ExecuteOutcome::Passed { remaining: 2 });
    assert_eq!(second, ExecuteOutcome::Passed { remaining: 2 });
    assert_eq!(fixture.store().completed(), vec!["A"]);
}

#[test]
fn remaining_counts_stale_entries_in_completed() {
    let mut fixture = three_exercises();
    fixture.seed(COMPLETED, json!(["Renamed Long Ago"]));
    select(&mut fixture, "A");

    let outcome = fixture.workshop.execute(Mode::Verify, &args()).expect("verify");

    assert_eq!(outcome, ExecuteOutcome::Passed { remaining: 1 });
    assert_eq!(fixture.store().completed(), vec!["Renamed Long Ago", "A"]);
}

#[test]
fn corrupt_completed_document_is_reset_on_pass() {
    let mut fixture = three_exercises();
    fixture.seed(COMPLETED, json!({"not": "a list"}));
    select(&mut fixture, "C");

    let outcome = fixture.workshop.execute(Mode::Verify, &args()).expect("verify");

    assert_eq!(outcome, ExecuteOutcome::Passed { remaining: 2 });
    assert_eq!(fixture.store().completed(), vec!["C"]);
}

#[test]
fn verify_fail_runs_fail_path_only() {
    let mut fixture = TestWorkshop::new(&[
        ("A", &scripted("verify = \"fail\"\n")),
        ("B", &scripted("")),
    ])
    .expect("fixture");
    select(&mut fixture, "A");

    let outcome = fixture.workshop.execute(Mode::Verify, &args()).expect("verify");

    assert_eq!(outcome, ExecuteOutcome::Failed);
    assert!(outcome.is_failure());
    assert!(fixture.store().completed().is_empty());
    assert_eq!(fixture.calls(), vec!["init:A:1", "verify:A", "end:A:verify:false"]);
    assert_eq!(fixture.shown(), [Shown::Failed("A".to_string())]);
}

#[test]
fn dry_run_never_mutates_progress() {
    for verdict in ["pass", "fail"] {
        let mut fixture = TestWorkshop::new(&[
            ("A", &scripted(&format!("run = \"{verdict}\"\n"))),
            ("B", &scripted("")),
        ])
        .expect("fixture");
        select(&mut fixture, "A");
        let before = fixture.store().clone();

        let outcome = fixture.workshop.execute(Mode::Run, &args()).expect("run");

        assert_eq!(outcome, ExecuteOutcome::DryRun);
        assert_eq!(fixture.store(), &before);
        assert_eq!(fixture.calls(), vec!["init:A:1", "run:A"]);
        assert!(fixture.shown().is_empty());
    }
}

#[test]
fn execution_error_leaves_progress_and_skips_pass_and_fail() {
    for mode in [Mode::Verify, Mode::Run] {
        let mut fixture = TestWorkshop::new(&[
            ("A", &scripted("verify = \"error\"\nrun = \"error\"\n")),
            ("B", &scripted("")),
        ])
        .expect("fixture");
        fixture.seed(COMPLETED, json!(["B"]));
        select(&mut fixture, "A");
        let before = fixture.store().clone();

        let err = fixture.workshop.execute(mode, &args()).unwrap_err();

        assert!(matches!(error_kind(&err), WorkshopError::Execution { .. }));
        assert_eq!(err.to_string(), format!("Could not {mode}: scripted {mode} error"));
        assert_eq!(fixture.store(), &before);
        assert_eq!(fixture.calls(), vec!["init:A:1".to_string(), format!("{mode}:A")]);
        assert!(fixture.shown().is_empty());
    }
}

#[test]
fn execute_without_current_is_a_usage_error() {
    let mut fixture = three_exercises();

    let err = fixture.workshop.execute(Mode::Verify, &args()).unwrap_err();

    assert!(matches!(error_kind(&err), WorkshopError::Usage(_)));
    assert!(err.to_string().contains("No active exercise"));
    assert!(fixture.calls().is_empty());
}

#[test]
fn execute_without_file_is_a_usage_error() {
    let mut fixture = three_exercises();
    select(&mut fixture, "A");

    let err = fixture.workshop.execute(Mode::Run, &[]).unwrap_err();

    assert!(matches!(error_kind(&err), WorkshopError::Usage(_)));
    assert_eq!(err.to_string(), "Usage: testshop run mysubmission");
    assert!(fixture.calls().is_empty());
}

#[test]
fn execute_against_vanished_current_is_a_resolution_error() {
    let mut fixture = three_exercises();
    fixture.seed(CURRENT, json!("Gone"));

    let err = fixture.workshop.execute(Mode::Verify, &args()).unwrap_err();

    assert!(matches!(error_kind(&err), WorkshopError::Resolution(_)));
    assert_eq!(fixture.store().current().as_deref(), Some("Gone"));
    assert!(fixture.store().completed().is_empty());
}

#[test]
fn solutions_are_presented_in_listed_order() {
    let mut fixture = TestWorkshop::new(&[(
        "A",
        &scripted("solutions = [\"solution/second.sh\", \"solution/first.sh\"]\n"),
    )])
    .expect("fixture");
    let solution_dir = fixture.exercise_path("A").join("solution");
    fs::create_dir_all(&solution_dir).expect("mkdir");
    fs::write(solution_dir.join("first.sh"), "echo first\n").expect("write");
    fs::write(solution_dir.join("second.sh"), "echo second\n").expect("write");
    select(&mut fixture, "A");

    fixture.workshop.execute(Mode::Verify, &args()).expect("verify");

    assert!(fixture.shown().contains(&Shown::Solutions(vec![
        "echo second\n".to_string(),
        "echo first\n".to_string(),
    ])));
}

#[test]
fn hidden_solutions_are_not_shown_but_pass_still_counts() {
    let mut fixture = TestWorkshop::new(&[
        ("A", &scripted("hide_solutions = true\nsolutions = [\"s.sh\"]\n")),
        ("B", &scripted("")),
    ])
    .expect("fixture");
    select(&mut fixture, "A");

    let outcome = fixture.workshop.execute(Mode::Verify, &args()).expect("verify");

    assert_eq!(outcome, ExecuteOutcome::Passed { remaining: 1 });
    assert_eq!(
        fixture.shown(),
        [Shown::Passed("A".to_string()), Shown::Progress(1)]
    );
    assert_eq!(fixture.store().completed(), vec!["A"]);
}

#[test]
fn unreadable_solution_stops_pass_before_recording() {
    let mut fixture = TestWorkshop::new(&[
        ("A", &scripted("solutions = [\"missing.sh\"]\n")),
        ("B", &scripted("")),
    ])
    .expect("fixture");
    select(&mut fixture, "A");

    let err = fixture.workshop.execute(Mode::Verify, &args()).unwrap_err();

    assert!(matches!(error_kind(&err), WorkshopError::Execution { .. }));
    let message = err.to_string();
    assert!(message.starts_with("ERROR: There was a problem printing the solution files: "));
    assert!(message.contains("missing.sh"));
    assert!(fixture.store().completed().is_empty());
    assert_eq!(fixture.calls(), vec!["init:A:1", "verify:A"]);
    assert_eq!(fixture.shown(), [Shown::Passed("A".to_string())]);
}

#[test]
fn cleanup_error_after_pass_keeps_completion_but_is_an_error() {
    let mut fixture = TestWorkshop::new(&[
        ("A", &scripted("end_error = true\n")),
        ("B", &scripted("")),
    ])
    .expect("fixture");
    select(&mut fixture, "A");

    let err = fixture.workshop.execute(Mode::Verify, &args()).unwrap_err();

    assert!(matches!(error_kind(&err), WorkshopError::Execution { .. }));
    assert_eq!(err.to_string(), "Error cleaning up: scripted end error");
    assert_eq!(fixture.store().completed(), vec!["A"]);
    assert_eq!(fixture.shown().last(), Some(&Shown::Progress(1)));
    assert_eq!(fixture.calls().last().map(String::as_str), Some("end:A:verify:true"));
}

#[test]
fn cleanup_error_after_fail_is_an_error() {
    let mut fixture =
        TestWorkshop::new(&[("A", &scripted("end_error = true\nverify = \"fail\"\n"))])
            .expect("fixture");
    select(&mut fixture, "A");

    let err = fixture.workshop.execute(Mode::Verify, &args()).unwrap_err();

    assert!(matches!(error_kind(&err), WorkshopError::Execution { .. }));
    assert!(err.to_string().starts_with("Error cleaning up"));
    assert!(fixture.store().completed().is_empty());
    assert_eq!(fixture.shown(), [Shown::Failed("A".to_string())]);
}

#[test]
fn menu_reflects_completed_exercises() {
    let mut fixture = three_exercises();
    select(&mut fixture, "C");
    fixture.workshop.execute(Mode::Verify, &args()).expect("verify");
    fixture.reset_recordings();

    fixture.workshop.menu().expect("menu");

    assert_eq!(
        fixture.shown(),
        [Shown::Menu {
            completed: vec!["C".to_string()],
        }]
    );
}
