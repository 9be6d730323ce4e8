// © 2024, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::process::{Command, Output};

fn bench_driver(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bench-driver"))
        .args(args)
        .env("BENCH_LOG", "warn")
        .env_remove("BENCH_JSON_OUTPUT")
        .env_remove("BENCH_QUIET")
        .output()
        .expect("failed to run bench-driver")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn exit_code(output: &Output) -> i32 {
    output.status.code().expect("bench-driver was killed by a signal")
}

#[test]
fn documented_counterexample_is_handled() {
    let output = bench_driver(&["maxmin", "1,-3,0,-2,-1,-2"]);
    assert_eq!(exit_code(&output), 0);
    assert!(stdout(&output).contains("max=1, min=-3"));
}

#[test]
fn all_equal_inputs_are_handled() {
    let output = bench_driver(&["maxmin", "5,5,5,5,5,5"]);
    assert_eq!(exit_code(&output), 0);
    assert!(stdout(&output).contains("max=5, min=5"));
}

#[test]
fn injected_fault_reaches_the_error_label() {
    let output = bench_driver(&["maxmin", "--fault", "ko2", "1,-3,0,-2,-1,-2"]);
    assert_eq!(exit_code(&output), 1);
    let text = stdout(&output);
    assert!(text.contains("max=0, min=-3"));
    assert!(text.contains("maxmin6::ERROR"));
}

#[test]
fn malformed_inputs_are_usage_errors() {
    assert_eq!(exit_code(&bench_driver(&["maxmin", "1,2"])), 2);
    assert_eq!(exit_code(&bench_driver(&["maxmin", "--fault", "max:z", "1,2,3,4,5,6"])), 2);
    assert_eq!(exit_code(&bench_driver(&[])), 2);
    assert_eq!(exit_code(&bench_driver(&["loops", "no_such_fixture"])), 2);
}

#[test]
fn sweep_reports_json() {
    let output = bench_driver(&["sweep", "--min", "-1", "--max", "1", "--json"]);
    assert_eq!(exit_code(&output), 0);
    let response: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(response["result"], "Holds");
    assert_eq!(response["details"]["Campaign"]["cases"], 729);
    assert_eq!(
        response["details"]["Campaign"]["coverage"]
            .as_array()
            .map(Vec::len),
        Some(30)
    );
}

#[test]
fn faulty_sweep_fails() {
    let output = bench_driver(&[
        "sweep", "--min", "-1", "--max", "1", "--fault", "ko2", "--fail-fast",
    ]);
    assert_eq!(exit_code(&output), 1);
    assert!(stdout(&output).contains("first counterexample"));
}

#[test]
fn random_campaign_passes() {
    let output = bench_driver(&["random", "--cases", "500", "--seed", "3"]);
    assert_eq!(exit_code(&output), 0);
    assert!(stdout(&output).contains("checked 500 case(s), 0 violation(s)"));
}

#[test]
fn loop_fixtures_exit_with_their_verdicts() {
    assert_eq!(exit_code(&bench_driver(&["loops"])), 0);
    assert_eq!(exit_code(&bench_driver(&["loops", "overflowing_odd_parity"])), 0);
    assert_eq!(exit_code(&bench_driver(&["loops", "multiple_loops_parity"])), 1);
    assert_eq!(exit_code(&bench_driver(&["loops", "plusminus_transformed"])), 2);
    assert_eq!(
        exit_code(&bench_driver(&[
            "loops",
            "nondet_bound_saturation",
            "--inputs",
            "1000000"
        ])),
        0
    );
}

#[test]
fn tree_is_printed_as_nested_conditionals() {
    let output = bench_driver(&["tree"]);
    assert_eq!(exit_code(&output), 0);
    assert!(stdout(&output).starts_with("if ((a>b) && (a>c) && (a>d) && (a>e) && (a>f)) {"));

    let faulty = stdout(&bench_driver(&["tree", "--fault", "ko2"]));
    assert!(faulty.starts_with("if ((a>b) && (a>c) && (b>d) && (a>e) && (a>f)) {"));
}

#[test]
fn settings_are_read_from_the_command_line() {
    let output = bench_driver(&["-Pjson_output=true", "maxmin", "5,5,5,5,5,5"]);
    assert_eq!(exit_code(&output), 0);
    let response: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(response["details"]["Case"]["selection"]["result"]["max"], 5);
}

#[test]
fn sweep_domain_is_read_from_the_environment() {
    let output = Command::new(env!("CARGO_BIN_EXE_bench-driver"))
        .args(["--json", "sweep"])
        .env("BENCH_LOG", "warn")
        .env("BENCH_SWEEP_MIN", "-1")
        .env("BENCH_SWEEP_MAX", "1")
        .output()
        .expect("failed to run bench-driver");
    assert_eq!(exit_code(&output), 0);
    let response: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(response["details"]["Campaign"]["cases"], 729);
}

#[test]
fn quiet_mode_only_sets_the_exit_status() {
    let output = bench_driver(&["--quiet", "loops", "multiple_loops_parity"]);
    assert_eq!(exit_code(&output), 1);
    assert!(stdout(&output).is_empty());
}
