// © 2024, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use bench_common::config;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|arg| arg.to_string()).collect()
}

#[test]
fn command_line_overrides_defaults() {
    let settings = config::from_args(args(&[
        "bench-driver",
        "-Psweep_min=-5",
        "-PFAIL_FAST=true",
        "sweep",
    ]))
    .unwrap();
    assert_eq!(config::lookup::<i32>(&settings, "SWEEP_MIN"), Some(-5));
    assert_eq!(config::lookup::<bool>(&settings, "FAIL_FAST"), Some(true));
    assert_eq!(config::lookup::<u64>(&settings, "ITERATION_LIMIT"), Some(1_000_000));
}

#[test]
fn malformed_values_are_ignored() {
    let settings = config::from_args(args(&["bench-driver", "-Psweep_min=lots"])).unwrap();
    assert_eq!(config::lookup::<i32>(&settings, "SWEEP_MIN"), None);
    assert_eq!(config::lookup::<String>(&settings, "SWEEP_MIN"), Some("lots".to_string()));
}

#[test]
fn unknown_settings_are_absent() {
    let settings = config::from_args(args(&["bench-driver"])).unwrap();
    assert_eq!(config::lookup::<String>(&settings, "NO_SUCH_SETTING"), None);
}

#[test]
fn accessors_fall_back_to_defaults() {
    assert!(config::sweep_min() <= config::sweep_max());
    assert!(config::iteration_limit() > 0);
    assert!(!config::dump().is_empty());
    assert!(!config::get_filtered_args().is_empty());
}

#[test]
fn environment_overrides_defaults() {
    std::env::set_var("BENCH_RANDOM_SEED", "7");
    let settings = config::from_args(args(&["bench-driver"]));
    std::env::remove_var("BENCH_RANDOM_SEED");
    let settings = settings.unwrap();
    assert_eq!(config::lookup::<u64>(&settings, "RANDOM_SEED"), Some(7));
    assert_eq!(config::lookup::<u64>(&settings, "random_seed"), Some(7));
    assert_eq!(config::lookup::<bool>(&settings, "JSON_OUTPUT"), Some(false));
}
