// © 2024, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#![deny(unused_must_use)]

#[macro_use]
extern crate log;

use bench_common::{config, errors::Result, CheckRequest, CheckService, LocalCheckService};
use bench_launch::{parse_fault, parse_inputs, parse_values, render_text, USAGE_EXIT_CODE};
use bench_programs::DecisionTree;
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use std::process;

fn fault_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("fault")
        .long("fault")
        .help("Replaces one guard conjunct: `ko2`, `max:<cand>:<conj>:<lhs>><rhs>` or `min:<max>:<cand>:<conj>:<lhs><<rhs>`")
        .takes_value(true)
        .value_name("FAULT")
}

fn fail_fast_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("fail-fast")
        .long("fail-fast")
        .help("Stops at the first counterexample")
}

fn app<'a, 'b>() -> App<'a, 'b> {
    App::new("bench-driver")
        .about("Runs the max/min and loop-summarization benchmark programs")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("json")
                .long("json")
                .global(true)
                .help("Prints the response as JSON"),
        )
        .arg(
            Arg::with_name("quiet")
                .long("quiet")
                .short("q")
                .global(true)
                .help("Only reports through the exit status"),
        )
        .subcommand(
            SubCommand::with_name("maxmin")
                .about("Runs maxmin6 once on the given inputs")
                .arg(
                    Arg::with_name("inputs")
                        .help("Six integers, separately or as one comma-separated list")
                        .required(true)
                        .multiple(true)
                        .allow_hyphen_values(true)
                        .value_name("INPUTS"),
                )
                .arg(fault_arg()),
        )
        .subcommand(
            SubCommand::with_name("sweep")
                .about("Checks every sextuple over [min, max]^6")
                .arg(
                    Arg::with_name("min")
                        .long("min")
                        .takes_value(true)
                        .allow_hyphen_values(true)
                        .value_name("MIN"),
                )
                .arg(
                    Arg::with_name("max")
                        .long("max")
                        .takes_value(true)
                        .allow_hyphen_values(true)
                        .value_name("MAX"),
                )
                .arg(fault_arg())
                .arg(fail_fast_arg()),
        )
        .subcommand(
            SubCommand::with_name("random")
                .about("Checks seeded random sextuples mixed with boundary values")
                .arg(
                    Arg::with_name("cases")
                        .long("cases")
                        .takes_value(true)
                        .value_name("N"),
                )
                .arg(
                    Arg::with_name("seed")
                        .long("seed")
                        .takes_value(true)
                        .value_name("SEED"),
                )
                .arg(fault_arg())
                .arg(fail_fast_arg()),
        )
        .subcommand(
            SubCommand::with_name("loops")
                .about("Runs one loop fixture, or checks the whole catalogue")
                .arg(Arg::with_name("fixture").value_name("FIXTURE"))
                .arg(
                    Arg::with_name("inputs")
                        .long("inputs")
                        .help("Comma-separated nondeterministic values instead of the witness")
                        .takes_value(true)
                        .allow_hyphen_values(true)
                        .requires("fixture")
                        .value_name("VALUES"),
                ),
        )
        .subcommand(
            SubCommand::with_name("tree")
                .about("Prints the decision tree as C-style if/else blocks")
                .arg(fault_arg()),
        )
}

fn parse_number<T>(matches: &ArgMatches, name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr<Err = std::num::ParseIntError>,
{
    match matches.value_of(name) {
        Some(text) => Ok(text
            .trim()
            .parse()
            .map_err(bench_programs::errors::Error::from)?),
        None => Ok(default),
    }
}

fn request(matches: &ArgMatches) -> Result<Option<CheckRequest>> {
    let request = match matches.subcommand() {
        ("maxmin", Some(sub)) => {
            let inputs: Vec<&str> = sub.values_of("inputs").into_iter().flatten().collect();
            CheckRequest::MaxMin {
                inputs: parse_inputs(&inputs)?,
                fault: parse_fault(sub.value_of("fault"))?,
            }
        }
        ("sweep", Some(sub)) => CheckRequest::Sweep {
            min: parse_number(sub, "min", config::sweep_min())?,
            max: parse_number(sub, "max", config::sweep_max())?,
            fault: parse_fault(sub.value_of("fault"))?,
            fail_fast: sub.is_present("fail-fast") || config::fail_fast(),
        },
        ("random", Some(sub)) => CheckRequest::Random {
            cases: parse_number(sub, "cases", config::random_cases())?,
            seed: parse_number(sub, "seed", config::random_seed())?,
            fault: parse_fault(sub.value_of("fault"))?,
            fail_fast: sub.is_present("fail-fast") || config::fail_fast(),
        },
        ("loops", Some(sub)) => match sub.value_of("fixture") {
            Some(name) => CheckRequest::Fixture {
                name: name.to_string(),
                inputs: sub.value_of("inputs").map(parse_values).transpose()?,
            },
            None => CheckRequest::AllFixtures,
        },
        ("tree", Some(sub)) => {
            let tree = match parse_fault(sub.value_of("fault"))? {
                Some(fault) => DecisionTree::derive().with_fault(&fault)?,
                None => DecisionTree::derive(),
            };
            print!("{tree}");
            return Ok(None);
        }
        _ => unreachable!("clap requires a subcommand"),
    };
    Ok(Some(request))
}

/// Global flags may be given before or after the subcommand.
fn flag(matches: &ArgMatches, name: &str) -> bool {
    matches.is_present(name)
        || matches
            .subcommand()
            .1
            .map_or(false, |sub| sub.is_present(name))
}

fn run(matches: &ArgMatches) -> Result<i32> {
    let request = match request(matches)? {
        Some(request) => request,
        None => return Ok(0),
    };
    debug!("request: {:?}", request);
    let response = LocalCheckService::new().check(&request)?;
    let json = flag(matches, "json") || config::json_output();
    let quiet = flag(matches, "quiet") || config::quiet();
    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else if !quiet {
        print!("{}", render_text(&response));
    }
    Ok(response.exit_code())
}

fn main() {
    env_logger::init_from_env(env_logger::Env::new().filter_or("BENCH_LOG", "info"));
    debug!("settings: {}", config::dump());

    let matches = match app().get_matches_from_safe(config::get_filtered_args()) {
        Ok(matches) => matches,
        Err(err) if err.use_stderr() => {
            eprintln!("{}", err.message);
            process::exit(USAGE_EXIT_CODE);
        }
        Err(err) => err.exit(),
    };
    let code = match run(&matches) {
        Ok(code) => code,
        Err(err) => {
            error!("{}", err);
            USAGE_EXIT_CODE
        }
    };
    process::exit(code);
}
