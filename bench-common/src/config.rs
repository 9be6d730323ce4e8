// © 2024, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

mod commandline;

use self::commandline::CommandLine;
use crate::errors::Result;
use config_crate::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::de::DeserializeOwned;
use std::{
    env,
    sync::{RwLock, RwLockReadGuard},
};

const DEFAULT_LOG_DIR: &str = "./log/";
const DEFAULT_SWEEP_MIN: i32 = -2;
const DEFAULT_SWEEP_MAX: i32 = 2;
const DEFAULT_RANDOM_CASES: u64 = 10_000;
const DEFAULT_RANDOM_SEED: u64 = 0;
const DEFAULT_ITERATION_LIMIT: u64 = 1_000_000;

lazy_static! {
    static ref SETTINGS: RwLock<Config> = RwLock::new(
        layered(CommandLine::with_prefix("-P").ignore_invalid(true)).unwrap_or_else(|err| {
            warn!("ignoring the configuration files and overrides: {}", err);
            Config::default()
        })
    );
}

fn defaults() -> Result<ConfigBuilder<DefaultState>> {
    Ok(Config::builder()
        .set_default("log_dir", DEFAULT_LOG_DIR)?
        .set_default("dump_reports", false)?
        .set_default("quiet", false)?
        .set_default("json_output", false)?
        .set_default("sweep_min", i64::from(DEFAULT_SWEEP_MIN))?
        .set_default("sweep_max", i64::from(DEFAULT_SWEEP_MAX))?
        .set_default("random_cases", DEFAULT_RANDOM_CASES as i64)?
        .set_default("random_seed", DEFAULT_RANDOM_SEED as i64)?
        .set_default("iteration_limit", DEFAULT_ITERATION_LIMIT as i64)?
        .set_default("fail_fast", false)?)
}

fn layered(command_line: CommandLine) -> Result<Config> {
    // 1. Default values
    let mut builder = defaults()?;

    // 2. Override with the optional TOML file "Bench.toml" (if there is any)
    builder = builder.add_source(File::with_name("Bench.toml").required(false));

    // 3. Override with an optional TOML file specified by the `BENCH_CONFIG` env variable
    if let Ok(path) = env::var("BENCH_CONFIG") {
        if !path.is_empty() {
            builder = builder.add_source(File::with_name(&path).required(false));
        }
    }

    // 4. Override with env variables (`BENCH_SWEEP_MIN`, ...)
    builder = builder.add_source(Environment::with_prefix("BENCH").ignore_empty(true));

    // 5. Override with command-line arguments -P<arg>=<val>
    builder = builder.add_source(command_line);

    Ok(builder.build()?)
}

/// Builds the settings as the driver would see them with `args` on its
/// command line.
pub fn from_args<I>(args: I) -> Result<Config>
where
    I: IntoIterator<Item = String>,
{
    layered(
        CommandLine::with_prefix("-P")
            .ignore_invalid(true)
            .with_args(args),
    )
}

/// Return vector of arguments filtered out by prefix
pub fn get_filtered_args() -> Vec<String> {
    CommandLine::with_prefix("-P")
        .get_remaining_args()
        .collect::<Vec<String>>()
}

/// Generate a dump of the settings
pub fn dump() -> String {
    format!("{:?}", settings())
}

fn settings() -> RwLockReadGuard<'static, Config> {
    SETTINGS
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Reads `name` from `config`. Missing settings give `None`, malformed ones
/// are reported and ignored. Names are case-insensitive; every source stores
/// its keys in lower case.
pub fn lookup<T: DeserializeOwned>(config: &Config, name: &str) -> Option<T> {
    match config.get(&name.to_lowercase()) {
        Ok(value) => Some(value),
        Err(ConfigError::NotFound(_)) => None,
        Err(err) => {
            warn!("ignoring setting {}: {}", name, err);
            None
        }
    }
}

fn read_setting<T: DeserializeOwned>(name: &str, default: T) -> T {
    lookup(&settings(), name).unwrap_or(default)
}

/// In which folder should we store reports?
pub fn log_dir() -> String {
    read_setting("LOG_DIR", DEFAULT_LOG_DIR.to_string())
}

/// Should campaigns and fixture runs dump their reports?
pub fn dump_reports() -> bool {
    read_setting("DUMP_REPORTS", false)
}

/// Should we hide user messages?
pub fn quiet() -> bool {
    read_setting("QUIET", false)
}

/// Should the driver print JSON instead of text?
pub fn json_output() -> bool {
    read_setting("JSON_OUTPUT", false)
}

/// Lower end of the default sweep domain.
pub fn sweep_min() -> i32 {
    read_setting("SWEEP_MIN", DEFAULT_SWEEP_MIN)
}

/// Upper end of the default sweep domain.
pub fn sweep_max() -> i32 {
    read_setting("SWEEP_MAX", DEFAULT_SWEEP_MAX)
}

pub fn random_cases() -> u64 {
    read_setting("RANDOM_CASES", DEFAULT_RANDOM_CASES)
}

pub fn random_seed() -> u64 {
    read_setting("RANDOM_SEED", DEFAULT_RANDOM_SEED)
}

/// Loops with at most this many iterations are also executed to cross-check
/// their closed-form summary.
pub fn iteration_limit() -> u64 {
    read_setting("ITERATION_LIMIT", DEFAULT_ITERATION_LIMIT)
}

/// Should campaigns stop at the first counterexample?
pub fn fail_fast() -> bool {
    read_setting("FAIL_FAST", false)
}
