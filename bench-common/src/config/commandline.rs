// © 2024, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use config_crate::{ConfigError, Source, Value};
use itertools::Itertools;
use std::{collections::HashMap, env};

/// Configuration source reading `<prefix><key>=<value>` arguments, by default
/// from the process' command line.
#[derive(Clone, Debug)]
pub struct CommandLine {
    /// Only arguments starting with the prefix are settings; `-Pfail_fast=true`
    /// becomes `fail_fast=true` with a prefix of `-P`.
    prefix: Option<String>,

    /// Separates key and value. It must split the argument into two non-empty
    /// parts, so `sweep_min=` is not a setting.
    separator: String,

    /// Whether arguments that are not settings are skipped or rejected with a
    /// `ConfigError`. [`CommandLine::get_remaining_args`] returns them either
    /// way.
    ignore_invalid: bool,

    /// Replaces `env::args()` when set.
    args: Option<Vec<String>>,
}

impl CommandLine {
    pub fn with_prefix(s: &str) -> Self {
        CommandLine {
            prefix: Some(s.to_owned()),
            ..CommandLine::default()
        }
    }

    #[must_use]
    pub fn ignore_invalid(mut self, ignore: bool) -> Self {
        self.ignore_invalid = ignore;
        self
    }

    #[must_use]
    pub fn with_args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.args = Some(args.into_iter().collect());
        self
    }

    fn args(&self) -> Vec<String> {
        match self.args {
            Some(ref args) => args.clone(),
            None => env::args().collect(),
        }
    }

    /// The arguments that are not settings, in their original order.
    pub fn get_remaining_args(self) -> impl Iterator<Item = String> {
        self.args()
            .into_iter()
            .filter(move |arg| !self.is_valid_arg(arg))
    }

    fn get_prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or_default()
    }

    fn split_arg<'a>(&'a self, arg: &'a str) -> Option<(&'a str, &'a str)> {
        let unprefixed = arg.strip_prefix(self.get_prefix())?;
        unprefixed
            .splitn(2, self.separator.as_str())
            .collect_tuple()
            .filter(|(key, value): &(&str, &str)| !key.is_empty() && !value.is_empty())
    }

    fn is_valid_arg(&self, arg: &str) -> bool {
        self.split_arg(arg).is_some()
    }
}

impl Default for CommandLine {
    fn default() -> CommandLine {
        CommandLine {
            prefix: None,
            separator: String::from("="),
            ignore_invalid: false,
            args: None,
        }
    }
}

impl Source for CommandLine {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new((*self).clone())
    }

    fn collect(&self) -> Result<HashMap<String, Value>, ConfigError> {
        let mut m = HashMap::new();
        let uri = String::from("command-line");

        for arg in self.args() {
            match self.split_arg(&arg) {
                Some((key, val)) => {
                    m.insert(key.to_lowercase(), Value::new(Some(&uri), val));
                }
                None if self.ignore_invalid => continue,
                None => {
                    return Err(ConfigError::Message(format!(
                        "Invalid command-line arg: '{arg}'"
                    )))
                }
            }
        }

        Ok(m)
    }
}
