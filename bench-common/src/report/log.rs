// © 2024, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Dumps of campaign and fixture results under `LOG_DIR/<namespace>/`.
//!
//! Nothing is written unless `DUMP_REPORTS` is set.

use crate::{config, errors::Result};
use serde::Serialize;
use std::{
    fs,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

/// Writes `data` to `LOG_DIR/namespace/name`. Returns the path of the
/// written file, or `None` when reports are disabled.
pub fn report<S: ToString>(namespace: &str, name: &str, data: S) -> Result<Option<PathBuf>> {
    report_with_writer(namespace, name, |writer| {
        writer.write_all(data.to_string().as_bytes())
    })
}

/// Like [`report`], with `data` rendered as pretty-printed JSON.
pub fn report_json<T: Serialize>(namespace: &str, name: &str, data: &T) -> Result<Option<PathBuf>> {
    if !config::dump_reports() {
        return Ok(None);
    }
    let rendered = serde_json::to_string_pretty(data)?;
    report(namespace, name, rendered)
}

pub fn report_with_writer<F>(namespace: &str, name: &str, write: F) -> Result<Option<PathBuf>>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    if !config::dump_reports() {
        return Ok(None);
    }
    let path = write_report(Path::new(&config::log_dir()), namespace, name, write)?;
    Ok(Some(path))
}

/// Writes one report below `log_dir`, creating the namespace folder if
/// needed.
pub fn write_report<F>(log_dir: &Path, namespace: &str, name: &str, write: F) -> Result<PathBuf>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let dir = log_dir.join(namespace);
    fs::create_dir_all(&dir)?;
    let path = dir.join(sanitize(name));
    let mut writer = BufWriter::new(fs::File::create(&path)?);
    write(&mut writer)?;
    writer.flush()?;
    debug!("wrote report {}", path.display());
    Ok(path)
}

/// Keeps file names portable: anything but ASCII alphanumerics, `.`, `-` and
/// `_` becomes `_`.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
