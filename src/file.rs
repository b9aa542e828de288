//! The file layer: decode a TOML document into the registered options.
//!
//! Each option is looked up by its file key path, one table per nested
//! record. Segments match exactly first and ASCII case-insensitively second,
//! so `MaxProcs` in the record finds `maxprocs = 4` in the file. Keys the
//! record does not declare are ignored.
//!
//! Decoding writes through the option handles as it goes. A bad value stops
//! the layer with an error, but options decoded before it keep their new
//! values.

use std::path::Path;

use toml::{Table, Value};

use crate::error::FileError;
use crate::walk::OptionSet;

/// Read and parse the config file.
///
/// Returns `Ok(None)` for a missing file when `allow_missing` is set.
pub(crate) fn read_table(path: &Path, allow_missing: bool) -> Result<Option<Table>, FileError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if allow_missing {
                tracing::debug!(path = %path.display(), "config file not found, skipping");
                return Ok(None);
            }
            return Err(FileError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(FileError::Io {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let table = content
        .parse::<Table>()
        .map_err(|e| FileError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
    Ok(Some(table))
}

/// Decode every option present in `table`. Returns how many were written.
pub(crate) fn apply_table(
    path: &Path,
    table: &Table,
    options: &mut OptionSet<'_>,
) -> Result<usize, FileError> {
    let mut applied = 0;
    for option in options.iter_mut() {
        let key = option.file_path().join(".");
        let value = lookup(table, option.file_path()).map_err(|reason| FileError::Decode {
            path: path.to_path_buf(),
            key: key.clone(),
            reason,
        })?;
        let Some(value) = value else {
            continue;
        };

        option
            .setting_mut()
            .decode(value)
            .map_err(|e| FileError::Decode {
                path: path.to_path_buf(),
                key: key.clone(),
                reason: e.to_string(),
            })?;
        tracing::trace!(%key, option = option.name(), "applied file value");
        applied += 1;
    }
    Ok(applied)
}

/// Read `path` and decode it into `options`.
pub(crate) fn load(
    path: &Path,
    allow_missing: bool,
    options: &mut OptionSet<'_>,
) -> Result<(), FileError> {
    let Some(table) = read_table(path, allow_missing)? else {
        return Ok(());
    };
    let applied = apply_table(path, &table, options)?;
    tracing::debug!(path = %path.display(), applied, "loaded config file");
    Ok(())
}

/// Follow `segments` through nested tables.
///
/// `Ok(None)` when any segment is absent; `Err` when an intermediate value is
/// not a table.
fn lookup<'t>(table: &'t Table, segments: &[&str]) -> Result<Option<&'t Value>, String> {
    let Some((last, parents)) = segments.split_last() else {
        return Ok(None);
    };

    let mut current = table;
    for segment in parents {
        let Some(value) = entry(current, segment) else {
            return Ok(None);
        };
        current = value
            .as_table()
            .ok_or_else(|| format!("expected a table at '{segment}', found {}", value.type_str()))?;
    }
    Ok(entry(current, last))
}

fn entry<'t>(table: &'t Table, key: &str) -> Option<&'t Value> {
    table.get(key).or_else(|| {
        table
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    })
}
