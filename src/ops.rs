//! Introspection: list the options a record exposes, render its usage text,
//! and generate a commented TOML template of its current values.
//!
//! All three walk the record, so absent `Option<T>` records are allocated as
//! a side effect, exactly as during a bind.

use toml_edit::{DocumentMut, Item, Key};

use crate::args;
use crate::error::SchemaError;
use crate::record::Record;
use crate::walk::{OptionInfo, walk};

/// The options `record` registers, in walk order.
pub fn options<R: Record>(record: &mut R) -> Result<Vec<OptionInfo>, SchemaError> {
    Ok(walk(record)?.infos())
}

/// The usage listing the argument layer attaches to its errors.
pub fn usage<R: Record>(program: &str, record: &mut R) -> Result<String, SchemaError> {
    let options = walk(record)?;
    Ok(args::usage(program, &options))
}

/// A commented TOML document holding the record's current values.
///
/// Every key is preceded by its description as a `#` comment. Nested records
/// become `[sections]` named by their file keys, so the output can be read
/// back by the file layer unchanged.
pub fn template<R: Record>(record: &mut R) -> Result<String, SchemaError> {
    let options = walk(record)?;
    let mut doc = DocumentMut::new();

    'options: for option in options.iter() {
        let Some((leaf, parents)) = option.file_path().split_last() else {
            continue;
        };

        let mut table = doc.as_table_mut();
        for segment in parents {
            let Some(next) = table
                .entry(segment)
                .or_insert_with(|| Item::Table(toml_edit::Table::new()))
                .as_table_mut()
            else {
                tracing::debug!(option = option.name(), "file key shadowed by a value, skipped");
                continue 'options;
            };
            table = next;
        }

        let mut key = Key::new(*leaf);
        key.leaf_decor_mut().set_prefix(comment(option.description()));
        table.insert_formatted(&key, Item::Value(edit_value(option.setting().to_toml())));
    }

    Ok(doc.to_string())
}

fn comment(text: &str) -> String {
    text.lines().map(|line| format!("# {line}\n")).collect()
}

fn edit_value(value: toml::Value) -> toml_edit::Value {
    match value {
        toml::Value::String(s) => s.into(),
        toml::Value::Integer(i) => i.into(),
        toml::Value::Float(f) => f.into(),
        toml::Value::Boolean(b) => b.into(),
        toml::Value::Datetime(dt) => match dt.to_string().parse::<toml_edit::Datetime>() {
            Ok(parsed) => parsed.into(),
            Err(_) => dt.to_string().into(),
        },
        toml::Value::Array(items) => {
            toml_edit::Value::Array(items.into_iter().map(edit_value).collect())
        }
        toml::Value::Table(table) => toml_edit::Value::InlineTable(
            table
                .into_iter()
                .map(|(k, v)| (k, edit_value(v)))
                .collect(),
        ),
    }
}
