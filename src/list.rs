//! Comma-separated list settings.
//!
//! On the command line a list is a single comma-separated value
//! (`-tags=a,b`). In the config file it is a TOML array (`tags = ["a", "b"]`),
//! though a comma-separated string is accepted there too.

use std::ops::{Deref, DerefMut};

use toml::Value;

use crate::error::ValueError;
use crate::setting::{Setting, deserialize, parse_int};
use crate::types::Kind;

/// A list of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringList(pub Vec<String>);

/// A list of native-width integers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntList(pub Vec<isize>);

fn split(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',')
        .filter(move |part| !raw.is_empty() || !part.is_empty())
}

fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl Setting for StringList {
    fn render(&self) -> String {
        join(&self.0)
    }

    fn parse(&mut self, raw: &str) -> Result<(), ValueError> {
        self.0 = split(raw).map(str::to_string).collect();
        Ok(())
    }

    fn kind(&self) -> Kind {
        Kind::Custom("strings")
    }

    fn decode(&mut self, value: &Value) -> Result<(), ValueError> {
        match value {
            Value::String(raw) => self.parse(raw),
            other => {
                self.0 = deserialize(other)?;
                Ok(())
            }
        }
    }

    fn to_toml(&self) -> Value {
        Value::Array(self.0.iter().cloned().map(Value::String).collect())
    }
}

impl IntList {
    fn parse_items(raw: &str) -> Result<Vec<isize>, ValueError> {
        split(raw)
            .map(|part| parse_int::<isize>(part.trim()))
            .collect()
    }
}

impl Setting for IntList {
    fn render(&self) -> String {
        join(&self.0)
    }

    fn parse(&mut self, raw: &str) -> Result<(), ValueError> {
        self.0 = Self::parse_items(raw)?;
        Ok(())
    }

    fn kind(&self) -> Kind {
        Kind::Custom("ints")
    }

    fn check(&self, raw: &str) -> Result<(), ValueError> {
        Self::parse_items(raw).map(|_| ())
    }

    fn decode(&mut self, value: &Value) -> Result<(), ValueError> {
        match value {
            Value::String(raw) => self.parse(raw),
            other => {
                self.0 = deserialize(other)?;
                Ok(())
            }
        }
    }

    fn to_toml(&self) -> Value {
        Value::Array(self.0.iter().map(|&n| Value::Integer(n as i64)).collect())
    }
}

impl Deref for StringList {
    type Target = Vec<String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for StringList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Deref for IntList {
    type Target = Vec<isize>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for IntList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<S: Into<String>> FromIterator<S> for StringList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        StringList(iter.into_iter().map(Into::into).collect())
    }
}

impl FromIterator<isize> for IntList {
    fn from_iter<I: IntoIterator<Item = isize>>(iter: I) -> Self {
        IntList(iter.into_iter().collect())
    }
}
