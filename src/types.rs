//! Shared vocabulary: the scalar type tag and per-field metadata.

use std::fmt;

/// The type tag carried by every registered option.
///
/// The first seven variants form the closed scalar set; everything else that
/// implements [`Setting`](crate::Setting) is tagged `Custom` with a short type
/// name used in usage text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Bool,
    /// Native-width signed integer (`isize`).
    Int,
    Int64,
    /// Native-width unsigned integer (`usize`).
    Uint,
    Uint64,
    Float64,
    String,
    Custom(&'static str),
}

impl Kind {
    /// The name shown in usage listings and synthesized descriptions.
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Int64 => "int64",
            Kind::Uint => "uint",
            Kind::Uint64 => "uint64",
            Kind::Float64 => "float64",
            Kind::String => "string",
            Kind::Custom(name) => name,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-field binding configuration, attached at schema-definition time.
///
/// `#[derive(Record)]` builds one of these for every field it emits from the
/// field name, its `#[bind(...)]` attributes and its doc comment. Hand-written
/// [`Record`](crate::Record) impls construct them directly.
///
/// Excluded fields (`#[bind(skip)]`, or `"-"` as either name) have no
/// metadata at all: they are never handed to a visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMeta {
    /// The Rust field name.
    pub name: &'static str,
    /// Override for the argument namespace segment.
    pub flag: Option<&'static str>,
    /// Override for the file key.
    pub file: Option<&'static str>,
    pub description: Option<&'static str>,
    /// Embedded fields contribute no namespace segment of their own.
    pub embedded: bool,
}

impl FieldMeta {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            flag: None,
            file: None,
            description: None,
            embedded: false,
        }
    }

    pub const fn flag(mut self, flag: &'static str) -> Self {
        self.flag = Some(flag);
        self
    }

    pub const fn file(mut self, file: &'static str) -> Self {
        self.file = Some(file);
        self
    }

    pub const fn description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    pub const fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }

    /// The namespace segment: the override, else the lower-cased field name.
    pub fn flag_name(&self) -> String {
        match self.flag {
            Some(flag) => flag.to_string(),
            None => self.name.to_lowercase(),
        }
    }

    /// The file key: the override, else the field name as written.
    pub fn file_key(&self) -> &'static str {
        self.file.unwrap_or(self.name)
    }
}
