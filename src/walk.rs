//! Schema walker: turn a record into a flat set of bindable options.
//!
//! The walker is a [`Visitor`] that tracks the current namespace while
//! descending through nested records. Every leaf becomes an
//! [`OptionDescriptor`] holding a mutable handle into the record, so the file
//! and argument layers can write through it afterwards.
//!
//! Naming rules:
//!
//! - A field's namespace segment is its flag name (override, else the
//!   lower-cased field name); segments are joined with `.`.
//! - A field's file key is its file override, else the field name as written.
//! - Embedded fields contribute neither a namespace segment nor a file key.
//!
//! The walk never writes a leaf. The only mutation is the allocation of absent
//! `Option<T>` records, done by their [`Record`] impl.

use std::collections::HashMap;

use crate::error::SchemaError;
use crate::record::{Record, Visitor};
use crate::setting::Setting;
use crate::types::{FieldMeta, Kind};

/// Option names that belong to the argument layer itself.
pub(crate) const RESERVED_NAMES: &[&str] = &["help"];

/// One bindable leaf, with a handle into the record it came from.
pub struct OptionDescriptor<'a> {
    name: String,
    file_path: Vec<&'static str>,
    kind: Kind,
    description: String,
    default: String,
    slot: &'a mut dyn Setting,
}

impl<'a> OptionDescriptor<'a> {
    /// Dotted namespace, e.g. `database.pool_size`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File key segments, outermost section first.
    pub fn file_path(&self) -> &[&'static str] {
        &self.file_path
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The value the record held when it was walked.
    pub fn default_value(&self) -> &str {
        &self.default
    }

    pub fn setting(&self) -> &dyn Setting {
        &*self.slot
    }

    pub(crate) fn setting_mut(&mut self) -> &mut dyn Setting {
        &mut *self.slot
    }

    pub fn info(&self) -> OptionInfo {
        OptionInfo {
            name: self.name.clone(),
            kind: self.kind,
            description: self.description.clone(),
            default: self.default.clone(),
        }
    }
}

/// An owned summary of a registered option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionInfo {
    pub name: String,
    pub kind: Kind,
    pub description: String,
    pub default: String,
}

/// All options registered by one walk, in declaration order.
#[derive(Default)]
pub struct OptionSet<'a> {
    options: Vec<OptionDescriptor<'a>>,
    index: HashMap<String, usize>,
}

impl<'a> OptionSet<'a> {
    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionDescriptor<'a>> {
        self.options.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut OptionDescriptor<'a>> {
        self.options.iter_mut()
    }

    pub fn get(&self, name: &str) -> Option<&OptionDescriptor<'a>> {
        self.index.get(name).map(|&i| &self.options[i])
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut OptionDescriptor<'a>> {
        let i = *self.index.get(name)?;
        Some(&mut self.options[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn infos(&self) -> Vec<OptionInfo> {
        self.options.iter().map(OptionDescriptor::info).collect()
    }

    fn insert(&mut self, descriptor: OptionDescriptor<'a>) -> Result<(), SchemaError> {
        if self.index.contains_key(&descriptor.name) {
            return Err(SchemaError::DuplicateName {
                name: descriptor.name,
            });
        }
        self.index
            .insert(descriptor.name.clone(), self.options.len());
        self.options.push(descriptor);
        Ok(())
    }
}

/// Walk `record` and register every reachable leaf.
pub fn walk<'a>(record: &'a mut dyn Record) -> Result<OptionSet<'a>, SchemaError> {
    let mut walker = Walker::default();
    record.visit(&mut walker)?;
    tracing::debug!(options = walker.set.len(), "walked configuration record");
    Ok(walker.set)
}

#[derive(Default)]
struct Walker<'a> {
    set: OptionSet<'a>,
    namespace: Vec<String>,
    file_path: Vec<&'static str>,
}

impl Walker<'_> {
    fn child_name(&self, meta: &FieldMeta) -> String {
        let segment = meta.flag_name();
        if self.namespace.is_empty() {
            segment
        } else {
            format!("{}.{segment}", self.namespace.join("."))
        }
    }
}

impl<'a> Visitor<'a> for Walker<'a> {
    fn leaf(&mut self, meta: &FieldMeta, slot: &'a mut dyn Setting) -> Result<(), SchemaError> {
        let name = self.child_name(meta);
        if RESERVED_NAMES.contains(&name.as_str()) {
            return Err(SchemaError::ReservedName { name });
        }

        let kind = slot.kind();
        let description = match meta.description {
            Some(desc) => desc.to_string(),
            None => format!("({kind} flag, no description given)"),
        };
        let mut file_path = self.file_path.clone();
        file_path.push(meta.file_key());

        tracing::trace!(option = %name, %kind, "registered option");
        self.set.insert(OptionDescriptor {
            name,
            file_path,
            kind,
            description,
            default: slot.render(),
            slot,
        })
    }

    fn record(
        &mut self,
        meta: &FieldMeta,
        record: &'a mut dyn Record,
    ) -> Result<(), SchemaError> {
        if meta.embedded {
            return record.visit(self);
        }

        self.namespace.push(meta.flag_name());
        self.file_path.push(meta.file_key());
        let result = record.visit(self);
        self.namespace.pop();
        self.file_path.pop();
        result
    }

    fn unsupported(&mut self, meta: &FieldMeta, type_name: &str) -> Result<(), SchemaError> {
        Err(SchemaError::UnsupportedType {
            name: self.child_name(meta),
            type_name: type_name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::*;

    fn names(set: &OptionSet<'_>) -> Vec<String> {
        set.iter().map(|o| o.name().to_string()).collect()
    }

    #[test]
    fn flat_record_registers_each_field() {
        let mut config = Simple { f1: 5 };
        let set = walk(&mut config).unwrap();
        assert_eq!(names(&set), vec!["f1"]);
        let f1 = set.get("f1").unwrap();
        assert_eq!(f1.kind(), Kind::Int);
        assert_eq!(f1.default_value(), "5");
        assert_eq!(f1.file_path(), &["f1"]);
    }

    #[test]
    fn nested_records_join_with_dots() {
        let mut config = AppConfig::default();
        let set = walk(&mut config).unwrap();
        assert!(set.contains("database.url"));
        assert!(set.contains("database.pool_size"));
        assert_eq!(
            set.get("database.pool_size").unwrap().file_path(),
            &["database", "pool_size"]
        );
    }

    #[test]
    fn declaration_order_is_kept() {
        let mut config = AppConfig::default();
        let set = walk(&mut config).unwrap();
        assert_eq!(
            names(&set),
            vec![
                "host",
                "port",
                "debug",
                "ratio",
                "max_size",
                "offset",
                "database.url",
                "database.pool_size",
                "cache.ttl",
                "cache.tags",
            ]
        );
    }

    #[test]
    fn private_fields_are_invisible() {
        let mut config = AppConfig::default();
        let set = walk(&mut config).unwrap();
        assert!(!set.contains("secret"));
    }

    #[test]
    fn flag_override_renames_namespace_only() {
        let mut config = FlagTag::default();
        let set = walk(&mut config).unwrap();
        let opt = set.get("f2").unwrap();
        assert_eq!(opt.file_path(), &["f1"]);
        assert!(!set.contains("f1"));
    }

    #[test]
    fn file_override_renames_section() {
        let mut config = AppConfig::default();
        let set = walk(&mut config).unwrap();
        assert_eq!(
            set.get("cache.ttl").unwrap().file_path(),
            &["cache_settings", "ttl"]
        );
    }

    #[test]
    fn embedded_fields_flatten_into_parent() {
        let mut config = Embedded::default();
        let set = walk(&mut config).unwrap();
        assert_eq!(names(&set), vec!["f"]);
        assert_eq!(set.get("f").unwrap().file_path(), &["f"]);
    }

    #[test]
    fn embedded_optional_is_allocated() {
        let mut config = EmbeddedOptional::default();
        let set = walk(&mut config).unwrap();
        assert_eq!(names(&set), vec!["f"]);
        drop(set);
        assert_eq!(config.inner, Some(Inner::default()));
    }

    #[test]
    fn absent_nested_record_is_allocated() {
        let mut config = Nested::default();
        assert!(config.s1.is_none());
        let set = walk(&mut config).unwrap();
        assert_eq!(names(&set), vec!["s1.f1"]);
        drop(set);
        assert_eq!(config.s1, Some(Simple::default()));
    }

    #[test]
    fn present_nested_record_is_kept() {
        let mut config = Nested {
            s1: Some(Simple { f1: 7 }),
        };
        let set = walk(&mut config).unwrap();
        assert_eq!(set.get("s1.f1").unwrap().default_value(), "7");
    }

    #[test]
    fn excluded_fields_are_skipped() {
        let mut config = Ignore::default();
        let set = walk(&mut config).unwrap();
        assert_eq!(names(&set), vec!["f"]);
    }

    #[test]
    fn walk_does_not_change_leaves() {
        let mut config = AppConfig::default();
        walk(&mut config).unwrap();
        let mut expected = AppConfig::default();
        expected.cache = Some(Cache::default());
        assert_eq!(config, expected);
    }

    #[test]
    fn description_from_doc_comment() {
        let mut config = AppConfig::default();
        let set = walk(&mut config).unwrap();
        assert_eq!(set.get("host").unwrap().description(), "The application host.");
        assert_eq!(
            set.get("database.pool_size").unwrap().description(),
            "Connection pool size."
        );
    }

    #[test]
    fn description_synthesized_when_missing() {
        let mut config = Simple::default();
        let set = walk(&mut config).unwrap();
        assert_eq!(
            set.get("f1").unwrap().description(),
            "(int flag, no description given)"
        );
    }

    #[test]
    fn desc_attribute_wins_over_doc_comment() {
        let mut config = AppConfig::default();
        let set = walk(&mut config).unwrap();
        assert_eq!(set.get("ratio").unwrap().description(), "sampling ratio");
    }

    #[test]
    fn list_leaves_use_custom_kind() {
        let mut config = Lists::default();
        let set = walk(&mut config).unwrap();
        assert_eq!(set.get("s").unwrap().kind(), Kind::Custom("strings"));
        assert_eq!(set.get("f").unwrap().kind(), Kind::Custom("ints"));
    }

    #[test]
    fn unsupported_type_is_a_schema_error() {
        let mut config = Unsupported::default();
        let err = walk(&mut config).err().unwrap();
        match err {
            SchemaError::UnsupportedType { name, type_name } => {
                assert_eq!(name, "pair");
                assert!(type_name.contains("u8"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_namespace_is_a_schema_error() {
        let mut config = Clash::default();
        let err = walk(&mut config).err().unwrap();
        assert_eq!(err, SchemaError::DuplicateName { name: "a".into() });
    }

    #[test]
    fn help_is_reserved() {
        let mut config = Helpful::default();
        let err = walk(&mut config).err().unwrap();
        assert_eq!(err, SchemaError::ReservedName { name: "help".into() });
    }

    #[test]
    fn lowercases_camel_case_fields() {
        let mut config = Camel::default();
        let set = walk(&mut config).unwrap();
        let opt = set.get("maxprocs").unwrap();
        assert_eq!(opt.file_path(), &["MaxProcs"]);
    }
}
