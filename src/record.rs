//! The record capability: how a config struct exposes its fields.
//!
//! A [`Record`] hands each of its bindable fields to a [`Visitor`], in
//! declaration order, together with that field's [`FieldMeta`]. Leaves go
//! through [`Visitor::leaf`], nested records through [`Visitor::record`].
//! The visitor receives mutable handles that live as long as the borrow of the
//! record, which is what lets the binder write into the caller's struct later.
//!
//! `#[derive(Record)]` generates the impl; writing one by hand looks like
//! this:
//!
//! ```
//! use flagbind::{FieldMeta, Record, SchemaError, Visitor};
//!
//! #[derive(Default)]
//! struct Server {
//!     port: usize,
//!     host: String,
//! }
//!
//! impl Record for Server {
//!     fn visit<'a>(&'a mut self, visitor: &mut dyn Visitor<'a>) -> Result<(), SchemaError> {
//!         visitor.leaf(&FieldMeta::new("port"), &mut self.port)?;
//!         visitor.leaf(&FieldMeta::new("host").description("bind address"), &mut self.host)?;
//!         Ok(())
//!     }
//! }
//! ```

use crate::error::SchemaError;
use crate::setting::Setting;
use crate::types::FieldMeta;

/// A struct whose fields can be bound.
pub trait Record {
    /// Hand every bindable field to `visitor`, in declaration order.
    fn visit<'a>(&'a mut self, visitor: &mut dyn Visitor<'a>) -> Result<(), SchemaError>;
}

/// Receives the fields of a [`Record`].
pub trait Visitor<'a> {
    /// A leaf field.
    fn leaf(&mut self, meta: &FieldMeta, slot: &'a mut dyn Setting) -> Result<(), SchemaError>;

    /// A nested record, or an embedded one when `meta.embedded` is set.
    fn record(
        &mut self,
        meta: &FieldMeta,
        record: &'a mut dyn Record,
    ) -> Result<(), SchemaError>;

    /// A field whose type can never be bound.
    fn unsupported(&mut self, meta: &FieldMeta, type_name: &str) -> Result<(), SchemaError>;
}

/// Absent nested records are allocated on first visit, so that later writes
/// from the file or the arguments have somewhere to land.
impl<T: Record + Default> Record for Option<T> {
    fn visit<'a>(&'a mut self, visitor: &mut dyn Visitor<'a>) -> Result<(), SchemaError> {
        if self.is_none() {
            tracing::trace!(
                record = std::any::type_name::<T>(),
                "allocating absent nested record"
            );
        }
        self.get_or_insert_with(T::default).visit(visitor)
    }
}

impl<T: Record + ?Sized> Record for Box<T> {
    fn visit<'a>(&'a mut self, visitor: &mut dyn Visitor<'a>) -> Result<(), SchemaError> {
        (**self).visit(visitor)
    }
}
