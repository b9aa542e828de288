//! Bind a configuration struct from a TOML file and command-line flags.
//!
//! Define a struct, derive [`Record`], fill in its defaults, and hand it to
//! flagbind together with `argv` and a file path:
//!
//! ```no_run
//! use flagbind::Record;
//!
//! #[derive(Record)]
//! struct Config {
//!     /// Address to listen on.
//!     pub listen: String,
//!     /// Worker threads.
//!     pub workers: usize,
//!     #[bind(nested)]
//!     pub database: Database,
//! }
//!
//! #[derive(Record, Default)]
//! struct Database {
//!     /// Connection string.
//!     pub url: String,
//! }
//!
//! let mut config = Config {
//!     listen: "0.0.0.0:8080".into(),
//!     workers: 4,
//!     database: Database::default(),
//! };
//! flagbind::bind_or_exit("server.toml", &mut config);
//! ```
//!
//! After the call `config.workers` holds `-workers=N` if it was given, else
//! `workers = N` from `server.toml` if present, else `4`.
//!
//! # Struct as schema
//!
//! The struct is the only schema. Every `pub` field is either a leaf (any
//! type implementing [`Setting`]) or, with `#[bind(nested)]`, another record.
//! Each leaf gets:
//!
//! - an **option name**: the dotted path of lower-cased field names
//!   (`database.url`), used on the command line;
//! - a **file key path**: the field names as written (`[database]` then
//!   `url`), used in the TOML file;
//! - a **description**: the first paragraph of the field's `///` comment;
//! - a **default**: whatever the field held when binding started.
//!
//! Field attributes adjust this:
//!
//! | Attribute | Effect |
//! |-----------|--------|
//! | `#[bind(flag = "name")]` | option name segment for this field |
//! | `#[bind(file = "name")]` | file key for this field |
//! | `#[bind(desc = "...")]` | description, instead of the doc comment |
//! | `#[bind(nested)]` | the field is a record (`T`, `Option<T>` or `Box<T>`) |
//! | `#[bind(flatten)]` | a record whose leaves live in the parent's namespace |
//! | `#[bind(skip)]` or `"-"` as either name | never bound |
//!
//! Private fields are never bound. `Option<T>` records that are `None` are
//! replaced with `T::default()` before binding, so they are always `Some`
//! afterwards.
//!
//! # Layer precedence
//!
//! ```text
//! Struct defaults      the values the record held before the call
//!        ↑ overridden by
//! Config file          TOML
//!        ↑ overridden by
//! Arguments            -name=value
//! ```
//!
//! Both layers are sparse: a leaf nobody mentions keeps its default.
//!
//! # Config file
//!
//! Keys are matched exactly first and ASCII case-insensitively second. Keys
//! the struct does not declare are ignored. A missing file is an error unless
//! the caller allows it. A value of the wrong type stops binding with a
//! [`FileError::Decode`] naming the key; values decoded before it stay
//! written.
//!
//! # Arguments
//!
//! `-name=value`, `-name value`, `--name=value` and `--name value` all work;
//! switches (`bool`) may also be given bare. `-h`, `-help` and `--help`
//! request the usage listing. Parsing stops at `--` or the first non-option
//! argument. Values are validated before any is written, and earlier writes
//! are undone when a later value fails, so a [`BindError::Argument`] leaves
//! the record as the file layer left it.
//!
//! # Supported types
//!
//! `bool`, `isize`, `i64`, `usize`, `u64`, `f64` and `String` out of the box,
//! plus the comma-separated [`StringList`] and [`IntList`]. Anything else can
//! implement [`Setting`]: two methods, `render` and `parse`.
//!
//! # Introspection
//!
//! [`options`] lists the registered options, [`usage`] renders the listing
//! shown for `-help`, and [`template`] writes a commented TOML file of the
//! record's current values.
//!
//! # Logging
//!
//! flagbind emits [`tracing`](https://docs.rs/tracing) events at `debug` and
//! `trace` level. Install a subscriber to see them.

// Lets `#[derive(Record)]` name `::flagbind` inside this crate's own tests.
extern crate self as flagbind;

pub mod error;
pub mod types;

mod args;
mod bind;
mod file;
mod list;
mod ops;
mod record;
mod setting;
mod walk;

#[cfg(test)]
mod fixtures;

pub use bind::{Binder, bind, bind_from_env, bind_or_exit, report};
pub use error::{BindError, FileError, SchemaError, ValueError, is_help};
pub use flagbind_derive::Record;
pub use list::{IntList, StringList};
pub use ops::{options, template, usage};
pub use record::{Record, Visitor};
pub use setting::Setting;
pub use types::{FieldMeta, Kind};
pub use walk::{OptionDescriptor, OptionInfo, OptionSet, walk};
