//! The settable capability and the scalar registry.
//!
//! A leaf is anything implementing [`Setting`]. The closed scalar set (`bool`,
//! `isize`, `i64`, `usize`, `u64`, `f64`, `String`) is implemented here with
//! the conventional flag grammar for argument values and serde-backed decoding
//! for file values. User types implement the two required methods and get
//! string-based file handling for free.

use serde::Serialize;
use serde::de::DeserializeOwned;
use toml::Value;

use crate::error::ValueError;
use crate::types::Kind;

/// A value that can be rendered to and parsed from its canonical string form.
///
/// Only [`render`](Setting::render) and [`parse`](Setting::parse) are
/// required. The provided methods cover the file layer (`decode`/`to_toml`),
/// usage text (`kind`) and up-front validation of argument values (`check`).
///
/// ```
/// use flagbind::{Setting, ValueError};
///
/// struct Level(u8);
///
/// impl Setting for Level {
///     fn render(&self) -> String {
///         self.0.to_string()
///     }
///
///     fn parse(&mut self, raw: &str) -> Result<(), ValueError> {
///         match raw.parse::<u8>() {
///             Ok(n) if n <= 9 => {
///                 self.0 = n;
///                 Ok(())
///             }
///             _ => Err(ValueError::new(format!("level must be 0-9, got {raw:?}"))),
///         }
///     }
/// }
/// ```
pub trait Setting {
    /// Render the current value in the form `parse` accepts.
    fn render(&self) -> String;

    /// Replace the value with the one `raw` describes.
    fn parse(&mut self, raw: &str) -> Result<(), ValueError>;

    fn kind(&self) -> Kind {
        Kind::Custom(short_type_name(std::any::type_name::<Self>()))
    }

    /// Validate `raw` without writing it.
    ///
    /// The argument layer checks every supplied value before applying any of
    /// them. The default accepts everything, deferring failures to `parse`.
    fn check(&self, raw: &str) -> Result<(), ValueError> {
        let _ = raw;
        Ok(())
    }

    /// Replace the value with one read from the config file.
    ///
    /// The default accepts a TOML string and hands it to `parse`.
    fn decode(&mut self, value: &Value) -> Result<(), ValueError> {
        match value.as_str() {
            Some(raw) => self.parse(raw),
            None => Err(ValueError::new(format!(
                "expected a string, found {}",
                value.type_str()
            ))),
        }
    }

    /// The value as it would be written to the config file.
    fn to_toml(&self) -> Value {
        Value::String(self.render())
    }

    /// Switches may be given as a bare `-name` on the command line.
    fn is_switch(&self) -> bool {
        false
    }
}

/// `my_crate::config::Level<u8>` → `Level`.
fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Deserialize a file value into a concrete type through serde.
pub(crate) fn deserialize<T: DeserializeOwned>(value: &Value) -> Result<T, ValueError> {
    value
        .clone()
        .try_into()
        .map_err(|e: toml::de::Error| ValueError::new(e.message()))
}

/// Encode a value for the file, falling back to a string for values TOML
/// cannot hold natively (e.g. `u64` above `i64::MAX`).
fn encode<T: Serialize + ToString>(value: &T) -> Value {
    Value::try_from(value).unwrap_or_else(|_| Value::String(value.to_string()))
}

/// Unsigned values also accept the string form [`encode`] falls back to.
fn decode_unsigned<T: DeserializeOwned + TryFrom<i128>>(value: &Value) -> Result<T, ValueError> {
    match value {
        Value::String(raw) => parse_int(raw),
        other => deserialize(other),
    }
}

macro_rules! scalar {
    ($ty:ty, $kind:expr, $parse:expr) => {
        scalar!($ty, $kind, $parse, deserialize);
    };
    ($ty:ty, $kind:expr, $parse:expr, $decode:expr) => {
        impl Setting for $ty {
            fn render(&self) -> String {
                self.to_string()
            }

            fn parse(&mut self, raw: &str) -> Result<(), ValueError> {
                *self = $parse(raw)?;
                Ok(())
            }

            fn kind(&self) -> Kind {
                $kind
            }

            fn check(&self, raw: &str) -> Result<(), ValueError> {
                $parse(raw).map(|_| ())
            }

            fn decode(&mut self, value: &Value) -> Result<(), ValueError> {
                *self = $decode(value)?;
                Ok(())
            }

            fn to_toml(&self) -> Value {
                encode(self)
            }

            fn is_switch(&self) -> bool {
                $kind == Kind::Bool
            }
        }
    };
}

scalar!(bool, Kind::Bool, parse_bool);
scalar!(isize, Kind::Int, parse_int::<isize>);
scalar!(i64, Kind::Int64, parse_int::<i64>);
scalar!(usize, Kind::Uint, parse_int::<usize>, decode_unsigned);
scalar!(u64, Kind::Uint64, parse_int::<u64>, decode_unsigned);
scalar!(f64, Kind::Float64, parse_float);
scalar!(String, Kind::String, parse_string);

pub(crate) fn parse_bool(raw: &str) -> Result<bool, ValueError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ValueError::new(format!("invalid boolean {raw:?}"))),
    }
}

pub(crate) fn parse_int<T: TryFrom<i128>>(raw: &str) -> Result<T, ValueError> {
    let value = parse_integer(raw)?;
    T::try_from(value).map_err(|_| ValueError::new(format!("value {raw:?} out of range")))
}

fn parse_float(raw: &str) -> Result<f64, ValueError> {
    raw.parse()
        .map_err(|_| ValueError::new(format!("invalid float {raw:?}")))
}

fn parse_string(raw: &str) -> Result<String, ValueError> {
    Ok(raw.to_string())
}

/// Integer literal with optional sign and base prefix (`0x`, `0o`, `0b`, or a
/// bare leading `0` for octal). `_` may separate digits.
fn parse_integer(raw: &str) -> Result<i128, ValueError> {
    let invalid = || ValueError::new(format!("invalid integer {raw:?}"));

    let (negative, body) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };

    let (radix, digits) = if let Some(d) = strip_prefix_ci(body, "0x") {
        (16, d)
    } else if let Some(d) = strip_prefix_ci(body, "0o") {
        (8, d)
    } else if let Some(d) = strip_prefix_ci(body, "0b") {
        (2, d)
    } else if body.len() > 1 && body.starts_with('0') {
        (8, &body[1..])
    } else {
        (10, body)
    };

    if digits.is_empty()
        || digits.starts_with(['+', '-', '_'])
        || digits.ends_with('_')
        || digits.contains("__")
    {
        return Err(invalid());
    }

    let magnitude = i128::from_str_radix(&digits.replace('_', ""), radix).map_err(|_| invalid())?;
    Ok(if negative { -magnitude } else { magnitude })
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &s[prefix.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_accepts_flag_grammar() {
        for raw in ["1", "t", "T", "TRUE", "true", "True"] {
            assert!(parse_bool(raw).unwrap(), "{raw}");
        }
        for raw in ["0", "f", "F", "FALSE", "false", "False"] {
            assert!(!parse_bool(raw).unwrap(), "{raw}");
        }
        assert!(parse_bool("yes").is_err());
    }

    #[test]
    fn int_accepts_bases_and_separators() {
        assert_eq!(parse_int::<isize>("42").unwrap(), 42);
        assert_eq!(parse_int::<isize>("-42").unwrap(), -42);
        assert_eq!(parse_int::<isize>("+7").unwrap(), 7);
        assert_eq!(parse_int::<isize>("0x1F").unwrap(), 31);
        assert_eq!(parse_int::<isize>("0o17").unwrap(), 15);
        assert_eq!(parse_int::<isize>("017").unwrap(), 15);
        assert_eq!(parse_int::<isize>("0b101").unwrap(), 5);
        assert_eq!(parse_int::<i64>("1_000_000").unwrap(), 1_000_000);
        assert_eq!(parse_int::<isize>("0").unwrap(), 0);
    }

    #[test]
    fn int_rejects_garbage() {
        for raw in ["", "NaN", "1.5", "0x", "_1", "1_", "1__0", "0x-5", "--1"] {
            assert!(parse_int::<isize>(raw).is_err(), "{raw:?} should fail");
        }
    }

    #[test]
    fn unsigned_rejects_negative() {
        let err = parse_int::<usize>("-1").unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn u64_accepts_full_range() {
        assert_eq!(parse_int::<u64>("18446744073709551615").unwrap(), u64::MAX);
        assert!(parse_int::<u64>("18446744073709551616").is_err());
    }

    #[test]
    fn parse_writes_in_place() {
        let mut n: isize = 5;
        n.parse("9").unwrap();
        assert_eq!(n, 9);

        let mut s = String::from("old");
        s.parse("new value").unwrap();
        assert_eq!(s, "new value");
    }

    #[test]
    fn failed_parse_leaves_value_alone() {
        let mut n: i64 = 5;
        assert!(n.parse("five").is_err());
        assert_eq!(n, 5);
    }

    #[test]
    fn check_does_not_write() {
        let n: u64 = 3;
        assert!(n.check("10").is_ok());
        assert!(n.check("ten").is_err());
        assert_eq!(n, 3);
    }

    #[test]
    fn decode_rejects_type_mismatch() {
        let mut n: isize = 0;
        let err = n.decode(&Value::String("a".into())).unwrap_err();
        assert!(err.to_string().contains("string") || err.to_string().contains("invalid type"));
        assert_eq!(n, 0);

        n.decode(&Value::Integer(3)).unwrap();
        assert_eq!(n, 3);
    }

    #[test]
    fn unsigned_decodes_its_string_fallback() {
        let mut big: u64 = 0;
        big.decode(&u64::MAX.to_toml()).unwrap();
        assert_eq!(big, u64::MAX);

        let mut small: usize = 0;
        small.decode(&Value::Integer(7)).unwrap();
        assert_eq!(small, 7);
        assert!(small.decode(&Value::String("seven".into())).is_err());
        assert!(small.decode(&Value::Boolean(true)).is_err());
    }

    #[test]
    fn decode_float_and_string() {
        let mut rate = 0.0f64;
        rate.decode(&Value::Float(1.5)).unwrap();
        assert_eq!(rate, 1.5);

        let mut host = String::new();
        host.decode(&Value::String("localhost".into())).unwrap();
        assert_eq!(host, "localhost");
        assert!(host.decode(&Value::Integer(1)).is_err());
    }

    #[test]
    fn kinds_and_switches() {
        assert_eq!(true.kind(), Kind::Bool);
        assert!(false.is_switch());
        assert_eq!(0isize.kind(), Kind::Int);
        assert_eq!(0usize.kind(), Kind::Uint);
        assert_eq!(String::new().kind(), Kind::String);
        assert!(!0i64.is_switch());
    }

    #[test]
    fn to_toml_uses_native_types() {
        assert_eq!(true.to_toml(), Value::Boolean(true));
        assert_eq!(3i64.to_toml(), Value::Integer(3));
        assert_eq!(2.5f64.to_toml(), Value::Float(2.5));
        assert_eq!(String::from("x").to_toml(), Value::String("x".into()));
        assert_eq!(
            u64::MAX.to_toml(),
            Value::String("18446744073709551615".into())
        );
    }

    #[test]
    fn short_type_name_strips_path_and_generics() {
        assert_eq!(short_type_name("a::b::Level"), "Level");
        assert_eq!(short_type_name("a::Wrap<alloc::string::String>"), "Wrap");
        assert_eq!(short_type_name("Plain"), "Plain");
    }

    struct Level(u8);

    impl Setting for Level {
        fn render(&self) -> String {
            self.0.to_string()
        }

        fn parse(&mut self, raw: &str) -> Result<(), ValueError> {
            self.0 = raw
                .parse()
                .map_err(|_| ValueError::new(format!("bad level {raw:?}")))?;
            Ok(())
        }
    }

    #[test]
    fn custom_setting_defaults() {
        let mut level = Level(1);
        assert_eq!(level.kind(), Kind::Custom("Level"));
        level.decode(&Value::String("4".into())).unwrap();
        assert_eq!(level.0, 4);
        assert!(level.decode(&Value::Integer(4)).is_err());
        assert_eq!(level.to_toml(), Value::String("4".into()));
        assert!(!level.is_switch());
    }
}
