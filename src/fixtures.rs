#[cfg(test)]
pub mod test {
    use std::time::Duration;

    use crate::{IntList, Record, StringList};

    #[derive(Record, Debug, PartialEq)]
    pub struct AppConfig {
        /// The application host.
        pub host: String,

        /// The port number.
        pub port: usize,

        /// Enable debug mode.
        pub debug: bool,

        /// Fraction of requests to trace.
        #[bind(desc = "sampling ratio")]
        pub ratio: f64,

        /// Largest accepted upload, in bytes.
        pub max_size: u64,

        /// Clock offset in seconds.
        pub offset: i64,

        /// Database settings.
        #[bind(nested)]
        pub database: Database,

        /// Cache settings, absent until something needs them.
        #[bind(nested, file = "cache_settings")]
        pub cache: Option<Cache>,

        secret: String,
    }

    impl Default for AppConfig {
        fn default() -> Self {
            Self {
                host: "localhost".into(),
                port: 8080,
                debug: false,
                ratio: 0.5,
                max_size: 1024,
                offset: 0,
                database: Database::default(),
                cache: None,
                secret: "hunter2".into(),
            }
        }
    }

    impl AppConfig {
        pub fn secret(&self) -> &str {
            &self.secret
        }
    }

    #[derive(Record, Debug, PartialEq)]
    pub struct Database {
        /// Connection string URL.
        pub url: String,

        /// Connection pool size.
        pub pool_size: usize,
    }

    impl Default for Database {
        fn default() -> Self {
            Self {
                url: String::new(),
                pool_size: 5,
            }
        }
    }

    #[derive(Record, Debug, Default, PartialEq)]
    pub struct Cache {
        /// Entry lifetime in seconds.
        pub ttl: u64,

        /// Tags attached to cached entries.
        pub tags: StringList,
    }

    #[test]
    fn app_config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 8080);
        assert!(!config.debug);
        assert_eq!(config.database.url, "");
        assert_eq!(config.database.pool_size, 5);
        assert_eq!(config.cache, None);
        assert_eq!(config.secret(), "hunter2");
    }

    // -- Small shapes mirroring the binding scenarios ---------------------------

    #[derive(Record, Debug, Default, PartialEq)]
    pub struct Simple {
        pub f1: isize,
    }

    #[derive(Record, Debug, Default, PartialEq)]
    pub struct FlagTag {
        #[bind(flag = "f2")]
        pub f1: isize,
    }

    #[derive(Record, Debug, Default, PartialEq)]
    pub struct Nested {
        #[bind(nested)]
        pub s1: Option<Simple>,
    }

    #[derive(Record, Debug, Default, PartialEq)]
    pub struct NestedValue {
        #[bind(nested)]
        pub s1: Simple,
    }

    #[derive(Record, Debug, Default, PartialEq)]
    pub struct Inner {
        pub f: isize,
    }

    #[derive(Record, Debug, Default, PartialEq)]
    pub struct Embedded {
        #[bind(flatten)]
        pub inner: Inner,
    }

    #[derive(Record, Debug, Default, PartialEq)]
    pub struct EmbeddedOptional {
        #[bind(flatten)]
        pub inner: Option<Inner>,
    }

    #[derive(Record, Debug, Default, PartialEq)]
    pub struct Ignore {
        pub f: isize,
        #[bind(flag = "-")]
        pub d: Duration,
    }

    #[derive(Record, Debug, Default, PartialEq)]
    pub struct Lists {
        pub s: StringList,
        pub f: IntList,
    }

    #[allow(non_snake_case)]
    #[derive(Record, Debug, Default, PartialEq)]
    pub struct Camel {
        pub MaxProcs: isize,
    }

    #[derive(Record, Debug, Default, PartialEq)]
    pub struct Short {
        /// Height in centimetres.
        pub h: usize,
    }

    // -- Shapes the walker must reject -----------------------------------------

    #[derive(Record, Debug, Default, PartialEq)]
    pub struct Unsupported {
        pub pair: (u8, u8),
    }

    #[derive(Record, Debug, Default, PartialEq)]
    pub struct Clash {
        pub a: isize,
        #[bind(flag = "a")]
        pub b: isize,
    }

    #[derive(Record, Debug, Default, PartialEq)]
    pub struct Helpful {
        pub help: bool,
    }
}
