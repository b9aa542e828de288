//! Configuration structs for the flagbind demo application.
//!
//! The root [`DemoConfig`] holds a few scalars plus the nested
//! [`ServerConfig`] and the optional [`RetryConfig`]:
//!
//! | Flag                        | File key                    |
//! |-----------------------------|-----------------------------|
//! | `-name`                     | `name`                      |
//! | `-verbose`                  | `verbose`                   |
//! | `-server.host`              | `[server] host`             |
//! | `-server.port`              | `[server] port`             |
//! | `-server.max_connections`   | `[server] max_connections`  |
//! | `-server.tags`              | `[server] tags`             |
//! | `-retry.attempts`           | `[retry] attempts`          |
//! | `-retry.backoff_ms`         | `[retry] backoff_ms`        |

use flagbind::{IntList, Record, StringList};

/// Root configuration for the demo application.
#[derive(Record, Debug)]
pub struct DemoConfig {
    /// Application name.
    pub name: String,

    /// Print every option with its description.
    pub verbose: bool,

    /// Print a commented config file instead of the bound values.
    pub template: bool,

    #[bind(nested)]
    pub server: ServerConfig,

    /// Created with defaults when neither the file nor the flags mention it.
    #[bind(nested)]
    pub retry: Option<RetryConfig>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            name: "flagbind-demo".into(),
            verbose: false,
            template: false,
            server: ServerConfig::default(),
            retry: None,
        }
    }
}

#[derive(Record, Debug)]
pub struct ServerConfig {
    /// Hostname to bind to.
    pub host: String,

    /// Port number to listen on.
    pub port: usize,

    /// Maximum number of concurrent connections.
    pub max_connections: u64,

    /// Labels reported alongside the server, comma-separated on the command line.
    pub tags: StringList,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
            max_connections: 100,
            tags: StringList::default(),
        }
    }
}

#[derive(Record, Debug, Default)]
pub struct RetryConfig {
    /// Attempts before giving up.
    pub attempts: usize,

    /// Delay before each attempt, in milliseconds.
    #[bind(desc = "backoff schedule in ms, e.g. 100,500,2000")]
    pub backoff_ms: IntList,
}
