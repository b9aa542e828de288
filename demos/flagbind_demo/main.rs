//! # flagbind demo application
//!
//! A sample CLI tool that binds [`DemoConfig`] from `flagbind-demo.toml` in
//! the working directory and from its arguments, then prints the bound
//! options.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example flagbind_demo
//! cargo run --example flagbind_demo -- -help
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature | How to exercise it |
//! |---|---|
//! | Struct defaults | `cargo run --example flagbind_demo` |
//! | Config file | Create `flagbind-demo.toml` in cwd, then run |
//! | Flag override | `... -- -server.port=9999` |
//! | Bare switch | `... -- -verbose` |
//! | List flags | `... -- -retry.backoff_ms=100,500` |
//! | Usage listing | `... -- -h` |
//! | Template | `... -- -template > flagbind-demo.toml` |
//! | Argument error | `... -- -server.port=abc` |
//! | Binder diagnostics | `RUST_LOG=flagbind=trace cargo run --example flagbind_demo` |

mod config;

use flagbind::Binder;
use tracing_subscriber::EnvFilter;

use config::DemoConfig;

const CONFIG_FILE: &str = "flagbind-demo.toml";

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut config = DemoConfig::default();

    let result = Binder::new()
        .args(std::env::args())
        .file(CONFIG_FILE)
        .allow_missing_file(true)
        .bind(&mut config);
    if let Err(err) = result {
        std::process::exit(flagbind::report(&err, &mut std::io::stderr()));
    }

    // Switch the flag back off so neither output mentions it as set.
    let template = std::mem::take(&mut config.template);
    let output = if template {
        flagbind::template(&mut config)
    } else {
        flagbind::options(&mut config).map(|infos| {
            infos
                .iter()
                .map(|info| {
                    if config.verbose {
                        format!("{} = {}  # {}\n", info.name, info.default, info.description)
                    } else {
                        format!("{} = {}\n", info.name, info.default)
                    }
                })
                .collect()
        })
    };

    match output {
        Ok(text) => print!("{text}"),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
