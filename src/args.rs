//! The argument layer: parse a flat argument list against the registered
//! options.
//!
//! Options are addressed by their dotted namespace with one or two dashes:
//! `-port=80`, `-port 80`, `--database.url=...`, and a bare `-debug` for
//! switches. A [`clap::Command`] is built at runtime from the option set and
//! does the tokenising, the unknown-option detection and the usage listing.
//! Single-dash tokens are rewritten to clap's long form first.
//!
//! Parsing stops at `--` or at the first token that is not an option; the
//! remaining tokens are ignored. Every supplied value is checked before any
//! is written, and options written before a failing `parse` are restored, so
//! a bad value leaves the record untouched.

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command};

use crate::error::BindError;
use crate::walk::{OptionDescriptor, OptionSet};

/// Id of the hidden catch-all for tokens after the options. Contains a space
/// so it can never equal an option namespace.
const REST: &str = " rest";

/// Build the runtime command for `options`.
pub(crate) fn command(program: &str, options: &OptionSet<'_>) -> Command {
    let mut cmd = Command::new(program.to_string())
        .disable_version_flag(true)
        .disable_help_flag(true)
        .args_override_self(true)
        .arg(
            Arg::new("help")
                .long("help")
                .action(ArgAction::Help)
                .help("Print this listing"),
        );

    for option in options.iter() {
        cmd = cmd.arg(option_arg(option));
    }

    cmd.arg(
        Arg::new(REST)
            .num_args(1..)
            .trailing_var_arg(true)
            .hide(true),
    )
}

fn option_arg(option: &OptionDescriptor<'_>) -> Arg {
    let arg = Arg::new(option.name().to_string())
        .long(option.name().to_string())
        .value_name(option.kind().name())
        .help(help_text(option))
        .action(ArgAction::Set);

    if option.setting().is_switch() {
        arg.num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
    } else {
        arg.allow_hyphen_values(true)
    }
}

fn help_text(option: &OptionDescriptor<'_>) -> String {
    match option.default_value() {
        "" => format!("{} (default: \"\")", option.description()),
        default => format!("{} (default: {default})", option.description()),
    }
}

/// The usage listing for `options`, as attached to argument errors.
pub(crate) fn usage(program: &str, options: &OptionSet<'_>) -> String {
    command(program, options).render_help().to_string()
}

/// Rewrite the tokens after the program name into clap's long form.
///
/// `-name` becomes `--name`. `-h`, `-help` and `--help` become `--help`
/// unless an option with that name exists. Rewriting stops at `--` and at the
/// first non-option token. The value following a non-switch option given
/// without `=` is passed through untouched, so `-offset -5` works.
fn normalize(tokens: &[String], options: &OptionSet<'_>) -> Result<Vec<String>, String> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut iter = tokens.iter();

    while let Some(token) = iter.next() {
        let body = match token.strip_prefix("--").or_else(|| token.strip_prefix('-')) {
            Some(body) if !body.is_empty() => body,
            _ => {
                out.push(token.clone());
                out.extend(iter.cloned());
                break;
            }
        };
        if body.starts_with(['-', '=']) {
            return Err(format!("bad flag syntax: {token}"));
        }

        let (name, inline_value) = match body.split_once('=') {
            Some((name, _)) => (name, true),
            None => (body, false),
        };

        match options.get(name) {
            None if name == "h" || name == "help" => out.push("--help".to_string()),
            None => out.push(format!("--{body}")),
            Some(option) => {
                out.push(format!("--{body}"));
                if !inline_value
                    && !option.setting().is_switch()
                    && let Some(value) = iter.next()
                {
                    out.push(value.clone());
                }
            }
        }
    }
    Ok(out)
}

/// Parse `argv` (program name first) and write the supplied values into
/// `options`. Returns how many options were set.
pub(crate) fn apply(argv: &[String], options: &mut OptionSet<'_>) -> Result<usize, BindError> {
    let Some((program, tokens)) = argv.split_first() else {
        return Err(BindError::MissingProgramName);
    };

    let normalized =
        normalize(tokens, options).map_err(|m| argument_error(program, options, m))?;

    let mut cmd = command(program, options);
    let argv = std::iter::once(program.clone()).chain(normalized);
    let matches = match cmd.try_get_matches_from_mut(argv) {
        Ok(matches) => matches,
        Err(e) if e.kind() == ErrorKind::DisplayHelp => {
            return Err(BindError::HelpRequested {
                usage: cmd.render_help().to_string(),
            });
        }
        Err(e) => {
            return Err(BindError::Argument {
                message: clap_message(&e),
                usage: cmd.render_help().to_string(),
            });
        }
    };

    let mut supplied = Vec::new();
    for option in options.iter() {
        let value = matches
            .try_get_one::<String>(option.name())
            .map_err(|e| argument_error(program, options, e.to_string()))?;
        if let Some(value) = value {
            option
                .setting()
                .check(value)
                .map_err(|e| {
                    argument_error(program, options, invalid_value(option.name(), value, &e))
                })?;
            supplied.push((option.name().to_string(), value.clone()));
        }
    }

    // Settings without their own `check` can still fail in `parse`, so keep
    // what each option held and put it back if a later write fails.
    let mut previous = Vec::with_capacity(supplied.len());
    for (name, value) in &supplied {
        let Some(option) = options.get_mut(name) else {
            continue;
        };
        previous.push((name.as_str(), option.setting().render()));
        if let Err(e) = option.setting_mut().parse(value) {
            restore(options, &previous);
            return Err(argument_error(program, options, invalid_value(name, value, &e)));
        }
        tracing::trace!(option = %name, %value, "applied argument");
    }

    tracing::debug!(supplied = supplied.len(), "parsed command-line arguments");
    Ok(supplied.len())
}

fn restore(options: &mut OptionSet<'_>, previous: &[(&str, String)]) {
    for (name, rendered) in previous.iter().rev() {
        let Some(option) = options.get_mut(name) else {
            continue;
        };
        if let Err(e) = option.setting_mut().parse(rendered) {
            tracing::warn!(option = %name, error = %e, "could not restore value");
        }
    }
}

fn argument_error(program: &str, options: &OptionSet<'_>, message: String) -> BindError {
    BindError::Argument {
        message,
        usage: usage(program, options),
    }
}

fn invalid_value(name: &str, value: &str, reason: &dyn std::fmt::Display) -> String {
    format!("invalid value {value:?} for flag -{name}: {reason}")
}

/// The first line of clap's rendered error, without its `error: ` prefix.
fn clap_message(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).to_string()
}
