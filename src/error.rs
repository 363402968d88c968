use std::path::PathBuf;

use thiserror::Error;

use crate::source::Location;
use crate::suggest::did_you_mean;

/// The error type returned by fallible [`Action`](crate::ActionFunc) and
/// [`FinalCheck`](crate::FinalCheck) callbacks.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// A setter's refusal to accept a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetterError {
    #[error("a value must follow this parameter")]
    ValueRequired,

    #[error("no value may follow this parameter")]
    NoValueAllowed,

    #[error("{0}")]
    Invalid(String),
}

/// A problem found while resolving parameter values. These are collected in
/// an [`ErrMap`](crate::ErrMap), never raised.
#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum ParamError {
    #[error("at {location}: {name}: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(paramset::bad_value)))]
    BadValue {
        location: Location,
        name: String,
        source: SetterError,
    },

    #[error("at {location}: '{name}' is not a parameter of this program{}", did_you_mean(.suggestions))]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(paramset::unknown_param)))]
    UnknownParam {
        location: Location,
        name: String,
        suggestions: Vec<String>,
    },

    #[error("at {location}: '{token}' is not a parameter: {reason}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(paramset::bad_prefix)))]
    BadPrefix {
        location: Location,
        token: String,
        reason: &'static str,
    },

    #[error("at {location}: {name}: a value must follow this parameter but none was given")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(paramset::missing_value)))]
    MissingValue { location: Location, name: String },

    #[error("{}", missing_positionals(.names))]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(paramset::missing_positional)))]
    MissingPositionals { names: Vec<String> },

    #[error("at {location}: {name}: this parameter may only be given on the command line")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(paramset::command_line_only)))]
    CommandLineOnly { location: Location, name: String },

    #[error("at {location}: {name}: this parameter may only be set once, it was already set at {first}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(paramset::already_set)))]
    AlreadySet {
        location: Location,
        name: String,
        first: Location,
    },

    #[error("at {location}: {name}: this parameter is in group '{actual}', not '{group}'")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(paramset::not_in_group)))]
    NotInGroup {
        location: Location,
        name: String,
        group: String,
        actual: String,
    },

    #[error("{name}: this parameter must be set somewhere")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(paramset::must_be_set)))]
    MustBeSet { name: String },

    #[error("at {location}: {reason}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(paramset::malformed_line)))]
    MalformedLine {
        location: Location,
        reason: &'static str,
    },

    #[error("config file {path} does not exist")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(paramset::missing_file)))]
    MissingConfigFile { path: PathBuf },

    #[error("failed to read {path}: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(paramset::io)))]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("at {location}: cannot include {path}: {reason}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(paramset::bad_include)))]
    BadInclude {
        location: Location,
        path: PathBuf,
        reason: &'static str,
    },

    #[error("at {location}: {name}: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(paramset::action)))]
    Action {
        location: Location,
        name: String,
        source: CallbackError,
    },

    #[error("final check failed: {0}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(paramset::final_check)))]
    FinalCheck(CallbackError),

    #[error("{}", unexpected_args(.tokens))]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(paramset::unexpected_args)))]
    UnexpectedArgs { tokens: Vec<String> },

    #[error("'{name}' is not a parameter group{}", did_you_mean(.suggestions))]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(paramset::unknown_group)))]
    UnknownGroup {
        name: String,
        suggestions: Vec<String>,
    },

    #[error("'{name}' is not a note{}", did_you_mean(.suggestions))]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(paramset::unknown_note)))]
    UnknownNote {
        name: String,
        suggestions: Vec<String>,
    },

    #[error("there is no positional parameter at index {0}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(paramset::unknown_position)))]
    UnknownPosition(usize),
}

fn missing_positionals(names: &[String]) -> String {
    let list = names
        .iter()
        .map(|n| format!("<{n}>"))
        .collect::<Vec<_>>()
        .join(", ");
    match names.len() {
        1 => format!("one more positional parameter is needed: {list}"),
        n => format!("{n} more positional parameters are needed: {list}"),
    }
}

/// Only the first few unexpected tokens are shown.
const SHOW_UNEXPECTED: usize = 5;

fn unexpected_args(tokens: &[String]) -> String {
    let shown = tokens
        .iter()
        .take(SHOW_UNEXPECTED)
        .map(|t| format!("'{t}'"))
        .collect::<Vec<_>>()
        .join(" ");
    let noun = if tokens.len() == 1 { "argument" } else { "arguments" };
    if tokens.len() > SHOW_UNEXPECTED {
        format!(
            "{} unexpected {noun}: {shown} ... ({} more)",
            tokens.len(),
            tokens.len() - SHOW_UNEXPECTED
        )
    } else {
        format!("{} unexpected {noun}: {shown}", tokens.len())
    }
}
