//! Program parameters declared once and filled from config files, environment
//! variables and the command line.
//!
//! A program registers its parameters on a [`ParamSet`]. Each one is bound to
//! a [`Setter`] that owns the destination and knows how to parse a value into
//! it. A single call to [`resolve`](ParamSet::resolve) (or
//! [`parse`](ParamSet::parse)) then reads every source in turn and sets the
//! parameters it finds.
//!
//! ```ignore
//! let mut ps = ParamSet::builder()
//!     .env_prefix("MYPROG_")
//!     .config_file(ConfigFile::at(FileLocation::Platform("params".into())))
//!     .build();
//! ps.add("verbose", Box::new(BoolSetter::new(&verbose)), "say more", vec![
//!     ParamOpt::alt_names(&["v"]),
//! ]);
//! ps.add_by_pos("file", Box::new(PathSetter::new(&file)), "the input", vec![]);
//!
//! let errs = ps.parse(std::env::args().skip(1));
//! ```
//!
//! # Source precedence
//!
//! ```text
//! Config files          in the order added, then group files by group name
//!        ↑ overridden by
//! Environment vars      PREFIX_NAME
//!        ↑ overridden by
//! Command line          -name, --name=value, positionals
//! ```
//!
//! Each source calls the setter again, so the last one to set a parameter
//! decides its value. Every successful set is recorded in the parameter's
//! [`sources`](Param::sources), which makes it possible to tell a user where
//! a surprising value came from. [`Attributes::SET_ONLY_ONCE`] turns later
//! sets into errors instead.
//!
//! # Two kinds of failure
//!
//! Mistakes in the program itself panic as soon as they happen: two
//! parameters with the same name, a malformed group name, a terminal
//! positional parameter followed by anything, a setter with no destination,
//! a second call to `resolve`. These surface the first time the program is
//! run and have to be fixed in code.
//!
//! Mistakes by the user never panic. They are collected in an [`ErrMap`],
//! keyed by parameter name, and resolution carries on, so one run reports
//! every problem at once. Unknown names come with "did you mean"
//! suggestions.
//!
//! # Config files
//!
//! One directive per line:
//!
//! ```text
//! # a comment
//! verbose
//! max-count = 12
//! myprog,otherprog/colour = blue
//! #include more.params
//! ```
//!
//! A line prefixed with program names applies only to those programs. How
//! unknown names are treated depends on the file; see [`ConfigFile`].
//!
//! # Environment variables
//!
//! With prefix `MYPROG_`, variables map by lowercasing and turning `_` into
//! `-`:
//!
//! | Env var | Parameter |
//! |---------|-----------|
//! | `MYPROG_VERBOSE` | `verbose` |
//! | `MYPROG_MAX_COUNT` | `max-count` |
//!
//! Unknown names are recorded in
//! [`unused_params`](ParamSet::unused_params) and otherwise ignored.
//!
//! # Command line
//!
//! Positional parameters come first, then named ones. `--` (or the
//! configured terminal parameter) ends parsing; later arguments are left in
//! [`remainder`](ParamSet::remainder) for the [`RemHandler`].
//!
//! # Helpers
//!
//! A [`Helper`] adds standard parameters (such as `-help`) when the set is
//! built, and acts after `parse`: showing usage, reporting errors, exiting.
//! Programs that want to handle errors themselves call `resolve` and read
//! the returned [`ErrMap`].
//!
//! # Logging
//!
//! Resolution emits [`tracing`](https://docs.rs/tracing) events: `debug` per
//! stage, `info` per config file loaded, `trace` per parameter set. No
//! subscriber is installed.

pub mod error;
pub mod types;

mod builder;
mod cli;
mod config;
mod env;
mod errmap;
mod file;
mod group;
mod helper;
mod param;
mod registry;
mod resolve;
mod setter;
mod source;
mod suggest;

#[cfg(test)]
mod fixtures;

pub use builder::{DEFAULT_TERMINAL_PARAM, ParamSetBuilder};
pub use env::{convert_env_var_name_to_param_name, convert_param_name_to_env_var_name};
pub use errmap::{ErrMap, GLOBAL_KEY};
pub use error::{CallbackError, ParamError, SetterError};
pub use group::{DEFAULT_GROUP, Group};
pub use helper::{Helper, NullHelper, NullRemHandler, RemHandler};
pub use param::{ActionFunc, ByName, ByPos, Param, ParamId, ParamOpt, PosOpt};
pub use registry::{FinalCheck, Note, ParamSet};
pub use resolve::ResolveInput;
pub use setter::Setter;
pub use source::{Location, Source, SourceKind};
pub use suggest::{did_you_mean, suggest};
pub use types::{Attributes, ConfigFile, FileLocation, ValueReq};
