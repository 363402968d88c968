//! The command-line stage.
//!
//! Arguments are read in two phases:
//!
//! 1. **Positional.** One argument per positional parameter, from the front.
//!    Too few arguments is a single error and ends the stage. A terminal
//!    positional parameter leaves every later argument in the remainder.
//! 2. **Named.** Each argument is `-name`, `--name`, `-name=value` or
//!    `--name=value`. A parameter that must have a value and was given none
//!    with `=` takes the next argument. The terminal parameter (`--` unless
//!    configured otherwise) ends the phase; what follows is the remainder.
//!
//! Unknown names are always errors.

use crate::error::ParamError;
use crate::param::Param;
use crate::registry::ParamSet;
use crate::source::{Location, SourceKind};
use crate::types::ValueReq;

/// Strip the one or two leading dashes of a parameter argument.
fn strip_dashes(token: &str) -> Result<&str, &'static str> {
    let name = if let Some(rest) = token.strip_prefix("--") {
        rest
    } else if let Some(rest) = token.strip_prefix('-') {
        rest
    } else {
        return Err("parameters must start with '-' or '--'");
    };
    if name.starts_with('-') {
        return Err("parameters start with at most two dashes");
    }
    if name.is_empty() {
        return Err("no name follows the dashes");
    }
    Ok(name)
}

impl ParamSet {
    pub(crate) fn resolve_args(&mut self, args: &[String]) {
        let n_pos = self.by_pos.len();
        if args.len() < n_pos {
            let names = self.by_pos[args.len()..]
                .iter()
                .map(|p| p.name().to_string())
                .collect();
            self.errors
                .add_global(ParamError::MissingPositionals { names });
            return;
        }

        for (i, arg) in args[..n_pos].iter().enumerate() {
            let p = &mut self.by_pos[i];
            p.apply(Location::command_line(i + 1, arg), arg, &mut self.errors);
            if p.is_terminal() {
                self.remainder = args[n_pos..].to_vec();
                return;
            }
        }

        self.resolve_named_args(args, n_pos);
    }

    fn resolve_named_args(&mut self, args: &[String], start: usize) {
        let mut i = start;
        while i < args.len() {
            let token = args[i].as_str();
            let location = Location::command_line(i + 1, token);
            i += 1;

            if token == self.terminal_param {
                self.terminal_seen = true;
                self.remainder = args[i..].to_vec();
                return;
            }

            let (param, inline) = match token.split_once('=') {
                Some((param, value)) => (param, Some(value)),
                None => (token, None),
            };
            let name = match strip_dashes(param) {
                Ok(name) => name,
                Err(reason) => {
                    self.errors.add(
                        token,
                        ParamError::BadPrefix {
                            location,
                            token: token.to_string(),
                            reason,
                        },
                    );
                    continue;
                }
            };

            let Some(&idx) = self.names.get(name) else {
                let suggestions = self.suggest_names(name);
                self.errors.add(
                    name,
                    ParamError::UnknownParam {
                        location,
                        name: name.to_string(),
                        suggestions,
                    },
                );
                continue;
            };

            let p = &mut self.by_name[idx];
            let value = match inline {
                Some(v) => Some(v),
                None if p.value_req() == ValueReq::Mandatory => match args.get(i) {
                    Some(next) => {
                        i += 1;
                        Some(next.as_str())
                    }
                    None => {
                        self.errors.add(
                            p.name(),
                            ParamError::MissingValue {
                                location,
                                name: name.to_string(),
                            },
                        );
                        continue;
                    }
                },
                None => None,
            };
            p.apply(SourceKind::CommandLine, location, name, value, &mut self.errors);
        }
    }
}
