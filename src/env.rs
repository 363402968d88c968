//! The environment stage.
//!
//! A variable `{PREFIX}{NAME}` sets the parameter whose name is `NAME`
//! lowercased with `_` turned into `-`. `PROG_DRY_RUN=1` sets `dry-run` for
//! prefix `PROG_`. The value is always passed to the setter, even when
//! empty, so `PROG_NAME=` sets `name` to the empty string.
//!
//! Unknown names are never errors: the environment is shared with every
//! other program.

use crate::error::ParamError;
use crate::param::Param;
use crate::registry::ParamSet;
use crate::source::{Location, SourceKind};
use crate::types::Attributes;

/// `DRY_RUN` becomes `dry-run`.
pub fn convert_env_var_name_to_param_name(name: &str) -> String {
    name.to_lowercase().replace('_', "-")
}

/// `dry-run` becomes `DRY_RUN`.
pub fn convert_param_name_to_env_var_name(name: &str) -> String {
    name.to_uppercase().replace('-', "_")
}

impl ParamSet {
    pub(crate) fn resolve_env(&mut self, vars: &[(String, String)]) {
        if self.env_prefixes.is_empty() {
            return;
        }

        for (i, (key, value)) in vars.iter().enumerate() {
            let Some(rest) = self
                .env_prefixes
                .iter()
                .find_map(|prefix| key.strip_prefix(prefix.as_str()))
            else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }

            let name = convert_env_var_name_to_param_name(rest);
            let location = Location::environment(i + 1, &format!("{key}={value}"));
            self.apply_env_var(&name, location, value);
        }
    }

    fn apply_env_var(&mut self, name: &str, location: Location, value: &str) {
        let Some(&idx) = self.names.get(name) else {
            self.record_unused(name, location);
            return;
        };

        let p = &mut self.by_name[idx];
        if p.has_attr(Attributes::COMMAND_LINE_ONLY) {
            self.errors.add(
                p.name(),
                ParamError::CommandLineOnly {
                    location,
                    name: name.to_string(),
                },
            );
            return;
        }
        p.apply(SourceKind::Environment, location, name, Some(value), &mut self.errors);
    }
}
