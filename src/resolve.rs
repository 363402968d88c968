//! The resolution pipeline: fill every parameter from its sources.
//!
//! Stages run in a fixed order, each adding to the same [`ErrMap`] and none
//! stopping the others:
//!
//! 1. Config files: the general ones in the order added, then each group's
//!    files in group-name order
//! 2. Environment variables (only if a prefix was added)
//! 3. The command line
//! 4. Mandatory-parameter check
//! 5. Final checks, in the order added, every one of them
//! 6. Leftover tokens, handed to the remainder handler
//!
//! A later source overrides an earlier one, so the command line wins. Every
//! successful set is recorded in the parameter's provenance.
//!
//! [`ResolveInput`] carries the arguments and environment explicitly, so the
//! whole pipeline can be driven with synthetic inputs.

use crate::errmap::ErrMap;
use crate::error::ParamError;
use crate::param::Param;
use crate::registry::ParamSet;
use crate::suggest::did_you_mean;
use crate::types::Attributes;

/// The command-line arguments and environment to resolve from. Config files
/// are read from disk during resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolveInput {
    /// Arguments after the program name.
    pub args: Vec<String>,
    /// Environment entries as `(name, value)` pairs.
    pub env_vars: Vec<(String, String)>,
}

impl ResolveInput {
    /// The given arguments with this process's environment.
    pub fn from_process<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            env_vars: std::env::vars().collect(),
        }
    }

    /// The given arguments and no environment.
    pub fn args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            env_vars: Vec::new(),
        }
    }
}

impl ParamSet {
    /// Resolve the parameters from config files, the given environment and
    /// the given arguments, in that order.
    ///
    /// Returns every error found; the parameters' destinations hold whatever
    /// values were accepted.
    ///
    /// # Panics
    ///
    /// Panics if called more than once, naming where the first call was made.
    /// Also panics if a parameter refers to a note or parameter that was
    /// never registered.
    #[track_caller]
    pub fn resolve(&mut self, input: ResolveInput) -> &ErrMap {
        let caller = std::panic::Location::caller();
        if let Some(first) = self.parse_called_from {
            panic!("parameters resolved a second time at {caller}, first resolved at {first}");
        }
        self.parse_called_from = Some(caller);
        self.check_references();

        tracing::debug!(stage = "config files", "resolving parameters");
        self.resolve_config_files();
        tracing::debug!(stage = "environment", prefixes = self.env_prefixes.len(), "resolving parameters");
        self.resolve_env(&input.env_vars);
        tracing::debug!(stage = "command line", args = input.args.len(), "resolving parameters");
        self.resolve_args(&input.args);

        self.check_must_be_set();
        self.run_final_checks();
        self.handle_remainder();

        tracing::debug!(errors = self.errors.count(), "parameters resolved");
        &self.errors
    }

    /// Resolve from the given arguments and this process's environment, then
    /// hand over to the helper: [`Helper::process_args`](crate::Helper::process_args)
    /// always, [`Helper::error_handler`](crate::Helper::error_handler) if
    /// there were errors.
    ///
    /// `args` excludes the program name, e.g. `std::env::args().skip(1)`.
    #[track_caller]
    pub fn parse<I, S>(&mut self, args: I) -> &ErrMap
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parse_with(ResolveInput::from_process(args))
    }

    /// Like [`parse`](Self::parse) with an explicit environment.
    #[track_caller]
    pub fn parse_with(&mut self, input: ResolveInput) -> &ErrMap {
        self.resolve(input);
        self.with_helper(|helper, ps| helper.process_args(ps));
        if self.has_errors() {
            self.with_helper(|helper, ps| helper.error_handler(ps, &ps.errors));
        }
        &self.errors
    }

    /// References between parameters and notes are fixed by the program, so
    /// a dangling one is a bug.
    fn check_references(&self) {
        for p in &self.by_name {
            for note in p.see_notes() {
                if !self.notes.contains_key(note) {
                    panic!(
                        "parameter '{}' refers to note '{note}' which does not exist{}",
                        p.name(),
                        did_you_mean(&self.suggest_notes(note))
                    );
                }
            }
            for other in p.see_also() {
                if !self.names.contains_key(other) {
                    panic!(
                        "parameter '{}' refers to parameter '{other}' which does not exist{}",
                        p.name(),
                        did_you_mean(&self.suggest_names(other))
                    );
                }
            }
        }
    }

    fn check_must_be_set(&mut self) {
        for p in &self.by_name {
            if p.has_attr(Attributes::MUST_BE_SET) && !p.has_been_set() {
                self.errors.add(
                    p.name(),
                    ParamError::MustBeSet {
                        name: p.name().to_string(),
                    },
                );
            }
        }
    }

    fn run_final_checks(&mut self) {
        let mut checks = std::mem::take(&mut self.final_checks);
        for check in checks.iter_mut() {
            if let Err(e) = check() {
                self.errors.add_global(ParamError::FinalCheck(e));
            }
        }
        self.final_checks = checks;
    }

    fn handle_remainder(&mut self) {
        if self.remainder.is_empty() {
            return;
        }
        match self.rem_handler.as_mut() {
            Some(handler) => handler.handle_remainder(&self.remainder, &mut self.errors),
            None => self.errors.add_global(ParamError::UnexpectedArgs {
                tokens: self.remainder.clone(),
            }),
        }
    }
}
