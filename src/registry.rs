//! The parameter registry.
//!
//! A [`ParamSet`] owns every parameter, group, note and source setting of a
//! program. It has two phases:
//!
//! 1. **Registration.** Parameters, groups, notes, config files and env
//!    prefixes are added. Mistakes here are bugs in the calling program and
//!    panic immediately, so they surface the first time the program runs.
//! 2. **Resolution.** A single call to [`resolve`](ParamSet::resolve) (or
//!    [`parse`](ParamSet::parse)) fills the parameters from their sources.
//!    User mistakes are collected in the [`ErrMap`], never raised. After
//!    resolution begins no further registration is allowed.

use std::collections::{BTreeMap, HashMap};

use crate::errmap::ErrMap;
use crate::error::{CallbackError, ParamError};
use crate::group::{self, Group, GroupRecord, check_group_name};
use crate::helper::{Helper, RemHandler};
use crate::param::{ByName, ByPos, Param, ParamId, ParamOpt, PosOpt};
use crate::setter::Setter;
use crate::source::Location;
use crate::suggest::{did_you_mean, suggest};
use crate::types::ConfigFile;

/// A check run after all sources have been read. Errors are recorded
/// globally.
pub type FinalCheck = Box<dyn FnMut() -> Result<(), CallbackError>>;

/// A named block of explanatory text that parameters can refer to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub name: String,
    pub text: String,
}

pub struct ParamSet {
    pub(crate) prog_name: String,
    pub(crate) by_name: Vec<ByName>,
    /// Every primary and alternative name, mapped to its index in `by_name`.
    pub(crate) names: HashMap<String, usize>,
    pub(crate) by_pos: Vec<ByPos>,
    pub(crate) groups: BTreeMap<String, GroupRecord>,
    pub(crate) notes: BTreeMap<String, Note>,
    pub(crate) env_prefixes: Vec<String>,
    pub(crate) config_files: Vec<ConfigFile>,
    pub(crate) terminal_param: String,
    pub(crate) rem_handler: Option<Box<dyn RemHandler>>,
    pub(crate) helper: Option<Box<dyn Helper>>,
    pub(crate) final_checks: Vec<FinalCheck>,
    pub(crate) errors: ErrMap,
    pub(crate) unused: BTreeMap<String, Vec<Location>>,
    pub(crate) remainder: Vec<String>,
    pub(crate) terminal_seen: bool,
    pub(crate) parse_called_from: Option<&'static std::panic::Location<'static>>,
}

impl ParamSet {
    pub(crate) fn empty(prog_name: String, terminal_param: String) -> Self {
        Self {
            prog_name,
            by_name: Vec::new(),
            names: HashMap::new(),
            by_pos: Vec::new(),
            groups: BTreeMap::new(),
            notes: BTreeMap::new(),
            env_prefixes: Vec::new(),
            config_files: Vec::new(),
            terminal_param,
            rem_handler: None,
            helper: None,
            final_checks: Vec::new(),
            errors: ErrMap::default(),
            unused: BTreeMap::new(),
            remainder: Vec::new(),
            terminal_seen: false,
            parse_called_from: None,
        }
    }

    /// Register a named parameter.
    ///
    /// # Panics
    ///
    /// Panics if resolution has begun, if any of its names is malformed or
    /// already taken, if a terminal positional parameter exists, or if the
    /// setter's own check fails.
    #[track_caller]
    pub fn add(
        &mut self,
        name: &str,
        setter: Box<dyn Setter>,
        description: &str,
        opts: Vec<ParamOpt>,
    ) -> ParamId {
        self.assert_not_resolved(&format!("add parameter '{name}'"));
        if let Some(term) = self.by_pos.iter().find(|p| p.is_terminal()) {
            panic!(
                "cannot add parameter '{name}': positional parameter '{}' is terminal, \
                 so named parameters could never be reached",
                term.name()
            );
        }

        let mut p = ByName::new(name, setter, description);
        for opt in opts {
            p.apply_opt(opt);
        }
        for n in p.all_names() {
            self.assert_name_free(n);
        }
        p.check_setter();

        let idx = self.by_name.len();
        for n in p.all_names() {
            self.names.insert(n.to_string(), idx);
        }
        self.by_name.push(p);
        ParamId(idx)
    }

    /// Register the next positional parameter. Positions are assigned in
    /// registration order, starting at zero.
    ///
    /// # Panics
    ///
    /// Panics if resolution has begun, if the name is malformed or taken, if
    /// a terminal positional parameter already exists, if this one is
    /// terminal while named parameters exist, or if the setter takes no
    /// value or fails its own check.
    #[track_caller]
    pub fn add_by_pos(
        &mut self,
        name: &str,
        setter: Box<dyn Setter>,
        description: &str,
        opts: Vec<PosOpt>,
    ) -> usize {
        self.assert_not_resolved(&format!("add positional parameter '{name}'"));
        if let Some(last) = self.by_pos.last()
            && last.is_terminal()
        {
            panic!(
                "cannot add positional parameter '{name}': '{}' is terminal and must be the last",
                last.name()
            );
        }

        let idx = self.by_pos.len();
        let mut p = ByPos::new(name, idx, setter, description);
        for opt in opts {
            p.apply_opt(opt);
        }
        if p.is_terminal() && !self.by_name.is_empty() {
            panic!(
                "positional parameter '{name}' cannot be terminal: there are already \
                 {} named parameters which could never be reached",
                self.by_name.len()
            );
        }
        self.assert_name_free(name);
        p.check_setter();

        self.by_pos.push(p);
        idx
    }

    fn assert_name_free(&self, name: &str) {
        if let Some(&idx) = self.names.get(name) {
            panic!(
                "parameter name '{name}' is already in use by parameter '{}'",
                self.by_name[idx].name()
            );
        }
        if self.by_pos.iter().any(|p| p.name() == name) {
            panic!("parameter name '{name}' is already in use by a positional parameter");
        }
    }

    #[track_caller]
    pub(crate) fn assert_not_resolved(&self, what: &str) {
        if let Some(at) = self.parse_called_from {
            panic!("cannot {what}: the parameters have already been resolved (at {at})");
        }
    }

    pub fn param(&self, id: ParamId) -> &ByName {
        &self.by_name[id.0]
    }

    /// Change a parameter's group, attributes or actions after registration.
    ///
    /// # Panics
    ///
    /// Panics if resolution has begun.
    #[track_caller]
    pub fn param_mut(&mut self, id: ParamId) -> &mut ByName {
        self.assert_not_resolved("change a parameter");
        &mut self.by_name[id.0]
    }

    /// Find a named parameter by any of its names.
    pub fn lookup(&self, name: &str) -> Result<&ByName, ParamError> {
        match self.names.get(name) {
            Some(&idx) => Ok(&self.by_name[idx]),
            None => Err(ParamError::UnknownParam {
                location: Location::global("lookup"),
                name: name.to_string(),
                suggestions: self.suggest_names(name),
            }),
        }
    }

    pub fn lookup_by_position(&self, idx: usize) -> Result<&ByPos, ParamError> {
        self.by_pos.get(idx).ok_or(ParamError::UnknownPosition(idx))
    }

    /// Named parameters in registration order.
    pub fn params(&self) -> &[ByName] {
        &self.by_name
    }

    /// Positional parameters in position order.
    pub fn positionals(&self) -> &[ByPos] {
        &self.by_pos
    }

    pub fn has_terminal_positional(&self) -> bool {
        self.by_pos.last().is_some_and(ByPos::is_terminal)
    }

    // --- groups ---

    /// # Panics
    ///
    /// Panics if resolution has begun or the group name is malformed.
    #[track_caller]
    pub fn set_group_description(&mut self, name: &str, description: &str) {
        self.assert_not_resolved(&format!("describe group '{name}'"));
        check_group_name(name);
        self.groups.entry(name.to_string()).or_default().description =
            Some(description.to_string());
    }

    /// Add a configuration file whose lines may only set parameters of the
    /// given group. Such files are always strict.
    ///
    /// # Panics
    ///
    /// Panics if resolution has begun or no parameter is in the group yet.
    #[track_caller]
    pub fn add_group_config_file(&mut self, group: &str, file: ConfigFile) {
        self.assert_not_resolved(&format!("add a config file for group '{group}'"));
        if !self.by_name.iter().any(|p| p.group_name() == group) {
            panic!(
                "cannot add a config file for group '{group}': it has no parameters{}",
                did_you_mean(&self.suggest_groups(group))
            );
        }
        self.groups.entry(group.to_string()).or_default().config_files.push(file);
    }

    /// All groups with at least one parameter, in name order.
    pub fn groups(&self) -> BTreeMap<&str, Group<'_>> {
        group::fix_groups(&self.by_name, &self.groups)
    }

    pub fn group(&self, name: &str) -> Result<Group<'_>, ParamError> {
        self.groups()
            .remove(name)
            .ok_or_else(|| ParamError::UnknownGroup {
                name: name.to_string(),
                suggestions: self.suggest_groups(name),
            })
    }

    // --- notes ---

    /// # Panics
    ///
    /// Panics if resolution has begun or the note already exists.
    #[track_caller]
    pub fn add_note(&mut self, name: &str, text: &str) {
        self.assert_not_resolved(&format!("add note '{name}'"));
        if self.notes.contains_key(name) {
            panic!("note '{name}' has already been added");
        }
        self.notes.insert(
            name.to_string(),
            Note {
                name: name.to_string(),
                text: text.to_string(),
            },
        );
    }

    pub fn note(&self, name: &str) -> Result<&Note, ParamError> {
        self.notes.get(name).ok_or_else(|| ParamError::UnknownNote {
            name: name.to_string(),
            suggestions: self.suggest_notes(name),
        })
    }

    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.notes.values()
    }

    // --- sources ---

    /// Read parameters from environment variables starting with `prefix`.
    ///
    /// # Panics
    ///
    /// Panics if resolution has begun, the prefix is empty, or it is a
    /// prefix of (or prefixed by) one already added.
    #[track_caller]
    pub fn add_env_prefix(&mut self, prefix: &str) {
        self.assert_not_resolved(&format!("add environment prefix '{prefix}'"));
        if prefix.is_empty() {
            panic!("the environment prefix must not be empty");
        }
        if let Some(other) = self
            .env_prefixes
            .iter()
            .find(|p| p.starts_with(prefix) || prefix.starts_with(p.as_str()))
        {
            panic!("environment prefix '{prefix}' clashes with prefix '{other}' already added");
        }
        self.env_prefixes.push(prefix.to_string());
    }

    /// # Panics
    ///
    /// Panics if resolution has begun.
    #[track_caller]
    pub fn add_config_file(&mut self, file: ConfigFile) {
        self.assert_not_resolved("add a config file");
        self.config_files.push(file);
    }

    /// # Panics
    ///
    /// Panics if resolution has begun.
    #[track_caller]
    pub fn add_final_check<F>(&mut self, check: F)
    where
        F: FnMut() -> Result<(), CallbackError> + 'static,
    {
        self.assert_not_resolved("add a final check");
        self.final_checks.push(Box::new(check));
    }

    pub fn env_prefixes(&self) -> &[String] {
        &self.env_prefixes
    }

    pub fn config_files(&self) -> &[ConfigFile] {
        &self.config_files
    }

    pub fn prog_name(&self) -> &str {
        &self.prog_name
    }

    pub fn terminal_param(&self) -> &str {
        &self.terminal_param
    }

    // --- results ---

    pub fn errors(&self) -> &ErrMap {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Tokens left unparsed after the terminal parameter or a terminal
    /// positional parameter.
    pub fn remainder(&self) -> &[String] {
        &self.remainder
    }

    /// True if the terminal parameter (`--` by default) was given.
    pub fn terminal_param_seen(&self) -> bool {
        self.terminal_seen
    }

    /// Names seen in lenient sources that matched no parameter, with every
    /// place they were seen.
    pub fn unused_params(&self) -> &BTreeMap<String, Vec<Location>> {
        &self.unused
    }

    pub fn is_resolved(&self) -> bool {
        self.parse_called_from.is_some()
    }

    /// Where resolution was started from, if it has been.
    pub fn parse_called_from(&self) -> Option<&'static std::panic::Location<'static>> {
        self.parse_called_from
    }

    // --- suggestions ---

    pub fn suggest_names(&self, name: &str) -> Vec<String> {
        suggest(name, self.names.keys().map(String::as_str))
    }

    pub fn suggest_groups(&self, name: &str) -> Vec<String> {
        let groups = self.groups();
        suggest(name, groups.keys().copied())
    }

    pub fn suggest_notes(&self, name: &str) -> Vec<String> {
        suggest(name, self.notes.keys().map(String::as_str))
    }
}

impl Default for ParamSet {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl std::fmt::Debug for ParamSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParamSet")
            .field("prog_name", &self.prog_name)
            .field("by_name", &self.by_name)
            .field("by_pos", &self.by_pos)
            .field("env_prefixes", &self.env_prefixes)
            .field("config_files", &self.config_files)
            .field("terminal_param", &self.terminal_param)
            .field("errors", &self.errors)
            .field("remainder", &self.remainder)
            .finish_non_exhaustive()
    }
}
