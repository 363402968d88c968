//! Named and positional parameters.
//!
//! A parameter binds one [`Setter`] together with its identity, attributes and
//! the provenance of every value successfully applied to it.

use std::fmt;

use crate::errmap::ErrMap;
use crate::error::{CallbackError, ParamError};
use crate::group::{DEFAULT_GROUP, check_group_name};
use crate::setter::Setter;
use crate::source::{Location, Source, SourceKind};
use crate::types::{Attributes, ValueReq};

/// Called after every successful set with the location, the parameter and
/// the tokens consumed. An error is recorded against the parameter.
pub type ActionFunc = Box<dyn FnMut(&Location, &dyn Param, &[String]) -> Result<(), CallbackError>>;

/// What both kinds of parameter have in common.
pub trait Param {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn value_req(&self) -> ValueReq;
    fn allowed_values(&self) -> String;
    fn current_value(&self) -> String;
    /// Every successful set, in the order they happened.
    fn sources(&self) -> &[Source];

    fn has_been_set(&self) -> bool {
        !self.sources().is_empty()
    }
}

/// Identifies a named parameter within its [`ParamSet`](crate::ParamSet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub(crate) usize);

/// Options applied when registering a named parameter.
pub enum ParamOpt {
    AltNames(Vec<String>),
    Group(String),
    Attrs(Attributes),
    PostAction(ActionFunc),
    SeeAlso(Vec<String>),
    SeeNote(Vec<String>),
}

impl ParamOpt {
    pub fn alt_names(names: &[&str]) -> Self {
        ParamOpt::AltNames(names.iter().map(|s| s.to_string()).collect())
    }

    pub fn group(name: &str) -> Self {
        ParamOpt::Group(name.to_string())
    }

    pub fn attrs(attrs: Attributes) -> Self {
        ParamOpt::Attrs(attrs)
    }

    pub fn post_action<F>(f: F) -> Self
    where
        F: FnMut(&Location, &dyn Param, &[String]) -> Result<(), CallbackError> + 'static,
    {
        ParamOpt::PostAction(Box::new(f))
    }

    pub fn see_also(names: &[&str]) -> Self {
        ParamOpt::SeeAlso(names.iter().map(|s| s.to_string()).collect())
    }

    pub fn see_note(names: &[&str]) -> Self {
        ParamOpt::SeeNote(names.iter().map(|s| s.to_string()).collect())
    }
}

impl fmt::Debug for ParamOpt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamOpt::AltNames(n) => f.debug_tuple("AltNames").field(n).finish(),
            ParamOpt::Group(g) => f.debug_tuple("Group").field(g).finish(),
            ParamOpt::Attrs(a) => f.debug_tuple("Attrs").field(a).finish(),
            ParamOpt::PostAction(_) => f.write_str("PostAction(..)"),
            ParamOpt::SeeAlso(n) => f.debug_tuple("SeeAlso").field(n).finish(),
            ParamOpt::SeeNote(n) => f.debug_tuple("SeeNote").field(n).finish(),
        }
    }
}

/// A parameter addressed by name: `-name`, `--name=value`, `name = value` in
/// a file, `PREFIX_NAME` in the environment.
pub struct ByName {
    name: String,
    alt_names: Vec<String>,
    description: String,
    group: String,
    attrs: Attributes,
    setter: Box<dyn Setter>,
    sources: Vec<Source>,
    actions: Vec<ActionFunc>,
    see_also: Vec<String>,
    see_notes: Vec<String>,
}

impl ByName {
    pub(crate) fn new(name: &str, setter: Box<dyn Setter>, description: &str) -> Self {
        check_param_name(name, "parameter");
        Self {
            name: name.to_string(),
            alt_names: Vec::new(),
            description: description.to_string(),
            group: DEFAULT_GROUP.to_string(),
            attrs: Attributes::empty(),
            setter,
            sources: Vec::new(),
            actions: Vec::new(),
            see_also: Vec::new(),
            see_notes: Vec::new(),
        }
    }

    pub(crate) fn apply_opt(&mut self, opt: ParamOpt) {
        match opt {
            ParamOpt::AltNames(names) => {
                for alt in names {
                    check_param_name(&alt, "alternative name");
                    if alt == self.name || self.alt_names.contains(&alt) {
                        panic!("{}: alternative name '{alt}' is given more than once", self.name);
                    }
                    self.alt_names.push(alt);
                }
            }
            ParamOpt::Group(g) => self.set_group(&g),
            ParamOpt::Attrs(a) => self.attrs |= a,
            ParamOpt::PostAction(f) => self.actions.push(f),
            ParamOpt::SeeAlso(names) => self.see_also.extend(names),
            ParamOpt::SeeNote(names) => self.see_notes.extend(names),
        }
    }

    pub(crate) fn check_setter(&self) {
        self.setter.check_setter(&self.name);
    }

    /// The primary name followed by the alternatives.
    pub fn all_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.alt_names.iter().map(String::as_str))
    }

    pub fn alt_names(&self) -> &[String] {
        &self.alt_names
    }

    pub fn group_name(&self) -> &str {
        &self.group
    }

    pub fn attributes(&self) -> Attributes {
        self.attrs
    }

    pub fn has_attr(&self, attr: Attributes) -> bool {
        self.attrs.contains(attr)
    }

    pub fn see_also(&self) -> &[String] {
        &self.see_also
    }

    pub fn see_notes(&self) -> &[String] {
        &self.see_notes
    }

    /// Move the parameter to another group.
    ///
    /// # Panics
    ///
    /// Panics if the group name is malformed.
    pub fn set_group(&mut self, group: &str) {
        check_group_name(group);
        self.group = group.to_string();
    }

    pub fn set_attributes(&mut self, attrs: Attributes) {
        self.attrs = attrs;
    }

    pub fn add_action(&mut self, f: ActionFunc) {
        self.actions.push(f);
    }

    /// Apply a value from some source. `used_name` is the name the
    /// parameter was addressed by; `value` is `None` when no value was
    /// given. Problems are recorded against the primary name.
    pub(crate) fn apply(
        &mut self,
        kind: SourceKind,
        location: Location,
        used_name: &str,
        value: Option<&str>,
        errs: &mut ErrMap,
    ) {
        if self.has_attr(Attributes::SET_ONLY_ONCE)
            && let Some(first) = self.sources.first()
        {
            errs.add(
                &self.name,
                ParamError::AlreadySet {
                    location,
                    name: used_name.to_string(),
                    first: first.location.clone(),
                },
            );
            return;
        }

        let result = match value {
            Some(v) => self.setter.set_with_val(used_name, v),
            None => self.setter.set(used_name),
        };
        if let Err(source) = result {
            errs.add(
                &self.name,
                ParamError::BadValue {
                    location,
                    name: used_name.to_string(),
                    source,
                },
            );
            return;
        }

        let values: Vec<String> = std::iter::once(used_name)
            .chain(value)
            .map(str::to_string)
            .collect();
        tracing::trace!(param = %self.name, source = %kind, location = %location, "parameter set");
        self.sources.push(Source {
            kind,
            location: location.clone(),
            values: values.clone(),
            param: used_name.to_string(),
        });

        let mut actions = std::mem::take(&mut self.actions);
        for action in actions.iter_mut() {
            if let Err(source) = action(&location, &*self, &values) {
                errs.add(
                    &self.name,
                    ParamError::Action {
                        location: location.clone(),
                        name: used_name.to_string(),
                        source,
                    },
                );
            }
        }
        self.actions = actions;
    }
}

impl Param for ByName {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn value_req(&self) -> ValueReq {
        self.setter.value_req()
    }

    fn allowed_values(&self) -> String {
        self.setter.allowed_values()
    }

    fn current_value(&self) -> String {
        self.setter.current_value()
    }

    fn sources(&self) -> &[Source] {
        &self.sources
    }
}

impl fmt::Debug for ByName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByName")
            .field("name", &self.name)
            .field("alt_names", &self.alt_names)
            .field("group", &self.group)
            .field("attrs", &self.attrs)
            .field("sources", &self.sources)
            .finish_non_exhaustive()
    }
}

/// Options applied when registering a positional parameter.
pub enum PosOpt {
    /// Every token after this one is left unparsed, as the remainder.
    Terminal,
    PostAction(ActionFunc),
}

impl PosOpt {
    pub fn post_action<F>(f: F) -> Self
    where
        F: FnMut(&Location, &dyn Param, &[String]) -> Result<(), CallbackError> + 'static,
    {
        PosOpt::PostAction(Box::new(f))
    }
}

/// A parameter taken from a fixed position at the start of the command line.
pub struct ByPos {
    name: String,
    description: String,
    index: usize,
    terminal: bool,
    setter: Box<dyn Setter>,
    sources: Vec<Source>,
    actions: Vec<ActionFunc>,
}

impl ByPos {
    pub(crate) fn new(name: &str, index: usize, setter: Box<dyn Setter>, description: &str) -> Self {
        check_param_name(name, "positional parameter");
        if setter.value_req() == ValueReq::None {
            panic!("{name}: a positional parameter must take a value but its setter takes none");
        }
        Self {
            name: name.to_string(),
            description: description.to_string(),
            index,
            terminal: false,
            setter,
            sources: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub(crate) fn apply_opt(&mut self, opt: PosOpt) {
        match opt {
            PosOpt::Terminal => self.terminal = true,
            PosOpt::PostAction(f) => self.actions.push(f),
        }
    }

    pub(crate) fn check_setter(&self) {
        self.setter.check_setter(&self.name);
    }

    /// Zero-based position on the command line.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub(crate) fn apply(&mut self, location: Location, value: &str, errs: &mut ErrMap) {
        if let Err(source) = self.setter.set_with_val(&self.name, value) {
            errs.add(
                &self.name,
                ParamError::BadValue {
                    location,
                    name: self.name.clone(),
                    source,
                },
            );
            return;
        }

        let values = vec![value.to_string()];
        tracing::trace!(param = %self.name, position = self.index, "positional parameter set");
        self.sources.push(Source {
            kind: SourceKind::CommandLine,
            location: location.clone(),
            values: values.clone(),
            param: self.name.clone(),
        });

        let mut actions = std::mem::take(&mut self.actions);
        for action in actions.iter_mut() {
            if let Err(source) = action(&location, &*self, &values) {
                errs.add(
                    &self.name,
                    ParamError::Action {
                        location: location.clone(),
                        name: self.name.clone(),
                        source,
                    },
                );
            }
        }
        self.actions = actions;
    }
}

impl Param for ByPos {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn value_req(&self) -> ValueReq {
        self.setter.value_req()
    }

    fn allowed_values(&self) -> String {
        self.setter.allowed_values()
    }

    fn current_value(&self) -> String {
        self.setter.current_value()
    }

    fn sources(&self) -> &[Source] {
        &self.sources
    }
}

impl fmt::Debug for ByPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByPos")
            .field("name", &self.name)
            .field("index", &self.index)
            .field("terminal", &self.terminal)
            .field("sources", &self.sources)
            .finish_non_exhaustive()
    }
}

/// Parameter names start with a letter or digit and contain only letters,
/// digits, `-` and `_`.
///
/// # Panics
///
/// Panics if the name breaks these rules.
pub(crate) fn check_param_name(name: &str, what: &str) {
    let mut chars = name.chars();
    match chars.next() {
        None => panic!("the {what} name must not be empty"),
        Some(c) if !c.is_ascii_alphanumeric() => {
            panic!("{what} '{name}': the name must start with a letter or digit")
        }
        _ => {}
    }
    if let Some(bad) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_')) {
        panic!("{what} '{name}': the name may not contain '{bad}'");
    }
}
