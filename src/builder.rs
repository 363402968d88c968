use crate::helper::{Helper, NullHelper, RemHandler};
use crate::registry::ParamSet;
use crate::types::ConfigFile;

/// The terminal parameter unless told otherwise.
pub const DEFAULT_TERMINAL_PARAM: &str = "--";

impl ParamSet {
    pub fn builder() -> ParamSetBuilder {
        ParamSetBuilder::new()
    }
}

/// Builder for the settings of a [`ParamSet`] that are fixed before any
/// parameter is registered.
///
/// ```ignore
/// let mut ps = ParamSet::builder()
///     .env_prefix("MYPROG_")
///     .config_file(ConfigFile::at(FileLocation::Platform("params".into())))
///     .build();
/// ```
pub struct ParamSetBuilder {
    program_name: Option<String>,
    helper: Option<Box<dyn Helper>>,
    terminal_param: String,
    rem_handler: Option<Box<dyn RemHandler>>,
    env_prefixes: Vec<String>,
    config_files: Vec<ConfigFile>,
}

impl ParamSetBuilder {
    fn new() -> Self {
        Self {
            program_name: None,
            helper: None,
            terminal_param: DEFAULT_TERMINAL_PARAM.to_string(),
            rem_handler: None,
            env_prefixes: Vec::new(),
            config_files: Vec::new(),
        }
    }

    /// Set the program name used for program-scoped config lines and the
    /// platform config directory (default: the basename of `argv[0]`).
    pub fn program_name(mut self, name: &str) -> Self {
        self.program_name = Some(name.to_string());
        self
    }

    /// Set the helper (default: [`NullHelper`]).
    pub fn helper(mut self, helper: impl Helper + 'static) -> Self {
        self.helper = Some(Box::new(helper));
        self
    }

    /// Set the token that ends named-parameter parsing (default: `--`).
    pub fn terminal_param(mut self, term: &str) -> Self {
        self.terminal_param = term.to_string();
        self
    }

    /// Set the handler for leftover tokens. Without one, leftover tokens are
    /// reported as errors.
    pub fn rem_handler(mut self, handler: impl RemHandler + 'static) -> Self {
        self.rem_handler = Some(Box::new(handler));
        self
    }

    /// Add an environment variable prefix. May be called more than once.
    pub fn env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefixes.push(prefix.to_string());
        self
    }

    /// Add a config file. Files are read in the order added.
    pub fn config_file(mut self, file: ConfigFile) -> Self {
        self.config_files.push(file);
        self
    }

    fn effective_program_name(&self) -> String {
        if let Some(name) = &self.program_name {
            return name.clone();
        }
        std::env::args()
            .next()
            .as_deref()
            .map(std::path::Path::new)
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "program".to_string())
    }

    /// Build the [`ParamSet`] and let the helper add its parameters.
    ///
    /// # Panics
    ///
    /// Panics if the terminal parameter does not start with `-`, or if the
    /// env prefixes overlap.
    pub fn build(self) -> ParamSet {
        if !self.terminal_param.starts_with('-') {
            panic!(
                "the terminal parameter '{}' must start with '-'",
                self.terminal_param
            );
        }

        let mut ps = ParamSet::empty(self.effective_program_name(), self.terminal_param);
        for prefix in &self.env_prefixes {
            ps.add_env_prefix(prefix);
        }
        for file in self.config_files {
            ps.add_config_file(file);
        }
        ps.rem_handler = self.rem_handler;
        ps.helper = Some(self.helper.unwrap_or_else(|| Box::new(NullHelper)));

        ps.with_helper(|helper, ps| helper.add_params(ps));
        ps
    }
}
