//! Small value types shared across the registry and the resolution stages.
//!
//! # Config file locations
//!
//! A configuration file is described by a [`ConfigFile`]. Its
//! [`location`](ConfigFile::location) says where to find it:
//!
//! | Variant | Resolves to |
//! |---------|-------------|
//! | `Path(p)` | `p` as given |
//! | `Platform(name)` | `{platform config dir}/{program}/{name}` |
//! | `Home(dir, name)` | `$HOME/{dir}/{name}` |
//! | `Cwd(name)` | `{cwd}/{name}` |
//!
//! Two independent flags govern how the file is treated:
//!
//! - **`must_exist`**: a missing file is reported as an error. Otherwise a
//!   missing top-level file is silently skipped.
//! - **`strict`**: unknown parameter names in the file are errors (with a
//!   suggestion). Otherwise they are recorded as unused and skipped.
//!
//! Group-scoped files and program-scoped lines are always strict.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Whether a parameter takes a value, as reported by its setter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueReq {
    /// A value must follow the parameter.
    Mandatory,
    /// A value may follow, but only in the `name=value` form.
    Optional,
    /// No value may follow.
    None,
}

impl fmt::Display for ValueReq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueReq::Mandatory => write!(f, "mandatory"),
            ValueReq::Optional => write!(f, "optional"),
            ValueReq::None => write!(f, "none"),
        }
    }
}

bitflags::bitflags! {
    /// Attributes that alter how a named parameter is resolved or shown.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attributes: u32 {
        /// May only be given on the command line, never in a file or the environment.
        const COMMAND_LINE_ONLY = 1 << 0;
        /// Must be given by at least one source.
        const MUST_BE_SET = 1 << 1;
        /// Only the first source to set it is honoured; later ones are errors.
        const SET_ONLY_ONCE = 1 << 2;
        /// Left out of the standard usage message.
        const DONT_SHOW_IN_STD_USAGE = 1 << 3;
    }
}

/// Where a configuration file lives.
#[derive(Debug, Clone, PartialEq)]
pub enum FileLocation {
    /// An explicit path.
    Path(PathBuf),
    /// A file in the platform config directory for the program
    /// (XDG on Linux, `~/Library/Application Support` on macOS).
    Platform(String),
    /// A file in a subdirectory of the user's home directory, e.g.
    /// `Home(".myprog", "params")`.
    Home(String, String),
    /// A file in the current working directory.
    Cwd(String),
}

/// A configuration file to be read during resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub location: FileLocation,
    pub must_exist: bool,
    pub strict: bool,
}

impl ConfigFile {
    /// An optional, lenient file at an explicit path.
    pub fn optional(path: impl Into<PathBuf>) -> Self {
        Self {
            location: FileLocation::Path(path.into()),
            must_exist: false,
            strict: false,
        }
    }

    /// A file at an explicit path that must exist.
    pub fn required(path: impl Into<PathBuf>) -> Self {
        Self {
            location: FileLocation::Path(path.into()),
            must_exist: true,
            strict: false,
        }
    }

    /// An optional file at the given location.
    pub fn at(location: FileLocation) -> Self {
        Self {
            location,
            must_exist: false,
            strict: false,
        }
    }

    /// Make unknown names in this file errors rather than unused entries.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Report the file as an error if it does not exist.
    pub fn must_exist(mut self) -> Self {
        self.must_exist = true;
        self
    }
}
