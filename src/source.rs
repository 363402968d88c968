//! Provenance: where and how a parameter value was supplied.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// A position in some input: a line of a file, an argument index, or an
/// environment entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    /// What was being read, e.g. `"command line"` or a file path.
    pub source: String,
    /// 1-based line number or argument index. Zero when not applicable.
    pub line: usize,
    /// The raw text found at this position.
    pub content: String,
}

impl Location {
    pub fn new(source: impl Into<String>, line: usize, content: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            line,
            content: content.into(),
        }
    }

    pub(crate) fn command_line(idx: usize, token: &str) -> Self {
        Self::new(CMD_LINE, idx, token)
    }

    pub(crate) fn environment(idx: usize, entry: &str) -> Self {
        Self::new(ENVIRONMENT, idx, entry)
    }

    /// A location not tied to any input, used for checks run after all
    /// sources have been read.
    pub(crate) fn global(what: &str) -> Self {
        Self::new(what, 0, "")
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.source)
        } else {
            write!(f, "{}:{}", self.source, self.line)
        }
    }
}

pub(crate) const CMD_LINE: &str = "command line";
pub(crate) const ENVIRONMENT: &str = "environment";

/// The kind of input a value came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum SourceKind {
    CommandLine,
    Environment,
    ConfigFile(PathBuf),
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::CommandLine => write!(f, "{CMD_LINE}"),
            SourceKind::Environment => write!(f, "{ENVIRONMENT}"),
            SourceKind::ConfigFile(path) => write!(f, "config file: {}", path.display()),
        }
    }
}

/// One successful application of a value to a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    pub kind: SourceKind,
    pub location: Location,
    /// The tokens consumed: the parameter itself and, if given, its value.
    pub values: Vec<String>,
    /// The name the parameter was addressed by (may be an alternative name).
    pub param: String,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.kind, self.location, self.values.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_display_with_and_without_line() {
        assert_eq!(Location::new("a.cfg", 3, "x = 1").to_string(), "a.cfg:3");
        assert_eq!(Location::global("final checks").to_string(), "final checks");
    }

    #[test]
    fn source_display_names_kind_and_values() {
        let src = Source {
            kind: SourceKind::CommandLine,
            location: Location::command_line(2, "-n"),
            values: vec!["-n".into(), "5".into()],
            param: "n".into(),
        };
        assert_eq!(src.to_string(), "command line at command line:2: -n 5");
    }

    #[test]
    fn source_serializes_with_tagged_kind() {
        let src = Source {
            kind: SourceKind::ConfigFile("/etc/prog.cfg".into()),
            location: Location::new("/etc/prog.cfg", 7, "n = 5"),
            values: vec!["n".into(), "5".into()],
            param: "n".into(),
        };
        let json = serde_json::to_value(&src).unwrap();
        assert_eq!(json["kind"]["kind"], "config_file");
        assert_eq!(json["kind"]["path"], "/etc/prog.cfg");
        assert_eq!(json["location"]["line"], 7);
        assert_eq!(json["values"][1], "5");
    }
}
