//! Locating and reading configuration files.
//!
//! # Locating
//!
//! Each [`FileLocation`] resolves to one concrete path. `Platform` uses the
//! program name to pick the platform-specific directory (e.g.
//! `~/.config/{prog}/` on Linux). A location that cannot be resolved (no home
//! directory, no working directory) is treated like a missing file.
//!
//! # Reading
//!
//! Files are read line by line into [`ConfigLine`]s, each tagged with its
//! [`Location`]. Blank lines and comments (first non-blank character `#`) are
//! dropped. A line `#include <path>` is replaced by the lines of that file;
//! relative paths are taken from the including file's directory.
//!
//! A missing top-level file is skipped unless it must exist. Any other read
//! failure, and any failure on an included file, is reported.

use std::path::{Path, PathBuf};

use crate::error::ParamError;
use crate::source::Location;
use crate::types::FileLocation;

/// How deep `#include` directives may nest.
const MAX_INCLUDE_DEPTH: usize = 10;

const INCLUDE: &str = "#include";

/// One directive read from a configuration file.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ConfigLine {
    pub(crate) location: Location,
    /// The line with surrounding whitespace removed.
    pub(crate) text: String,
}

/// Resolve a [`FileLocation`] to a concrete path.
///
/// Returns `None` if the location cannot be resolved (e.g. no home directory).
pub(crate) fn resolve_location(loc: &FileLocation, prog_name: &str) -> Option<PathBuf> {
    match loc {
        FileLocation::Path(p) => Some(p.clone()),
        FileLocation::Platform(file) => {
            let proj = directories::ProjectDirs::from("", "", prog_name)?;
            Some(proj.config_dir().join(file))
        }
        FileLocation::Home(dir, file) => {
            let user = directories::UserDirs::new()?;
            Some(user.home_dir().join(dir).join(file))
        }
        FileLocation::Cwd(file) => std::env::current_dir().ok().map(|d| d.join(file)),
    }
}

/// Read a configuration file and everything it includes.
///
/// Lines that could be read are returned even when errors occurred, so one
/// bad include does not hide the rest of the file.
pub(crate) fn read_config(path: &Path, must_exist: bool) -> (Vec<ConfigLine>, Vec<ParamError>) {
    let mut lines = Vec::new();
    let mut errs = Vec::new();

    match std::fs::read_to_string(path) {
        Ok(content) => {
            let mut stack = vec![path.to_path_buf()];
            split_lines(path, &content, &mut stack, &mut lines, &mut errs);
            tracing::info!(path = %path.display(), directives = lines.len(), "loaded config file");
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if must_exist {
                errs.push(ParamError::MissingConfigFile {
                    path: path.to_path_buf(),
                });
            } else {
                tracing::debug!(path = %path.display(), "optional config file not found");
            }
        }
        Err(e) => errs.push(ParamError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }

    (lines, errs)
}

fn split_lines(
    path: &Path,
    content: &str,
    stack: &mut Vec<PathBuf>,
    lines: &mut Vec<ConfigLine>,
    errs: &mut Vec<ParamError>,
) {
    let source = path.display().to_string();
    for (i, raw) in content.lines().enumerate() {
        let text = raw.trim();
        let location = Location::new(source.as_str(), i + 1, raw);

        if let Some(rest) = text.strip_prefix(INCLUDE)
            && (rest.is_empty() || rest.starts_with(char::is_whitespace))
        {
            include(path, rest.trim(), location, stack, lines, errs);
            continue;
        }
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        lines.push(ConfigLine {
            location,
            text: text.to_string(),
        });
    }
}

fn include(
    from: &Path,
    target: &str,
    location: Location,
    stack: &mut Vec<PathBuf>,
    lines: &mut Vec<ConfigLine>,
    errs: &mut Vec<ParamError>,
) {
    if target.is_empty() {
        errs.push(ParamError::MalformedLine {
            location,
            reason: "#include needs a file name",
        });
        return;
    }

    let target = Path::new(target);
    let path = match from.parent() {
        Some(dir) if target.is_relative() => dir.join(target),
        _ => target.to_path_buf(),
    };

    if stack.contains(&path) {
        errs.push(ParamError::BadInclude {
            location,
            path,
            reason: "the file is already being read (include loop)",
        });
        return;
    }
    if stack.len() > MAX_INCLUDE_DEPTH {
        errs.push(ParamError::BadInclude {
            location,
            path,
            reason: "includes are nested too deeply",
        });
        return;
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => {
            tracing::debug!(path = %path.display(), included_from = %location, "including config file");
            stack.push(path.clone());
            split_lines(&path, &content, stack, lines, errs);
            stack.pop();
        }
        Err(e) => errs.push(ParamError::Io { path, source: e }),
    }
}
