//! The config-file stage.
//!
//! Each directive is `[prog1,prog2/]name[ = value]`. Whitespace around the
//! name and the value is trimmed; `name =` gives an empty value, a bare
//! `name` gives none.
//!
//! Unknown names are errors in strict files, group files and
//! program-scoped lines. Elsewhere they are recorded as unused.

use std::path::{Path, PathBuf};

use crate::error::ParamError;
use crate::file::{self, ConfigLine};
use crate::param::Param;
use crate::registry::ParamSet;
use crate::source::{Location, SourceKind};
use crate::types::{Attributes, ConfigFile, FileLocation};

/// One directive split into its parts.
#[derive(Debug, PartialEq)]
struct Directive<'a> {
    /// Programs the line is restricted to, if any.
    progs: Option<Vec<&'a str>>,
    name: &'a str,
    value: Option<&'a str>,
}

fn split_directive(text: &str) -> Result<Directive<'_>, &'static str> {
    let (lhs, value) = match text.split_once('=') {
        Some((lhs, rhs)) => (lhs.trim(), Some(rhs.trim())),
        None => (text.trim(), None),
    };

    let (progs, name) = match lhs.split_once('/') {
        Some((progs, name)) => {
            let progs: Vec<&str> = progs.split(',').map(str::trim).collect();
            if progs.iter().any(|p| p.is_empty()) {
                return Err("a program name before '/' is empty");
            }
            (Some(progs), name.trim())
        }
        None => (None, lhs),
    };

    if name.is_empty() {
        return Err("no parameter name given");
    }
    Ok(Directive { progs, name, value })
}

/// How a single file is read.
struct FileRules<'a> {
    path: &'a Path,
    strict: bool,
    /// Set for group config files: every name must belong to this group.
    group: Option<&'a str>,
}

impl ParamSet {
    pub(crate) fn resolve_config_files(&mut self) {
        let general: Vec<ConfigFile> = self.config_files.clone();
        for cf in &general {
            self.read_config_file(cf, None);
        }

        let by_group: Vec<(String, ConfigFile)> = self
            .groups
            .iter()
            .flat_map(|(g, rec)| rec.config_files.iter().map(move |cf| (g.clone(), cf.clone())))
            .collect();
        for (group, cf) in &by_group {
            self.read_config_file(cf, Some(group));
        }
    }

    fn read_config_file(&mut self, cf: &ConfigFile, group: Option<&str>) {
        let Some(path) = file::resolve_location(&cf.location, &self.prog_name) else {
            tracing::debug!(location = ?cf.location, "config file location cannot be resolved");
            if cf.must_exist {
                self.errors.add_global(ParamError::MissingConfigFile {
                    path: unresolved_path(&cf.location),
                });
            }
            return;
        };

        let (lines, errs) = file::read_config(&path, cf.must_exist);
        for e in errs {
            self.errors.add_global(e);
        }

        let rules = FileRules {
            path: &path,
            strict: cf.strict || group.is_some(),
            group,
        };
        for line in lines {
            self.apply_config_line(&rules, line);
        }
    }

    fn apply_config_line(&mut self, rules: &FileRules<'_>, line: ConfigLine) {
        let ConfigLine { location, text } = line;
        let d = match split_directive(&text) {
            Ok(d) => d,
            Err(reason) => {
                self.errors
                    .add_global(ParamError::MalformedLine { location, reason });
                return;
            }
        };

        let mut strict = rules.strict;
        if let Some(progs) = &d.progs {
            if !progs.contains(&self.prog_name.as_str()) {
                tracing::trace!(location = %location, "config line is for other programs");
                return;
            }
            strict = true;
        }

        let Some(&idx) = self.names.get(d.name) else {
            if strict {
                let suggestions = self.suggest_names(d.name);
                self.errors.add(
                    d.name,
                    ParamError::UnknownParam {
                        location,
                        name: d.name.to_string(),
                        suggestions,
                    },
                );
            } else {
                self.record_unused(d.name, location);
            }
            return;
        };

        let p = &mut self.by_name[idx];
        if p.has_attr(Attributes::COMMAND_LINE_ONLY) {
            self.errors.add(
                p.name(),
                ParamError::CommandLineOnly {
                    location,
                    name: d.name.to_string(),
                },
            );
            return;
        }
        if let Some(group) = rules.group
            && p.group_name() != group
        {
            self.errors.add(
                p.name(),
                ParamError::NotInGroup {
                    location,
                    name: d.name.to_string(),
                    group: group.to_string(),
                    actual: p.group_name().to_string(),
                },
            );
            return;
        }

        p.apply(
            SourceKind::ConfigFile(rules.path.to_path_buf()),
            location,
            d.name,
            d.value,
            &mut self.errors,
        );
    }

    pub(crate) fn record_unused(&mut self, name: &str, location: Location) {
        tracing::trace!(name, location = %location, "no parameter with this name");
        self.unused.entry(name.to_string()).or_default().push(location);
    }
}

/// The best description of a location that could not be resolved.
fn unresolved_path(loc: &FileLocation) -> PathBuf {
    match loc {
        FileLocation::Path(p) => p.clone(),
        FileLocation::Platform(f) | FileLocation::Cwd(f) => PathBuf::from(f),
        FileLocation::Home(dir, f) => Path::new("~").join(dir).join(f),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResolveInput;
    use crate::fixtures::test::{OptionalText, flag, int, text};
    use crate::param::ParamOpt;
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn write_cfg(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn set_with_file(prog: &str, cf: ConfigFile) -> ParamSet {
        ParamSet::builder().program_name(prog).config_file(cf).build()
    }

    #[test]
    fn split_plain_and_valued() {
        assert_eq!(
            split_directive("flag").unwrap(),
            Directive {
                progs: None,
                name: "flag",
                value: None
            }
        );
        assert_eq!(
            split_directive("  n  =  42 ").unwrap(),
            Directive {
                progs: None,
                name: "n",
                value: Some("42")
            }
        );
        assert_eq!(split_directive("s =").unwrap().value, Some(""));
    }

    #[test]
    fn split_value_may_contain_slash_and_equals() {
        let d = split_directive("path = /usr/lib/a=b").unwrap();
        assert_eq!(d.progs, None);
        assert_eq!(d.name, "path");
        assert_eq!(d.value, Some("/usr/lib/a=b"));
    }

    #[test]
    fn split_program_scope() {
        let d = split_directive("progA, progB / n = 1").unwrap();
        assert_eq!(d.progs, Some(vec!["progA", "progB"]));
        assert_eq!(d.name, "n");
    }

    #[test]
    fn split_rejects_empty_parts() {
        assert!(split_directive("= 3").is_err());
        assert!(split_directive("a,/n = 3").is_err());
        assert!(split_directive("prog/ = 3").is_err());
    }

    #[test]
    fn line_for_another_program_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = write_cfg(&dir, "p.cfg", "myProg/myParam = 42\n");
        let mut ps = set_with_file("otherProg", ConfigFile::optional(path));
        let (v, s) = int();
        let id = ps.add("myParam", s, "", vec![]);

        let errs = ps.resolve(ResolveInput::default());
        assert!(errs.is_empty());
        assert_eq!(v.get(), 0);
        assert!(!ps.param(id).has_been_set());
        assert!(ps.unused_params().is_empty());
    }

    #[test]
    fn line_for_this_program_is_applied() {
        let dir = TempDir::new().unwrap();
        let path = write_cfg(&dir, "p.cfg", "otherProg,myProg/myParam = 42\n");
        let mut ps = set_with_file("myProg", ConfigFile::optional(&path));
        let (v, s) = int();
        let id = ps.add("myParam", s, "", vec![]);

        assert!(ps.resolve(ResolveInput::default()).is_empty());
        assert_eq!(v.get(), 42);
        let src = &ps.param(id).sources()[0];
        assert_eq!(src.kind, SourceKind::ConfigFile(path));
        assert_eq!(src.location.line, 1);
        assert_eq!(src.values, vec!["myParam", "42"]);
    }

    #[test]
    fn lenient_file_records_unknown_names() {
        let dir = TempDir::new().unwrap();
        let path = write_cfg(&dir, "p.cfg", "nosuch = 1\n\nnosuch\n");
        let mut ps = set_with_file("prog", ConfigFile::optional(path));

        assert!(ps.resolve(ResolveInput::default()).is_empty());
        let unused = &ps.unused_params()["nosuch"];
        assert_eq!(unused.len(), 2);
        assert_eq!(unused[1].line, 3);
    }

    #[test]
    fn strict_file_reports_unknown_names_with_suggestion() {
        let dir = TempDir::new().unwrap();
        let path = write_cfg(&dir, "p.cfg", "colour = red\n");
        let mut ps = set_with_file("prog", ConfigFile::optional(path).strict());
        let (_, s) = text();
        ps.add("color", s, "", vec![]);

        let errs = ps.resolve(ResolveInput::default());
        let msg = errs.get("colour").unwrap()[0].to_string();
        assert!(msg.ends_with("did you mean: color?"), "{msg}");
    }

    #[test]
    fn program_scoped_line_is_strict() {
        let dir = TempDir::new().unwrap();
        let path = write_cfg(&dir, "p.cfg", "prog/nosuch = 1\n");
        let mut ps = set_with_file("prog", ConfigFile::optional(path));
        let errs = ps.resolve(ResolveInput::default());
        assert!(matches!(
            errs.get("nosuch").unwrap()[0],
            ParamError::UnknownParam { .. }
        ));
    }

    #[test]
    fn command_line_only_param_rejected_in_file() {
        let dir = TempDir::new().unwrap();
        let path = write_cfg(&dir, "p.cfg", "secret = x\n");
        let mut ps = set_with_file("prog", ConfigFile::optional(path));
        let (v, s) = text();
        ps.add("secret", s, "", vec![ParamOpt::attrs(Attributes::COMMAND_LINE_ONLY)]);

        let errs = ps.resolve(ResolveInput::default());
        assert!(matches!(
            errs.get("secret").unwrap()[0],
            ParamError::CommandLineOnly { .. }
        ));
        assert!(v.borrow().is_empty());
    }

    #[test]
    fn missing_files_follow_must_exist() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("gone.cfg");

        let mut ps = set_with_file("prog", ConfigFile::optional(&gone));
        assert!(ps.resolve(ResolveInput::default()).is_empty());

        let mut ps = set_with_file("prog", ConfigFile::required(&gone));
        let errs = ps.resolve(ResolveInput::default());
        assert_eq!(errs.count(), 1);
        assert!(matches!(
            errs.get("").unwrap()[0],
            ParamError::MissingConfigFile { .. }
        ));
    }

    #[test]
    fn values_and_bare_names_reach_the_setter() {
        let dir = TempDir::new().unwrap();
        let path = write_cfg(&dir, "p.cfg", "verbose\nmode\nname = a b c\n");
        let mut ps = set_with_file("prog", ConfigFile::optional(path));
        let (verbose, s) = flag();
        ps.add("verbose", s, "", vec![]);
        let mode = Rc::new(RefCell::new(String::new()));
        ps.add("mode", OptionalText::new(&mode, "auto"), "", vec![]);
        let (name, s) = text();
        ps.add("name", s, "", vec![]);

        assert!(ps.resolve(ResolveInput::default()).is_empty());
        assert!(verbose.get());
        assert_eq!(*mode.borrow(), "auto");
        assert_eq!(*name.borrow(), "a b c");
    }

    #[test]
    fn flag_given_a_value_in_file_is_bad_value() {
        let dir = TempDir::new().unwrap();
        let path = write_cfg(&dir, "p.cfg", "verbose = yes\nn\n");
        let mut ps = set_with_file("prog", ConfigFile::optional(path));
        let (_, s) = flag();
        ps.add("verbose", s, "", vec![]);
        let (_, s) = int();
        ps.add("n", s, "", vec![]);

        let errs = ps.resolve(ResolveInput::default());
        assert_eq!(errs.count(), 2);
        assert!(errs.get("verbose").is_some());
        assert!(errs.get("n").is_some());
    }

    #[test]
    fn malformed_line_is_reported_globally() {
        let dir = TempDir::new().unwrap();
        let path = write_cfg(&dir, "p.cfg", "= 5\n");
        let mut ps = set_with_file("prog", ConfigFile::optional(path));
        let errs = ps.resolve(ResolveInput::default());
        assert!(matches!(
            errs.get("").unwrap()[0],
            ParamError::MalformedLine { .. }
        ));
    }

    #[test]
    fn group_file_only_sets_its_own_group() {
        let dir = TempDir::new().unwrap();
        let path = write_cfg(&dir, "net.cfg", "port = 80\nlevel = 3\nnosuch = 1\n");
        let mut ps = ParamSet::builder().program_name("prog").build();
        let (port, s) = int();
        ps.add("port", s, "", vec![ParamOpt::group("net")]);
        let (level, s) = int();
        ps.add("level", s, "", vec![]);
        ps.add_group_config_file("net", ConfigFile::optional(path));

        let errs = ps.resolve(ResolveInput::default());
        assert_eq!(port.get(), 80);
        assert_eq!(level.get(), 0);
        assert!(matches!(
            errs.get("level").unwrap()[0],
            ParamError::NotInGroup { .. }
        ));
        assert!(matches!(
            errs.get("nosuch").unwrap()[0],
            ParamError::UnknownParam { .. }
        ));
    }

    #[test]
    fn group_files_read_after_general_files() {
        let dir = TempDir::new().unwrap();
        let general = write_cfg(&dir, "all.cfg", "port = 1\n");
        let grouped = write_cfg(&dir, "net.cfg", "port = 2\n");
        let mut ps = set_with_file("prog", ConfigFile::optional(general));
        let (port, s) = int();
        let id = ps.add("port", s, "", vec![ParamOpt::group("net")]);
        ps.add_group_config_file("net", ConfigFile::optional(grouped));

        assert!(ps.resolve(ResolveInput::default()).is_empty());
        assert_eq!(port.get(), 2);
        assert_eq!(ps.param(id).sources().len(), 2);
    }

    #[test]
    fn alt_name_in_file_sets_primary() {
        let dir = TempDir::new().unwrap();
        let path = write_cfg(&dir, "p.cfg", "v\n");
        let mut ps = set_with_file("prog", ConfigFile::optional(path));
        let (verbose, s) = flag();
        let id = ps.add("verbose", s, "", vec![ParamOpt::alt_names(&["v"])]);

        assert!(ps.resolve(ResolveInput::default()).is_empty());
        assert!(verbose.get());
        assert_eq!(ps.param(id).sources()[0].param, "v");
    }

    #[test]
    fn included_lines_are_applied() {
        let dir = TempDir::new().unwrap();
        write_cfg(&dir, "inc.cfg", "n = 7\n");
        let path = write_cfg(&dir, "p.cfg", "#include inc.cfg\n");
        let mut ps = set_with_file("prog", ConfigFile::optional(path));
        let (n, s) = int();
        let id = ps.add("n", s, "", vec![]);

        assert!(ps.resolve(ResolveInput::default()).is_empty());
        assert_eq!(n.get(), 7);
        assert!(ps.param(id).sources()[0].location.source.ends_with("inc.cfg"));
    }
}
