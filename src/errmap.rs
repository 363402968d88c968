//! Accumulated resolution errors, keyed by parameter name.

use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::error::ParamError;

/// Key used for errors that belong to no single parameter.
pub const GLOBAL_KEY: &str = "";

/// Errors gathered during resolution. Keys are parameter names, or
/// [`GLOBAL_KEY`] for errors not tied to one parameter. Within a key, errors
/// keep the order they were found in.
#[derive(Debug, Default)]
pub struct ErrMap {
    errs: BTreeMap<String, Vec<ParamError>>,
}

impl ErrMap {
    pub fn add(&mut self, name: &str, err: ParamError) {
        self.errs.entry(name.to_string()).or_default().push(err);
    }

    pub fn add_global(&mut self, err: ParamError) {
        self.add(GLOBAL_KEY, err);
    }

    pub fn get(&self, name: &str) -> Option<&[ParamError]> {
        self.errs.get(name).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.errs.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ParamError])> {
        self.errs.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.errs.is_empty()
    }

    /// Total number of errors across all keys.
    pub fn count(&self) -> usize {
        self.errs.values().map(Vec::len).sum()
    }

    /// Write a summary for the user, one error per line, grouped by name.
    pub fn report(&self, w: &mut impl Write, prog_name: &str) -> io::Result<()> {
        let n = self.count();
        if n == 0 {
            return Ok(());
        }
        let noun = if n == 1 { "error was" } else { "errors were" };
        writeln!(w, "{prog_name}: {n} {noun} detected while setting the parameters:")?;
        for (name, errs) in &self.errs {
            let label = if name.is_empty() { "(global)" } else { name.as_str() };
            for err in errs {
                writeln!(w, "  {label}: {err}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn must(name: &str) -> ParamError {
        ParamError::MustBeSet { name: name.into() }
    }

    #[test]
    fn errors_keep_insertion_order_within_a_key() {
        let mut m = ErrMap::default();
        m.add("a", must("first"));
        m.add("a", must("second"));
        let errs = m.get("a").unwrap();
        assert!(errs[0].to_string().starts_with("first"));
        assert!(errs[1].to_string().starts_with("second"));
    }

    #[test]
    fn count_spans_keys() {
        let mut m = ErrMap::default();
        assert!(m.is_empty());
        m.add("a", must("a"));
        m.add("b", must("b"));
        m.add_global(ParamError::FinalCheck("bad".into()));
        assert_eq!(m.count(), 3);
        assert_eq!(m.keys().collect::<Vec<_>>(), vec!["", "a", "b"]);
    }

    #[test]
    fn report_lists_every_error() {
        let mut m = ErrMap::default();
        m.add("p1", must("p1"));
        m.add_global(ParamError::FinalCheck("inconsistent".into()));
        let mut out = Vec::new();
        m.report(&mut out, "prog").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("prog: 2 errors were detected"));
        assert!(text.contains("(global): final check failed: inconsistent"));
        assert!(text.contains("p1: p1: this parameter must be set somewhere"));
    }

    #[test]
    fn report_is_silent_when_empty() {
        let mut out = Vec::new();
        ErrMap::default().report(&mut out, "prog").unwrap();
        assert!(out.is_empty());
    }
}
