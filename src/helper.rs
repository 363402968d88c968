//! Hooks for the collaborators that sit around resolution: the helper that
//! reports errors and shows usage, and the handler for leftover arguments.

use crate::errmap::ErrMap;
use crate::registry::ParamSet;

/// Standard behaviour wrapped around resolution: extra parameters (such as
/// `-help`), what to do once arguments are processed, how to report errors,
/// and how to show usage.
///
/// Every method defaults to doing nothing.
pub trait Helper {
    /// Register the helper's own parameters. Called once, when the
    /// [`ParamSet`] is built.
    fn add_params(&mut self, _ps: &mut ParamSet) {}

    /// Act on the resolved parameters, e.g. show help if it was asked for.
    /// Called by [`ParamSet::parse`] after resolution.
    fn process_args(&mut self, _ps: &mut ParamSet) {}

    /// Report resolution errors. Called by [`ParamSet::parse`] when there
    /// are any. Typical helpers print them and exit.
    fn error_handler(&mut self, _ps: &ParamSet, _errs: &ErrMap) {}

    /// Show usage, followed by any messages.
    fn help(&mut self, _ps: &ParamSet, _messages: &[String]) {}
}

/// A helper that does nothing at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHelper;

impl Helper for NullHelper {}

/// Deals with the tokens left over after the terminal parameter or a
/// terminal positional parameter. Without one, any leftover tokens are
/// reported as unexpected.
pub trait RemHandler {
    fn handle_remainder(&mut self, remainder: &[String], errs: &mut ErrMap);
}

/// Accepts any remainder; the program reads it from
/// [`ParamSet::remainder`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRemHandler;

impl RemHandler for NullRemHandler {
    fn handle_remainder(&mut self, _remainder: &[String], _errs: &mut ErrMap) {}
}

impl ParamSet {
    /// Show usage through the helper.
    pub fn help(&mut self, messages: &[String]) {
        if let Some(mut helper) = self.helper.take() {
            helper.help(self, messages);
            self.helper = Some(helper);
        }
    }

    pub(crate) fn with_helper(&mut self, f: impl FnOnce(&mut dyn Helper, &mut ParamSet)) {
        if let Some(mut helper) = self.helper.take() {
            f(helper.as_mut(), self);
            self.helper = Some(helper);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResolveInput;
    use crate::fixtures::test::{args, flag};
    use crate::param::{Param, ParamOpt};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        calls: Rc<RefCell<Vec<String>>>,
    }

    impl Helper for Recorder {
        fn add_params(&mut self, ps: &mut ParamSet) {
            self.calls.borrow_mut().push("add_params".into());
            let (_, s) = flag();
            ps.add("help", s, "show usage", vec![ParamOpt::alt_names(&["h"])]);
        }

        fn process_args(&mut self, ps: &mut ParamSet) {
            let set = ps.lookup("help").map(|p| !p.sources().is_empty()).unwrap_or(false);
            self.calls.borrow_mut().push(format!("process_args help={set}"));
        }

        fn error_handler(&mut self, _ps: &ParamSet, errs: &ErrMap) {
            self.calls.borrow_mut().push(format!("error_handler {}", errs.count()));
        }

        fn help(&mut self, ps: &ParamSet, messages: &[String]) {
            self.calls
                .borrow_mut()
                .push(format!("help {} {}", ps.prog_name(), messages.join(",")));
        }
    }

    #[test]
    fn helper_hooks_run_in_order() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut ps = ParamSet::builder()
            .program_name("prog")
            .helper(Recorder {
                calls: calls.clone(),
            })
            .build();
        ps.parse_with(ResolveInput {
            args: args(&["-h", "-nope"]),
            env_vars: vec![],
        });
        ps.help(&["bye".to_string()]);
        assert_eq!(
            *calls.borrow(),
            vec![
                "add_params",
                "process_args help=true",
                "error_handler 1",
                "help prog bye",
            ]
        );
    }

    #[test]
    fn error_handler_not_called_without_errors() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut ps = ParamSet::builder()
            .program_name("prog")
            .helper(Recorder {
                calls: calls.clone(),
            })
            .build();
        ps.parse_with(ResolveInput::default());
        assert_eq!(
            *calls.borrow(),
            vec!["add_params", "process_args help=false"]
        );
    }

    #[test]
    fn null_rem_handler_accepts_anything() {
        let mut errs = ErrMap::default();
        NullRemHandler.handle_remainder(&args(&["a", "b"]), &mut errs);
        assert!(errs.is_empty());
    }
}
