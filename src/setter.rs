//! The contract every parameter value obeys.
//!
//! A [`Setter`] owns the route to the destination storage (typically a shared
//! `Rc<Cell<T>>` or `Rc<RefCell<T>>` the caller also holds) and decides
//! whether a given value is acceptable. The registry never looks inside it.
//!
//! The value requirement decides which of the two setting methods is called:
//!
//! - [`set`](Setter::set) when the parameter appears alone;
//! - [`set_with_val`](Setter::set_with_val) when a value accompanies it.
//!
//! Both have defaults that refuse, so a setter only implements the ones its
//! [`ValueReq`] admits:
//!
//! | `ValueReq`  | implement              |
//! |-------------|------------------------|
//! | `Mandatory` | `set_with_val`         |
//! | `Optional`  | `set` and `set_with_val` |
//! | `None`      | `set`                  |

use crate::error::SetterError;
use crate::types::ValueReq;

pub trait Setter {
    /// Whether a value must, may, or must not follow the parameter.
    fn value_req(&self) -> ValueReq;

    /// Apply the parameter with no value.
    fn set(&mut self, _name: &str) -> Result<(), SetterError> {
        Err(SetterError::ValueRequired)
    }

    /// Apply the parameter with the given value.
    fn set_with_val(&mut self, _name: &str, _value: &str) -> Result<(), SetterError> {
        Err(SetterError::NoValueAllowed)
    }

    /// A short description of the values this setter accepts, for usage text.
    fn allowed_values(&self) -> String;

    /// The current value of the destination, for usage text.
    fn current_value(&self) -> String;

    /// Check the setter is usable. Called once, when the parameter is
    /// registered.
    ///
    /// # Panics
    ///
    /// Implementations panic if the setter is misconfigured; that is a bug in
    /// the calling program, not a user error.
    fn check_setter(&self, _name: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{BoolFlag, IntValue, OptionalText};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn flag_refuses_a_value() {
        let dest = Rc::new(Cell::new(false));
        let mut s = BoolFlag::new(&dest);
        assert_eq!(s.value_req(), ValueReq::None);
        assert_eq!(s.set_with_val("f", "x"), Err(SetterError::NoValueAllowed));
        assert!(!dest.get());
        s.set("f").unwrap();
        assert!(dest.get());
    }

    #[test]
    fn mandatory_value_refuses_bare_use() {
        let dest = Rc::new(Cell::new(0));
        let mut s = IntValue::new(&dest);
        assert_eq!(s.set("n"), Err(SetterError::ValueRequired));
        s.set_with_val("n", "42").unwrap();
        assert_eq!(dest.get(), 42);
        assert!(matches!(
            s.set_with_val("n", "forty"),
            Err(SetterError::Invalid(_))
        ));
        assert_eq!(s.current_value(), "42");
    }

    #[test]
    fn optional_value_accepts_both() {
        let dest = Rc::new(RefCell::new(String::new()));
        let mut s = OptionalText::new(&dest, "dflt");
        s.set("o").unwrap();
        assert_eq!(*dest.borrow(), "dflt");
        s.set_with_val("o", "given").unwrap();
        assert_eq!(*dest.borrow(), "given");
    }
}
