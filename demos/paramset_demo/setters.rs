//! Setters for the demo application.
//!
//! Each one shares its destination with `main` through an `Rc`, so the
//! program reads the resolved values straight from its own variables.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::str::FromStr;

use paramset::{Setter, SetterError, ValueReq};

/// Sets a bool to true. Takes no value.
pub struct Flag(pub Rc<Cell<bool>>);

impl Setter for Flag {
    fn value_req(&self) -> ValueReq {
        ValueReq::None
    }

    fn set(&mut self, _name: &str) -> Result<(), SetterError> {
        self.0.set(true);
        Ok(())
    }

    fn allowed_values(&self) -> String {
        "none".into()
    }

    fn current_value(&self) -> String {
        self.0.get().to_string()
    }
}

/// Parses any `FromStr + Copy` number.
pub struct Number<T>(pub Rc<Cell<T>>);

impl<T> Setter for Number<T>
where
    T: FromStr + Copy + ToString,
{
    fn value_req(&self) -> ValueReq {
        ValueReq::Mandatory
    }

    fn set_with_val(&mut self, _name: &str, value: &str) -> Result<(), SetterError> {
        let n = value
            .parse()
            .map_err(|_| SetterError::Invalid(format!("'{value}' is not a valid number")))?;
        self.0.set(n);
        Ok(())
    }

    fn allowed_values(&self) -> String {
        format!("a number of type {}", std::any::type_name::<T>())
    }

    fn current_value(&self) -> String {
        self.0.get().to_string()
    }
}

/// Accepts one of a fixed set of words.
pub struct Choice {
    pub dest: Rc<RefCell<String>>,
    pub allowed: &'static [&'static str],
}

impl Setter for Choice {
    fn value_req(&self) -> ValueReq {
        ValueReq::Mandatory
    }

    fn set_with_val(&mut self, _name: &str, value: &str) -> Result<(), SetterError> {
        if !self.allowed.contains(&value) {
            return Err(SetterError::Invalid(format!(
                "'{value}' is not one of: {}",
                self.allowed.join(", ")
            )));
        }
        *self.dest.borrow_mut() = value.to_string();
        Ok(())
    }

    fn allowed_values(&self) -> String {
        format!("one of: {}", self.allowed.join(", "))
    }

    fn current_value(&self) -> String {
        self.dest.borrow().clone()
    }

    fn check_setter(&self, name: &str) {
        if self.allowed.is_empty() {
            panic!("{name}: a choice needs at least one allowed value");
        }
    }
}

/// Stores any string.
pub struct Text(pub Rc<RefCell<String>>);

impl Setter for Text {
    fn value_req(&self) -> ValueReq {
        ValueReq::Mandatory
    }

    fn set_with_val(&mut self, _name: &str, value: &str) -> Result<(), SetterError> {
        *self.0.borrow_mut() = value.to_string();
        Ok(())
    }

    fn allowed_values(&self) -> String {
        "any text".into()
    }

    fn current_value(&self) -> String {
        self.0.borrow().clone()
    }
}
