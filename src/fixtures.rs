#[cfg(test)]
pub mod test {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use crate::error::SetterError;
    use crate::setter::Setter;
    use crate::types::ValueReq;

    /// Sets a bool to true. Takes no value.
    pub struct BoolFlag {
        dest: Rc<Cell<bool>>,
    }

    impl BoolFlag {
        pub fn new(dest: &Rc<Cell<bool>>) -> Box<Self> {
            Box::new(Self { dest: dest.clone() })
        }
    }

    impl Setter for BoolFlag {
        fn value_req(&self) -> ValueReq {
            ValueReq::None
        }

        fn set(&mut self, _name: &str) -> Result<(), SetterError> {
            self.dest.set(true);
            Ok(())
        }

        fn allowed_values(&self) -> String {
            "none".into()
        }

        fn current_value(&self) -> String {
            self.dest.get().to_string()
        }
    }

    /// Parses an `i64`. A value is mandatory.
    pub struct IntValue {
        dest: Rc<Cell<i64>>,
    }

    impl IntValue {
        pub fn new(dest: &Rc<Cell<i64>>) -> Box<Self> {
            Box::new(Self { dest: dest.clone() })
        }
    }

    impl Setter for IntValue {
        fn value_req(&self) -> ValueReq {
            ValueReq::Mandatory
        }

        fn set_with_val(&mut self, _name: &str, value: &str) -> Result<(), SetterError> {
            let n = value
                .parse()
                .map_err(|_| SetterError::Invalid(format!("'{value}' is not a whole number")))?;
            self.dest.set(n);
            Ok(())
        }

        fn allowed_values(&self) -> String {
            "any whole number".into()
        }

        fn current_value(&self) -> String {
            self.dest.get().to_string()
        }
    }

    /// Stores any string. A value is mandatory.
    pub struct TextValue {
        dest: Rc<RefCell<String>>,
    }

    impl TextValue {
        pub fn new(dest: &Rc<RefCell<String>>) -> Box<Self> {
            Box::new(Self { dest: dest.clone() })
        }
    }

    impl Setter for TextValue {
        fn value_req(&self) -> ValueReq {
            ValueReq::Mandatory
        }

        fn set_with_val(&mut self, _name: &str, value: &str) -> Result<(), SetterError> {
            *self.dest.borrow_mut() = value.to_string();
            Ok(())
        }

        fn allowed_values(&self) -> String {
            "any string".into()
        }

        fn current_value(&self) -> String {
            self.dest.borrow().clone()
        }
    }

    /// Stores a string, or a default when given alone.
    pub struct OptionalText {
        dest: Rc<RefCell<String>>,
        dflt: &'static str,
    }

    impl OptionalText {
        pub fn new(dest: &Rc<RefCell<String>>, dflt: &'static str) -> Box<Self> {
            Box::new(Self {
                dest: dest.clone(),
                dflt,
            })
        }
    }

    impl Setter for OptionalText {
        fn value_req(&self) -> ValueReq {
            ValueReq::Optional
        }

        fn set(&mut self, _name: &str) -> Result<(), SetterError> {
            *self.dest.borrow_mut() = self.dflt.to_string();
            Ok(())
        }

        fn set_with_val(&mut self, _name: &str, value: &str) -> Result<(), SetterError> {
            *self.dest.borrow_mut() = value.to_string();
            Ok(())
        }

        fn allowed_values(&self) -> String {
            "any string, optionally".into()
        }

        fn current_value(&self) -> String {
            self.dest.borrow().clone()
        }
    }

    /// A setter with no destination, rejected at registration.
    pub struct Unbound;

    impl Setter for Unbound {
        fn value_req(&self) -> ValueReq {
            ValueReq::None
        }

        fn allowed_values(&self) -> String {
            String::new()
        }

        fn current_value(&self) -> String {
            String::new()
        }

        fn check_setter(&self, name: &str) {
            panic!("{name}: Unbound setter has no destination");
        }
    }

    pub fn flag() -> (Rc<Cell<bool>>, Box<BoolFlag>) {
        let dest = Rc::new(Cell::new(false));
        let s = BoolFlag::new(&dest);
        (dest, s)
    }

    pub fn int() -> (Rc<Cell<i64>>, Box<IntValue>) {
        let dest = Rc::new(Cell::new(0));
        let s = IntValue::new(&dest);
        (dest, s)
    }

    pub fn text() -> (Rc<RefCell<String>>, Box<TextValue>) {
        let dest = Rc::new(RefCell::new(String::new()));
        let s = TextValue::new(&dest);
        (dest, s)
    }

    pub fn args(a: &[&str]) -> Vec<String> {
        a.iter().map(|s| s.to_string()).collect()
    }

    pub fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}
