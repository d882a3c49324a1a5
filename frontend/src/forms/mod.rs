//! # Forms
//!
//! A form is a plain map of field name → control, where each control holds a
//! JSON value, the validators that apply to it and the errors currently
//! attached to it. Forms know nothing about rendering.
//!
//! ## Lifecycle:
//! 1. A builder in [`offer_forms`] creates the form with its defaults
//! 2. User input goes through [`Form::set_input`], which re-runs validators
//! 3. Submitting marks the form submitted, making errors visible inline
//! 4. A valid form is turned into a typed request with [`Form::payload`]
//!
//! Errors attached by the server with [`FormControl::set_errors`] stay until
//! the control's value changes.

pub mod offer_forms;

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::errors::FormError;

/// Rules a control value must satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    /// Value must be present: not null and not an empty string. `0` passes.
    Required,
    /// Value, when present, must be a whole number
    Integer,
    /// Value, when present, must be a decimal number
    Decimal,
}

impl Validator {
    /// Key under which a failure of this validator is stored
    pub fn key(&self) -> &'static str {
        match self {
            Validator::Required => "required",
            Validator::Integer => "integer",
            Validator::Decimal => "decimal",
        }
    }

    fn check(&self, value: &Value) -> Option<&'static str> {
        let blank = is_blank(value);
        match self {
            Validator::Required if blank => Some("This field is required"),
            Validator::Integer if !blank && !is_integer(value) => Some("Enter a whole number"),
            Validator::Decimal if !blank && !is_decimal(value) => Some("Enter a number like 2.50"),
            _ => None,
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_i64() || n.is_u64(),
        Value::String(s) => s.trim().parse::<i64>().is_ok(),
        _ => false,
    }
}

fn is_decimal(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => Decimal::from_str(s.trim()).is_ok(),
        _ => false,
    }
}

/// A single form field
#[derive(Debug, Clone, PartialEq)]
pub struct FormControl {
    value: Value,
    validators: Vec<Validator>,
    errors: BTreeMap<String, String>,
    read_only: bool,
}

impl FormControl {
    pub fn new(value: Value, validators: Vec<Validator>) -> Self {
        let mut control = Self {
            value,
            validators,
            errors: BTreeMap::new(),
            read_only: false,
        };
        control.update_validity();
        control
    }

    /// A control whose value is fixed by the form builder
    pub fn fixed(value: Value, validators: Vec<Validator>) -> Self {
        Self {
            read_only: true,
            ..Self::new(value, validators)
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn error(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Replace the value and re-run validators, dropping any server errors
    pub fn set_value(&mut self, value: Value) {
        self.value = value;
        self.update_validity();
    }

    /// Set the value from raw text typed by the user.
    ///
    /// Blank text becomes null. Whole numbers typed into an integer control
    /// are stored as JSON numbers; anything else is kept as text so decimal
    /// prices keep their exact digits.
    pub fn set_input(&mut self, raw: &str) {
        let trimmed = raw.trim();
        let value = if trimmed.is_empty() {
            Value::Null
        } else if self.validators.contains(&Validator::Integer) {
            trimmed
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(trimmed.to_string()))
        } else {
            Value::String(trimmed.to_string())
        };
        self.set_value(value);
    }

    /// Replace the errors attached to this control, e.g. with server-side
    /// validation messages
    pub fn set_errors(&mut self, errors: BTreeMap<String, String>) {
        self.errors = errors;
    }

    fn update_validity(&mut self) {
        self.errors = self
            .validators
            .iter()
            .filter_map(|v| v.check(&self.value).map(|msg| (v.key().to_string(), msg.to_string())))
            .collect();
    }
}

/// A group of named controls plus its submitted flag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Form {
    controls: BTreeMap<&'static str, FormControl>,
    submitted: bool,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_control(mut self, name: &'static str, control: FormControl) -> Self {
        self.controls.insert(name, control);
        self
    }

    pub fn control(&self, name: &str) -> Option<&FormControl> {
        self.controls.get(name)
    }

    pub fn control_mut(&mut self, name: &str) -> Result<&mut FormControl, FormError> {
        self.controls
            .get_mut(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }

    /// Apply user input to an editable control
    pub fn set_input(&mut self, name: &str, raw: &str) -> Result<(), FormError> {
        let control = self.control_mut(name)?;
        if control.is_read_only() {
            return Err(FormError::ReadOnlyField(name.to_string()));
        }
        control.set_input(raw);
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.controls.values().all(FormControl::is_valid)
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn mark_submitted(&mut self) {
        self.submitted = true;
    }

    /// Error messages to show next to a field. Nothing is shown before the
    /// first submit.
    pub fn visible_errors(&self, name: &str) -> Vec<&str> {
        if !self.submitted {
            return Vec::new();
        }
        self.control(name)
            .map(|c| c.errors().values().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Current values of every control
    pub fn value(&self) -> Map<String, Value> {
        self.controls
            .iter()
            .map(|(name, control)| (name.to_string(), control.value().clone()))
            .collect()
    }

    /// Convert the form value into a typed request payload
    pub fn payload<T: DeserializeOwned>(&self) -> Result<T, FormError> {
        Ok(serde_json::from_value(Value::Object(self.value()))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_rejects_null_and_empty_string_only() {
        assert!(!FormControl::new(Value::Null, vec![Validator::Required]).is_valid());
        assert!(!FormControl::new(json!(""), vec![Validator::Required]).is_valid());
        assert!(FormControl::new(json!(0), vec![Validator::Required]).is_valid());
        assert!(FormControl::new(json!("x"), vec![Validator::Required]).is_valid());
    }

    #[test]
    fn test_set_input_parses_integers() {
        let mut control = FormControl::new(json!(1), vec![Validator::Required, Validator::Integer]);

        control.set_input(" 12 ");
        assert_eq!(control.value(), &json!(12));
        assert!(control.is_valid());

        control.set_input("twelve");
        assert_eq!(control.value(), &json!("twelve"));
        assert_eq!(control.error("integer"), Some("Enter a whole number"));

        control.set_input("");
        assert_eq!(control.value(), &Value::Null);
        assert!(control.error("required").is_some());
        assert!(control.error("integer").is_none());
    }

    #[test]
    fn test_set_input_keeps_decimal_text() {
        let mut control = FormControl::new(json!(1), vec![Validator::Required, Validator::Decimal]);

        control.set_input("2.50");
        assert_eq!(control.value(), &json!("2.50"));
        assert!(control.is_valid());

        control.set_input("2,50");
        assert!(control.error("decimal").is_some());
    }

    #[test]
    fn test_server_errors_clear_on_value_change() {
        let mut control = FormControl::new(json!(3), vec![Validator::Required]);
        control.set_errors(BTreeMap::from([("nbTokens".to_string(), "too many".to_string())]));
        assert!(!control.is_valid());

        control.set_input("2");
        assert!(control.is_valid());
    }

    #[test]
    fn test_read_only_controls_reject_input() {
        let mut form = Form::new()
            .with_control("project", FormControl::fixed(json!(3), vec![Validator::Required]))
            .with_control("name", FormControl::new(Value::Null, vec![]));

        assert!(matches!(form.set_input("project", "4"), Err(FormError::ReadOnlyField(_))));
        assert!(matches!(form.set_input("missing", "4"), Err(FormError::UnknownField(_))));
        assert!(form.set_input("name", "widgets").is_ok());
        assert_eq!(form.value().get("project"), Some(&json!(3)));
    }

    #[test]
    fn test_errors_visible_only_after_submit() {
        let mut form = Form::new().with_control("name", FormControl::new(Value::Null, vec![Validator::Required]));

        assert!(!form.is_valid());
        assert!(form.visible_errors("name").is_empty());

        form.mark_submitted();
        assert_eq!(form.visible_errors("name"), vec!["This field is required"]);
    }
}
