//! Request validation.
//!
//! Constraints are declared with `validator` derive attributes. The
//! [`RequestValidator`] turns violations into `{field, message}` pairs using
//! templates keyed by the constraint code. Attributes override the code
//! (`code = "required"`, `code = "min"`) so one template serves several
//! validator kinds.

use crate::FieldError;
use serde_json::Value;
use std::collections::HashMap;
use validator::{Validate, ValidationError, ValidationErrors};

/// Template code for presence and non-empty checks.
pub const CODE_REQUIRED: &str = "required";
/// Template code for e-mail format checks.
pub const CODE_EMAIL: &str = "email";
/// Template code for lower bounds.
pub const CODE_MIN: &str = "min";
/// Template code for upper bounds.
pub const CODE_MAX: &str = "max";

/// Maps the Rust field names `validator` reports to the names clients send.
///
/// `validator` ignores `#[serde(rename)]`, so request types that rename a
/// field list the `(rust, json)` pairs in `RENAMED`.
pub trait FieldNames {
    const RENAMED: &'static [(&'static str, &'static str)] = &[];

    /// Returns the JSON name for a Rust field name.
    fn json_name(field: &str) -> &str {
        Self::RENAMED
            .iter()
            .find(|(rust, _)| *rust == field)
            .map_or(field, |&(_, json)| json)
    }
}

/// Translates `validator` failures into field errors.
///
/// Built once at startup and shared; it holds no global state.
#[derive(Debug, Clone)]
pub struct RequestValidator {
    templates: HashMap<String, String>,
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestValidator {
    /// Creates a validator with the standard templates registered.
    #[must_use]
    pub fn new() -> Self {
        let mut validator = Self {
            templates: HashMap::new(),
        };
        validator.register(CODE_REQUIRED, "The field {field} is required");
        validator.register(CODE_EMAIL, "The field {field} must be a valid email");
        validator.register(CODE_MIN, "The field {field} must be at least {min}");
        validator.register(CODE_MAX, "The field {field} must be at most {max}");
        validator
    }

    /// Registers (or replaces) the template for a constraint code.
    ///
    /// `{field}` expands to the JSON field name; any other `{name}` expands to
    /// the constraint parameter of that name.
    pub fn register(&mut self, code: impl Into<String>, template: impl Into<String>) {
        self.templates.insert(code.into(), template.into());
    }

    /// Validates `value`, returning one entry per violated constraint.
    pub fn validate<T: Validate + FieldNames>(&self, value: &T) -> Result<(), Vec<FieldError>> {
        value.validate().map_err(|errors| self.translate::<T>(&errors))
    }

    /// Converts `validator` errors into field errors named after the JSON
    /// fields of `T`, ordered by that name.
    #[must_use]
    pub fn translate<T: FieldNames>(&self, errors: &ValidationErrors) -> Vec<FieldError> {
        let mut fields: Vec<_> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errors)| (T::json_name(&field).to_string(), errors))
            .collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        fields
            .into_iter()
            .flat_map(|(field, errors)| {
                errors
                    .iter()
                    .map(move |error| FieldError::new(field.clone(), self.message_for(&field, error)))
            })
            .collect()
    }

    fn message_for(&self, field: &str, error: &ValidationError) -> String {
        let Some(template) = self.templates.get(error.code.as_ref()) else {
            return format!("Validation failed for field: {field}");
        };

        let mut message = template.replace("{field}", field);
        for (name, value) in &error.params {
            let placeholder = format!("{{{name}}}");
            if message.contains(&placeholder) {
                message = message.replace(&placeholder, &param_to_string(value));
            }
        }
        message
    }
}

fn param_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Sample {
        #[validate(required, length(min = 1, code = "required"))]
        name: Option<String>,

        #[serde(rename = "unitPrice")]
        #[validate(range(min = 0.01, code = "min"))]
        unit_price: f64,

        #[validate(range(max = 10, code = "max"))]
        quantity: i32,

        #[validate(email(code = "email"))]
        contact: String,

        #[validate(length(max = 3))]
        tag: String,
    }

    impl FieldNames for Sample {
        const RENAMED: &'static [(&'static str, &'static str)] = &[("unit_price", "unitPrice")];
    }

    fn valid() -> Sample {
        Sample {
            name: Some("Widget".to_string()),
            unit_price: 1.5,
            quantity: 2,
            contact: "ops@example.com".to_string(),
            tag: "ab".to_string(),
        }
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(RequestValidator::new().validate(&valid()).is_ok());
    }

    #[test]
    fn test_one_entry_per_violation() {
        let sample = Sample {
            name: None,
            unit_price: 0.0,
            quantity: 11,
            contact: "nope".to_string(),
            tag: "abcdef".to_string(),
        };

        let errors = RequestValidator::new().validate(&sample).unwrap_err();
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn test_messages_use_templates() {
        let sample = Sample {
            name: Some(String::new()),
            unit_price: 0.0,
            quantity: 11,
            contact: "nope".to_string(),
            ..valid()
        };

        let errors = RequestValidator::new().validate(&sample).unwrap_err();
        let by_field: HashMap<_, _> = errors
            .iter()
            .map(|e| (e.field.as_str(), e.message.as_str()))
            .collect();

        assert_eq!(by_field["name"], "The field name is required");
        assert_eq!(by_field["unitPrice"], "The field unitPrice must be at least 0.01");
        assert!(by_field["quantity"].starts_with("The field quantity must be at most 10"));
        assert_eq!(by_field["contact"], "The field contact must be a valid email");
    }

    #[test]
    fn test_unknown_code_falls_back() {
        let sample = Sample {
            tag: "abcdef".to_string(),
            ..valid()
        };

        let errors = RequestValidator::new().validate(&sample).unwrap_err();
        assert_eq!(errors, vec![FieldError::new("tag", "Validation failed for field: tag")]);
    }

    #[test]
    fn test_custom_template_registration() {
        let mut validator = RequestValidator::new();
        validator.register("length", "{field} is too long (max {max})");
        let sample = Sample {
            tag: "abcdef".to_string(),
            ..valid()
        };

        let errors = validator.validate(&sample).unwrap_err();
        assert_eq!(errors[0].message, "tag is too long (max 3)");
    }

    #[test]
    fn test_renamed_field_uses_json_name() {
        let sample = Sample {
            unit_price: 0.0,
            ..valid()
        };

        let errors = RequestValidator::new().validate(&sample).unwrap_err();
        assert_eq!(
            errors,
            vec![FieldError::new("unitPrice", "The field unitPrice must be at least 0.01")]
        );
    }

    #[test]
    fn test_unlisted_field_keeps_rust_name() {
        assert_eq!(Sample::json_name("quantity"), "quantity");
        assert_eq!(Sample::json_name("unit_price"), "unitPrice");
    }
}
