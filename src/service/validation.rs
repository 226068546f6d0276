//! Request validation: non-blank and length rules on input fields.

use crate::dto::{DeveloperInput, ProgrammingLanguageInput};
use crate::error::AppError;
use std::collections::BTreeMap;

pub const LANGUAGE_NAME_MAX: usize = 100;
pub const CREATORS_NAME_MAX: usize = 200;

/// Field name (as seen on the wire) to message. First failure per field wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.0
    }

    fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

/// Implemented by request bodies checked before they reach a service.
pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

struct Rule<'a> {
    field: &'a str,
    label: &'a str,
    value: &'a str,
    max: Option<usize>,
}

fn check(errors: &mut FieldErrors, rule: Rule<'_>) {
    if rule.value.trim().is_empty() {
        errors.add(rule.field, format!("{} is required", rule.label));
        return;
    }
    // Postgres text columns cannot store NUL.
    if rule.value.contains('\0') {
        errors.add(
            rule.field,
            format!("{} must not contain NUL characters", rule.label),
        );
        return;
    }
    if let Some(max) = rule.max {
        if rule.value.chars().count() > max {
            errors.add(
                rule.field,
                format!("{} must be at most {} characters", rule.label, max),
            );
        }
    }
}

impl Validate for DeveloperInput {
    fn validate(&self) -> Result<(), AppError> {
        let mut errors = FieldErrors::default();
        check(
            &mut errors,
            Rule {
                field: "firstName",
                label: "First name",
                value: &self.first_name,
                max: None,
            },
        );
        check(
            &mut errors,
            Rule {
                field: "lastName",
                label: "Last name",
                value: &self.last_name,
                max: None,
            },
        );
        errors.into_result()
    }
}

impl Validate for ProgrammingLanguageInput {
    fn validate(&self) -> Result<(), AppError> {
        let mut errors = FieldErrors::default();
        check(
            &mut errors,
            Rule {
                field: "name",
                label: "Language name",
                value: &self.name,
                max: Some(LANGUAGE_NAME_MAX),
            },
        );
        check(
            &mut errors,
            Rule {
                field: "creatorsName",
                label: "Creator name",
                value: &self.creators_name,
                max: Some(CREATORS_NAME_MAX),
            },
        );
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_errors(result: Result<(), AppError>) -> FieldErrors {
        match result {
            Err(AppError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn blank_first_name_is_rejected() {
        let input = DeveloperInput {
            first_name: "   ".into(),
            last_name: "Doe".into(),
            ..Default::default()
        };
        let errors = field_errors(input.validate());
        assert_eq!(errors.get("firstName"), Some("First name is required"));
        assert_eq!(errors.get("lastName"), None);
    }

    #[test]
    fn all_failing_fields_are_reported() {
        let errors = field_errors(DeveloperInput::default().validate());
        assert_eq!(errors.get("firstName"), Some("First name is required"));
        assert_eq!(errors.get("lastName"), Some("Last name is required"));
    }

    #[test]
    fn valid_developer_passes() {
        let input = DeveloperInput {
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            ..Default::default()
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn language_length_bounds_count_chars() {
        let at_limit = ProgrammingLanguageInput {
            name: "é".repeat(LANGUAGE_NAME_MAX),
            creators_name: "x".repeat(CREATORS_NAME_MAX),
            ..Default::default()
        };
        assert!(at_limit.validate().is_ok());

        let too_long = ProgrammingLanguageInput {
            name: "a".repeat(LANGUAGE_NAME_MAX + 1),
            creators_name: "x".repeat(CREATORS_NAME_MAX + 1),
            ..Default::default()
        };
        let errors = field_errors(too_long.validate());
        assert_eq!(
            errors.get("name"),
            Some("Language name must be at most 100 characters")
        );
        assert_eq!(
            errors.get("creatorsName"),
            Some("Creator name must be at most 200 characters")
        );
    }

    #[test]
    fn nul_characters_are_rejected() {
        let input = DeveloperInput {
            first_name: "Ada\u{0}".into(),
            last_name: "Lovelace".into(),
            ..Default::default()
        };
        let errors = field_errors(input.validate());
        assert_eq!(
            errors.get("firstName"),
            Some("First name must not contain NUL characters")
        );

        let input = ProgrammingLanguageInput {
            name: "C".into(),
            creators_name: "\u{0}Ritchie".into(),
            ..Default::default()
        };
        let errors = field_errors(input.validate());
        assert_eq!(
            errors.get("creatorsName"),
            Some("Creator name must not contain NUL characters")
        );
    }

    #[test]
    fn missing_creator_is_required() {
        let input = ProgrammingLanguageInput {
            name: "Java".into(),
            ..Default::default()
        };
        let errors = field_errors(input.validate());
        assert_eq!(errors.get("creatorsName"), Some("Creator name is required"));
    }
}
