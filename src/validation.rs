// src/validation.rs - Field-level validation collected across a request
use std::str::FromStr;
use serde::Serialize;
use sqlx::SqlitePool;
use crate::error::{ApiError, ApiResult, FieldErrors};

// ==================== VALIDATION RESULT ====================

#[derive(Debug, Default, Serialize)]
pub struct ValidationResult {
    pub errors: FieldErrors,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn merge(&mut self, other: ValidationResult) {
        for (field, errors) in other.errors {
            self.errors.entry(field).or_default().extend(errors);
        }
    }

    pub fn to_api_error(&self) -> ApiError {
        let message = self.errors
            .iter()
            .map(|(field, errors)| format!("{}: {}", field, errors.join(", ")))
            .collect::<Vec<_>>()
            .join("; ");

        ApiError::ValidationError {
            message,
            fields: self.errors.clone(),
        }
    }

    pub fn into_result(self) -> ApiResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self.to_api_error())
        }
    }
}

impl From<validator::ValidationErrors> for ValidationResult {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut result = ValidationResult::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("failed '{}' check", error.code));
                result.add_error(field.to_string(), message);
            }
        }
        result
    }
}

/// Rejects values that are empty once surrounding whitespace is removed.
pub fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        let mut error = validator::ValidationError::new("blank");
        error.message = Some("This field may not be blank.".into());
        Err(error)
    } else {
        Ok(())
    }
}

// ==================== FIELD VALIDATORS ====================

pub struct FieldValidator;

impl FieldValidator {
    /// Accepts `value` only if it parses as one of the enumerated choices `E`.
    pub fn choice<E: FromStr>(
        result: &mut ValidationResult,
        field: &str,
        value: Option<&str>,
        allowed: &[&str],
    ) {
        if let Some(value) = value {
            if E::from_str(value).is_err() {
                let message = format!(
                    "'{}' is not a valid choice. Must be one of: {}",
                    value,
                    allowed.join(", ")
                );
                result.add_error(field, message);
            }
        }
    }

    /// Records an error on `field` unless `table` holds a row with `id`.
    pub async fn reference(
        pool: &SqlitePool,
        result: &mut ValidationResult,
        field: &str,
        table: &str,
        id: Option<&str>,
    ) -> ApiResult<()> {
        let Some(id) = id else {
            return Ok(());
        };

        let query = format!("SELECT COUNT(*) FROM {} WHERE id = ?", table);
        let count: i64 = sqlx::query_scalar(&query)
            .bind(id)
            .fetch_one(pool)
            .await?;

        if count == 0 {
            result.add_error(field, format!("Invalid pk \"{}\" - object does not exist.", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppointmentStatus;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Name cannot be empty"))]
        name: String,
        #[validate(range(min = 0, message = "Stock cannot be negative"))]
        stock: i64,
    }

    #[test]
    fn test_from_validator_errors() {
        let sample = Sample { name: String::new(), stock: -1 };
        let result = ValidationResult::from(sample.validate().unwrap_err());
        assert_eq!(result.errors["name"], vec!["Name cannot be empty".to_string()]);
        assert_eq!(result.errors["stock"], vec!["Stock cannot be negative".to_string()]);
        assert!(result.into_result().is_err());
    }

    #[test]
    fn test_merge_and_message() {
        let mut a = ValidationResult::new();
        a.add_error("patient", "missing");
        let mut b = ValidationResult::new();
        b.add_error("patient", "invalid");
        b.add_error("doctor", "invalid");
        a.merge(b);

        assert_eq!(a.errors["patient"].len(), 2);
        match a.to_api_error() {
            ApiError::ValidationError { message, .. } => {
                assert_eq!(message, "doctor: invalid; patient: missing, invalid");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_choice() {
        use AppointmentStatus as Status;
        let choices = Status::CHOICES;
        let mut result = ValidationResult::new();
        FieldValidator::choice::<Status>(&mut result, "status", Some("confirmed"), choices);
        assert!(result.is_valid());

        FieldValidator::choice::<Status>(&mut result, "status", Some("pending"), choices);
        assert!(result.errors["status"][0].contains("not a valid choice"));

        let mut empty = ValidationResult::new();
        FieldValidator::choice::<Status>(&mut empty, "status", None, choices);
        assert!(empty.is_valid());
    }

    #[derive(Validate)]
    struct Named {
        #[validate(custom(function = "not_blank"))]
        name: String,
    }

    #[test]
    fn test_not_blank() {
        assert!(Named { name: "Cardiology".to_string() }.validate().is_ok());

        let errors = Named { name: " \t ".to_string() }.validate().unwrap_err();
        let result = ValidationResult::from(errors);
        assert_eq!(result.errors["name"], vec!["This field may not be blank.".to_string()]);
    }
}
