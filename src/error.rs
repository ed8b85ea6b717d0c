// src/error.rs
use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Field name -> messages, as reported to API clients.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Key used when an input error cannot be tied to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    ValidationError { message: String, fields: FieldErrors },
    DatabaseError(sqlx::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize)]
struct ErrorResponse<'a> {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a FieldErrors>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError { message, .. } => write!(f, "Validation Error: {}", message),
            ApiError::DatabaseError(err) => write!(f, "Database Error: {}", err),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ValidationError { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let errors = match self {
            ApiError::ValidationError { fields, .. } if !fields.is_empty() => Some(fields),
            _ => None,
        };

        // Store failures are logged in full but reported generically.
        let message = match self {
            ApiError::DatabaseError(err) => {
                log::error!("Database error: {}", err);
                "Internal Server Error: database operation failed".to_string()
            }
            other => other.to_string(),
        };

        let error_response = ErrorResponse {
            success: false,
            message,
            errors,
        };

        HttpResponse::build(self.status_code()).json(error_response)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return ApiError::Conflict(db_err.message().to_string());
            }
            if db_err.is_foreign_key_violation() {
                return ApiError::invalid(NON_FIELD_ERRORS, "Referenced record does not exist");
            }
        }
        if matches!(err, sqlx::Error::RowNotFound) {
            return ApiError::NotFound("Record not found".to_string());
        }
        ApiError::DatabaseError(err)
    }
}

impl From<JsonPayloadError> for ApiError {
    fn from(err: JsonPayloadError) -> Self {
        match err {
            JsonPayloadError::Deserialize(ref e) if e.is_data() => {
                let message = e.to_string();
                let field = missing_field_name(&message).unwrap_or(NON_FIELD_ERRORS);
                ApiError::invalid(field, &message)
            }
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl ApiError {
    pub fn not_found(entity: &str) -> Self {
        ApiError::NotFound(format!("{} not found", entity))
    }

    pub fn conflict(msg: &str) -> Self {
        ApiError::Conflict(msg.to_string())
    }

    /// A validation error carrying a single field message.
    pub fn invalid(field: &str, msg: &str) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), vec![msg.to_string()]);
        ApiError::ValidationError {
            message: format!("{}: {}", field, msg),
            fields,
        }
    }
}

/// Extracts `name` from serde's "missing field `name`" message.
fn missing_field_name(message: &str) -> Option<&str> {
    let rest = message.split("missing field `").nth(1)?;
    rest.split('`').next().filter(|name| !name.is_empty())
}

/// JSON extractor config that reports body errors through `ApiError`.
pub fn json_config(limit: usize) -> actix_web::web::JsonConfig {
    actix_web::web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req: &HttpRequest| ApiError::from(err).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_name() {
        assert_eq!(
            missing_field_name("missing field `user_email` at line 1 column 24"),
            Some("user_email")
        );
        assert_eq!(missing_field_name("invalid type: string \"x\", expected i64"), None);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::not_found("Patient").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::conflict("dup").status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::BadRequest("bad".to_string()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::invalid("patient", "does not exist").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_invalid_carries_field() {
        match ApiError::invalid("sku", "already taken") {
            ApiError::ValidationError { fields, message } => {
                assert_eq!(fields["sku"], vec!["already taken".to_string()]);
                assert_eq!(message, "sku: already taken");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_json_data_error_becomes_validation_error() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{}")
            .and_then(|v| {
                #[derive(serde::Deserialize, Debug)]
                #[allow(dead_code)]
                struct Body {
                    user_name: String,
                }
                serde_json::from_value::<Body>(v).map(|_| ())
            })
            .unwrap_err();
        let err = ApiError::from(JsonPayloadError::Deserialize(serde_err));
        match err {
            ApiError::ValidationError { fields, .. } => assert!(fields.contains_key("user_name")),
            other => panic!("unexpected error: {}", other),
        }
    }
}
