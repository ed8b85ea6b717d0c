// src/models/department.rs
use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::validation::not_blank;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Department {
    pub id: String,
    pub name: String,
    pub location: String,
}

#[derive(Debug, Deserialize, Validate, Clone)]
pub struct DepartmentRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    #[validate(custom(function = "not_blank"))]
    pub name: String,

    #[validate(length(max = 100, message = "Location cannot exceed 100 characters"))]
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PatchDepartmentRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 100, message = "Location cannot exceed 100 characters"))]
    pub location: Option<String>,
}

impl DepartmentRequest {
    pub fn merged(existing: Department, patch: PatchDepartmentRequest) -> Self {
        Self {
            name: patch.name.unwrap_or(existing.name),
            location: patch.location.unwrap_or(existing.location),
        }
    }
}
