// src/models/inventory.rs
use serde::{Deserialize, Serialize};
use validator::Validate;
use chrono::{DateTime, NaiveDate, Utc};
use crate::models::wire::nullable;
use crate::projection;
use crate::validation::not_blank;

// ==================== INVENTORY ITEM ====================

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct InventoryItem {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub uses: String,
    pub stock: i64,
    pub min_stock: i64,
    pub unit: String,
    pub expiry_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    pub fn needs_reorder(&self) -> bool {
        projection::needs_reorder(self.stock, self.min_stock)
    }
}

#[derive(Debug, Serialize)]
pub struct InventoryItemResponse {
    #[serde(flatten)]
    pub item: InventoryItem,
    pub needs_reorder: bool,
}

impl From<InventoryItem> for InventoryItemResponse {
    fn from(item: InventoryItem) -> Self {
        let needs_reorder = item.needs_reorder();
        Self { item, needs_reorder }
    }
}

#[derive(Debug, Serialize, sqlx::FromRow, PartialEq, Eq)]
pub struct InventorySummary {
    pub total_medicines: i64,
    pub total_units: i64,
}

#[derive(Debug, Deserialize, Validate, Clone)]
pub struct InventoryItemRequest {
    #[validate(length(min = 1, max = 50, message = "SKU must be between 1 and 50 characters"))]
    #[validate(custom(function = "not_blank"))]
    pub sku: String,

    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    #[validate(custom(function = "not_blank"))]
    pub name: String,

    #[validate(length(max = 100, message = "Category cannot exceed 100 characters"))]
    pub category: Option<String>,

    #[validate(length(max = 1000, message = "Uses cannot exceed 1000 characters"))]
    pub uses: Option<String>,

    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: Option<i64>,

    #[validate(range(min = 0, message = "Minimum stock cannot be negative"))]
    pub min_stock: Option<i64>,

    #[validate(length(max = 50, message = "Unit cannot exceed 50 characters"))]
    pub unit: Option<String>,

    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PatchInventoryItemRequest {
    #[validate(length(min = 1, max = 50, message = "SKU must be between 1 and 50 characters"))]
    pub sku: Option<String>,

    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 100, message = "Category cannot exceed 100 characters"))]
    pub category: Option<String>,

    #[validate(length(max = 1000, message = "Uses cannot exceed 1000 characters"))]
    pub uses: Option<String>,

    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: Option<i64>,

    #[validate(range(min = 0, message = "Minimum stock cannot be negative"))]
    pub min_stock: Option<i64>,

    #[validate(length(max = 50, message = "Unit cannot exceed 50 characters"))]
    pub unit: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub expiry_date: Option<Option<NaiveDate>>,
}

impl InventoryItemRequest {
    pub fn merged(existing: InventoryItem, patch: PatchInventoryItemRequest) -> Self {
        Self {
            sku: patch.sku.unwrap_or(existing.sku),
            name: patch.name.unwrap_or(existing.name),
            category: Some(patch.category.unwrap_or(existing.category)),
            uses: Some(patch.uses.unwrap_or(existing.uses)),
            stock: Some(patch.stock.unwrap_or(existing.stock)),
            min_stock: Some(patch.min_stock.unwrap_or(existing.min_stock)),
            unit: Some(patch.unit.unwrap_or(existing.unit)),
            expiry_date: patch.expiry_date.unwrap_or(existing.expiry_date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(stock: i64, min_stock: i64) -> InventoryItem {
        InventoryItem {
            id: "i1".to_string(),
            sku: "M010".to_string(),
            name: "ORS Sachets".to_string(),
            category: "Oral Rehydration".to_string(),
            uses: "Treat dehydration and diarrhea".to_string(),
            stock,
            min_stock,
            unit: "sachets".to_string(),
            expiry_date: NaiveDate::from_ymd_opt(2024, 10, 1),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_needs_reorder_flag() {
        assert!(item(40, 50).needs_reorder());
        assert!(item(50, 50).needs_reorder());
        assert!(!item(51, 50).needs_reorder());
    }

    #[test]
    fn test_response_serializes_flag() {
        let json = serde_json::to_value(InventoryItemResponse::from(item(40, 50))).unwrap();
        assert_eq!(json["needs_reorder"], true);
        assert_eq!(json["sku"], "M010");
        assert_eq!(json["expiry_date"], "2024-10-01");
    }

    #[test]
    fn test_negative_stock_rejected() {
        let request: InventoryItemRequest =
            serde_json::from_str(r#"{"sku": "M001", "name": "Paracetamol", "stock": -5}"#).unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("stock"));
    }

    #[test]
    fn test_merged_stock_change_flips_flag() {
        let patch: PatchInventoryItemRequest = serde_json::from_str(r#"{"stock": 10}"#).unwrap();
        let merged = InventoryItemRequest::merged(item(450, 200), patch);
        assert_eq!(merged.stock, Some(10));
        assert_eq!(merged.sku, "M010");
        assert!(projection::needs_reorder(merged.stock.unwrap(), merged.min_stock.unwrap()));
    }
}
