// src/repositories/inventory.rs
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    InventoryItem, InventoryItemRequest, InventoryItemResponse, InventorySummary,
    PatchInventoryItemRequest,
};
use super::{ensure_unique, new_id, CrudRepository};

pub struct InventoryRepository;

impl InventoryRepository {
    async fn ensure_sku_free(
        pool: &SqlitePool,
        sku: &str,
        exclude_id: Option<&str>,
    ) -> ApiResult<()> {
        ensure_unique(
            pool,
            "inventory_items",
            "sku",
            sku,
            exclude_id,
            &format!("Inventory item with SKU '{}' already exists", sku),
        )
        .await
    }

    /// Items at or below their reorder threshold, in default order.
    pub async fn low_stock_items(&self, pool: &SqlitePool) -> ApiResult<Vec<InventoryItem>> {
        let items = self.fetch_all(pool).await?;
        Ok(items.into_iter().filter(InventoryItem::needs_reorder).collect())
    }

    pub async fn summary(&self, pool: &SqlitePool) -> ApiResult<InventorySummary> {
        let summary = sqlx::query_as::<_, InventorySummary>(
            r#"SELECT COUNT(*) AS total_medicines,
                      COALESCE(SUM(stock), 0) AS total_units
               FROM inventory_items"#,
        )
        .fetch_one(pool)
        .await?;
        Ok(summary)
    }
}

#[async_trait]
impl CrudRepository for InventoryRepository {
    type Row = InventoryItem;
    type View = InventoryItemResponse;
    type Write = InventoryItemRequest;
    type Patch = PatchInventoryItemRequest;

    fn label(&self) -> &'static str {
        "Inventory item"
    }

    fn table_name(&self) -> &'static str {
        "inventory_items"
    }

    async fn insert(&self, pool: &SqlitePool, data: InventoryItemRequest) -> ApiResult<String> {
        let sku = data.sku.trim().to_string();
        Self::ensure_sku_free(pool, &sku, None).await?;

        let id = new_id();
        let now = Utc::now();

        sqlx::query(
            r#"INSERT INTO inventory_items (id, sku, name, category, uses, stock, min_stock, unit,
                                            expiry_date, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(&sku)
        .bind(data.name.trim())
        .bind(data.category.clone().unwrap_or_default())
        .bind(data.uses.clone().unwrap_or_default())
        .bind(data.stock.unwrap_or(0))
        .bind(data.min_stock.unwrap_or(0))
        .bind(data.unit.clone().unwrap_or_default())
        .bind(data.expiry_date)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        log::info!("Inventory item created: {} ({})", sku, id);
        Ok(id)
    }

    async fn replace(
        &self,
        pool: &SqlitePool,
        id: &str,
        data: InventoryItemRequest,
    ) -> ApiResult<()> {
        let sku = data.sku.trim().to_string();
        Self::ensure_sku_free(pool, &sku, Some(id)).await?;

        let result = sqlx::query(
            r#"UPDATE inventory_items SET sku = ?, name = ?, category = ?, uses = ?, stock = ?,
                                          min_stock = ?, unit = ?, expiry_date = ?, updated_at = ?
               WHERE id = ?"#,
        )
        .bind(&sku)
        .bind(data.name.trim())
        .bind(data.category.clone().unwrap_or_default())
        .bind(data.uses.clone().unwrap_or_default())
        .bind(data.stock.unwrap_or(0))
        .bind(data.min_stock.unwrap_or(0))
        .bind(data.unit.clone().unwrap_or_default())
        .bind(data.expiry_date)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found(self.label()));
        }

        log::info!("Inventory item updated: {} (stock {})", sku, data.stock.unwrap_or(0));
        Ok(())
    }

    fn merge(
        &self,
        existing: InventoryItem,
        patch: PatchInventoryItemRequest,
    ) -> InventoryItemRequest {
        InventoryItemRequest::merged(existing, patch)
    }

    fn project(&self, row: InventoryItem) -> InventoryItemResponse {
        InventoryItemResponse::from(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory_pool;

    fn request(sku: &str, stock: i64, min_stock: i64) -> InventoryItemRequest {
        InventoryItemRequest {
            sku: sku.to_string(),
            name: format!("Medicine {}", sku),
            category: None,
            uses: None,
            stock: Some(stock),
            min_stock: Some(min_stock),
            unit: Some("tablets".to_string()),
            expiry_date: None,
        }
    }

    #[actix_rt::test]
    async fn test_low_stock_items() {
        let pool = memory_pool().await;
        let repo = InventoryRepository;
        repo.insert(&pool, request("A", 40, 50)).await.unwrap();
        repo.insert(&pool, request("B", 450, 200)).await.unwrap();

        let low: Vec<String> = repo.low_stock_items(&pool).await.unwrap()
            .into_iter().map(|i| i.sku).collect();
        assert_eq!(low, vec!["A"]);
    }

    #[actix_rt::test]
    async fn test_summary_empty_and_filled() {
        let pool = memory_pool().await;
        let repo = InventoryRepository;
        assert_eq!(
            repo.summary(&pool).await.unwrap(),
            InventorySummary { total_medicines: 0, total_units: 0 }
        );

        repo.insert(&pool, request("A", 40, 50)).await.unwrap();
        repo.insert(&pool, request("B", 450, 200)).await.unwrap();
        assert_eq!(
            repo.summary(&pool).await.unwrap(),
            InventorySummary { total_medicines: 2, total_units: 490 }
        );
    }

    #[actix_rt::test]
    async fn test_duplicate_sku_conflicts() {
        let pool = memory_pool().await;
        let repo = InventoryRepository;
        repo.insert(&pool, request("M001", 10, 5)).await.unwrap();
        let err = repo.insert(&pool, request(" M001 ", 1, 1)).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }
}
