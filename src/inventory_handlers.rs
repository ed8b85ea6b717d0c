// src/inventory_handlers.rs
use actix_web::{web, HttpResponse};
use std::sync::Arc;
use crate::error::ApiResult;
use crate::models::InventoryItemResponse;
use crate::repositories::InventoryRepository;
use crate::AppState;

pub async fn low_stock(
    app_state: web::Data<Arc<AppState>>,
    repo: web::Data<InventoryRepository>,
) -> ApiResult<HttpResponse> {
    let items: Vec<InventoryItemResponse> = repo
        .low_stock_items(&app_state.db_pool)
        .await?
        .into_iter()
        .map(InventoryItemResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(items))
}

pub async fn summary(
    app_state: web::Data<Arc<AppState>>,
    repo: web::Data<InventoryRepository>,
) -> ApiResult<HttpResponse> {
    let summary = repo.summary(&app_state.db_pool).await?;
    Ok(HttpResponse::Ok().json(summary))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{json, Value};
    use crate::test_support::{app_state, test_app};

    #[actix_rt::test]
    async fn test_low_stock_and_summary() {
        let state = app_state().await;
        let app = test_app!(state);

        let req = test::TestRequest::get().uri("/inventory/summary/").to_request();
        let empty: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(empty, json!({"total_medicines": 0, "total_units": 0}));

        for (sku, stock, min_stock) in [("A", 40, 50), ("B", 450, 200)] {
            let req = test::TestRequest::post()
                .uri("/inventory/")
                .set_json(json!({"sku": sku, "name": sku, "stock": stock, "min_stock": min_stock}))
                .to_request();
            test::call_service(&app, req).await;
        }

        let req = test::TestRequest::get().uri("/inventory/low-stock/").to_request();
        let low: Value = test::call_and_read_body_json(&app, req).await;
        let low = low.as_array().unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0]["sku"], "A");
        assert_eq!(low[0]["needs_reorder"], true);

        let req = test::TestRequest::get().uri("/inventory/summary").to_request();
        let summary: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(summary, json!({"total_medicines": 2, "total_units": 490}));
    }

    #[actix_rt::test]
    async fn test_fixed_paths_are_read_only() {
        let state = app_state().await;
        let app = test_app!(state);

        for uri in ["/inventory/low-stock", "/inventory/summary"] {
            let req = test::TestRequest::post().uri(uri).set_json(json!({})).to_request();
            let status = test::call_service(&app, req).await.status();
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{}", uri);

            let req = test::TestRequest::delete().uri(uri).to_request();
            let status = test::call_service(&app, req).await.status();
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{}", uri);
        }
    }
}
