// src/handlers.rs
//! CRUD handlers shared by every resource. Each one is instantiated per
//! repository in `routes::configure`.

use actix_web::{web, HttpResponse};
use std::sync::Arc;
use crate::error::ApiResult;
use crate::repositories::CrudRepository;
use crate::AppState;

// ==================== READ ====================

pub async fn list<R: CrudRepository>(
    app_state: web::Data<Arc<AppState>>,
    repo: web::Data<R>,
) -> ApiResult<HttpResponse> {
    let rows = repo.fetch_all(&app_state.db_pool).await?;
    let views: Vec<R::View> = rows.into_iter().map(|row| repo.project(row)).collect();

    Ok(HttpResponse::Ok().json(views))
}

pub async fn get<R: CrudRepository>(
    app_state: web::Data<Arc<AppState>>,
    repo: web::Data<R>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let row = repo.fetch_existing(&app_state.db_pool, &id).await?;

    Ok(HttpResponse::Ok().json(repo.project(row)))
}

// ==================== WRITE ====================

pub async fn create<R: CrudRepository>(
    app_state: web::Data<Arc<AppState>>,
    repo: web::Data<R>,
    body: web::Json<R::Write>,
) -> ApiResult<HttpResponse> {
    let data = body.into_inner();
    let pool = &app_state.db_pool;

    repo.validate_write(pool, &data).await?;
    let id = repo.insert(pool, data).await?;
    let row = repo.fetch_existing(pool, &id).await?;

    Ok(HttpResponse::Created().json(repo.project(row)))
}

pub async fn replace<R: CrudRepository>(
    app_state: web::Data<Arc<AppState>>,
    repo: web::Data<R>,
    path: web::Path<String>,
    body: web::Json<R::Write>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let data = body.into_inner();
    let pool = &app_state.db_pool;

    repo.fetch_existing(pool, &id).await?;
    repo.validate_write(pool, &data).await?;
    repo.replace(pool, &id, data).await?;
    let row = repo.fetch_existing(pool, &id).await?;

    Ok(HttpResponse::Ok().json(repo.project(row)))
}

/// Overlays the supplied fields on the stored row, then validates and writes
/// the result exactly like a full replacement.
pub async fn partial_update<R: CrudRepository>(
    app_state: web::Data<Arc<AppState>>,
    repo: web::Data<R>,
    path: web::Path<String>,
    body: web::Json<R::Patch>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let pool = &app_state.db_pool;

    let existing = repo.fetch_existing(pool, &id).await?;
    let data = repo.merge(existing, body.into_inner());

    repo.validate_write(pool, &data).await?;
    repo.replace(pool, &id, data).await?;
    let row = repo.fetch_existing(pool, &id).await?;

    Ok(HttpResponse::Ok().json(repo.project(row)))
}

pub async fn delete<R: CrudRepository>(
    app_state: web::Data<Arc<AppState>>,
    repo: web::Data<R>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    repo.delete(&app_state.db_pool, &id).await?;

    log::info!("{} deleted: {}", repo.label(), id);
    Ok(HttpResponse::NoContent().finish())
}
