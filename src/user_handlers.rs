// src/user_handlers.rs
use actix_web::{web, HttpResponse};
use std::sync::Arc;
use crate::error::ApiResult;
use crate::repositories::users;
use crate::AppState;

pub async fn list_users(app_state: web::Data<Arc<AppState>>) -> ApiResult<HttpResponse> {
    let users = users::list_users(&app_state.db_pool).await?;
    Ok(HttpResponse::Ok().json(users))
}

pub async fn get_user(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user = users::get_user(&app_state.db_pool, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{json, Value};
    use crate::test_support::{app_state, test_app};

    #[actix_rt::test]
    async fn test_doctor_account_is_listed() {
        let state = app_state().await;
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/doctors/")
            .set_json(json!({"user_name": "Amina Hassan", "user_email": "amina.h@hospital.com"}))
            .to_request();
        let doctor: Value = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::get().uri("/users/").to_request();
        let users: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(users.as_array().unwrap().len(), 1);
        assert_eq!(users[0]["username"], "amina.h@hospital.com");
        assert_eq!(users[0]["role"], "doctor");

        let req = test::TestRequest::get()
            .uri(&format!("/users/{}", doctor["user"].as_str().unwrap()))
            .to_request();
        let user: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(user["first_name"], "Amina");
        assert_eq!(user["last_name"], "Hassan");

        let req = test::TestRequest::get().uri("/users/unknown").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::post().uri("/users/").set_json(json!({})).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::METHOD_NOT_ALLOWED);

        let req = test::TestRequest::delete()
            .uri(&format!("/users/{}", doctor["user"].as_str().unwrap()))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
