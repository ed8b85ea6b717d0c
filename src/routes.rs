// src/routes.rs
//! Registers every resource once at startup.

use actix_web::{web, Scope};
use crate::handlers;
use crate::inventory_handlers;
use crate::repositories::{
    AppointmentRepository, CrudRepository, DepartmentRepository, DoctorRepository,
    InventoryRepository, MedicalRecordRepository, PatientRepository,
};
use crate::user_handlers;

/// Attaches `repo` to `scope` and mounts the collection and item routes.
fn crud_routes<R: CrudRepository>(scope: Scope, repo: R) -> Scope {
    scope
        .app_data(web::Data::new(repo))
        .service(
            web::resource("")
                .route(web::get().to(handlers::list::<R>))
                .route(web::post().to(handlers::create::<R>)),
        )
        .service(
            web::resource("/{id}")
                .route(web::get().to(handlers::get::<R>))
                .route(web::put().to(handlers::replace::<R>))
                .route(web::patch().to(handlers::partial_update::<R>))
                .route(web::delete().to(handlers::delete::<R>)),
        )
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(crud_routes(web::scope("/departments"), DepartmentRepository))
        .service(crud_routes(web::scope("/doctors"), DoctorRepository))
        .service(crud_routes(web::scope("/patients"), PatientRepository))
        .service(crud_routes(web::scope("/appointments"), AppointmentRepository))
        .service(crud_routes(web::scope("/records"), MedicalRecordRepository))
        .service(
            // Fixed paths first so they are not taken as item ids.
            crud_routes(
                web::scope("/inventory")
                    .service(
                        web::resource("/low-stock")
                            .route(web::get().to(inventory_handlers::low_stock)),
                    )
                    .service(
                        web::resource("/summary").route(web::get().to(inventory_handlers::summary)),
                    ),
                InventoryRepository,
            ),
        )
        .service(
            web::scope("/users")
                .service(web::resource("").route(web::get().to(user_handlers::list_users)))
                .service(web::resource("/{id}").route(web::get().to(user_handlers::get_user))),
        );
}
