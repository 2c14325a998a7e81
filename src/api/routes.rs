// API routes configuration
// Author: Gabriel Demetrios Lafis

use actix_web::{web, HttpResponse, Responder};

use super::handlers;

/// Configure API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            // Health check
            .route("/health", web::get().to(health_check))

            // Listings
            .route("/patients", web::get().to(handlers::list_patients))
            .route("/patients/{id}", web::get().to(handlers::get_patient))
            .route("/specialists", web::get().to(handlers::list_specialists))
            .route("/specialists/{id}", web::get().to(handlers::get_specialist))
            .route("/appointments", web::get().to(handlers::list_appointments))
            .route("/lifeguards", web::get().to(handlers::list_lifeguards))
            .route("/lifeguards/{id}", web::get().to(handlers::get_lifeguard))

            // Analytics
            .service(
                web::scope("/analytics")
                    .route("/patients", web::get().to(handlers::patient_analytics))
                    .route("/patients-graph", web::get().to(handlers::patient_graph))
                    .route("/appointments", web::get().to(handlers::appointment_analytics))
                    .route("/appointments-graph", web::get().to(handlers::appointment_graph))
            )

            // Dashboard
            .service(
                web::scope("/dashboard")
                    .route("/specialists", web::get().to(handlers::specialist_dashboard))
                    .route("/patients", web::get().to(handlers::patient_dashboard))
            )

            // Settings
            .service(
                web::resource("/settings")
                    .route(web::get().to(handlers::get_settings))
                    .route(web::post().to(handlers::create_settings))
                    .route(web::patch().to(handlers::update_settings))
            )
    );
}

/// Health check handler
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
