use actix_web::web;

use crate::handlers::consent_handlers::{get_consent, set_consent};
use crate::handlers::health_handlers::health_check;
use crate::handlers::qr_handlers::{generate_qr, generate_qr_from_query};
use crate::handlers::scan_handlers::scan_qr;
use crate::handlers::url_handlers::{probe_url, validate_url};

/// Configure the routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/qr", web::post().to(generate_qr))
            .route("/qr", web::get().to(generate_qr_from_query))
            .route("/scan", web::post().to(scan_qr))
            .route("/validate", web::post().to(validate_url))
            .route("/validate/probe", web::post().to(probe_url))
            .route("/consent", web::get().to(get_consent))
            .route("/consent", web::post().to(set_consent))
            .route("/health/check", web::get().to(health_check)),
    );
}
