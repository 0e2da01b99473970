use actix_web::{HttpResponse, Responder, Result, web};

use crate::services::url_checker::{self, DEFAULT_PROBE_TIMEOUT_MS};
use crate::state::app_state::AppState;
use crate::structs::url_request::{ProbeUrlRequest, ValidateUrlRequest};

/// Syntactic URL check, advisory to the user before they generate a code.
pub async fn validate_url(
    web::Json(req): web::Json<ValidateUrlRequest>,
) -> Result<impl Responder> {
    Ok(HttpResponse::Ok().json(url_checker::validate_url(&req.url)))
}

/// Syntactic check plus a best-effort reachability probe.
///
/// Never blocks generation and never hangs: the probe is bounded by the
/// requested timeout and falls back to the syntactic verdict when the
/// network gives no answer.
pub async fn probe_url(
    app_state: web::Data<AppState>,
    web::Json(req): web::Json<ProbeUrlRequest>,
) -> Result<impl Responder> {
    let timeout_ms = req.timeout_ms.unwrap_or(DEFAULT_PROBE_TIMEOUT_MS);
    let outcome =
        url_checker::check_reachable(&app_state.probe_client, &req.url, timeout_ms).await;
    Ok(HttpResponse::Ok().json(outcome))
}
