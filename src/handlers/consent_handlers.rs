use actix_web::{HttpResponse, Result, error, web};
use serde::Deserialize;

use crate::models::consent::Consent;
use crate::state::app_state::AppState;

#[derive(Deserialize)]
pub struct SetConsentRequest {
    pub consent: Consent,
}

pub async fn get_consent(app_state: web::Data<AppState>) -> HttpResponse {
    let value = app_state
        .consent
        .get()
        .map(Consent::as_str)
        .unwrap_or("unset");
    HttpResponse::Ok().json(serde_json::json!({ "consent": value }))
}

pub async fn set_consent(
    app_state: web::Data<AppState>,
    web::Json(req): web::Json<SetConsentRequest>,
) -> Result<HttpResponse> {
    app_state
        .consent
        .set(req.consent)
        .map_err(|e| error::ErrorInternalServerError(format!("Failed to store consent: {}", e)))?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "consent": req.consent.as_str() })))
}
