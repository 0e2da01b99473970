use actix_web::{HttpResponse, Responder, Result, web};
use validator::Validate;

use crate::services::encoder;
use crate::state::app_state::AppState;
use crate::structs::qr_request::CreateQrRequest;

/// Generate a QR code for a URL and hand it back as a download.
pub async fn generate_qr(
    app_state: web::Data<AppState>,
    web::Json(req): web::Json<CreateQrRequest>,
) -> Result<impl Responder> {
    Ok(respond_with_qr(&app_state, &req))
}

/// Query-string variant, so a prefilled link can fetch a code directly.
pub async fn generate_qr_from_query(
    app_state: web::Data<AppState>,
    query: web::Query<CreateQrRequest>,
) -> Result<impl Responder> {
    Ok(respond_with_qr(&app_state, &query))
}

fn respond_with_qr(app_state: &AppState, req: &CreateQrRequest) -> HttpResponse {
    if req.url.trim().is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "URL is required"
        }));
    }
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    // One encode at a time; the permit releases on every exit path.
    let _permit = match app_state.encode_gate.try_acquire() {
        Some(permit) => permit,
        None => {
            log::warn!("rejected concurrent {} request", app_state.encode_gate.name());
            return HttpResponse::Conflict().json(serde_json::json!({
                "error": "A download is already in progress"
            }));
        }
    };

    match encoder::encode(&req.to_options()) {
        Ok(artifact) => HttpResponse::Ok()
            .content_type(artifact.content_type)
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", artifact.filename),
            ))
            .body(artifact.bytes),
        Err(e) => HttpResponse::build(e.status_code()).json(serde_json::json!({
            "error": e.to_string()
        })),
    }
}
