use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, Result, error, web};
use futures_util::StreamExt;

use crate::services::decoder;
use crate::services::error::PipelineError;
use crate::state::app_state::AppState;
use crate::structs::scan_response::ScanResponse;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Scan an uploaded image for a QR code.
///
/// The body is the raw image; anything that is not declared `image/*` is
/// rejected before a byte is read. A well-formed upload always gets a
/// found/not-found answer, never a partial decode.
pub async fn scan_qr(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    mut payload: web::Payload,
) -> Result<impl Responder> {
    if !req.content_type().starts_with("image/") {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Please select an image file"
        })));
    }

    // One scan at a time; the permit releases on every exit path.
    let _permit = match app_state.scan_gate.try_acquire() {
        Some(permit) => permit,
        None => {
            log::warn!("rejected concurrent {} request", app_state.scan_gate.name());
            return Ok(HttpResponse::Conflict().json(serde_json::json!({
                "error": "A scan is already in progress"
            })));
        }
    };

    let mut bytes = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(error::ErrorBadRequest)?;
        if bytes.len() + chunk.len() > MAX_UPLOAD_BYTES {
            return Ok(HttpResponse::PayloadTooLarge().json(serde_json::json!({
                "error": "Image is too large to scan (max 10 MiB)"
            })));
        }
        bytes.extend_from_slice(&chunk);
    }

    match decoder::decode(&bytes) {
        Ok(text) => Ok(HttpResponse::Ok().json(ScanResponse::found(text))),
        Err(e @ (PipelineError::NotFound(_) | PipelineError::ResourceUnavailable(_))) => {
            Ok(HttpResponse::Ok().json(ScanResponse::not_found(e.to_string())))
        }
        Err(e) => Ok(HttpResponse::build(e.status_code()).json(serde_json::json!({
            "error": e.to_string()
        }))),
    }
}
