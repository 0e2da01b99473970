use actix_web::http::StatusCode;
use qrcode::types::QrError;
use thiserror::Error;

/// Failure taxonomy shared by both pipelines and the URL checker.
///
/// Every variant is recovered at the handler boundary and turned into a
/// JSON body; nothing here is allowed to crash a request.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    ResourceUnavailable(String),
    #[error("{0}")]
    NotFound(String),
    #[error("timed out after {0} ms")]
    Timeout(u64),
    #[error("{0}")]
    Unknown(String),
}

impl PipelineError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PipelineError::Validation(_) => StatusCode::BAD_REQUEST,
            PipelineError::ResourceUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PipelineError::NotFound(_) => StatusCode::NOT_FOUND,
            PipelineError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            PipelineError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<QrError> for PipelineError {
    fn from(e: QrError) -> Self {
        match e {
            QrError::DataTooLong => {
                PipelineError::Validation(String::from("URL is too long to fit in a QR code"))
            }
            other => PipelineError::Unknown(format!("QR code generation error: {:?}", other)),
        }
    }
}
