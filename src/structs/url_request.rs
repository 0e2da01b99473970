use serde::Deserialize;

#[derive(Deserialize)]
pub struct ValidateUrlRequest {
    pub url: String,
}

#[derive(Deserialize)]
pub struct ProbeUrlRequest {
    pub url: String,
    pub timeout_ms: Option<u64>,
}
