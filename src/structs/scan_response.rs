use serde::Serialize;

/// Binary outcome of a scan: a payload was found, or it was not.
/// There is deliberately no partial or best-guess state.
#[derive(Serialize)]
pub struct ScanResponse {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ScanResponse {
    pub fn found(text: String) -> Self {
        Self {
            found: true,
            text: Some(text),
            reason: None,
        }
    }

    pub fn not_found(reason: String) -> Self {
        Self {
            found: false,
            text: None,
            reason: Some(reason),
        }
    }
}
