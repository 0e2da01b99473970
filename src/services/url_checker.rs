use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::services::error::PipelineError;

/// Ceiling shared with the encoder's truncation policy.
pub const MAX_URL_CHARS: usize = 2000;
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 5_000;
pub const MAX_PROBE_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
}

impl ValidationOutcome {
    fn invalid(message: &str) -> Self {
        Self {
            is_valid: false,
            message: message.to_string(),
            http_status: None,
        }
    }

    fn valid(message: &str) -> Self {
        Self {
            is_valid: true,
            message: message.to_string(),
            http_status: None,
        }
    }
}

/// Syntactic check only: absolute http(s) URL, within the QR data ceiling.
pub fn validate_url(raw: &str) -> ValidationOutcome {
    if raw.trim().is_empty() {
        return ValidationOutcome::invalid("URL is required");
    }
    if raw.chars().count() > MAX_URL_CHARS {
        return ValidationOutcome::invalid("URL is too long for QR code (max 2000 characters)");
    }
    if !raw.starts_with("http://") && !raw.starts_with("https://") {
        return ValidationOutcome::invalid("URL must include http:// or https://");
    }
    match Url::parse(raw) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
            ValidationOutcome::valid("Valid URL")
        }
        _ => ValidationOutcome::invalid("Invalid URL format"),
    }
}

/// Best-effort reachability probe, advisory only.
///
/// On success the observed status is reported. On timeout or any
/// network-layer failure the outcome falls back to the syntactic verdict:
/// a well-formed URL is never reported broken just because the probe was
/// blocked, since a blocked probe and an unreachable host look the same
/// from here.
pub async fn check_reachable(
    client: &reqwest::Client,
    raw: &str,
    timeout_ms: u64,
) -> ValidationOutcome {
    let syntactic = validate_url(raw);
    if !syntactic.is_valid {
        return syntactic;
    }

    let bound = Duration::from_millis(timeout_ms.clamp(1, MAX_PROBE_TIMEOUT_MS));
    match probe(client, raw, bound).await {
        Ok(status) => ValidationOutcome {
            is_valid: true,
            message: String::from("URL is valid and accessible. QR code will work correctly."),
            http_status: Some(status),
        },
        Err(PipelineError::Timeout(ms)) => {
            log::debug!("reachability probe for {} timed out after {} ms", raw, ms);
            ValidationOutcome::valid(
                "URL format is valid. Reachability could not be verified within the timeout.",
            )
        }
        Err(e) => {
            log::debug!("reachability probe for {} failed: {}", raw, e);
            ValidationOutcome::valid(
                "URL format is valid. QR code should work (unable to verify accessibility).",
            )
        }
    }
}

/// One HEAD request against the target, bounded by `bound`.
async fn probe(
    client: &reqwest::Client,
    url: &str,
    bound: Duration,
) -> Result<u16, PipelineError> {
    let response = client.head(url).timeout(bound).send().await.map_err(|e| {
        if e.is_timeout() {
            PipelineError::Timeout(bound.as_millis() as u64)
        } else {
            PipelineError::Unknown(format!("probe failed: {}", e))
        }
    })?;
    Ok(response.status().as_u16())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_http_urls() {
        for url in [
            "https://example.com",
            "http://example.com/path?query=1#frag",
            "https://sub.domain.example.co.uk:8443/deep/path",
        ] {
            let outcome = validate_url(url);
            assert!(outcome.is_valid, "{} should be valid", url);
            assert_eq!(outcome.message, "Valid URL");
        }
    }

    #[test]
    fn empty_input_is_required() {
        assert_eq!(validate_url("").message, "URL is required");
        assert_eq!(validate_url("   ").message, "URL is required");
    }

    #[test]
    fn missing_scheme_gets_a_specific_message() {
        let outcome = validate_url("example.com");
        assert!(!outcome.is_valid);
        assert_eq!(outcome.message, "URL must include http:// or https://");
        assert!(!validate_url("ftp://example.com").is_valid);
    }

    #[test]
    fn unparseable_url_is_invalid() {
        let outcome = validate_url("http://");
        assert!(!outcome.is_valid);
        assert_eq!(outcome.message, "Invalid URL format");
    }

    #[test]
    fn over_long_url_is_invalid() {
        let long = format!("https://example.com/{}", "a".repeat(2000));
        let outcome = validate_url(&long);
        assert!(!outcome.is_valid);
        assert_eq!(
            outcome.message,
            "URL is too long for QR code (max 2000 characters)"
        );
    }

    #[actix_web::test]
    async fn probe_short_circuits_on_invalid_url() {
        let client = reqwest::Client::new();
        let outcome = check_reachable(&client, "not a url", 100).await;
        assert!(!outcome.is_valid);
        assert!(outcome.http_status.is_none());
    }

    #[actix_web::test]
    async fn probe_falls_back_instead_of_hanging() {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        // Discard port on loopback: refused or filtered, never serving.
        let outcome = check_reachable(&client, "http://127.0.0.1:9", 2_000).await;
        assert!(outcome.is_valid);
        assert!(outcome.message.starts_with("URL format is valid"));
    }
}
