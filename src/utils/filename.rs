use crate::services::encoder::OutputFormat;

/// Suggested download name: `qr-code-<unix-epoch-ms>.<ext>`.
///
/// The timestamp keeps repeated downloads in one session from colliding;
/// it lives only in the name, never inside the image bytes.
pub fn download_name(format: OutputFormat) -> String {
    format!(
        "qr-code-{}.{}",
        chrono::Utc::now().timestamp_millis(),
        format.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_a_millisecond_timestamp() {
        let name = download_name(OutputFormat::Png);
        let stamp = name
            .strip_prefix("qr-code-")
            .and_then(|rest| rest.strip_suffix(".png"))
            .expect("name should be qr-code-<ms>.png");
        assert!(stamp.parse::<i64>().unwrap() > 0);
    }

    #[test]
    fn extension_follows_format() {
        assert!(download_name(OutputFormat::Jpeg).ends_with(".jpeg"));
        assert!(download_name(OutputFormat::Svg).ends_with(".svg"));
    }
}
