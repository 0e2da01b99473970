use crate::services::error::PipelineError;

/// Decode pipeline: image bytes in, payload text out.
///
/// Symbol recognition (finder patterns, perspective correction,
/// format/version decoding, Reed-Solomon) is delegated to `rqrr`; this
/// function only owns loading the pixels and the one-symbol rule.
pub fn decode(image_bytes: &[u8]) -> Result<String, PipelineError> {
    if image_bytes.is_empty() {
        return Err(PipelineError::ResourceUnavailable(String::from(
            "Uploaded image is empty",
        )));
    }

    let loaded = image::load_from_memory(image_bytes).map_err(|e| {
        PipelineError::ResourceUnavailable(format!("Could not read image: {}", e))
    })?;

    let luma = loaded.to_luma8();
    let (width, height) = luma.dimensions();
    let mut prepared =
        rqrr::PreparedImage::prepare_from_greyscale(width as usize, height as usize, |x, y| {
            luma.get_pixel(x as u32, y as u32).0[0]
        });
    let grids = prepared.detect_grids();

    match grids.len() {
        0 => Err(PipelineError::NotFound(String::from(
            "No QR code found in image",
        ))),
        1 => {
            let (_meta, text) = grids[0].decode().map_err(|e| {
                PipelineError::NotFound(format!("QR code could not be decoded: {}", e))
            })?;
            Ok(text)
        }
        n => Err(PipelineError::NotFound(format!(
            "Expected a single QR code, found {}",
            n
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::encoder::{self, EncodeOptions};

    fn encoded_png(url: &str) -> Vec<u8> {
        let opts = EncodeOptions {
            payload: url.to_string(),
            module_size: 256,
            scale_factor: 2,
            ..EncodeOptions::default()
        };
        encoder::encode(&opts).unwrap().bytes
    }

    #[test]
    fn round_trips_encoder_output() {
        let bytes = encoded_png("https://example.com");
        assert_eq!(decode(&bytes).unwrap(), "https://example.com");
    }

    #[test]
    fn round_trips_custom_colors() {
        let opts = EncodeOptions {
            payload: String::from("https://example.com/some/long/path?q=1"),
            fg_color: String::from("#1a1a2e"),
            bg_color: String::from("#f5f5f5"),
            module_size: 256,
            scale_factor: 2,
            ..EncodeOptions::default()
        };
        let artifact = encoder::encode(&opts).unwrap();
        assert_eq!(
            decode(&artifact.bytes).unwrap(),
            "https://example.com/some/long/path?q=1"
        );
    }

    #[test]
    fn blank_image_has_no_symbol() {
        let blank = image::RgbaImage::from_pixel(256, 256, image::Rgba([255, 255, 255, 255]));
        let mut bytes = Vec::new();
        blank
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .unwrap();
        assert!(matches!(decode(&bytes), Err(PipelineError::NotFound(_))));
    }

    #[test]
    fn unreadable_bytes_fail_to_load() {
        assert!(matches!(
            decode(b"definitely not an image"),
            Err(PipelineError::ResourceUnavailable(_))
        ));
    }

    #[test]
    fn empty_upload_fails_to_load() {
        assert!(matches!(
            decode(&[]),
            Err(PipelineError::ResourceUnavailable(_))
        ));
    }
}
