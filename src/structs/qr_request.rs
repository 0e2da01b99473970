use serde::Deserialize;
use validator::Validate;

use crate::services::encoder::{
    DEFAULT_BG_COLOR, DEFAULT_FG_COLOR, DEFAULT_JPEG_QUALITY, DEFAULT_MODULE_SIZE,
    DEFAULT_SCALE_FACTOR, EncodeOptions, OutputFormat,
};

/// Body of `POST /api/qr`, also accepted as `GET /api/qr` query params.
#[derive(Deserialize, Validate)]
pub struct CreateQrRequest {
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,
    #[validate(range(min = 128, max = 400, message = "size must be between 128 and 400"))]
    pub size: Option<u32>,
    pub fg_color: Option<String>,
    pub bg_color: Option<String>,
    pub format: Option<OutputFormat>,
    #[validate(range(min = 1, max = 8, message = "scale_factor must be between 1 and 8"))]
    pub scale_factor: Option<u32>,
    #[validate(range(min = 0.0, max = 1.0, message = "quality must be between 0.0 and 1.0"))]
    pub quality: Option<f32>,
}

impl CreateQrRequest {
    pub fn to_options(&self) -> EncodeOptions {
        EncodeOptions {
            payload: self.url.clone(),
            module_size: self.size.unwrap_or(DEFAULT_MODULE_SIZE),
            fg_color: self
                .fg_color
                .clone()
                .unwrap_or_else(|| String::from(DEFAULT_FG_COLOR)),
            bg_color: self
                .bg_color
                .clone()
                .unwrap_or_else(|| String::from(DEFAULT_BG_COLOR)),
            format: self.format.unwrap_or_default(),
            scale_factor: self.scale_factor.unwrap_or(DEFAULT_SCALE_FACTOR),
            quality: self.quality.unwrap_or(DEFAULT_JPEG_QUALITY),
        }
    }
}
