use std::borrow::Cow;
use std::io::Cursor;

use image::buffer::ConvertBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ImageFormat, Luma, Rgba, RgbaImage, RgbImage};
use qrcode::QrCode;
use qrcode::render::svg;
use serde::{Deserialize, Serialize};

use crate::services::error::PipelineError;
use crate::utils::{color, filename};

/// Practical data ceiling of the rendered symbol. Longer payloads are
/// truncated and marked, not rejected.
pub const MAX_PAYLOAD_CHARS: usize = 2000;
pub const TRUNCATION_MARKER: &str = "...";

pub const MIN_MODULE_SIZE: u32 = 128;
pub const MAX_MODULE_SIZE: u32 = 400;
pub const DEFAULT_MODULE_SIZE: u32 = 256;
pub const DEFAULT_SCALE_FACTOR: u32 = 3;
pub const DEFAULT_JPEG_QUALITY: f32 = 0.95;
pub const DEFAULT_FG_COLOR: &str = "#000000";
pub const DEFAULT_BG_COLOR: &str = "#ffffff";

/// Largest raster side we will allocate.
const MAX_RASTER_PX: u32 = 8192;
/// Quiet zone rendered around the symbol: 4 modules on each side.
const QUIET_ZONE_MODULES: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    Svg,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Svg => "svg",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Svg => "image/svg+xml",
        }
    }
}

#[derive(Debug, Clone)]
pub struct EncodeOptions {
    pub payload: String,
    pub module_size: u32,
    pub fg_color: String,
    pub bg_color: String,
    pub format: OutputFormat,
    pub scale_factor: u32,
    pub quality: f32,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            payload: String::new(),
            module_size: DEFAULT_MODULE_SIZE,
            fg_color: String::from(DEFAULT_FG_COLOR),
            bg_color: String::from(DEFAULT_BG_COLOR),
            format: OutputFormat::default(),
            scale_factor: DEFAULT_SCALE_FACTOR,
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// One finished download: bytes, their MIME type, and a suggested name.
/// Built per request and handed straight back; never cached.
pub struct EncodeArtifact {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
}

/// Cap the payload at [`MAX_PAYLOAD_CHARS`], appending a visible marker
/// when anything was cut off.
pub fn truncate_payload(payload: &str) -> Cow<'_, str> {
    if payload.chars().count() <= MAX_PAYLOAD_CHARS {
        Cow::Borrowed(payload)
    } else {
        let mut truncated: String = payload.chars().take(MAX_PAYLOAD_CHARS).collect();
        truncated.push_str(TRUNCATION_MARKER);
        Cow::Owned(truncated)
    }
}

/// Vector stage: payload text to QR module matrix.
pub fn render(payload: &str) -> Result<QrCode, PipelineError> {
    Ok(QrCode::new(payload.as_bytes())?)
}

/// Raster stage: paint the symbol onto a `side_px` square canvas.
///
/// The canvas is filled with the background color before the symbol is
/// composited, so antialiased or transparent edges never bleed through.
/// Draw order is fixed and nothing here depends on the clock, which keeps
/// repeated encodes byte-for-byte identical.
pub fn rasterize(code: &QrCode, side_px: u32, fg: Rgba<u8>, bg: Rgba<u8>) -> RgbaImage {
    let modules = code.width() as u32 + QUIET_ZONE_MODULES;
    let module_px = (side_px / modules).max(1);
    let mut symbol = code
        .render::<Luma<u8>>()
        .quiet_zone(true)
        .module_dimensions(module_px, module_px)
        .build();

    // A dense symbol at one pixel per module can still exceed a small
    // canvas; snap it down without smoothing the module edges.
    if symbol.width() > side_px || symbol.height() > side_px {
        symbol = image::imageops::resize(&symbol, side_px, side_px, FilterType::Nearest);
    }

    let mut canvas = RgbaImage::from_pixel(side_px, side_px, bg);
    let dx = (side_px - symbol.width()) / 2;
    let dy = (side_px - symbol.height()) / 2;
    for (x, y, pixel) in symbol.enumerate_pixels() {
        if pixel.0[0] < 128 {
            canvas.put_pixel(dx + x, dy + y, fg);
        }
    }
    canvas
}

/// Run the whole encode pipeline: truncate, render, rasterize (unless the
/// caller asked for the vector markup itself), serialize.
pub fn encode(opts: &EncodeOptions) -> Result<EncodeArtifact, PipelineError> {
    if opts.payload.trim().is_empty() {
        return Err(PipelineError::Validation(String::from("URL is required")));
    }
    if !(MIN_MODULE_SIZE..=MAX_MODULE_SIZE).contains(&opts.module_size) {
        return Err(PipelineError::Validation(format!(
            "size must be between {} and {}",
            MIN_MODULE_SIZE, MAX_MODULE_SIZE
        )));
    }
    if opts.scale_factor == 0 {
        return Err(PipelineError::Validation(String::from(
            "scale_factor must be at least 1",
        )));
    }
    let fg = color::parse_hex(&opts.fg_color).ok_or_else(|| {
        PipelineError::Validation(format!("Invalid foreground color: {}", opts.fg_color))
    })?;
    let bg = color::parse_hex(&opts.bg_color).ok_or_else(|| {
        PipelineError::Validation(format!("Invalid background color: {}", opts.bg_color))
    })?;

    let payload = truncate_payload(&opts.payload);
    let code = render(&payload)?;

    let (bytes, content_type) = match opts.format {
        OutputFormat::Svg => (
            svg_markup(&code, opts.module_size, fg, bg).into_bytes(),
            OutputFormat::Svg.content_type(),
        ),
        OutputFormat::Png => {
            let bitmap = raster_canvas(&code, opts, fg, bg)?;
            (png_bytes(&bitmap)?, OutputFormat::Png.content_type())
        }
        OutputFormat::Jpeg => {
            let bitmap = raster_canvas(&code, opts, fg, bg)?;
            (
                jpeg_bytes(&bitmap, opts.quality)?,
                OutputFormat::Jpeg.content_type(),
            )
        }
    };

    Ok(EncodeArtifact {
        bytes,
        content_type,
        filename: filename::download_name(opts.format),
    })
}

fn raster_canvas(
    code: &QrCode,
    opts: &EncodeOptions,
    fg: Rgba<u8>,
    bg: Rgba<u8>,
) -> Result<RgbaImage, PipelineError> {
    let side_px = opts
        .module_size
        .checked_mul(opts.scale_factor)
        .filter(|side| *side <= MAX_RASTER_PX)
        .ok_or_else(|| {
            PipelineError::Validation(format!(
                "requested raster output exceeds {} pixels per side",
                MAX_RASTER_PX
            ))
        })?;
    Ok(rasterize(code, side_px, fg, bg))
}

/// The SVG path skips rasterization entirely and returns the markup.
fn svg_markup(code: &QrCode, min_side: u32, fg: Rgba<u8>, bg: Rgba<u8>) -> String {
    let dark = color::canonical_hex(fg);
    let light = color::canonical_hex(bg);
    code.render::<svg::Color>()
        .min_dimensions(min_side, min_side)
        .quiet_zone(true)
        .dark_color(svg::Color(&dark))
        .light_color(svg::Color(&light))
        .build()
}

fn png_bytes(bitmap: &RgbaImage) -> Result<Vec<u8>, PipelineError> {
    let mut bytes = Vec::new();
    bitmap
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| PipelineError::Unknown(format!("Could not create image file: {}", e)))?;
    Ok(bytes)
}

fn jpeg_bytes(bitmap: &RgbaImage, quality: f32) -> Result<Vec<u8>, PipelineError> {
    // JPEG has no alpha channel; flatten before encoding.
    let rgb: RgbImage = bitmap.convert();
    let steps = ((quality.clamp(0.0, 1.0) * 100.0).round() as u8).max(1);
    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut bytes), steps);
    rgb.write_with_encoder(encoder)
        .map_err(|e| PipelineError::Unknown(format!("Could not create image file: {}", e)))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(url: &str) -> EncodeOptions {
        EncodeOptions {
            payload: url.to_string(),
            ..EncodeOptions::default()
        }
    }

    #[test]
    fn truncates_long_payloads_with_a_marker() {
        let long = "a".repeat(2500);
        let truncated = truncate_payload(&long);
        assert_eq!(truncated.chars().count(), MAX_PAYLOAD_CHARS + 3);
        assert!(truncated.ends_with(TRUNCATION_MARKER));
        assert!(truncated.starts_with(&"a".repeat(MAX_PAYLOAD_CHARS)));
    }

    #[test]
    fn leaves_short_payloads_alone() {
        assert_eq!(truncate_payload("https://example.com"), "https://example.com");
        let exactly = "b".repeat(MAX_PAYLOAD_CHARS);
        assert_eq!(truncate_payload(&exactly), exactly.as_str());
    }

    #[test]
    fn encode_is_deterministic() {
        let opts = options("https://example.com");
        let first = encode(&opts).unwrap();
        let second = encode(&opts).unwrap();
        assert_eq!(first.bytes, second.bytes);
    }

    #[test]
    fn raster_matches_requested_dimensions() {
        let opts = EncodeOptions {
            module_size: 256,
            scale_factor: 2,
            ..options("https://example.com")
        };
        let artifact = encode(&opts).unwrap();
        assert_eq!(artifact.content_type, "image/png");
        let decoded = image::load_from_memory(&artifact.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (512, 512));
    }

    #[test]
    fn background_color_fills_the_canvas() {
        let opts = EncodeOptions {
            bg_color: String::from("#ff0000"),
            ..options("https://example.com")
        };
        let artifact = encode(&opts).unwrap();
        let decoded = image::load_from_memory(&artifact.bytes).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn jpeg_output_carries_jpeg_bytes() {
        let opts = EncodeOptions {
            format: OutputFormat::Jpeg,
            ..options("https://example.com")
        };
        let artifact = encode(&opts).unwrap();
        assert_eq!(artifact.content_type, "image/jpeg");
        assert_eq!(&artifact.bytes[..2], &[0xff, 0xd8]);
        assert!(artifact.filename.ends_with(".jpeg"));
    }

    #[test]
    fn svg_passes_vector_markup_through() {
        let opts = EncodeOptions {
            format: OutputFormat::Svg,
            fg_color: String::from("#123456"),
            ..options("https://example.com")
        };
        let artifact = encode(&opts).unwrap();
        let markup = String::from_utf8(artifact.bytes).unwrap();
        assert!(markup.contains("<svg"));
        assert!(markup.contains("#123456"));
        assert!(artifact.filename.ends_with(".svg"));
    }

    #[test]
    fn rejects_unknown_colors() {
        let opts = EncodeOptions {
            fg_color: String::from("#notahex"),
            ..options("https://example.com")
        };
        assert!(matches!(
            encode(&opts),
            Err(PipelineError::Validation(_))
        ));
    }

    #[test]
    fn empty_payload_is_rejected() {
        assert!(matches!(
            encode(&options("   ")),
            Err(PipelineError::Validation(_))
        ));
    }

    #[test]
    fn out_of_range_module_size_is_rejected() {
        let opts = EncodeOptions {
            module_size: 64,
            ..options("https://example.com")
        };
        assert!(matches!(
            encode(&opts),
            Err(PipelineError::Validation(_))
        ));
    }
}
