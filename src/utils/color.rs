use image::Rgba;

/// Parse a `#rgb` or `#rrggbb` hex color, with or without the leading `#`.
pub fn parse_hex(raw: &str) -> Option<Rgba<u8>> {
    let hex = raw.trim().strip_prefix('#').unwrap_or(raw.trim());

    let (r, g, b) = match hex.len() {
        3 => {
            let mut digits = hex.chars().map(|c| c.to_digit(16));
            let r = digits.next()??;
            let g = digits.next()??;
            let b = digits.next()??;
            ((r * 17) as u8, (g * 17) as u8, (b * 17) as u8)
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            (r, g, b)
        }
        _ => return None,
    };

    Some(Rgba([r, g, b, 255]))
}

/// Canonical `#rrggbb` form, safe to embed in SVG markup.
pub fn canonical_hex(color: Rgba<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.0[0], color.0[1], color.0[2])
}
