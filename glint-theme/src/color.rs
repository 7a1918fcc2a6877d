//! Color utilities: WCAG relative luminance and CSS-style color parsing.
//!
//! The parser accepts the subset of CSS color syntax that computed styles
//! actually produce for backgrounds: `rgb()`/`rgba()` with integer channels,
//! 3-, 6- and 8-digit hex, and a small fixed set of named colors. Anything
//! else parses to `None`; callers treat that as "unknown, fall back".

use vello::peniko::Color;

/// Gamma-expand a single sRGB channel (normalized to `[0, 1]`).
fn linearize(channel: f64) -> f64 {
    if channel <= 0.03928 {
        channel / 12.92
    } else {
        ((channel + 0.055) / 1.055).powf(2.4)
    }
}

/// Relative luminance of a color per the WCAG formula.
///
/// Returns a value in `[0, 1]` where `0.0` is black and `1.0` is white.
/// The alpha channel is ignored.
pub fn luminance(color: Color) -> f64 {
    let [r, g, b, _] = color.components;
    0.2126 * linearize(r as f64) + 0.7152 * linearize(g as f64) + 0.0722 * linearize(b as f64)
}

/// Relative luminance from 8-bit RGB channels.
pub fn luminance_rgb8(r: u8, g: u8, b: u8) -> f64 {
    luminance(Color::from_rgb8(r, g, b))
}

/// Parse a CSS-style color string.
///
/// Supported formats:
/// - `rgb(r, g, b)` and `rgba(r, g, b, a)` with integer channels; the alpha
///   component is validated but not carried into the returned color
/// - `#rgb`, `#rrggbb` and `#rrggbbaa` hex notation
/// - a fixed set of named colors (`black`, `white`, `red`, `green`, `blue`,
///   `yellow`, `cyan`, `magenta`, `gray`/`grey`)
///
/// Returns `None` for anything unparseable. Never panics.
pub fn parse_color(input: &str) -> Option<Color> {
    let lower = input.trim().to_ascii_lowercase();

    if let Some(rest) = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
    {
        return parse_rgb_functional(rest.strip_suffix(')')?);
    }

    if let Some(hex) = lower.strip_prefix('#') {
        return parse_hex(hex);
    }

    named_color(&lower)
}

/// Average a set of colors channel-wise.
///
/// Used when several probe points over the same chrome element each resolve
/// to a solid color and a single representative value is wanted. Returns
/// `None` for an empty slice.
pub fn average_color(colors: &[Color]) -> Option<Color> {
    if colors.is_empty() {
        return None;
    }
    let mut sum = [0.0f64; 3];
    for color in colors {
        let [r, g, b, _] = color.components;
        sum[0] += r as f64;
        sum[1] += g as f64;
        sum[2] += b as f64;
    }
    let n = colors.len() as f64;
    Some(Color::from_rgb8(
        ((sum[0] / n) * 255.0).round() as u8,
        ((sum[1] / n) * 255.0).round() as u8,
        ((sum[2] / n) * 255.0).round() as u8,
    ))
}

fn parse_rgb_functional(inner: &str) -> Option<Color> {
    let mut parts = inner.split(',').map(str::trim);
    let r = parts.next()?.parse::<u8>().ok()?;
    let g = parts.next()?.parse::<u8>().ok()?;
    let b = parts.next()?.parse::<u8>().ok()?;
    if let Some(alpha) = parts.next() {
        // Alpha must at least be a number, but the parsed color drops it.
        alpha.parse::<f64>().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(Color::from_rgb8(r, g, b))
}

fn parse_hex(hex: &str) -> Option<Color> {
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut expanded = String::with_capacity(6);
            for c in hex.chars() {
                expanded.push(c);
                expanded.push(c);
            }
            parse_hex(&expanded)
        }
        6 => Some(Color::from_rgb8(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        8 => Some(Color::from_rgba8(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            channel(&hex[6..8])?,
        )),
        _ => None,
    }
}

fn named_color(name: &str) -> Option<Color> {
    let (r, g, b) = match name {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "cyan" => (0, 255, 255),
        "magenta" => (255, 0, 255),
        "gray" | "grey" => (128, 128, 128),
        _ => return None,
    };
    Some(Color::from_rgb8(r, g, b))
}
