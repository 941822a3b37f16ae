use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.5);
            let rgb: Srgb = hsl.into_color();
            to_rgb(rgb)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Sequential colour ramp for heatmaps
// ---------------------------------------------------------------------------

/// Viridis anchor colours, dark to light.
const RAMP: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

/// Colour for `t` in `[0, 1]` (clamped), interpolated in linear RGB.
pub fn ramp_color(t: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) as f32 } else { 0.0 };
    let segments = (RAMP.len() - 1) as f32;
    let pos = t * segments;
    let idx = (pos.floor() as usize).min(RAMP.len() - 2);
    let frac = pos - idx as f32;

    let lo = linear(RAMP[idx]);
    let hi = linear(RAMP[idx + 1]);
    to_rgb(Srgb::from_linear(lo.mix(hi, frac)))
}

/// Map `value` from `[min, max]` onto the ramp; a degenerate range maps to
/// the middle colour.
pub fn scaled_ramp_color(value: f64, min: f64, max: f64) -> RGBColor {
    let span = max - min;
    if span.abs() < f64::EPSILON {
        return ramp_color(0.5);
    }
    ramp_color((value - min) / span)
}

fn linear((r, g, b): (u8, u8, u8)) -> LinSrgb {
    Srgb::new(r, g, b).into_format::<f32>().into_linear()
}

fn to_rgb(rgb: Srgb) -> RGBColor {
    let rgb: Srgb<u8> = rgb.into_format();
    RGBColor(rgb.red, rgb.green, rgb.blue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(7);
        assert_eq!(colors.len(), 7);
        assert_ne!(colors[0], colors[1]);
    }

    #[test]
    fn ramp_endpoints_match_anchors() {
        assert_eq!(ramp_color(0.0), RGBColor(68, 1, 84));
        assert_eq!(ramp_color(1.0), RGBColor(253, 231, 37));
        assert_eq!(ramp_color(-3.0), ramp_color(0.0));
        assert_eq!(ramp_color(f64::NAN), ramp_color(0.0));
    }

    #[test]
    fn degenerate_range_is_mid_ramp() {
        assert_eq!(scaled_ramp_color(2.0, 2.0, 2.0), ramp_color(0.5));
    }
}
