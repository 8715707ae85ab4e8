use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Categorical palette (pie slices)
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Sequential scale (bar heights)
// ---------------------------------------------------------------------------

/// Light-to-dark blue for `value` within `0..=max`.
pub fn sequential_blue(value: usize, max: usize) -> Color32 {
    let t = if max == 0 {
        1.0
    } else {
        (value as f32 / max as f32).clamp(0.0, 1.0)
    };
    let low: LinSrgb = Srgb::<u8>::new(0xde, 0xeb, 0xf7).into_format::<f32>().into_linear();
    let high: LinSrgb = Srgb::<u8>::new(0x08, 0x30, 0x6b).into_format::<f32>().into_linear();
    to_color32(Srgb::from_linear(low.mix(high, t)))
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    )
}
