//! Rotated tick labels
//!
//! The bitmap backend only draws text at multiples of 90°. Labels are drawn
//! horizontally into a scratch bitmap and composited into the chart at 45°
//! (counter-clockwise), right end anchored under the tick.

use plotters::prelude::*;
use plotters::style::TextStyle;

use super::{render_err, ChartError};

const SIN_45: f64 = std::f64::consts::FRAC_1_SQRT_2;
const COS_45: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Extra rows below the measured text box, for descenders
const DESCENT_PADDING: u32 = 4;

/// A horizontally rendered label, RGB8 pixels on white
pub struct LabelBitmap {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl LabelBitmap {
    /// Render `text` with `style` into a tightly sized scratch bitmap
    pub fn render(text: &str, size: (u32, u32), style: &TextStyle) -> Result<Self, ChartError> {
        let width = size.0.max(1);
        let height = size.1 + DESCENT_PADDING;
        let mut pixels = vec![255u8; (width * height * 3) as usize];
        {
            let area = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
            area.draw_text(text, style, (0, 0)).map_err(render_err)?;
            area.present().map_err(render_err)?;
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    #[cfg(test)]
    fn from_raw(pixels: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            pixels,
            width,
            height,
        }
    }

    /// Ink coverage at a pixel: 0.0 for white, 1.0 for black
    fn coverage(&self, x: u32, y: u32) -> f64 {
        let offset = ((y * self.width + x) * 3) as usize;
        let darkest = self.pixels[offset..offset + 3].iter().min().copied().unwrap_or(255);
        1.0 - darkest as f64 / 255.0
    }
}

/// Vertical space a label occupies once rotated by 45°
pub fn rotated_height(size: (u32, u32)) -> u32 {
    ((size.0 + size.1 + DESCENT_PADDING) as f64 * SIN_45).ceil() as u32
}

/// Composite `label` rotated 45° counter-clockwise into an RGB8 `target`
///
/// The right-most point of the rotated label lands on `anchor.0` and its top
/// on `anchor.1`. Pixels outside the target are clipped.
pub fn blit_rotated(
    target: &mut [u8],
    target_size: (u32, u32),
    label: &LabelBitmap,
    anchor: (i32, i32),
) {
    let w = label.width as f64;
    let h = label.height as f64;

    // Origin is where the label's top-right corner lands
    let origin_x = anchor.0 as f64 - h * SIN_45;
    let origin_y = anchor.1 as f64;

    let min_x = (origin_x - w * COS_45).floor() as i32;
    let max_x = anchor.0;
    let max_y = (origin_y + (w + h) * SIN_45).ceil() as i32;

    for py in anchor.1.max(0)..max_y.min(target_size.1 as i32) {
        for px in min_x.max(0)..=max_x.min(target_size.0 as i32 - 1) {
            let dx = px as f64 + 0.5 - origin_x;
            let dy = py as f64 + 0.5 - origin_y;

            // Inverse rotation back into label space
            let u = dx * COS_45 - dy * SIN_45 + w;
            let v = dx * SIN_45 + dy * COS_45;
            if u < 0.0 || v < 0.0 || u >= w || v >= h {
                continue;
            }

            let alpha = label.coverage(u as u32, v as u32);
            if alpha <= 0.0 {
                continue;
            }

            let offset = ((py as u32 * target_size.0 + px as u32) * 3) as usize;
            for channel in &mut target[offset..offset + 3] {
                *channel = (*channel as f64 * (1.0 - alpha)).round() as u8;
            }
        }
    }
}
