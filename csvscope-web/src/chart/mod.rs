//! Mean ± standard deviation bar chart
//!
//! One bar per numeric column, drawn with `plotters` into an in-memory RGB
//! bitmap, encoded as PNG and returned base64-encoded for embedding in an
//! `<img>` data URL. Nothing touches the disk.
//!
//! The pixel buffer is owned by [`Canvas`] and the plotters backends only
//! live inside its drawing scope, so everything is released when rendering
//! returns, on error paths as well.

mod labels;

use base64::Engine as _;
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use plotters::style::{FontStyle, TextStyle};
use std::io::Cursor;
use thiserror::Error;

use crate::table::{summarize, Table};
use labels::{blit_rotated, rotated_height, LabelBitmap};

pub const CHART_WIDTH: u32 = 800;
pub const CHART_HEIGHT: u32 = 500;

pub const BAR_COLOR: RGBColor = RGBColor(0x00, 0x7b, 0xff);
const EDGE_COLOR: RGBColor = BLACK;

/// Error bar cap width in pixels
const CAP_WIDTH: u32 = 11;
/// Fraction of each category slot covered by its bar
const BAR_WIDTH: f64 = 0.8;
const TICK_LENGTH: i32 = 5;
const FONT: &str = "sans-serif";

/// Chart rendering errors
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Chart rendering failed: {0}")]
    Render(String),

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

pub(crate) fn render_err<E: std::fmt::Display>(err: E) -> ChartError {
    ChartError::Render(err.to_string())
}

/// A rendered chart: base64 of the PNG bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImage {
    base64: String,
}

impl ChartImage {
    pub fn from_png(png: &[u8]) -> Self {
        Self {
            base64: base64::engine::general_purpose::STANDARD.encode(png),
        }
    }

    /// Bare base64 text, without the `data:` prefix
    pub fn as_base64(&self) -> &str {
        &self.base64
    }

    /// `data:image/png;base64,...` for an `<img src>`
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", self.base64)
    }
}

/// Height and error of one bar
#[derive(Debug, Clone, PartialEq)]
pub struct BarStat {
    pub label: String,
    pub mean: f64,
    pub std: f64,
}

/// Per-numeric-column mean and sample standard deviation, in column order
pub fn bar_stats(table: &Table) -> Vec<BarStat> {
    table
        .numeric_columns()
        .map(|(name, values)| {
            let summary = summarize(name, values);
            BarStat {
                label: summary.name,
                mean: summary.mean,
                std: summary.std,
            }
        })
        .collect()
}

pub fn chart_title(title: &str) -> String {
    format!("Mean ± Std Dev for Numeric Columns in {}", title)
}

/// Render the chart for `table`, or `None` when it has no numeric columns
pub fn render_mean_std_chart(table: &Table, title: &str) -> Result<Option<ChartImage>, ChartError> {
    let bars = bar_stats(table);
    if bars.is_empty() {
        return Ok(None);
    }

    let png = render_png(&bars, &chart_title(title))?;
    Ok(Some(ChartImage::from_png(&png)))
}

/// Draw the bars and encode the result as PNG bytes
pub fn render_png(bars: &[BarStat], caption: &str) -> Result<Vec<u8>, ChartError> {
    let mut canvas = Canvas::new(CHART_WIDTH, CHART_HEIGHT);
    canvas.draw_chart(bars, caption)?;
    canvas.encode_png()
}

/// y-axis range covering 0 and every finite `mean ± std`, with 5% headroom
fn value_range(bars: &[BarStat]) -> (f64, f64) {
    let mut low = 0.0f64;
    let mut high = 0.0f64;
    for bar in bars.iter().filter(|b| b.mean.is_finite()) {
        let spread = if bar.std.is_finite() { bar.std } else { 0.0 };
        low = low.min(bar.mean - spread);
        high = high.max(bar.mean + spread);
    }

    if high - low <= f64::EPSILON {
        high = low + 1.0;
    }
    let pad = (high - low) * 0.05;
    let low = if low < 0.0 { low - pad } else { low };
    (low, high + pad)
}

/// Request-scoped RGB8 pixel buffer
struct Canvas {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl Canvas {
    fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![255u8; (width * height * 3) as usize],
            width,
            height,
        }
    }

    fn label_style() -> TextStyle<'static> {
        (FONT, 14).into_font().color(&BLACK)
    }

    fn draw_chart(&mut self, bars: &[BarStat], caption: &str) -> Result<(), ChartError> {
        let label_style = Self::label_style();
        let (label_sizes, anchors) = {
            let root = BitMapBackend::with_buffer(&mut self.pixels, (self.width, self.height))
                .into_drawing_area();
            root.fill(&WHITE).map_err(render_err)?;

            let mut label_sizes = Vec::with_capacity(bars.len());
            for bar in bars {
                label_sizes.push(
                    root.estimate_text_size(&bar.label, &label_style)
                        .map_err(render_err)?,
                );
            }

            // Label area fits the tallest rotated label, capped at half the image
            let tallest = label_sizes.iter().map(|s| rotated_height(*s)).max().unwrap_or(0);
            let label_area = (tallest + TICK_LENGTH as u32 + 10).clamp(30, self.height / 2);

            let (y_low, y_high) = value_range(bars);
            let slots = bars.len() as f64;

            let mut chart = ChartBuilder::on(&root)
                .caption(caption, (FONT, 22).into_font().style(FontStyle::Bold))
                .margin(15)
                .x_label_area_size(label_area)
                .y_label_area_size(70)
                .build_cartesian_2d(-0.5..slots - 0.5, y_low..y_high)
                .map_err(render_err)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(0)
                .y_desc("Mean Value")
                .axis_desc_style((FONT, 16))
                .label_style((FONT, 13))
                .draw()
                .map_err(render_err)?;

            let half = BAR_WIDTH / 2.0;
            chart
                .draw_series(
                    bars.iter()
                        .enumerate()
                        .filter(|(_, bar)| bar.mean.is_finite())
                        .flat_map(|(i, bar)| {
                            let corners = [(i as f64 - half, bar.mean), (i as f64 + half, 0.0)];
                            [
                                Rectangle::new(corners, BAR_COLOR.filled()),
                                Rectangle::new(corners, EDGE_COLOR.stroke_width(1)),
                            ]
                        }),
                )
                .map_err(render_err)?;

            chart
                .draw_series(
                    bars.iter()
                        .enumerate()
                        .filter(|(_, bar)| bar.mean.is_finite() && bar.std.is_finite())
                        .map(|(i, bar)| {
                            ErrorBar::new_vertical(
                                i as f64,
                                bar.mean - bar.std,
                                bar.mean,
                                bar.mean + bar.std,
                                BLACK.stroke_width(1),
                                CAP_WIDTH,
                            )
                        }),
                )
                .map_err(render_err)?;

            let mut anchors = Vec::with_capacity(bars.len());
            for i in 0..bars.len() {
                let (x, y) = chart.backend_coord(&(i as f64, y_low));
                root.draw(&PathElement::new(vec![(x, y), (x, y + TICK_LENGTH)], BLACK))
                    .map_err(render_err)?;
                anchors.push((x, y + TICK_LENGTH + 3));
            }

            root.present().map_err(render_err)?;
            (label_sizes, anchors)
        };

        for ((bar, size), anchor) in bars.iter().zip(label_sizes).zip(anchors) {
            let label = LabelBitmap::render(&bar.label, size, &label_style)?;
            blit_rotated(&mut self.pixels, (self.width, self.height), &label, anchor);
        }

        Ok(())
    }

    fn encode_png(self) -> Result<Vec<u8>, ChartError> {
        let image = RgbImage::from_raw(self.width, self.height, self.pixels)
            .ok_or_else(|| ChartError::Encode("pixel buffer size mismatch".to_string()))?;

        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| ChartError::Encode(e.to_string()))?;
        Ok(png)
    }
}
