use std::f64::consts::PI;

use super::charts::{BarChart, ChartColor, PieChart};
use super::pdf::{text_width, Page, PdfDocument};
use super::ChartSink;

const BLACK: ChartColor = ChartColor::rgb(0, 0, 0);
const WHITE: ChartColor = ChartColor::rgb(255, 255, 255);
const GRID: ChartColor = ChartColor::rgb(200, 200, 200);

/// 6 x 4 inches, matching the on-screen bar chart proportions.
const BAR_PAGE: (f64, f64) = (432.0, 288.0);
/// 5 x 5 inches.
const PIE_PAGE: (f64, f64) = (360.0, 360.0);
const TITLE_SIZE: f64 = 13.0;
const LABEL_SIZE: f64 = 9.0;
/// Arc segment length used to approximate circles.
const ARC_STEP_DEGREES: f64 = 2.0;

/// Chart sink that appends one page per chart to a PDF document.
#[derive(Default)]
pub struct PdfSink {
    document: PdfDocument,
}

impl PdfSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> &PdfDocument {
        &self.document
    }
}

impl ChartSink for PdfSink {
    fn bar_chart(&mut self, chart: &BarChart) {
        let (width, height) = BAR_PAGE;
        let mut page = Page::new(width, height);

        let left = 56.0;
        let right = width - 20.0;
        let bottom = 52.0;
        let top = height - 40.0;

        page.fill_color(BLACK);
        page.text_centered(width / 2.0, height - 26.0, TITLE_SIZE, &chart.title);
        page.text_centered((left + right) / 2.0, 12.0, LABEL_SIZE + 1.0, &chart.x_label);
        page.text_vertical(18.0, (bottom + top) / 2.0, LABEL_SIZE + 1.0, &chart.y_label);

        let max = chart.max_value().max(1);
        let step = tick_step(max);
        let scale_top = max.div_ceil(step) * step;
        let plot_height = top - bottom;

        let mut tick = 0;
        while tick <= scale_top {
            let y = bottom + plot_height * tick as f64 / scale_top as f64;
            page.stroke_color(GRID);
            page.line((left, y), (right, y));
            page.fill_color(BLACK);
            let label = tick.to_string();
            page.text(
                left - 6.0 - text_width(&label, LABEL_SIZE),
                y - 3.0,
                LABEL_SIZE,
                &label,
            );
            tick += step;
        }

        let slot = (right - left) / chart.bars.len().max(1) as f64;
        for (idx, (label, count)) in chart.bars.iter().enumerate() {
            let bar_width = slot * 0.8;
            let x = left + slot * idx as f64 + (slot - bar_width) / 2.0;
            let bar_height = plot_height * *count as f64 / scale_top as f64;
            page.fill_color(chart.color);
            page.fill_rect(x, bottom, bar_width, bar_height);
            page.fill_color(BLACK);
            page.text_centered(x + bar_width / 2.0, bottom - 14.0, LABEL_SIZE, label);
        }

        page.stroke_color(BLACK);
        page.line((left, bottom), (right, bottom));
        page.line((left, bottom), (left, top));

        self.document.add_page(page);
    }

    fn pie_chart(&mut self, chart: &PieChart) {
        let (width, height) = PIE_PAGE;
        let mut page = Page::new(width, height);
        let center = (width / 2.0, height / 2.0 - 10.0);
        let radius = 120.0;

        page.fill_color(BLACK);
        page.text_centered(width / 2.0, height - 28.0, TITLE_SIZE, &chart.title);

        page.stroke_color(WHITE);
        for slice in chart.slices.iter().filter(|slice| slice.sweep_degrees > 0.0) {
            page.fill_color(slice.color);
            page.polygon(&wedge(center, radius, slice.start_degrees, slice.sweep_degrees));
        }

        for slice in chart.slices.iter().filter(|slice| slice.sweep_degrees > 0.0) {
            let mid = slice.mid_degrees();

            let (px, py) = polar(center, radius * 0.6, mid);
            page.fill_color(WHITE);
            page.text_centered(px, py - 3.0, LABEL_SIZE + 1.0, &slice.percent_label());

            let (lx, ly) = polar(center, radius * 1.1, mid);
            let label_x = if lx >= center.0 {
                lx
            } else {
                lx - text_width(&slice.label, LABEL_SIZE + 1.0)
            };
            page.fill_color(BLACK);
            page.text(label_x, ly - 3.0, LABEL_SIZE + 1.0, &slice.label);
        }

        self.document.add_page(page);
    }
}

/// Round step between y-axis ticks so there are at most about five of them.
fn tick_step(max: u64) -> u64 {
    max.div_ceil(5).max(1)
}

fn polar(center: (f64, f64), radius: f64, degrees: f64) -> (f64, f64) {
    let radians = degrees * PI / 180.0;
    (
        center.0 + radius * radians.cos(),
        center.1 + radius * radians.sin(),
    )
}

/// Polygon outline of a pie wedge: the center followed by points along the arc.
fn wedge(center: (f64, f64), radius: f64, start: f64, sweep: f64) -> Vec<(f64, f64)> {
    let segments = (sweep / ARC_STEP_DEGREES).ceil().max(1.0) as usize;
    let mut points = Vec::with_capacity(segments + 2);
    if sweep < 360.0 {
        points.push(center);
    }
    for step in 0..=segments {
        let angle = start + sweep * step as f64 / segments as f64;
        points.push(polar(center, radius, angle));
    }
    points
}
