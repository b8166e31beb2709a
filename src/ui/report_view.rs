use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Points};
use ratatui::widgets::{Bar, BarChart as BarChartWidget, BarGroup, Block, Borders, Paragraph};
use ratatui::Frame;

use crate::report::{BarChart, ChartSink, PieChart};

use super::helpers::{round_bounds, terminal_color};

/// Sample spacing used to fill the pie with canvas points.
const PIE_SAMPLE_STEP: f64 = 0.02;

/// Interactive chart sink: keeps the charts it receives and draws them on the
/// report screen.
#[derive(Default, Clone, Debug)]
pub(crate) struct ReportView {
    pub(crate) bar: Option<BarChart>,
    pub(crate) pie: Option<PieChart>,
}

impl ChartSink for ReportView {
    fn bar_chart(&mut self, chart: &BarChart) {
        self.bar = Some(chart.clone());
    }

    fn pie_chart(&mut self, chart: &PieChart) {
        self.pie = Some(chart.clone());
    }
}

impl ReportView {
    pub(crate) fn draw(&self, frame: &mut Frame, area: Rect) {
        match (&self.bar, &self.pie) {
            (Some(bar), Some(pie)) => {
                let chunks = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                    .split(area);
                draw_bar_chart(frame, chunks[0], bar);
                draw_pie_chart(frame, chunks[1], pie);
            }
            (Some(bar), None) => draw_bar_chart(frame, area, bar),
            (None, Some(pie)) => draw_pie_chart(frame, area, pie),
            (None, None) => {
                frame.render_widget(Paragraph::new("No records available for report."), area)
            }
        }
    }
}

fn draw_bar_chart(frame: &mut Frame, area: Rect, chart: &BarChart) {
    let block = Block::default()
        .title(chart.title.clone())
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let color = terminal_color(chart.color);
    let bars: Vec<Bar> = chart
        .bars
        .iter()
        .map(|(label, count)| {
            Bar::default()
                .value(*count)
                .label(Line::from(label.clone()))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(Color::Black).bg(color))
        })
        .collect();

    let slots = chart.bars.len().max(1) as u16;
    let bar_width = (chunks[0].width / slots).saturating_sub(1).clamp(3, 12);
    let widget = BarChartWidget::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .max(chart.max_value().max(1));
    frame.render_widget(widget, chunks[0]);

    let axis = Line::from(vec![
        Span::styled(
            format!("x: {}", chart.x_label),
            Style::default().fg(Color::Gray),
        ),
        Span::raw("   "),
        Span::styled(
            format!("y: {}", chart.y_label),
            Style::default().fg(Color::Gray),
        ),
    ]);
    frame.render_widget(Paragraph::new(axis), chunks[1]);
}

fn draw_pie_chart(frame: &mut Frame, area: Rect, chart: &PieChart) {
    let block = Block::default()
        .title(chart.title.clone())
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let legend_height = (chart.slices.len() as u16).min(inner.height / 2);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(legend_height)])
        .split(inner);

    let layers = pie_layers(chart);
    let (x_bounds, y_bounds) = round_bounds(chunks[0], 1.05);
    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            for (coords, color) in &layers {
                ctx.draw(&Points {
                    coords,
                    color: *color,
                });
            }
        });
    frame.render_widget(canvas, chunks[0]);

    let legend: Vec<Line> = chart
        .slices
        .iter()
        .map(|slice| {
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(terminal_color(slice.color))),
                Span::styled(
                    slice.label.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("  {} ({})", slice.percent_label(), slice.count)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(legend), chunks[1]);
}

/// Points inside the unit circle, bucketed by the slice that covers them.
fn pie_layers(chart: &PieChart) -> Vec<(Vec<(f64, f64)>, Color)> {
    let mut layers: Vec<(Vec<(f64, f64)>, Color)> = chart
        .slices
        .iter()
        .map(|slice| (Vec::new(), terminal_color(slice.color)))
        .collect();

    let steps = (2.0 / PIE_SAMPLE_STEP) as i32;
    for xi in 0..=steps {
        for yi in 0..=steps {
            let x = -1.0 + f64::from(xi) * PIE_SAMPLE_STEP;
            let y = -1.0 + f64::from(yi) * PIE_SAMPLE_STEP;
            if x * x + y * y > 1.0 {
                continue;
            }
            let degrees = y.atan2(x).to_degrees();
            if let Some(idx) = chart.slice_at(degrees) {
                layers[idx].0.push((x, y));
            }
        }
    }
    layers
}
