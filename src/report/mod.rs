//! Report generation: count the inventory by category and by status, turn
//! the counts into chart models, and hand the charts to a sink. The TUI is one
//! sink, [`PdfSink`] is the other; both go through [`render`].

mod charts;
mod pdf;
mod pdf_sink;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::info;

use crate::db::EquipmentStore;
use crate::error::{InventoryError, InventoryResult};
use crate::models::Distribution;

pub use charts::{BarChart, ChartColor, PieChart, PieSlice, PIE_START_DEGREES};
pub use pdf::{Page, PdfDocument};
pub use pdf_sink::PdfSink;

/// File name prefix of exported reports; the timestamp and extension follow.
pub const REPORT_PREFIX: &str = "Playground_Report_";

/// Receives charts in drawing order.
pub trait ChartSink {
    fn bar_chart(&mut self, chart: &BarChart);
    fn pie_chart(&mut self, chart: &PieChart);
}

/// Both distributions, at least one of them non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub categories: Distribution,
    pub statuses: Distribution,
}

impl Report {
    /// Read both distributions from the store. One empty distribution is
    /// kept as empty; both empty is [`InventoryError::NoData`].
    pub fn collect(store: &EquipmentStore) -> InventoryResult<Self> {
        let categories = empty_on_no_data(build_category_distribution(store))?;
        let statuses = empty_on_no_data(build_status_distribution(store))?;
        if categories.is_empty() && statuses.is_empty() {
            return Err(InventoryError::NoData);
        }
        Ok(Self {
            categories,
            statuses,
        })
    }
}

pub fn build_category_distribution(store: &EquipmentStore) -> InventoryResult<Distribution> {
    non_empty(store.count_by_category()?)
}

pub fn build_status_distribution(store: &EquipmentStore) -> InventoryResult<Distribution> {
    non_empty(store.count_by_status()?)
}

fn non_empty(distribution: Distribution) -> InventoryResult<Distribution> {
    if distribution.is_empty() {
        Err(InventoryError::NoData)
    } else {
        Ok(distribution)
    }
}

fn empty_on_no_data(result: InventoryResult<Distribution>) -> InventoryResult<Distribution> {
    match result {
        Err(InventoryError::NoData) => Ok(Distribution::default()),
        other => other,
    }
}

/// Draw the category bar chart and the status pie chart, skipping whichever
/// distribution is empty.
pub fn render(report: &Report, sink: &mut dyn ChartSink) {
    if !report.categories.is_empty() {
        sink.bar_chart(&BarChart::category_counts(&report.categories));
    }
    if !report.statuses.is_empty() {
        sink.pie_chart(&PieChart::status_distribution(&report.statuses));
    }
}

/// Collect the current report and render it into `sink`.
pub fn render_from_store(store: &EquipmentStore, sink: &mut dyn ChartSink) -> InventoryResult<()> {
    let report = Report::collect(store)?;
    render(&report, sink);
    Ok(())
}

/// `Playground_Report_YYYYMMDD_HHMMSS.pdf` for the given moment.
pub fn report_file_name(now: &DateTime<Local>) -> String {
    format!("{}.pdf", report_stem(now))
}

fn report_stem(now: &DateTime<Local>) -> String {
    format!("{REPORT_PREFIX}{}", now.format("%Y%m%d_%H%M%S"))
}

/// First free report path in `dir`. A second export within the same second
/// gets `_1`, `_2`, ... appended to the stem.
fn unused_report_path(dir: &Path, now: &DateTime<Local>) -> PathBuf {
    let path = dir.join(report_file_name(now));
    if !path.exists() {
        return path;
    }
    let stem = report_stem(now);
    (1..)
        .map(|n| dir.join(format!("{stem}_{n}.pdf")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(path)
}

/// Render the report into a PDF inside `dir`, one page per chart, and return
/// the path of the finished file. Earlier reports are never overwritten.
pub fn export(store: &EquipmentStore, dir: &Path, now: DateTime<Local>) -> InventoryResult<PathBuf> {
    let report = Report::collect(store)?;
    fs::create_dir_all(dir)?;

    let mut sink = PdfSink::new();
    render(&report, &mut sink);

    let path = unused_report_path(dir, &now);
    sink.document().save(&path)?;
    info!(path = %path.display(), pages = sink.document().page_count(), "report exported");
    Ok(path)
}
