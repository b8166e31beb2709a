use crate::models::Distribution;

/// RGB color shared by the PDF and terminal renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ChartColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

pub const SKY_BLUE: ChartColor = ChartColor::rgb(135, 206, 235);

/// Slice colors, used in order and then repeated.
pub const SLICE_PALETTE: [ChartColor; 6] = [
    ChartColor::rgb(0, 128, 0),
    ChartColor::rgb(255, 0, 0),
    ChartColor::rgb(255, 165, 0),
    ChartColor::rgb(70, 130, 180),
    ChartColor::rgb(147, 112, 219),
    ChartColor::rgb(128, 128, 128),
];

/// Angle of the first slice edge, counter-clockwise from the positive x axis.
pub const PIE_START_DEGREES: f64 = 140.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub color: ChartColor,
    pub bars: Vec<(String, u64)>,
}

impl BarChart {
    pub fn category_counts(categories: &Distribution) -> Self {
        Self {
            title: "Category-wise Equipment Count".to_string(),
            x_label: "Category".to_string(),
            y_label: "Number of Equipments".to_string(),
            color: SKY_BLUE,
            bars: categories
                .iter()
                .map(|(label, count)| (label.to_string(), count))
                .collect(),
        }
    }

    pub fn max_value(&self) -> u64 {
        self.bars.iter().map(|(_, count)| *count).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub count: u64,
    /// Share of the whole, between 0 and 1.
    pub fraction: f64,
    pub start_degrees: f64,
    pub sweep_degrees: f64,
    pub color: ChartColor,
}

impl PieSlice {
    /// Percentage text drawn inside the slice, one decimal place.
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.fraction * 100.0)
    }

    pub fn mid_degrees(&self) -> f64 {
        self.start_degrees + self.sweep_degrees / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    pub fn status_distribution(statuses: &Distribution) -> Self {
        let total = statuses.total();
        let mut start = PIE_START_DEGREES;
        let slices = statuses
            .iter()
            .enumerate()
            .map(|(idx, (label, count))| {
                let fraction = if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64
                };
                let slice = PieSlice {
                    label: label.to_string(),
                    count,
                    fraction,
                    start_degrees: start,
                    sweep_degrees: fraction * 360.0,
                    color: SLICE_PALETTE[idx % SLICE_PALETTE.len()],
                };
                start += slice.sweep_degrees;
                slice
            })
            .collect();

        Self {
            title: "Equipment Status Distribution".to_string(),
            slices,
        }
    }

    /// Index of the slice covering `degrees` (any angle, wrapped into the pie).
    pub fn slice_at(&self, degrees: f64) -> Option<usize> {
        let offset = (degrees - PIE_START_DEGREES).rem_euclid(360.0);
        let mut covered = 0.0;
        for (idx, slice) in self.slices.iter().enumerate() {
            covered += slice.sweep_degrees;
            if offset < covered {
                return Some(idx);
            }
        }
        self.slices.iter().rposition(|slice| slice.sweep_degrees > 0.0)
    }
}
