pub mod geometry;
pub mod label_placement;
pub mod text;
pub(crate) mod types;
pub use geometry::{PathCommand, PathData, Polar, large_arc_flag};
pub use label_placement::{CategoryLabel, LabelPlacement, RowLabel, TextAnchor, place_labels};
pub use text::{HeuristicEstimator, WidthEstimator, estimate_width, fit_to_width, truncate_chars};
pub use types::*;

use crate::config::ChartConfig;
use crate::ir::{Category, DataModel, Tier};
use std::f32::consts::PI;

/// Spacer rows reserved for one category, split into the baseline lead
/// (empty comfortable tier) and the comfortable-band prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpacerAllowance {
    pub lead: usize,
    pub comfortable: usize,
}

impl SpacerAllowance {
    pub fn for_category(category: &Category, config: &ChartConfig) -> Self {
        let raw_total = category.skills.total();
        let has_comfortable = category.skills.count(Tier::Comfortable) > 0;
        Self {
            lead: if !has_comfortable && raw_total > 0 {
                config.baseline_spacer_rows
            } else {
                0
            },
            comfortable: if has_comfortable {
                config.comfortable_spacer_rows
            } else {
                0
            },
        }
    }

    pub fn total(self) -> usize {
        self.lead + self.comfortable
    }
}

pub fn angle_step(category_count: usize) -> f32 {
    2.0 * PI / category_count.max(1) as f32
}

/// Outer padding kept free for category labels.
pub fn reserved_label_padding(
    model: &DataModel,
    config: &ChartConfig,
    estimator: &dyn WidthEstimator,
) -> f32 {
    let longest = model
        .categories
        .iter()
        .map(|cat| estimator.text_width(&cat.name, config.label_font_size))
        .fold(1.0_f32, f32::max);
    config
        .label_padding_min
        .max(config.label_offset + longest.ceil() + config.label_padding_extra)
}

pub fn compute_layout(model: &DataModel, config: &ChartConfig) -> RingLayout {
    compute_layout_with(model, config, &HeuristicEstimator)
}

/// Radial allocation: one shared unit thickness for the whole chart, every
/// category's tiers stacked outward from the hub in fixed order.
pub fn compute_layout_with(
    model: &DataModel,
    config: &ChartConfig,
    estimator: &dyn WidthEstimator,
) -> RingLayout {
    let size = config.size.max(1.0);
    let half = size / 2.0;
    let inner_core = config.inner_core.clamp(0.0, half);

    let allowances: Vec<SpacerAllowance> = model
        .categories
        .iter()
        .map(|cat| SpacerAllowance::for_category(cat, config))
        .collect();
    let max_total = model
        .categories
        .iter()
        .zip(&allowances)
        .map(|(cat, allowance)| cat.skills.total() + allowance.total())
        .max()
        .unwrap_or(0)
        .max(1);

    let mut reserved_padding = reserved_label_padding(model, config, estimator);
    let mut max_radius = half - reserved_padding;
    let mut unit = config
        .min_row_thickness
        .max((max_radius - inner_core) / max_total as f32);

    let used = inner_core + max_total as f32 * unit;
    if used > max_radius + 1e-3 {
        // Minimum row thickness wins over label room; labels are clamped to
        // the canvas and truncated harder instead.
        reserved_padding = (half - used).max(0.0);
        max_radius = half - reserved_padding;
        if used > half {
            unit = (half - inner_core).max(0.0) / max_total as f32;
            tracing::warn!(
                max_total,
                unit,
                "canvas too small for minimum row thickness"
            );
        }
    }

    let chart_font_size = (unit - 2.0)
        .floor()
        .clamp(config.chart_font_min, config.chart_font_max.max(config.chart_font_min));
    let step = angle_step(model.categories.len());

    tracing::debug!(
        categories = model.categories.len(),
        max_total,
        reserved_padding,
        max_radius,
        unit,
        chart_font_size,
        "radial allocation"
    );

    let categories = model
        .categories
        .iter()
        .zip(&allowances)
        .enumerate()
        .map(|(index, (category, allowance))| {
            layout_category(index, category, *allowance, step, inner_core, unit, config)
        })
        .collect();

    RingLayout {
        size,
        polar: Polar::centered(size),
        inner_core,
        reserved_padding,
        max_radius,
        max_total,
        unit,
        angle_step: step,
        chart_font_size,
        hub_filled: model.has_comfortable_items(),
        categories,
    }
}

fn row_opacity(row: usize, config: &ChartConfig) -> f32 {
    (1.0 - row as f32 * config.opacity_decay).max(config.opacity_floor)
}

fn layout_category(
    index: usize,
    category: &Category,
    allowance: SpacerAllowance,
    step: f32,
    inner_core: f32,
    unit: f32,
    config: &ChartConfig,
) -> CategoryLayout {
    let raw_total = category.skills.total();
    let mut cursor = inner_core + allowance.lead as f32 * unit;
    let mut bands = Vec::with_capacity(Tier::ALL.len());

    for tier in Tier::ALL {
        let items = category.skills.get(tier);
        let spacer_rows = if tier == Tier::Comfortable {
            allowance.comfortable
        } else {
            0
        };
        let spacer_thickness = spacer_rows as f32 * unit;
        let inner_radius = cursor;
        let outer_radius = inner_radius + (items.len() + spacer_rows) as f32 * unit;

        let spacer = (spacer_rows > 0).then(|| SpacerLayout {
            rows: spacer_rows,
            inner_radius,
            outer_radius: inner_radius + spacer_thickness,
            opacity: row_opacity(0, config),
        });
        let rows = items
            .iter()
            .enumerate()
            .map(|(row, item)| {
                let row_inner = inner_radius + spacer_thickness + row as f32 * unit;
                RowLayout {
                    item: item.clone(),
                    index: row,
                    inner_radius: row_inner,
                    outer_radius: row_inner + unit,
                    opacity: row_opacity(row, config),
                }
            })
            .collect();

        bands.push(BandLayout {
            tier,
            inner_radius,
            outer_radius,
            spacer,
            rows,
        });
        cursor = outer_radius;
    }

    CategoryLayout {
        index,
        name: category.name.clone(),
        start_angle: index as f32 * step,
        end_angle: (index + 1) as f32 * step,
        raw_total,
        lead_spacer_rows: allowance.lead,
        total_with_spacer: raw_total + allowance.total(),
        bands,
        outer_radius: cursor,
    }
}
