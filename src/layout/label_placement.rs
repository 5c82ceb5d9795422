use crate::config::{ChartConfig, TextFlow};
use crate::ir::Tier;

use super::geometry::PathData;
use super::text::{WidthEstimator, fit_to_width, truncate_chars};
use super::{CategoryLayout, RingLayout, RowLayout};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_svg(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// Item label following an invisible guide arc through its row.
#[derive(Debug, Clone)]
pub struct RowLabel {
    pub id: String,
    pub category: usize,
    pub tier: Tier,
    pub row: usize,
    pub radius: f32,
    pub font_size: f32,
    pub text: String,
    pub guide: PathData,
}

/// Horizontal label just outside a category's outermost band.
#[derive(Debug, Clone)]
pub struct CategoryLabel {
    pub category: usize,
    pub anchor_radius: f32,
    pub x: f32,
    pub y: f32,
    pub anchor: TextAnchor,
    pub available: f32,
    pub font_size: f32,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct LabelPlacement {
    pub rows: Vec<RowLabel>,
    pub categories: Vec<CategoryLabel>,
}

pub fn place_labels(
    layout: &RingLayout,
    config: &ChartConfig,
    estimator: &dyn WidthEstimator,
) -> LabelPlacement {
    let mut placement = LabelPlacement::default();
    for category in &layout.categories {
        for band in &category.bands {
            for row in &band.rows {
                if let Some(label) =
                    place_row_label(layout, category, band.tier, row, config, estimator)
                {
                    placement.rows.push(label);
                }
            }
        }
        placement
            .categories
            .push(place_category_label(layout, category, config));
    }
    placement
}

/// Fits one item into its row's arc. `None` means nothing should be drawn.
pub fn place_row_label(
    layout: &RingLayout,
    category: &CategoryLayout,
    tier: Tier,
    row: &RowLayout,
    config: &ChartConfig,
    estimator: &dyn WidthEstimator,
) -> Option<RowLabel> {
    let radius = row.mid_radius();
    if radius <= 0.0 || row.height() <= 0.0 {
        return None;
    }
    let pad_theta = config.row_pad_px / radius;
    let start = category.start_angle + pad_theta;
    let end = category.end_angle - pad_theta;
    if end <= start {
        return None;
    }

    let row_font_cap = (row.height() - 2.0).floor().max(config.chart_font_min);
    let font_size = layout.chart_font_size.min(row_font_cap);
    let budget = ((end - start) * radius - config.row_safe_px).max(0.0);
    let text = fit_to_width(estimator, &row.item, font_size, budget);
    if text.is_empty() {
        tracing::debug!(
            category = category.index,
            tier = tier.key(),
            row = row.index,
            budget,
            "row label skipped"
        );
        return None;
    }

    let guide = match config.text_flow {
        TextFlow::Clockwise => layout.polar.guide_arc(radius, start, end, true),
        TextFlow::CounterClockwise => layout.polar.guide_arc(radius, end, start, false),
    };

    Some(RowLabel {
        id: format!("tp-{}-{}-{}", category.index, tier.key(), row.index),
        category: category.index,
        tier,
        row: row.index,
        radius,
        font_size,
        text,
        guide,
    })
}

pub fn place_category_label(
    layout: &RingLayout,
    category: &CategoryLayout,
    config: &ChartConfig,
) -> CategoryLabel {
    let half = layout.size / 2.0;
    let margin = layout
        .unit
        .max(layout.chart_font_size * 2.0)
        .max(config.label_margin_min);
    let anchor_radius = (category.outer_radius + margin).min(half - config.canvas_safety);
    let angle = category.mid_angle();
    let (base_x, base_y) = layout.polar.to_cartesian(anchor_radius, angle);

    let on_right = angle.cos() >= 0.0;
    let (x, anchor, available) = if on_right {
        let x = base_x + config.label_offset;
        let right_bound = layout.polar.cx + half - config.canvas_safety;
        (x, TextAnchor::Start, (right_bound - x).max(0.0))
    } else {
        let x = base_x - config.label_offset;
        let left_bound = layout.polar.cx - half + config.canvas_safety;
        (x, TextAnchor::End, (x - left_bound).max(0.0))
    };

    CategoryLabel {
        category: category.index,
        anchor_radius,
        x,
        y: base_y,
        anchor,
        available,
        font_size: config.label_font_size,
        text: truncate_chars(&category.name, config.label_font_size, available),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Category, DataModel};
    use crate::layout::text::{HeuristicEstimator, estimate_width};
    use crate::layout::{PathCommand, compute_layout};

    fn layout_for(categories: Vec<Category>, config: &ChartConfig) -> RingLayout {
        compute_layout(&DataModel { categories }, config)
    }

    #[test]
    fn row_labels_fit_their_arc_budget() {
        let config = ChartConfig::default();
        let layout = compute_layout(&DataModel::default_data(), &config);
        let placement = place_labels(&layout, &config, &HeuristicEstimator);
        assert!(!placement.rows.is_empty());
        for label in &placement.rows {
            let cat = &layout.categories[label.category];
            let pad = config.row_pad_px / label.radius;
            let arc = (cat.end_angle - cat.start_angle - 2.0 * pad) * label.radius;
            assert!(estimate_width(&label.text, label.font_size) <= arc - config.row_safe_px + 1e-3);
            assert!(label.font_size >= config.chart_font_min);
            assert!(label.font_size <= config.chart_font_max);
        }
    }

    #[test]
    fn guide_direction_follows_text_flow() {
        let mut config = ChartConfig::default();
        let cats = vec![
            Category::new("A").with_items(Tier::Far, &["x"]),
            Category::new("B").with_items(Tier::Far, &["y"]),
        ];
        config.text_flow = TextFlow::CounterClockwise;
        let layout = layout_for(cats.clone(), &config);
        let placement = place_labels(&layout, &config, &HeuristicEstimator);
        assert!(placement.rows.iter().all(|label| label
            .guide
            .arcs()
            .all(|cmd| matches!(cmd, PathCommand::Arc { sweep: false, .. }))));

        config.text_flow = TextFlow::Clockwise;
        let layout = layout_for(cats, &config);
        let placement = place_labels(&layout, &config, &HeuristicEstimator);
        assert_eq!(placement.rows.len(), 2);
        assert!(placement.rows.iter().all(|label| label
            .guide
            .arcs()
            .all(|cmd| matches!(cmd, PathCommand::Arc { sweep: true, .. }))));
        assert_eq!(placement.rows[1].id, "tp-1-far-0");
    }

    #[test]
    fn collapsed_rows_get_no_labels() {
        let config = ChartConfig {
            inner_core: 400.0,
            ..ChartConfig::default()
        };
        let layout = compute_layout(&DataModel::default_data(), &config);
        assert_eq!(layout.unit, 0.0);
        let placement = place_labels(&layout, &config, &HeuristicEstimator);
        assert!(placement.rows.is_empty());
    }

    #[test]
    fn narrow_sectors_drop_labels_instead_of_drawing_stubs() {
        let config = ChartConfig::default();
        let cats: Vec<Category> = (0..120)
            .map(|i| Category::new(format!("c{i}")).with_items(Tier::Challenging, &["数据结构"]))
            .collect();
        let layout = layout_for(cats, &config);
        let placement = place_labels(&layout, &config, &HeuristicEstimator);
        assert!(placement.rows.iter().all(|label| !label.text.is_empty()));
        assert!(placement.rows.len() < 120);
        assert_eq!(placement.categories.len(), 120);
    }

    #[test]
    fn category_labels_extend_horizontally_outward() {
        let config = ChartConfig::default();
        let cats = vec![
            Category::new("Right").with_items(Tier::Far, &["x"]),
            Category::new("Left").with_items(Tier::Far, &["y"]),
        ];
        let layout = layout_for(cats, &config);
        let placement = place_labels(&layout, &config, &HeuristicEstimator);
        // Sector 0 bisects at π/2 (cos ≈ 0, rounds either way); sector 1 at 3π/2.
        for label in &placement.categories {
            let cat = &layout.categories[label.category];
            let expected = if cat.mid_angle().cos() >= 0.0 {
                TextAnchor::Start
            } else {
                TextAnchor::End
            };
            assert_eq!(label.anchor, expected);
            assert!(label.anchor_radius <= layout.size / 2.0 - config.canvas_safety);
            assert!(label.anchor_radius >= cat.outer_radius + config.label_margin_min - 1e-3
                || label.anchor_radius == layout.size / 2.0 - config.canvas_safety);
        }
    }

    #[test]
    fn category_label_is_truncated_to_canvas_edge() {
        let config = ChartConfig::default();
        let long_name = "A category name that is far too long to ever fit beside the chart";
        let cats = vec![
            Category::new(long_name).with_items(Tier::Far, &["x"]),
            Category::new("B"),
            Category::new("C"),
            Category::new("D"),
        ];
        let layout = layout_for(cats, &config);
        let label = place_category_label(&layout, &layout.categories[0], &config);
        assert_eq!(label.anchor, TextAnchor::Start);
        assert!(label.text.ends_with('…'));
        assert!(label.text.chars().count() < long_name.chars().count());
        let right_edge = layout.size - config.canvas_safety;
        assert!(label.x + label.available <= right_edge + 1e-3);
    }
}
