use crate::ir::Tier;

use super::geometry::Polar;

/// One item's one-unit-thick sub-band.
#[derive(Debug, Clone)]
pub struct RowLayout {
    pub item: String,
    pub index: usize,
    pub inner_radius: f32,
    pub outer_radius: f32,
    /// Base opacity before any highlight factor is applied.
    pub opacity: f32,
}

impl RowLayout {
    pub fn mid_radius(&self) -> f32 {
        (self.inner_radius + self.outer_radius) / 2.0
    }

    pub fn height(&self) -> f32 {
        self.outer_radius - self.inner_radius
    }
}

/// Spacer rows at the start of a band. They carry no text and render as one
/// solid block.
#[derive(Debug, Clone)]
pub struct SpacerLayout {
    pub rows: usize,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone)]
pub struct BandLayout {
    pub tier: Tier,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub spacer: Option<SpacerLayout>,
    pub rows: Vec<RowLayout>,
}

impl BandLayout {
    pub fn is_visible(&self) -> bool {
        self.outer_radius > self.inner_radius
    }

    pub fn spacer_rows(&self) -> usize {
        self.spacer.as_ref().map_or(0, |spacer| spacer.rows)
    }
}

#[derive(Debug, Clone)]
pub struct CategoryLayout {
    pub index: usize,
    pub name: String,
    pub start_angle: f32,
    pub end_angle: f32,
    pub raw_total: usize,
    /// Baseline spacer rows placed before the first band.
    pub lead_spacer_rows: usize,
    pub total_with_spacer: usize,
    /// Always one entry per tier, innermost first; empty tiers have zero
    /// thickness.
    pub bands: Vec<BandLayout>,
    /// Radius after the last non-empty band.
    pub outer_radius: f32,
}

impl CategoryLayout {
    pub fn mid_angle(&self) -> f32 {
        (self.start_angle + self.end_angle) / 2.0
    }

    pub fn band(&self, tier: Tier) -> Option<&BandLayout> {
        self.bands.iter().find(|band| band.tier == tier)
    }
}

/// Full allocator output for one render pass.
#[derive(Debug, Clone)]
pub struct RingLayout {
    pub size: f32,
    pub polar: Polar,
    pub inner_core: f32,
    pub reserved_padding: f32,
    pub max_radius: f32,
    pub max_total: usize,
    /// Radial pixels per item, shared by every row in the chart.
    pub unit: f32,
    pub angle_step: f32,
    pub chart_font_size: f32,
    pub hub_filled: bool,
    pub categories: Vec<CategoryLayout>,
}

impl RingLayout {
    pub fn used_radius(&self) -> f32 {
        self.categories
            .iter()
            .map(|cat| cat.outer_radius)
            .fold(self.inner_core, f32::max)
    }
}
