//! Composite export: the rendered chart plus a generated legend, as one SVG
//! document or a scaled PNG.

use crate::config::{Config, ExportConfig};
use crate::ir::{DataModel, Tier};
use crate::layout::{
    HeuristicEstimator, LabelPlacement, RingLayout, TextAnchor, WidthEstimator,
    compute_layout_with, place_labels,
};
use crate::render::render_svg;
use crate::scene::{Baseline, Highlight, Scene, SceneNode, TextStyle, build_chart_scene};
use crate::theme::Theme;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("composite document could not be parsed: {0}")]
    Parse(String),
    #[error("failed to allocate a {width}x{height} raster surface")]
    Surface { width: u32, height: u32 },
    #[error("png encoding failed: {0}")]
    Encode(String),
}

/// Encoded PNG plus its pixel dimensions.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

pub fn legend_label(tier: Tier) -> String {
    format!("{}. {} / {}", tier.ordinal(), tier.name_cn(), tier.name_en())
}

/// Legend panel in its own coordinate space, origin at the panel's top-left.
pub fn build_legend(theme: &Theme, export: &ExportConfig, width: f32) -> Vec<SceneNode> {
    let mut nodes = vec![
        SceneNode::Rect {
            x: 0.0,
            y: 0.0,
            width,
            height: export.legend_height(),
            rx: export.legend_corner_radius,
            fill: theme.legend_background.clone(),
            stroke: Some(theme.legend_border.clone()),
        },
        SceneNode::Text {
            x: export.legend_pad,
            y: export.legend_pad + export.legend_title_height,
            text: export.legend_title.clone(),
            style: TextStyle {
                font_size: export.legend_title_size,
                font_weight: 600,
                fill: theme.legend_title_color.clone(),
                anchor: TextAnchor::Start,
                baseline: Baseline::Hanging,
                halo: None,
            },
        },
    ];

    let start_y = export.legend_pad + export.legend_title_height + export.legend_title_gap;
    for (idx, tier) in Tier::ALL.into_iter().enumerate() {
        let item_y = start_y + idx as f32 * export.legend_item_height;
        nodes.push(SceneNode::Rect {
            x: export.legend_pad,
            y: item_y + 2.0,
            width: export.legend_swatch,
            height: export.legend_swatch,
            rx: export.legend_swatch_radius,
            fill: theme.tier_color(tier).to_string(),
            stroke: None,
        });
        nodes.push(SceneNode::Text {
            x: export.legend_pad + export.legend_swatch + 8.0,
            y: item_y + export.legend_swatch,
            text: legend_label(tier),
            style: TextStyle {
                font_size: export.legend_text_size,
                font_weight: 400,
                fill: theme.legend_text_color.clone(),
                anchor: TextAnchor::Start,
                baseline: Baseline::Auto,
                halo: None,
            },
        });
    }
    nodes
}

/// Places the chart at `(pad, pad)` and the legend directly beneath it.
pub fn compose(chart: &Scene, theme: &Theme, export: &ExportConfig) -> Scene {
    let pad = export.pad;
    let legend_height = export.legend_height();
    let mut doc = Scene::new(
        chart.width + pad * 2.0,
        chart.height + pad + legend_height + pad,
        chart.font_family.clone(),
    );
    doc.defs = chart.defs.clone();
    doc.nodes.push(SceneNode::Group {
        translate: Some((pad, pad)),
        children: chart.nodes.clone(),
    });
    doc.nodes.push(SceneNode::Group {
        translate: Some((pad, pad + chart.height)),
        children: build_legend(theme, export, chart.width),
    });
    doc
}

/// Rasterizes an SVG document at `scale` over an opaque background.
#[cfg(feature = "png")]
pub fn rasterize(svg: &str, scale: f32, background: &str) -> Result<RasterImage, ExportError> {
    use resvg::tiny_skia::{Color, Pixmap, Transform};

    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(svg, &opt).map_err(|err| ExportError::Parse(err.to_string()))?;

    let size = tree.size();
    let width = (size.width() * scale).ceil().max(1.0) as u32;
    let height = (size.height() * scale).ceil().max(1.0) as u32;
    let mut pixmap = Pixmap::new(width, height).ok_or(ExportError::Surface { width, height })?;

    let (r, g, b, a) = parse_hex_color(background).unwrap_or((255, 255, 255, 255));
    pixmap.fill(Color::from_rgba8(r, g, b, a));
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    let png = pixmap
        .encode_png()
        .map_err(|err| ExportError::Encode(err.to_string()))?;
    tracing::debug!(width, height, bytes = png.len(), "rasterized composite");
    Ok(RasterImage { width, height, png })
}

/// `#rgb`, `#rrggbb` or `#rrggbbaa` to RGBA bytes.
pub fn parse_hex_color(value: &str) -> Option<(u8, u8, u8, u8)> {
    let hex = value.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut out = [0u8; 3];
            for (slot, idx) in out.iter_mut().zip(0..3) {
                let v = channel(&hex[idx..idx + 1])?;
                *slot = v * 17;
            }
            Some((out[0], out[1], out[2], 255))
        }
        6 => Some((
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            255,
        )),
        8 => Some((
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            channel(&hex[6..8])?,
        )),
        _ => None,
    }
}

/// Result of the most recent render pass.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub layout: RingLayout,
    pub placement: LabelPlacement,
    pub scene: Scene,
}

/// Holds the last rendered chart so the export entry points have something
/// to compose. Both exports return `None` until `render` has run once.
pub struct ChartSession {
    config: Config,
    estimator: Box<dyn WidthEstimator + Send + Sync>,
    last: Option<RenderedChart>,
}

impl ChartSession {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            estimator: Box::new(HeuristicEstimator),
            last: None,
        }
    }

    pub fn with_estimator(mut self, estimator: impl WidthEstimator + Send + Sync + 'static) -> Self {
        self.estimator = Box::new(estimator);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Lays out and draws `model`, replacing the previous render.
    pub fn render(&mut self, model: &DataModel, highlight: Option<Highlight>) -> &RenderedChart {
        let estimator = self.estimator.as_ref();
        let layout = compute_layout_with(model, &self.config.chart, estimator);
        let placement = place_labels(&layout, &self.config.chart, estimator);
        let scene = build_chart_scene(
            &layout,
            &placement,
            &self.config.theme,
            &self.config.chart,
            highlight,
        );
        tracing::debug!(
            rows = placement.rows.len(),
            categories = placement.categories.len(),
            "chart rendered"
        );
        self.last.insert(RenderedChart {
            layout,
            placement,
            scene,
        })
    }

    pub fn last_render(&self) -> Option<&RenderedChart> {
        self.last.as_ref()
    }

    /// Chart alone, without the legend.
    pub fn chart_svg(&self) -> Option<String> {
        self.last.as_ref().map(|chart| render_svg(&chart.scene))
    }

    pub fn composite_scene(&self) -> Option<Scene> {
        let chart = self.last.as_ref()?;
        Some(compose(&chart.scene, &self.config.theme, &self.config.export))
    }

    pub fn export_vector(&self) -> Option<String> {
        self.composite_scene().map(|doc| render_svg(&doc))
    }

    #[cfg(feature = "png")]
    pub fn export_raster(&self) -> Option<Result<RasterImage, ExportError>> {
        let svg = self.export_vector()?;
        Some(rasterize(
            &svg,
            self.config.export.raster_scale,
            &self.config.export.raster_background,
        ))
    }
}

impl Default for ChartSession {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl std::fmt::Debug for ChartSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartSession")
            .field("config", &self.config)
            .field("rendered", &self.last.is_some())
            .finish()
    }
}
