//! Typed draw commands shared by the SVG serializer and the exporter.
//!
//! A `Scene` is a flat list of nodes plus document-level definitions. Nothing
//! here knows about SVG syntax; `render` turns a scene into markup and
//! `export` composes scenes.

use crate::config::ChartConfig;
use crate::ir::Tier;
use crate::layout::{LabelPlacement, PathData, RingLayout, TextAnchor};
use crate::theme::{GradientStop, Theme};

pub const GLOW_GRADIENT_ID: &str = "bgGlow";

/// Fill of a shape: a flat color or a reference to a gradient definition.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(String),
    Gradient(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    Auto,
    Middle,
    Hanging,
}

impl Baseline {
    pub fn as_svg(self) -> Option<&'static str> {
        match self {
            Baseline::Auto => None,
            Baseline::Middle => Some("middle"),
            Baseline::Hanging => Some("hanging"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Halo {
    pub color: String,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub font_weight: u16,
    pub fill: String,
    pub anchor: TextAnchor,
    pub baseline: Baseline,
    pub halo: Option<Halo>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    RadialGradient { id: String, stops: Vec<GradientStop> },
}

impl Definition {
    pub fn id(&self) -> &str {
        match self {
            Definition::RadialGradient { id, .. } => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneNode {
    /// Annular wedge filled with a tier color.
    Sector {
        path: PathData,
        fill: String,
        opacity: f32,
    },
    /// Text centered along an invisible guide path.
    TextOnArc {
        id: String,
        guide: PathData,
        text: String,
        font_size: f32,
        font_weight: u16,
        fill: String,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        style: TextStyle,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        rx: f32,
        fill: String,
        stroke: Option<String>,
    },
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
        fill: Paint,
    },
    Group {
        translate: Option<(f32, f32)>,
        children: Vec<SceneNode>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub font_family: String,
    pub defs: Vec<Definition>,
    pub nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn new(width: f32, height: f32, font_family: impl Into<String>) -> Self {
        Self {
            width,
            height,
            font_family: font_family.into(),
            defs: Vec::new(),
            nodes: Vec::new(),
        }
    }

    /// Depth-first walk over every node, groups included.
    pub fn walk(&self) -> Vec<&SceneNode> {
        fn visit<'a>(nodes: &'a [SceneNode], out: &mut Vec<&'a SceneNode>) {
            for node in nodes {
                out.push(node);
                if let SceneNode::Group { children, .. } = node {
                    visit(children, out);
                }
            }
        }
        let mut out = Vec::new();
        visit(&self.nodes, &mut out);
        out
    }
}

/// The band drawn at full opacity; every other band gets the idle factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub category: usize,
    pub tier: Tier,
}

impl Highlight {
    /// Selecting the active band again clears the highlight.
    pub fn toggle(current: Option<Highlight>, clicked: Highlight) -> Option<Highlight> {
        if current == Some(clicked) {
            None
        } else {
            Some(clicked)
        }
    }
}

/// Builds the chart's draw list, back to front: glow, bands, row labels,
/// category labels, hub.
pub fn build_chart_scene(
    layout: &RingLayout,
    placement: &LabelPlacement,
    theme: &Theme,
    config: &ChartConfig,
    highlight: Option<Highlight>,
) -> Scene {
    let mut scene = Scene::new(layout.size, layout.size, theme.font_family.clone());
    let (cx, cy) = (layout.polar.cx, layout.polar.cy);

    scene.defs.push(Definition::RadialGradient {
        id: GLOW_GRADIENT_ID.to_string(),
        stops: theme.glow_stops.clone(),
    });
    scene.nodes.push(SceneNode::Circle {
        cx,
        cy,
        r: layout.size / 2.0,
        fill: Paint::Gradient(GLOW_GRADIENT_ID.to_string()),
    });

    for category in &layout.categories {
        let mut sectors = Vec::new();
        for band in category.bands.iter().filter(|band| band.is_visible()) {
            let active = highlight.is_some_and(|h| h.category == category.index && h.tier == band.tier);
            let factor = if active { 1.0 } else { config.idle_opacity };
            let fill = theme.tier_color(band.tier).to_string();

            if let Some(spacer) = &band.spacer {
                sectors.push(SceneNode::Sector {
                    path: layout.polar.annular_sector_path(
                        spacer.inner_radius,
                        spacer.outer_radius,
                        category.start_angle,
                        category.end_angle,
                    ),
                    fill: fill.clone(),
                    opacity: spacer.opacity * factor,
                });
            }
            for row in &band.rows {
                sectors.push(SceneNode::Sector {
                    path: layout.polar.annular_sector_path(
                        row.inner_radius,
                        row.outer_radius,
                        category.start_angle,
                        category.end_angle,
                    ),
                    fill: fill.clone(),
                    opacity: row.opacity * factor,
                });
            }
        }
        if !sectors.is_empty() {
            scene.nodes.push(SceneNode::Group {
                translate: None,
                children: sectors,
            });
        }
    }

    if !placement.rows.is_empty() {
        let labels = placement
            .rows
            .iter()
            .map(|label| SceneNode::TextOnArc {
                id: label.id.clone(),
                guide: label.guide.clone(),
                text: label.text.clone(),
                font_size: label.font_size,
                font_weight: 500,
                fill: theme.item_text_color.clone(),
            })
            .collect();
        scene.nodes.push(SceneNode::Group {
            translate: None,
            children: labels,
        });
    }

    let halo = (config.halo_width > 0.0).then(|| Halo {
        color: theme.halo_color.clone(),
        width: config.halo_width,
    });
    for label in placement.categories.iter().filter(|label| !label.text.is_empty()) {
        scene.nodes.push(SceneNode::Text {
            x: label.x,
            y: label.y,
            text: label.text.clone(),
            style: TextStyle {
                font_size: label.font_size,
                font_weight: 700,
                fill: theme.category_text_color.clone(),
                anchor: label.anchor,
                baseline: Baseline::Middle,
                halo: halo.clone(),
            },
        });
    }

    let hub_fill = if layout.hub_filled {
        theme.comfortable_color.clone()
    } else {
        theme.hub_empty_color.clone()
    };
    scene.nodes.push(SceneNode::Circle {
        cx,
        cy,
        r: layout.inner_core,
        fill: Paint::Solid(hub_fill),
    });

    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Category, DataModel};
    use crate::layout::{HeuristicEstimator, compute_layout, place_labels};

    fn scene_for(model: &DataModel, highlight: Option<Highlight>) -> (RingLayout, Scene) {
        let config = ChartConfig::default();
        let layout = compute_layout(model, &config);
        let placement = place_labels(&layout, &config, &HeuristicEstimator);
        let scene = build_chart_scene(&layout, &placement, &Theme::default(), &config, highlight);
        (layout, scene)
    }

    fn sector_opacities(scene: &Scene) -> Vec<f32> {
        scene
            .walk()
            .into_iter()
            .filter_map(|node| match node {
                SceneNode::Sector { opacity, .. } => Some(*opacity),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn comfortable_spacer_renders_as_one_block() {
        let model = DataModel {
            categories: vec![Category::new("A").with_items(Tier::Comfortable, &["x", "y"])],
        };
        let (_, scene) = scene_for(&model, None);
        // spacer block + two rows
        let opacities = sector_opacities(&scene);
        assert_eq!(opacities.len(), 3);
        assert!((opacities[0] - 0.9).abs() < 1e-4);
        assert!((opacities[2] - 0.72).abs() < 1e-4);
    }

    #[test]
    fn highlight_lifts_only_the_selected_band() {
        let model = DataModel {
            categories: vec![
                Category::new("A").with_items(Tier::Near, &["x"]),
                Category::new("B").with_items(Tier::Near, &["y"]),
            ],
        };
        let (_, scene) = scene_for(
            &model,
            Some(Highlight {
                category: 1,
                tier: Tier::Near,
            }),
        );
        assert_eq!(sector_opacities(&scene), vec![0.9, 1.0]);
    }

    #[test]
    fn clicking_the_active_band_clears_highlight() {
        let near = Highlight {
            category: 0,
            tier: Tier::Near,
        };
        let far = Highlight {
            category: 0,
            tier: Tier::Far,
        };
        assert_eq!(Highlight::toggle(None, near), Some(near));
        assert_eq!(Highlight::toggle(Some(near), near), None);
        assert_eq!(Highlight::toggle(Some(near), far), Some(far));
    }

    #[test]
    fn hub_reflects_comfortable_presence() {
        let theme = Theme::default();
        let hub = |scene: &Scene| match scene.nodes.last() {
            Some(SceneNode::Circle {
                fill: Paint::Solid(color),
                r,
                ..
            }) => (color.clone(), *r),
            other => panic!("unexpected last node {other:?}"),
        };

        let (_, scene) = scene_for(&DataModel::default_data(), None);
        assert_eq!(hub(&scene), (theme.comfortable_color.clone(), 20.0));

        let model = DataModel {
            categories: vec![Category::new("A").with_items(Tier::Far, &["x"])],
        };
        let (_, scene) = scene_for(&model, None);
        assert_eq!(hub(&scene).0, theme.hub_empty_color);
    }

    #[test]
    fn glow_is_first_and_defined() {
        let (layout, scene) = scene_for(&DataModel::default_data(), None);
        assert_eq!(scene.defs[0].id(), GLOW_GRADIENT_ID);
        match &scene.nodes[0] {
            SceneNode::Circle { r, fill, .. } => {
                assert_eq!(*r, layout.size / 2.0);
                assert_eq!(*fill, Paint::Gradient(GLOW_GRADIENT_ID.to_string()));
            }
            other => panic!("unexpected first node {other:?}"),
        }
    }

    #[test]
    fn empty_model_still_draws_furniture() {
        let (_, scene) = scene_for(&DataModel::new(), None);
        assert_eq!(scene.nodes.len(), 2);
        assert!(sector_opacities(&scene).is_empty());
    }
}
