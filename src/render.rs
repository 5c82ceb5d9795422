use crate::scene::{Definition, Paint, Scene, SceneNode, TextStyle};
use anyhow::Result;
use std::path::Path;

pub fn render_svg(scene: &Scene) -> String {
    let mut svg = String::new();
    let width = scene.width;
    let height = scene.height;

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\" font-family=\"{}\">",
        escape_xml(&scene.font_family)
    ));

    if !scene.defs.is_empty() {
        svg.push_str("<defs>");
        for def in &scene.defs {
            push_definition(&mut svg, def);
        }
        svg.push_str("</defs>");
    }

    for node in &scene.nodes {
        push_node(&mut svg, node);
    }

    svg.push_str("</svg>");
    svg
}

fn push_definition(svg: &mut String, def: &Definition) {
    match def {
        Definition::RadialGradient { id, stops } => {
            svg.push_str(&format!(
                "<radialGradient id=\"{}\" cx=\"50%\" cy=\"50%\" r=\"50%\">",
                escape_xml(id)
            ));
            for stop in stops {
                svg.push_str(&format!(
                    "<stop offset=\"{}%\" stop-color=\"{}\" stop-opacity=\"{}\"/>",
                    (stop.offset * 100.0).round(),
                    stop.color,
                    stop.opacity
                ));
            }
            svg.push_str("</radialGradient>");
        }
    }
}

fn push_node(svg: &mut String, node: &SceneNode) {
    match node {
        SceneNode::Sector {
            path,
            fill,
            opacity,
        } => {
            svg.push_str(&format!(
                "<path d=\"{path}\" fill=\"{fill}\" fill-opacity=\"{opacity:.3}\" stroke=\"none\"/>"
            ));
        }
        SceneNode::TextOnArc {
            id,
            guide,
            text,
            font_size,
            font_weight,
            fill,
        } => {
            let id = escape_xml(id);
            svg.push_str(&format!(
                "<g><path id=\"{id}\" d=\"{guide}\" fill=\"none\" stroke=\"none\"/>"
            ));
            svg.push_str(&format!(
                "<text font-size=\"{font_size}\" font-weight=\"{font_weight}\" fill=\"{fill}\"><textPath href=\"#{id}\" xlink:href=\"#{id}\" startOffset=\"50%\" text-anchor=\"middle\">{}</textPath></text></g>",
                escape_xml(text)
            ));
        }
        SceneNode::Text { x, y, text, style } => {
            svg.push_str(&format!(
                "<text x=\"{x:.2}\" y=\"{y:.2}\"{}>{}</text>",
                text_style_attrs(style),
                escape_xml(text)
            ));
        }
        SceneNode::Rect {
            x,
            y,
            width,
            height,
            rx,
            fill,
            stroke,
        } => {
            let stroke = stroke
                .as_deref()
                .map(|color| format!(" stroke=\"{color}\""))
                .unwrap_or_default();
            svg.push_str(&format!(
                "<rect x=\"{x}\" y=\"{y}\" width=\"{width}\" height=\"{height}\" rx=\"{rx}\" fill=\"{fill}\"{stroke}/>"
            ));
        }
        SceneNode::Circle { cx, cy, r, fill } => {
            let fill = match fill {
                Paint::Solid(color) => color.clone(),
                Paint::Gradient(id) => format!("url(#{})", escape_xml(id)),
            };
            svg.push_str(&format!(
                "<circle cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{r:.2}\" fill=\"{fill}\"/>"
            ));
        }
        SceneNode::Group {
            translate,
            children,
        } => {
            match translate {
                Some((tx, ty)) => svg.push_str(&format!("<g transform=\"translate({tx}, {ty})\">")),
                None => svg.push_str("<g>"),
            }
            for child in children {
                push_node(svg, child);
            }
            svg.push_str("</g>");
        }
    }
}

fn text_style_attrs(style: &TextStyle) -> String {
    let mut attrs = format!(
        " text-anchor=\"{}\" font-size=\"{}\" font-weight=\"{}\" fill=\"{}\"",
        style.anchor.as_svg(),
        style.font_size,
        style.font_weight,
        style.fill
    );
    if let Some(baseline) = style.baseline.as_svg() {
        attrs.push_str(&format!(" dominant-baseline=\"{baseline}\""));
    }
    if let Some(halo) = &style.halo {
        attrs.push_str(&format!(
            " stroke=\"{}\" stroke-width=\"{}\" stroke-linejoin=\"round\" paint-order=\"stroke\"",
            halo.color, halo.width
        ));
    }
    attrs
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
            tracing::info!(path = %path.display(), bytes = svg.len(), "wrote svg");
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

pub fn write_output_png(png: &[u8], output: &Path) -> Result<()> {
    std::fs::write(output, png)?;
    tracing::info!(path = %output.display(), bytes = png.len(), "wrote png");
    Ok(())
}

pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;
    use crate::ir::{Category, DataModel, Tier};
    use crate::layout::{HeuristicEstimator, TextAnchor, compute_layout, place_labels};
    use crate::scene::{Baseline, Halo, build_chart_scene};
    use crate::theme::Theme;

    fn chart_svg(model: &DataModel) -> String {
        let config = ChartConfig::default();
        let layout = compute_layout(model, &config);
        let placement = place_labels(&layout, &config, &HeuristicEstimator);
        let scene = build_chart_scene(&layout, &placement, &Theme::default(), &config, None);
        render_svg(&scene)
    }

    #[test]
    fn render_svg_basic() {
        let svg = chart_svg(&DataModel::default_data());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("width=\"720\""));
        assert!(svg.contains("<radialGradient id=\"bgGlow\""));
        assert!(svg.contains("stop-color=\"#fecdd3\" stop-opacity=\"0.6\""));
        assert!(svg.contains("fill=\"url(#bgGlow)\""));
        assert!(svg.contains("href=\"#tp-0-comfortable-0\""));
        assert!(svg.contains("startOffset=\"50%\""));
        assert!(svg.contains("paint-order=\"stroke\""));
        assert!(svg.contains("前端"));
    }

    #[test]
    fn escapes_user_text() {
        let model = DataModel {
            categories: vec![Category::new("R&D <core>").with_items(Tier::Far, &["\"quoted\""])],
        };
        let svg = chart_svg(&model);
        assert!(svg.contains("R&amp;D &lt;core&gt;"));
        assert!(svg.contains("&quot;quoted&quot;"));
        assert!(!svg.contains("<core>"));
    }

    #[test]
    fn text_style_writes_halo_and_baseline() {
        let style = TextStyle {
            font_size: 14.0,
            font_weight: 700,
            fill: "#1e293b".to_string(),
            anchor: TextAnchor::End,
            baseline: Baseline::Middle,
            halo: Some(Halo {
                color: "#ffffff".to_string(),
                width: 4.0,
            }),
        };
        let attrs = text_style_attrs(&style);
        assert!(attrs.contains("text-anchor=\"end\""));
        assert!(attrs.contains("dominant-baseline=\"middle\""));
        assert!(attrs.contains("stroke-width=\"4\""));
    }

    #[test]
    fn group_translate_is_serialized() {
        let mut scene = Scene::new(10.0, 10.0, "sans-serif");
        scene.nodes.push(SceneNode::Group {
            translate: Some((24.0, 744.0)),
            children: vec![SceneNode::Rect {
                x: 0.0,
                y: 0.0,
                width: 720.0,
                height: 144.0,
                rx: 12.0,
                fill: "#ffffff".to_string(),
                stroke: Some("#e5e7eb".to_string()),
            }],
        });
        let svg = render_svg(&scene);
        assert!(svg.contains("<g transform=\"translate(24, 744)\"><rect x=\"0\" y=\"0\" width=\"720\" height=\"144\" rx=\"12\" fill=\"#ffffff\" stroke=\"#e5e7eb\"/></g>"));
        assert!(!svg.contains("<defs>"));
    }
}
