use capability_rings::{ChartSession, Config, Highlight, TextFlow, Tier, parse_data_model};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartRenderOptions {
    size: Option<f32>,
    font_family: Option<String>,
    text_flow: Option<TextFlow>,
    highlight: Option<HighlightOption>,
    /// Chart only, without the legend panel.
    chart_only: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct HighlightOption {
    category: usize,
    tier: Tier,
}

fn build_config(options: &ChartRenderOptions) -> Config {
    let mut config = Config::default();
    if let Some(size) = options.size.filter(|size| *size > 0.0) {
        config.chart.size = size;
    }
    if let Some(font_family) = &options.font_family {
        config.theme.font_family = font_family.clone();
    }
    if let Some(text_flow) = options.text_flow {
        config.chart.text_flow = text_flow;
    }
    config
}

fn render(data_json: &str, options: ChartRenderOptions) -> Result<String, String> {
    let model = parse_data_model(data_json).map_err(|error| error.to_string())?;
    let highlight = options.highlight.as_ref().map(|h| Highlight {
        category: h.category,
        tier: h.tier,
    });
    let mut session = ChartSession::new(build_config(&options));
    session.render(&model, highlight);
    let svg = if options.chart_only.unwrap_or(false) {
        session.chart_svg()
    } else {
        session.export_vector()
    };
    svg.ok_or_else(|| "nothing rendered".to_string())
}

#[wasm_bindgen]
pub fn render_capability_svg(data_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<ChartRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        ChartRenderOptions::default()
    };
    render(data_json, options).map_err(|error| JsValue::from_str(&error))
}
