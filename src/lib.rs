#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod edit;
pub mod export;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod scene;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{ChartConfig, Config, ExportConfig, TextFlow, load_config, parse_config};
pub use export::{ChartSession, ExportError, RasterImage};
pub use ir::{Category, DataModel, Skills, Tier};
pub use layout::{compute_layout, place_labels};
pub use parser::{ImportError, parse_data_model, to_json_pretty};
pub use render::render_svg;
pub use scene::Highlight;
pub use theme::Theme;

/// Parses `input` and returns the composite (chart + legend) SVG.
pub fn render_composite_svg(input: &str, config: Config) -> Result<String, ImportError> {
    let model = parse_data_model(input)?;
    let mut session = ChartSession::new(config);
    session.render(&model, None);
    Ok(session.export_vector().unwrap_or_default())
}
