use crate::ir::Tier;
use crate::theme::Theme;
use anyhow::bail;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

static COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").expect("valid color regex")
});

/// Direction item labels flow around the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextFlow {
    Clockwise,
    CounterClockwise,
}

/// Radial layout policy. The spacer-row counts are tuned constants, kept
/// overridable rather than derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    pub size: f32,
    pub inner_core: f32,
    pub min_row_thickness: f32,
    pub comfortable_spacer_rows: usize,
    pub baseline_spacer_rows: usize,
    pub label_font_size: f32,
    pub label_offset: f32,
    pub label_padding_min: f32,
    pub label_padding_extra: f32,
    pub chart_font_min: f32,
    pub chart_font_max: f32,
    pub row_pad_px: f32,
    pub row_safe_px: f32,
    pub opacity_decay: f32,
    pub opacity_floor: f32,
    pub idle_opacity: f32,
    pub label_margin_min: f32,
    pub canvas_safety: f32,
    pub text_flow: TextFlow,
    pub halo_width: f32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            size: 720.0,
            inner_core: 20.0,
            min_row_thickness: 6.0,
            comfortable_spacer_rows: 3,
            baseline_spacer_rows: 1,
            label_font_size: 14.0,
            label_offset: 8.0,
            label_padding_min: 28.0,
            label_padding_extra: 8.0,
            chart_font_min: 7.0,
            chart_font_max: 12.0,
            row_pad_px: 6.0,
            row_safe_px: 8.0,
            opacity_decay: 0.2,
            opacity_floor: 0.3,
            idle_opacity: 0.9,
            label_margin_min: 16.0,
            canvas_safety: 4.0,
            text_flow: TextFlow::CounterClockwise,
            halo_width: 4.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub pad: f32,
    pub legend_pad: f32,
    pub legend_title_height: f32,
    pub legend_title_gap: f32,
    pub legend_item_height: f32,
    pub legend_item_gap: f32,
    pub legend_swatch: f32,
    pub legend_swatch_radius: f32,
    pub legend_corner_radius: f32,
    pub legend_title: String,
    pub legend_title_size: f32,
    pub legend_text_size: f32,
    pub raster_scale: f32,
    pub raster_background: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            pad: 24.0,
            legend_pad: 12.0,
            legend_title_height: 18.0,
            legend_title_gap: 8.0,
            legend_item_height: 22.0,
            legend_item_gap: 6.0,
            legend_swatch: 14.0,
            legend_swatch_radius: 3.0,
            legend_corner_radius: 12.0,
            legend_title: "图例 Legend".to_string(),
            legend_title_size: 14.0,
            legend_text_size: 13.0,
            raster_scale: 2.0,
            raster_background: "#ffffff".to_string(),
        }
    }
}

impl ExportConfig {
    pub fn legend_height(&self) -> f32 {
        self.legend_pad * 2.0
            + self.legend_title_height
            + self.legend_title_gap
            + Tier::ALL.len() as f32 * self.legend_item_height
            + self.legend_item_gap
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub chart: ChartConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeFile {
    font_family: Option<String>,
    comfortable: Option<String>,
    challenging: Option<String>,
    near: Option<String>,
    far: Option<String>,
    background: Option<String>,
    item_text_color: Option<String>,
    category_text_color: Option<String>,
    halo_color: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartConfigFile {
    size: Option<f32>,
    inner_core: Option<f32>,
    min_row_thickness: Option<f32>,
    comfortable_spacer_rows: Option<usize>,
    baseline_spacer_rows: Option<usize>,
    label_font_size: Option<f32>,
    text_flow: Option<TextFlow>,
    halo_width: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportConfigFile {
    pad: Option<f32>,
    legend_title: Option<String>,
    raster_scale: Option<f32>,
    raster_background: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<ThemeFile>,
    chart: Option<ChartConfigFile>,
    export: Option<ExportConfigFile>,
}

pub fn validate_color(field: &str, value: &str) -> anyhow::Result<()> {
    if !COLOR_RE.is_match(value) {
        bail!("{field}: expected #rgb, #rrggbb or #rrggbbaa color, got {value:?}");
    }
    Ok(())
}

fn set_color(target: &mut String, field: &str, value: Option<String>) -> anyhow::Result<()> {
    if let Some(value) = value {
        validate_color(field, &value)?;
        *target = value;
    }
    Ok(())
}

/// Loads a JSON5 file of partial overrides on top of the defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = json5::from_str(contents)?;

    if let Some(theme) = parsed.theme {
        if let Some(v) = theme.font_family {
            config.theme.font_family = v;
        }
        for (tier, value) in Tier::ALL
            .into_iter()
            .zip([theme.comfortable, theme.challenging, theme.near, theme.far])
        {
            set_color(config.theme.tier_color_mut(tier), tier.key(), value)?;
        }
        if let Some(background) = theme.background {
            validate_color("background", &background)?;
            // Surfaces that sit on the page follow it unless set on their own.
            config.theme.halo_color = background.clone();
            config.theme.hub_empty_color = background.clone();
            config.export.raster_background = background.clone();
            config.theme.background = background;
        }
        set_color(
            &mut config.theme.item_text_color,
            "itemTextColor",
            theme.item_text_color,
        )?;
        set_color(
            &mut config.theme.category_text_color,
            "categoryTextColor",
            theme.category_text_color,
        )?;
        set_color(&mut config.theme.halo_color, "haloColor", theme.halo_color)?;
    }

    if let Some(chart) = parsed.chart {
        if let Some(v) = chart.size {
            if v <= 0.0 {
                bail!("chart.size must be positive, got {v}");
            }
            config.chart.size = v;
        }
        if let Some(v) = chart.inner_core {
            config.chart.inner_core = v.max(0.0);
        }
        if let Some(v) = chart.min_row_thickness {
            config.chart.min_row_thickness = v.max(1.0);
        }
        if let Some(v) = chart.comfortable_spacer_rows {
            config.chart.comfortable_spacer_rows = v;
        }
        if let Some(v) = chart.baseline_spacer_rows {
            config.chart.baseline_spacer_rows = v;
        }
        if let Some(v) = chart.label_font_size {
            config.chart.label_font_size = v.max(1.0);
        }
        if let Some(v) = chart.text_flow {
            config.chart.text_flow = v;
        }
        if let Some(v) = chart.halo_width {
            config.chart.halo_width = v.max(0.0);
        }
    }

    if let Some(export) = parsed.export {
        if let Some(v) = export.pad {
            config.export.pad = v.max(0.0);
        }
        if let Some(v) = export.legend_title {
            config.export.legend_title = v;
        }
        if let Some(v) = export.raster_scale {
            if v <= 0.0 {
                bail!("export.rasterScale must be positive, got {v}");
            }
            config.export.raster_scale = v;
        }
        set_color(
            &mut config.export.raster_background,
            "rasterBackground",
            export.raster_background,
        )?;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_chart() {
        let config = Config::default();
        assert_eq!(config.chart.size, 720.0);
        assert_eq!(config.chart.inner_core, 20.0);
        assert_eq!(config.chart.comfortable_spacer_rows, 3);
        assert_eq!(config.export.legend_height(), 144.0);
        assert_eq!(config.export.raster_scale, 2.0);
    }

    #[test]
    fn overrides_merge_over_defaults() {
        let config = parse_config(
            r##"{
                // JSON5 comments are fine
                theme: { near: "#112233" },
                chart: { size: 900, textFlow: "clockwise", baselineSpacerRows: 2 },
                export: { legendTitle: "Legend" },
            }"##,
        )
        .unwrap();
        assert_eq!(config.theme.near_color, "#112233");
        assert_eq!(config.theme.far_color, "#ffa0a0ff");
        assert_eq!(config.chart.size, 900.0);
        assert_eq!(config.chart.text_flow, TextFlow::Clockwise);
        assert_eq!(config.chart.baseline_spacer_rows, 2);
        assert_eq!(config.chart.inner_core, 20.0);
        assert_eq!(config.export.legend_title, "Legend");
    }

    #[test]
    fn background_drives_halo_hub_and_raster_fill() {
        let config = parse_config(r##"{ theme: { background: "#0f172a" } }"##).unwrap();
        assert_eq!(config.theme.background, "#0f172a");
        assert_eq!(config.theme.halo_color, "#0f172a");
        assert_eq!(config.theme.hub_empty_color, "#0f172a");
        assert_eq!(config.export.raster_background, "#0f172a");

        let config = parse_config(
            r##"{
                theme: { background: "#0f172a", haloColor: "#ffffff" },
                export: { rasterBackground: "#000000" },
            }"##,
        )
        .unwrap();
        assert_eq!(config.theme.halo_color, "#ffffff");
        assert_eq!(config.theme.hub_empty_color, "#0f172a");
        assert_eq!(config.export.raster_background, "#000000");
    }

    #[test]
    fn rejects_bad_colors_and_sizes() {
        let err = parse_config(r#"{ theme: { far: "red" } }"#).unwrap_err();
        assert!(err.to_string().contains("far"));
        assert!(parse_config(r#"{ chart: { size: 0 } }"#).is_err());
        assert!(validate_color("x", "#abc").is_ok());
        assert!(validate_color("x", "#f5ca0bff").is_ok());
        assert!(validate_color("x", "#f5ca0").is_err());
    }
}
