use serde::{Deserialize, Serialize};

use crate::ir::Tier;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f32,
    pub color: String,
    pub opacity: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub comfortable_color: String,
    pub challenging_color: String,
    pub near_color: String,
    pub far_color: String,
    pub background: String,
    pub hub_empty_color: String,
    pub glow_stops: Vec<GradientStop>,
    pub item_text_color: String,
    pub category_text_color: String,
    pub halo_color: String,
    pub legend_background: String,
    pub legend_border: String,
    pub legend_title_color: String,
    pub legend_text_color: String,
}

impl Theme {
    pub fn capability_default() -> Self {
        Self {
            font_family: "Inter, \"PingFang SC\", \"Microsoft YaHei\", system-ui, sans-serif"
                .to_string(),
            comfortable_color: "#3b82f6".to_string(),
            challenging_color: "#f5ca0bff".to_string(),
            near_color: "#ef4444".to_string(),
            far_color: "#ffa0a0ff".to_string(),
            background: "#ffffff".to_string(),
            hub_empty_color: "#ffffff".to_string(),
            glow_stops: vec![
                GradientStop {
                    offset: 0.0,
                    color: "#ffffff".to_string(),
                    opacity: 1.0,
                },
                GradientStop {
                    offset: 0.7,
                    color: "#fecdd3".to_string(),
                    opacity: 0.6,
                },
                GradientStop {
                    offset: 1.0,
                    color: "#fecdd3".to_string(),
                    opacity: 0.2,
                },
            ],
            item_text_color: "#ffffff".to_string(),
            category_text_color: "#1e293b".to_string(),
            halo_color: "#ffffff".to_string(),
            legend_background: "#ffffff".to_string(),
            legend_border: "#e5e7eb".to_string(),
            legend_title_color: "#334155".to_string(),
            legend_text_color: "#475569".to_string(),
        }
    }

    pub fn tier_color(&self, tier: Tier) -> &str {
        match tier {
            Tier::Comfortable => &self.comfortable_color,
            Tier::Challenging => &self.challenging_color,
            Tier::Near => &self.near_color,
            Tier::Far => &self.far_color,
        }
    }

    pub fn tier_color_mut(&mut self, tier: Tier) -> &mut String {
        match tier {
            Tier::Comfortable => &mut self.comfortable_color,
            Tier::Challenging => &mut self.challenging_color,
            Tier::Near => &mut self.near_color,
            Tier::Far => &mut self.far_color,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::capability_default()
    }
}
