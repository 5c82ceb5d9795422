use crate::layout::{LabelPlacement, RingLayout};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub size: f32,
    pub inner_core: f32,
    pub reserved_padding: f32,
    pub max_radius: f32,
    pub max_total: usize,
    pub unit: f32,
    pub chart_font_size: f32,
    pub hub_filled: bool,
    pub categories: Vec<CategoryDump>,
}

#[derive(Debug, Serialize)]
pub struct CategoryDump {
    pub index: usize,
    pub name: String,
    pub start_angle: f32,
    pub end_angle: f32,
    pub raw_total: usize,
    pub total_with_spacer: usize,
    pub lead_spacer_rows: usize,
    pub outer_radius: f32,
    pub bands: Vec<BandDump>,
    pub label: Option<CategoryLabelDump>,
}

#[derive(Debug, Serialize)]
pub struct BandDump {
    pub tier: &'static str,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub spacer_rows: usize,
    pub rows: Vec<RowDump>,
}

#[derive(Debug, Serialize)]
pub struct RowDump {
    pub item: String,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub opacity: f32,
    /// Fitted text, absent when the row's arc was too short.
    pub label: Option<String>,
    pub font_size: Option<f32>,
}

#[derive(Debug, Serialize)]
pub struct CategoryLabelDump {
    pub x: f32,
    pub y: f32,
    pub anchor: &'static str,
    pub available: f32,
    pub text: String,
}

impl LayoutDump {
    pub fn from_layout(layout: &RingLayout, placement: &LabelPlacement) -> Self {
        let categories = layout
            .categories
            .iter()
            .map(|cat| {
                let bands = cat
                    .bands
                    .iter()
                    .map(|band| BandDump {
                        tier: band.tier.key(),
                        inner_radius: band.inner_radius,
                        outer_radius: band.outer_radius,
                        spacer_rows: band.spacer_rows(),
                        rows: band
                            .rows
                            .iter()
                            .map(|row| {
                                let label = placement.rows.iter().find(|label| {
                                    label.category == cat.index
                                        && label.tier == band.tier
                                        && label.row == row.index
                                });
                                RowDump {
                                    item: row.item.clone(),
                                    inner_radius: row.inner_radius,
                                    outer_radius: row.outer_radius,
                                    opacity: row.opacity,
                                    label: label.map(|l| l.text.clone()),
                                    font_size: label.map(|l| l.font_size),
                                }
                            })
                            .collect(),
                    })
                    .collect();
                let label = placement
                    .categories
                    .iter()
                    .find(|label| label.category == cat.index)
                    .map(|label| CategoryLabelDump {
                        x: label.x,
                        y: label.y,
                        anchor: label.anchor.as_svg(),
                        available: label.available,
                        text: label.text.clone(),
                    });
                CategoryDump {
                    index: cat.index,
                    name: cat.name.clone(),
                    start_angle: cat.start_angle,
                    end_angle: cat.end_angle,
                    raw_total: cat.raw_total,
                    total_with_spacer: cat.total_with_spacer,
                    lead_spacer_rows: cat.lead_spacer_rows,
                    outer_radius: cat.outer_radius,
                    bands,
                    label,
                }
            })
            .collect();

        LayoutDump {
            size: layout.size,
            inner_core: layout.inner_core,
            reserved_padding: layout.reserved_padding,
            max_radius: layout.max_radius,
            max_total: layout.max_total,
            unit: layout.unit,
            chart_font_size: layout.chart_font_size,
            hub_filled: layout.hub_filled,
            categories,
        }
    }
}

pub fn write_layout_dump(
    path: &Path,
    layout: &RingLayout,
    placement: &LabelPlacement,
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, placement);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
