use std::collections::BTreeMap;

use airport_dashboard::color::Rgb;
use airport_dashboard::view::{ChartDatum, MapLayer, SeriesPoint};
use eframe::egui::{Color32, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points};

use super::color32;
use crate::state::AppState;

/// Hover distance, in degrees, within which a map tooltip snaps to an airport.
const TOOLTIP_RADIUS_DEG: f64 = 0.05;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the map and charts in the central panel.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(view) = &state.view else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open an airports file to begin  (File → Open…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for notice in &view.notices {
                ui.colored_label(Color32::from_rgb(220, 140, 0), notice.to_string());
            }

            if let Some(layer) = &view.map {
                ui.heading("Airport Map");
                map_plot(ui, layer);
                ui.separator();
            }

            ui.columns(2, |cols: &mut [Ui]| {
                top_elevation_chart(&mut cols[0], &view.top_elevation);
                state_share_chart(&mut cols[1], &view.state_share, &view.state_colors);
            });
            ui.separator();

            mean_elevation_chart(ui, &view.state_mean_elevation);
        });
}

// ---------------------------------------------------------------------------
// Map: one scatter series per facility type
// ---------------------------------------------------------------------------

fn map_plot(ui: &mut Ui, layer: &MapLayer) {
    let mut series: BTreeMap<String, (Rgb, Vec<[f64; 2]>)> = BTreeMap::new();
    for point in &layer.points {
        series
            .entry(point.tooltip.type_label.clone())
            .or_insert_with(|| (point.color, Vec::new()))
            .1
            .push(point.position);
    }

    let tooltips: Vec<([f64; 2], String)> = layer
        .points
        .iter()
        .map(|p| (p.position, p.tooltip.text()))
        .collect();

    Plot::new("airport_map")
        .height(420.0)
        .legend(Legend::default())
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .label_formatter(move |_name, value| nearest_tooltip(&tooltips, value))
        .show(ui, |plot_ui| {
            for (label, (color, positions)) in series {
                let points = Points::new(PlotPoints::from(positions))
                    .name(label)
                    .color(color32(color))
                    .radius(3.0);
                plot_ui.points(points);
            }
        });
}

fn nearest_tooltip(tooltips: &[([f64; 2], String)], value: &PlotPoint) -> String {
    let nearest = tooltips
        .iter()
        .map(|(pos, text)| {
            let dx = pos[0] - value.x;
            let dy = pos[1] - value.y;
            (dx * dx + dy * dy, text)
        })
        .min_by(|a, b| a.0.total_cmp(&b.0));

    match nearest {
        Some((dist_sq, text)) if dist_sq <= TOOLTIP_RADIUS_DEG * TOOLTIP_RADIUS_DEG => text.clone(),
        _ => format!("lon {:.3}, lat {:.3}", value.x, value.y),
    }
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

fn top_elevation_chart(ui: &mut Ui, bars: &[ChartDatum]) {
    ui.heading("Highest Elevation Airports (Filtered)");
    if bars.is_empty() {
        ui.label("No airports to rank.");
        return;
    }

    // Highest bar on top.
    let n = bars.len();
    let chart = BarChart::new(
        bars.iter()
            .enumerate()
            .map(|(i, d)| Bar::new((n - i) as f64, d.value).name(&d.label))
            .collect(),
    )
    .horizontal()
    .color(Color32::from_rgb(31, 119, 180))
    .name("Elevation (ft)");

    Plot::new("top_elevation")
        .height(260.0)
        .x_axis_label("Elevation (ft)")
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::remainder())
        .column(Column::auto())
        .header(18.0, |mut header| {
            header.col(|ui| {
                ui.strong("Airport");
            });
            header.col(|ui| {
                ui.strong("Elevation (ft)");
            });
        })
        .body(|mut body| {
            for d in bars {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(&d.label);
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.0}", d.value));
                    });
                });
            }
        });
}

fn state_share_chart(ui: &mut Ui, slices: &[ChartDatum], colors: &[Rgb]) {
    ui.heading("Airports Per State");
    let total: f64 = slices.iter().map(|d| d.value).sum();
    if total <= 0.0 {
        ui.label("No airports loaded.");
        return;
    }

    let bars: Vec<Bar> = slices
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(i, (d, c))| {
            Bar::new(i as f64, d.value)
                .name(format!("{} ({:.1}%)", d.label, 100.0 * d.value / total))
                .fill(color32(*c))
        })
        .collect();

    Plot::new("state_share")
        .height(260.0)
        .y_axis_label("Airports")
        .show(ui, |plot_ui| plot_ui.bar_chart(BarChart::new(bars)));
}

fn mean_elevation_chart(ui: &mut Ui, series: &[SeriesPoint]) {
    ui.heading("Average Airport Elevation by State");
    if series.is_empty() {
        return;
    }

    let labels: Vec<String> = series.iter().map(|p| p.x.clone()).collect();
    let points: Vec<[f64; 2]> = series
        .iter()
        .enumerate()
        .map(|(i, p)| [i as f64, p.y])
        .collect();

    Plot::new("state_mean_elevation")
        .height(240.0)
        .x_axis_label("State")
        .y_axis_label("Average Elevation (ft)")
        .label_formatter(move |_name, value| {
            let idx = value.x.round();
            match labels.get(idx.max(0.0) as usize) {
                Some(state) if idx >= 0.0 => format!("{state}: {:.1} ft", value.y),
                _ => String::new(),
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(PlotPoints::from(points.clone())).width(2.0));
            plot_ui.points(Points::new(PlotPoints::from(points)).radius(4.0));
        });

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for p in series {
            ui.label(format!("{}: {:.1} ft", p.x, p.y));
        }
    });
}
