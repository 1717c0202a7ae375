use airport_dashboard::color::facility_color;
use airport_dashboard::data::derive::label_to_type;
use airport_dashboard::data::filter::ServiceMode;
use airport_dashboard::view::legend;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use super::color32;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel. Views are recomputed only when the
/// criteria actually changed this frame.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };
    let before = state.criteria.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- States ----
            let header = format!(
                "States  ({}/{})",
                state.criteria.states.len(),
                dataset.states.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("states")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_states();
                        }
                        if ui.small_button("None").clicked() {
                            state.criteria.states.clear();
                        }
                    });
                    for code in &dataset.states {
                        let mut checked = state.criteria.states.contains(code);
                        if ui.checkbox(&mut checked, code.as_str()).changed() {
                            state.criteria.toggle_state(code);
                        }
                    }
                });

            // ---- Facility types ----
            let header = format!(
                "Airport types  ({}/{})",
                state.criteria.facility_types.len(),
                dataset.facility_types.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("types")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_types();
                        }
                        if ui.small_button("None").clicked() {
                            state.criteria.facility_types.clear();
                        }
                    });
                    // listed by label, filtered by raw type
                    for (label, facility_type) in label_to_type(&dataset) {
                        let mut checked = state.criteria.facility_types.contains(&facility_type);
                        let text = RichText::new(label).color(color32(facility_color(&facility_type)));
                        if ui.checkbox(&mut checked, text).changed() {
                            state.criteria.toggle_type(&facility_type);
                        }
                    }
                });
            ui.separator();

            // ---- Scheduled service ----
            ui.strong("Scheduled Service");
            for mode in ServiceMode::ALL {
                ui.radio_value(&mut state.criteria.service, mode, mode.label());
            }
            if !dataset.has_scheduled_service {
                ui.weak("Dataset has no scheduled_service column; this filter is ignored.");
            }
            ui.separator();

            // ---- Elevation ----
            ui.strong("Elevation Filter");
            if let Some((lo, hi)) = dataset.elevation_range {
                ui.add(
                    egui::Slider::new(&mut state.criteria.min_elevation_ft, lo.floor()..=hi.ceil())
                        .step_by(1.0)
                        .text("Minimum Elevation (ft)"),
                );
            }

            if state.criteria != before {
                state.recompute();
            }

            summaries(ui, state);
            ui.separator();
            map_legend(ui);
        });
}

fn summaries(ui: &mut Ui, state: &AppState) {
    let Some(view) = &state.view else {
        return;
    };

    match &view.elevation_summary {
        Some(elev) => {
            ui.label(format!(
                "Airports above {:.0} ft: {} total",
                elev.min_elevation_ft, elev.count
            ));
            ui.label(format!("Average Elevation: {:.1} ft", elev.mean_elevation_ft));
        }
        None => {
            ui.colored_label(Color32::RED, "Error computing elevation summary");
        }
    }
    ui.add_space(4.0);

    match &view.selection {
        Some(sel) => {
            ui.label(format!(
                "Average Elevation ({}): {:.2} ft across {} airports",
                sel.states.join(", "),
                sel.mean_elevation_ft,
                sel.count
            ));
        }
        None if view.matched > 0 => {
            ui.colored_label(Color32::RED, "Error computing average elevation");
        }
        None => {
            ui.label("No airports to summarize for this selection.");
        }
    }
}

fn map_legend(ui: &mut Ui) {
    ui.strong("Map Legend");
    for entry in legend() {
        ui.colored_label(
            color32(entry.color),
            format!("{}: {}", entry.color_name, entry.label),
        );
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let has_source = state.source.is_some();
            if ui.add_enabled(has_source, egui::Button::new("Reload")).clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(view)) = (&state.dataset, &state.view) {
            ui.label(format!(
                "{} airports loaded, {} visible",
                ds.len(),
                view.matched
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open airports data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
