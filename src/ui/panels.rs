use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::config::ColumnNames;
use crate::data::filter::ViolationKind;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- District ----
            ui.strong("District");
            let current = state.district.clone().unwrap_or_default();
            let mut picked_district = None;
            egui::ComboBox::from_id_salt("district")
                .selected_text(&current)
                .show_ui(ui, |ui: &mut Ui| {
                    for district in &state.districts {
                        if ui.selectable_label(current == *district, district).clicked() {
                            picked_district = Some(district.clone());
                        }
                    }
                });
            if let Some(district) = picked_district {
                state.select_district(Some(district));
            }
            ui.add_space(6.0);

            // ---- Jurisdiction (depends on district) ----
            ui.strong("Jurisdiction");
            let current = state.jurisdiction.clone().unwrap_or_default();
            let mut picked_jurisdiction = None;
            egui::ComboBox::from_id_salt("jurisdiction")
                .selected_text(&current)
                .show_ui(ui, |ui: &mut Ui| {
                    for jurisdiction in &state.jurisdictions {
                        if ui
                            .selectable_label(current == *jurisdiction, jurisdiction)
                            .clicked()
                        {
                            picked_jurisdiction = Some(jurisdiction.clone());
                        }
                    }
                });
            if state.jurisdictions.is_empty() {
                ui.label(RichText::new("No jurisdictions for this district").weak());
            }
            if let Some(jurisdiction) = picked_jurisdiction {
                state.select_jurisdiction(jurisdiction);
            }
            ui.separator();

            // ---- Violation keywords ----
            let header = format!(
                "Violations  ({}/{})",
                state.violations.len(),
                ViolationKind::ALL.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    for kind in ViolationKind::ALL {
                        let mut checked = state.violations.contains(&kind);
                        let response = ui
                            .checkbox(&mut checked, kind.label())
                            .on_hover_text(kind.keyword());
                        if response.changed() {
                            state.toggle_violation(kind);
                        }
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState, columns: &ColumnNames) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state, columns);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} devices loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Metrics and raw data
// ---------------------------------------------------------------------------

/// Render the three summary metrics side by side.
pub fn metrics(ui: &mut Ui, state: &AppState) {
    let summary = &state.report.summary;
    let fmt_opt = |v: Option<usize>| v.map_or_else(|| "—".to_string(), |n| n.to_string());

    ui.columns(3, |cols| {
        metric(&mut cols[0], "Devices", summary.count.to_string());
        metric(&mut cols[1], "Speed limits", fmt_opt(summary.distinct_speed_limits));
        metric(&mut cols[2], "Camera directions", fmt_opt(summary.distinct_directions));
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).size(28.0).strong());
    });
}

/// Render the filtered rows with every source column.
pub fn data_table(ui: &mut Ui, state: &AppState) {
    let Some(ds) = &state.dataset else {
        return;
    };
    if ds.headers.is_empty() {
        return;
    }
    let row_height = ui.text_style_height(&egui::TextStyle::Body) + 4.0;

    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(300.0)
            .columns(TableColumn::auto().at_least(60.0), ds.headers.len())
            .header(row_height, |mut header| {
                for name in &ds.headers {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(row_height, state.visible_indices.len(), |mut row| {
                    let record = &ds.records[state.visible_indices[row.index()]];
                    for i in 0..ds.headers.len() {
                        row.col(|ui: &mut Ui| {
                            ui.label(record.cells.get(i).map(String::as_str).unwrap_or(""));
                        });
                    }
                });
            });
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState, columns: &ColumnNames) {
    let file = rfd::FileDialog::new()
        .set_title("Open enforcement device records")
        .add_filter("CSV", &["csv", "txt"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path, columns) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} devices with columns {:?}",
                    dataset.len(),
                    dataset.headers
                );
                state.set_dataset(Arc::new(dataset));
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
