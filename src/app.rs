use eframe::egui::{self, RichText, Ui};

use crate::config::ColumnNames;
use crate::state::AppState;
use crate::ui::{charts, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
    /// Header mapping used when the user opens another file.
    pub columns: ColumnNames,
}

impl DashboardApp {
    pub fn new(state: AppState, columns: ColumnNames) -> Self {
        Self { state, columns }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, &self.columns);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: caption ----
        egui::TopBottomPanel::bottom("caption").show(ctx, |ui| {
            ui.label(RichText::new("Data: Tainan City Government open data").small().weak());
        });

        // ---- Central panel: metrics, rows, charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                charts::empty_hint(ui);
                return;
            }
            egui::ScrollArea::vertical().show(ui, |ui: &mut Ui| {
                overview(ui, &self.state);
            });
        });
    }
}

fn overview(ui: &mut Ui, state: &AppState) {
    let district = state.district.as_deref().unwrap_or("—");
    let jurisdiction = state.jurisdiction.as_deref().unwrap_or("—");
    ui.heading(format!("{district} - {jurisdiction}"));
    ui.separator();

    panels::metrics(ui, state);
    ui.add_space(8.0);

    egui::CollapsingHeader::new("Filtered records")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            panels::data_table(ui, state);
        });
    ui.separator();

    ui.columns(2, |cols| {
        charts::speed_limit_chart(&mut cols[0], state);
        charts::direction_chart(&mut cols[1], state);
    });
}
