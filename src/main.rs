use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;

use enforcement_dashboard::app::DashboardApp;
use enforcement_dashboard::config::{Cli, ColumnNames, Command};
use enforcement_dashboard::data::aggregate::build_report;
use enforcement_dashboard::data::filter::{apply_filter, FilterCriteria};
use enforcement_dashboard::data::loader::{load_file, load_startup};
use enforcement_dashboard::state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let columns = ColumnNames::from_cli(&cli)?;

    match &cli.command {
        Some(Command::Report {
            district,
            jurisdiction,
            keywords,
        }) => {
            let dataset = load_file(cli.data_path(), &columns)?;
            let criteria = FilterCriteria::new(district.as_str(), jurisdiction.as_str())
                .with_keywords(keywords);
            let view = apply_filter(&dataset, &criteria);
            let report = build_report(&view);
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("serializing report")?
            );
            Ok(())
        }
        None => run_gui(&cli, columns),
    }
}

fn run_gui(cli: &Cli, columns: ColumnNames) -> Result<()> {
    let mut state = AppState::default();

    if let Some(dataset) = load_startup(cli.data.as_deref(), &columns)? {
        log::info!(
            "Loaded {} devices from {}",
            dataset.len(),
            cli.data_path().display()
        );
        state.set_dataset(Arc::new(dataset));
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Enforcement Device Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(state, columns)))),
    )
    .map_err(|e| anyhow::anyhow!("running UI: {e}"))
}
