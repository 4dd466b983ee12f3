mod app;
mod ui;

use std::process::ExitCode;

use anyhow::Context;
use app::BusDashboardApp;
use bus_eda::config::DashboardConfig;
use bus_eda::session::DatasetHandle;
use bus_eda::state::AppState;
use eframe::egui;

fn main() -> ExitCode {
    env_logger::init();

    let config = DashboardConfig::from_args();
    let handle = DatasetHandle::new(&config.data_path);

    let result = if config.summary_only {
        print_summary(&handle, &config)
    } else {
        run_dashboard(&handle, &config)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Headless mode: one recompute, printed as JSON.
fn print_summary(handle: &DatasetHandle, config: &DashboardConfig) -> anyhow::Result<()> {
    let summary = handle.recompute(config.criteria())?;
    let json = serde_json::to_string_pretty(&summary).context("serializing summary")?;
    println!("{json}");
    Ok(())
}

fn run_dashboard(handle: &DatasetHandle, config: &DashboardConfig) -> anyhow::Result<()> {
    let state = match handle.get_or_load() {
        Ok(dataset) => {
            let mut state = AppState::default();
            state.set_dataset(dataset, config.criteria().clone());
            state
        }
        Err(e) => {
            log::error!("Failed to load dataset: {e:#}");
            AppState::failed(format!("{e}"))
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Bus Travel Data – EDA Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(BusDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}
