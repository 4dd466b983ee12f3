use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use bus_eda::data::export::EXPORT_FILE_NAME;
use bus_eda::data::model::CategoricalField;
use bus_eda::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🔎 Filters");
    ui.separator();

    // Options come from the unfiltered dataset so selections never narrow
    // each other's lists.
    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    if ui
        .add_enabled(!state.criteria.is_unconstrained(), egui::Button::new("Reset all"))
        .clicked()
    {
        state.clear_all_filters();
    }
    ui.add_space(4.0);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for field in CategoricalField::ALL {
                let n_total = dataset.options(field).count();
                let n_selected = state.criteria.selected(field).map_or(0, |s| s.len());
                let header_text = if n_selected == 0 {
                    format!("{}  (all {n_total})", field.label())
                } else {
                    format!("{}  ({n_selected}/{n_total})", field.label())
                };

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(field.label())
                    .default_open(field == CategoricalField::Route)
                    .show(ui, |ui: &mut Ui| {
                        if ui.small_button("Clear").clicked() {
                            state.clear_filter(field);
                        }

                        for value in dataset.options(field) {
                            let mut checked = state.criteria.is_selected(field, value);
                            if ui.checkbox(&mut checked, value).changed() {
                                state.toggle_filter_value(field, value);
                            }
                        }
                    });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            let has_rows = !state.visible_indices.is_empty();
            if ui
                .add_enabled(has_rows, egui::Button::new("📥 Export filtered CSV…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} tickets loaded, {} match the filters",
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
// Startup failure
// ---------------------------------------------------------------------------

/// Full-window message for a dataset that could not be loaded.
pub fn load_error(ui: &mut Ui, message: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.label(
            RichText::new(format!("Could not load the dataset.\n\n{message}"))
                .color(Color32::RED)
                .heading(),
        );
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered data")
        .set_file_name(EXPORT_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match state.export_visible(&path) {
            Ok(rows) => {
                state.status_message = None;
                log::info!("Saved {rows} filtered rows to {}", path.display());
            }
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
