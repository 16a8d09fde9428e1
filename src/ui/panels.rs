use eframe::egui::{self, Color32, RichText, Ui};

use crate::analysis::quantile::DuplicatePolicy;
use crate::data::model::Column;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – analysis controls
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Analysis");
    ui.separator();

    let mut settings = state.settings;

    ui.strong("Quantiles");
    ui.label(format!("Key: {}", settings.key));
    ui.add(egui::Slider::new(&mut settings.quantiles, 1..=10).text("groups"));

    ui.add_space(4.0);
    ui.label("Duplicate boundaries");
    egui::ComboBox::from_id_salt("duplicate_policy")
        .selected_text(settings.policy.as_str())
        .show_ui(ui, |ui: &mut Ui| {
            for policy in DuplicatePolicy::ALL {
                ui.selectable_value(&mut settings.policy, policy, policy.as_str());
            }
        });
    ui.separator();

    ui.strong("Linear model axes");
    column_picker(ui, "x_axis", "Pick an X-axis value:", &mut settings.x);
    column_picker(ui, "y_axis", "Pick a Y-axis value:", &mut settings.y);

    state.apply_settings(settings);

    if let Some(labeled) = state.report.as_ref().and_then(|r| r.labeled.as_ref().ok()) {
        ui.separator();
        let c = &labeled.classification;
        if c.is_empty() {
            ui.label("No rows labelled");
        } else {
            ui.label(format!("{} rows labelled ({} policy)", c.len(), c.policy));
        }
        if c.effective_k != c.requested_k {
            ui.label(format!("{} of {} groups non-empty", c.effective_k, c.requested_k));
        }
        if !c.dropped.is_empty() {
            ui.label(format!("{} rows dropped on tied boundaries", c.dropped.len()));
        }
        let counts = c.counts();
        for (label, color) in state.color_map.legend_entries() {
            let n = counts.get(label as usize - 1).copied().unwrap_or(0);
            ui.label(RichText::new(format!("■ {label}: {n} counties")).color(color));
        }
    }
}

fn column_picker(ui: &mut Ui, id: &str, label: &str, selected: &mut Column) {
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected.display_name())
        .show_ui(ui, |ui: &mut Ui| {
            for column in Column::ALL {
                ui.selectable_value(selected, column, column.display_name());
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
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.source.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!("{} counties from {}", ds.len(), ds.origin));
        } else if let Some(source) = &state.source {
            ui.label(format!("No data from {}", source.describe()));
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
        .set_title("Open census extract")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.open_file(path);
    }
}
