use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use squeeze_bench::Institution;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No data loaded.");
            return;
        }
    };

    // Clone what we need so we can mutate state inside the loop.
    let materials: Vec<String> = dataset
        .materials()
        .iter()
        .map(|m| m.material.clone())
        .collect();
    let labels: Vec<_> = dataset.labels().into_iter().cloned().collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all();
                }
                if ui.small_button("None").clicked() {
                    state.select_none();
                }
            });

            let n_selected = state.filters.materials.len();
            egui::CollapsingHeader::new(
                RichText::new(format!("Material  ({n_selected}/{})", materials.len())).strong(),
            )
            .id_salt("materials")
            .default_open(true)
            .show(ui, |ui: &mut Ui| {
                for material in &materials {
                    let mut checked = state.filters.materials.contains(material);
                    if ui.checkbox(&mut checked, material.as_str()).changed() {
                        state.toggle_material(material);
                    }
                }
            });

            let n_selected = state.filters.labels.len();
            egui::CollapsingHeader::new(
                RichText::new(format!("Configuration  ({n_selected}/{})", labels.len())).strong(),
            )
            .id_salt("configurations")
            .default_open(true)
            .show(ui, |ui: &mut Ui| {
                for label in &labels {
                    // Label text doubles as the colour legend.
                    let mut text = RichText::new(label.as_str());
                    if let Some(cm) = &state.color_map {
                        text = text.color(cm.color_for(label));
                    }
                    let mut checked = state.filters.labels.contains(label);
                    if ui.checkbox(&mut checked, text).changed() {
                        state.toggle_label(label);
                    }
                }
            });

            if let Some(ds) = &state.dataset {
                if !ds.skipped().is_empty() {
                    ui.separator();
                    egui::CollapsingHeader::new(format!("Skipped files ({})", ds.skipped().len()))
                        .id_salt("skipped")
                        .show(ui, |ui: &mut Ui| {
                            for skipped in ds.skipped() {
                                ui.label(RichText::new(&skipped.reason).small());
                            }
                        });
                }
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
            if ui.button("Open folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.folder.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        let before = state.institution;
        egui::ComboBox::from_id_salt("institution")
            .selected_text(state.institution.tag())
            .show_ui(ui, |ui: &mut Ui| {
                for inst in Institution::ALL {
                    ui.selectable_value(&mut state.institution, inst, inst.tag());
                }
            });
        if state.institution != before {
            state.reload();
        }

        let mut skip = state.skip_bad_files();
        if ui.checkbox(&mut skip, "Skip bad files").changed() {
            state.set_skip_bad_files(skip);
        }

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} experiments loaded, {} visible",
                ds.len(),
                state.visible().len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title(format!(
            "Open {} data folder (*.{})",
            state.institution,
            state.institution.parser().extension()
        ))
        .pick_folder();

    if let Some(path) = folder {
        state.open_folder(&path);
    }
}
