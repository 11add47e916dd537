// AI Prediction tab
// One text field per feature column; submits the row for a predicted role

use crate::client::{Request, NO_DATA_MESSAGE};
use crate::state::AppState;
use crate::ui::components::*;
use eframe::egui;

pub fn render(ui: &mut egui::Ui, state: &mut AppState, requests: &mut Vec<Request>) {
    ui.horizontal(|ui| {
        ui.heading("Predict Primary Role");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if primary_button(ui, "Reload model", state.prediction.model.pending).clicked() {
                requests.push(Request::ReloadModel);
            }
        });
    });
    ui.separator();

    let model = &state.prediction.model;
    request_status(ui, model.pending, model.error.as_deref());
    let Some(status) = &model.data else {
        return;
    };
    if !status.available {
        notice_label(ui, status.message.as_deref().unwrap_or("Model not available."));
        return;
    }
    ui.label(
        egui::RichText::new(format!(
            "Model expects {} features; roles: {}",
            status.feature_names.len(),
            status.classes.join(", ")
        ))
        .weak(),
    );
    if status.schema_matches == Some(false) {
        if let Some(message) = &status.message {
            error_label(ui, message);
        }
    }

    if state.prediction.inputs.is_empty() {
        notice_label(ui, NO_DATA_MESSAGE);
        return;
    }

    ui.add_space(8.0);
    egui::Grid::new("prediction_form")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            for (column, value) in state.prediction.inputs.iter_mut() {
                ui.label(column.as_str());
                ui.text_edit_singleline(value);
                ui.end_row();
            }
        });

    ui.add_space(8.0);
    let result = &state.prediction.result;
    if primary_button(ui, "Predict", result.pending).clicked() {
        requests.push(Request::Predict(state.prediction.features()));
    }
    request_status(ui, result.pending, result.error.as_deref());

    if let Some(prediction) = &result.data {
        ui.add_space(8.0);
        success_label(
            ui,
            &format!("Predicted primary role: {}", prediction.prediction),
        );
        for p in &prediction.probabilities {
            ui.label(format!("{}: {:.1}%", p.label, p.probability * 100.0));
        }
    }
}
