// Main application layout
// Menu bar, tab strip, active tab and the activity log

use crate::client::Request;
use crate::state::{AppState, Tab};
use crate::ui::components::ActivityLog;
use crate::ui::{chat, dashboard, prediction};
use eframe::egui;

/// Render the whole window; returns the backend requests the user triggered
pub fn render_app_layout(
    ctx: &egui::Context,
    state: &mut AppState,
    activity: &mut ActivityLog,
) -> Vec<Request> {
    let mut requests = Vec::new();

    render_menu_bar(ctx, state, &mut requests);

    egui::TopBottomPanel::top("tab_bar").show(ctx, |ui| {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            for tab in Tab::ALL {
                ui.selectable_value(&mut state.active_tab, tab, tab.title());
            }
        });
        ui.add_space(4.0);
    });

    if state.ui_state.activity_visible {
        egui::TopBottomPanel::bottom("activity_panel")
            .resizable(true)
            .default_height(120.0)
            .min_height(60.0)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                activity.render(ui);
            });
    }

    egui::CentralPanel::default().show(ctx, |ui| match state.active_tab {
        Tab::Dashboard => {
            egui::ScrollArea::vertical()
                .id_source("dashboard_scroll")
                .show(ui, |ui| dashboard::render(ui, state, &mut requests));
        }
        Tab::Prediction => {
            egui::ScrollArea::vertical()
                .id_source("prediction_scroll")
                .show(ui, |ui| prediction::render(ui, state, &mut requests));
        }
        Tab::Chat => chat::render(ui, state, &mut requests),
    });

    requests
}

/// Render the top menu bar
fn render_menu_bar(ctx: &egui::Context, state: &mut AppState, requests: &mut Vec<Request>) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Refresh data").clicked() {
                    requests.push(Request::RefreshLeads);
                    ui.close_menu();
                }
                if ui.button("Reload model").clicked() {
                    requests.push(Request::ReloadModel);
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                let mut dark_mode = ctx.style().visuals.dark_mode;
                if ui.checkbox(&mut dark_mode, "Dark Mode").changed() {
                    ctx.set_visuals(if dark_mode {
                        egui::Visuals::dark()
                    } else {
                        egui::Visuals::light()
                    });
                }
                ui.checkbox(&mut state.ui_state.activity_visible, "Activity log");
            });
        });
    });
}
