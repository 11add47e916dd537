// Leads Dashboard tab
// Row count, full table and the primary-role distribution

use crate::client::{Request, NO_DATA_NOTICE};
use crate::state::AppState;
use crate::ui::components::*;
use eframe::egui;

pub fn render(ui: &mut egui::Ui, state: &AppState, requests: &mut Vec<Request>) {
    ui.horizontal(|ui| {
        ui.heading("Leads Dashboard");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if primary_button(ui, "Refresh", state.leads.pending).clicked() {
                requests.push(Request::RefreshLeads);
            }
        });
    });
    ui.separator();
    request_status(ui, state.leads.pending, state.leads.error.as_deref());

    let Some(data) = &state.leads.data else {
        return;
    };

    if data.rows.is_empty() {
        notice_label(ui, data.notice.as_deref().unwrap_or(NO_DATA_NOTICE));
        return;
    }

    ui.label(format!("Total leads: {}", data.total));
    ui.add_space(8.0);
    data_table(ui, data);

    if !data.role_distribution.is_empty() {
        ui.add_space(16.0);
        ui.label(egui::RichText::new("Primary Role Distribution").heading().size(16.0));
        ui.add_space(8.0);
        egui::ScrollArea::horizontal()
            .id_source("role_chart_scroll")
            .show(ui, |ui| bar_chart(ui, &data.role_distribution));
    }
}
