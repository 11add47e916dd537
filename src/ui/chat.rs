// Chat tab
// Transcript view and message box for the chat relay

use crate::client::Request;
use crate::state::AppState;
use crate::ui::components::*;
use eframe::egui;

pub fn render(ui: &mut egui::Ui, state: &mut AppState, requests: &mut Vec<Request>) {
    ui.horizontal(|ui| {
        ui.heading("Chat");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let can_reset = state.chat.session_id.is_some() && !state.chat.transcript.is_empty();
            if ui
                .add_enabled(can_reset && !state.chat.pending, egui::Button::new("Clear"))
                .clicked()
            {
                if let Some(session_id) = state.chat.session_id.clone() {
                    requests.push(Request::ResetChat { session_id });
                }
            }
        });
    });
    ui.separator();

    let status = &state.chat.status;
    request_status(ui, status.pending, status.error.as_deref());
    if !state.chat.enabled() {
        if let Some(message) = status.data.as_ref().and_then(|s| s.message.as_deref()) {
            notice_label(ui, message);
        }
        return;
    }

    let input_height = 36.0;
    egui::ScrollArea::vertical()
        .id_source("chat_transcript_scroll")
        .auto_shrink([false; 2])
        .max_height((ui.available_height() - input_height - 24.0).max(80.0))
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for entry in &state.chat.transcript {
                let (speaker, color) = if entry.is_user() {
                    ("You", ui.visuals().strong_text_color())
                } else {
                    ("Assistant", ui.visuals().hyperlink_color)
                };
                ui.label(egui::RichText::new(speaker).strong().color(color));
                ui.label(&entry.content);
                ui.add_space(8.0);
            }
            if state.chat.pending {
                ui.spinner();
            }
        });

    if let Some(error) = &state.chat.error {
        error_label(ui, error);
    }

    ui.separator();
    ui.horizontal(|ui| {
        let edit = ui.add_sized(
            [ui.available_width() - 80.0, input_height - 8.0],
            egui::TextEdit::singleline(&mut state.chat.draft).hint_text("Type a message..."),
        );
        let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        let clicked = primary_button(ui, "Send", state.chat.pending).clicked();

        if (submitted || clicked) && !state.chat.pending {
            if let Some(message) = state.chat.take_draft() {
                requests.push(Request::SendChat {
                    session_id: state.chat.session_id.clone(),
                    message,
                });
            }
            edit.request_focus();
        }
    });
}
