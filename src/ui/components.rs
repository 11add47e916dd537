// Reusable UI components
// Provides common UI elements for the application

use crate::client::{LeadsData, RoleCount};
use eframe::egui;

const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 0, 0);
const SUCCESS_COLOR: egui::Color32 = egui::Color32::from_rgb(0, 160, 0);

/// Render a primary action button, disabled while `busy`
pub fn primary_button(ui: &mut egui::Ui, text: &str, busy: bool) -> egui::Response {
    ui.add_enabled(!busy, egui::Button::new(egui::RichText::new(text).strong()))
}

/// Spinner while a request runs, red text if the last one failed
pub fn request_status(ui: &mut egui::Ui, pending: bool, error: Option<&str>) {
    if pending {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(egui::RichText::new("Loading...").weak());
        });
    }
    if let Some(error) = error {
        error_label(ui, error);
    }
}

pub fn error_label(ui: &mut egui::Ui, text: &str) {
    ui.colored_label(ERROR_COLOR, text);
}

pub fn success_label(ui: &mut egui::Ui, text: &str) {
    ui.colored_label(SUCCESS_COLOR, egui::RichText::new(text).strong());
}

/// Informational message, e.g. why a section has nothing to show
pub fn notice_label(ui: &mut egui::Ui, text: &str) {
    ui.label(egui::RichText::new(text).italics().weak());
}

/// Scrollable grid of every row and column
pub fn data_table(ui: &mut egui::Ui, data: &LeadsData) {
    egui::ScrollArea::both()
        .id_source("leads_table_scroll")
        .max_height(320.0)
        .auto_shrink([false, true])
        .show(ui, |ui| {
            egui::Grid::new("leads_table")
                .striped(true)
                .min_col_width(60.0)
                .show(ui, |ui| {
                    for column in &data.columns {
                        ui.label(egui::RichText::new(column).strong());
                    }
                    ui.end_row();

                    for row in 0..data.rows.len() {
                        for column in &data.columns {
                            ui.label(data.cell(row, column));
                        }
                        ui.end_row();
                    }
                });
        });
}

/// Bar height for `count`, as a fraction of the tallest bar
pub fn bar_fraction(count: usize, max_count: usize) -> f32 {
    if max_count == 0 {
        0.0
    } else {
        count as f32 / max_count as f32
    }
}

/// Vertical bar chart of role counts, in the order given
pub fn bar_chart(ui: &mut egui::Ui, counts: &[RoleCount]) {
    let max_count = counts.iter().map(|c| c.count).max().unwrap_or(0);
    let height = 180.0;
    let bar_width = 48.0;
    let gap = 16.0;
    let width = (counts.len() as f32 * (bar_width + gap)).max(bar_width);

    let (response, painter) =
        ui.allocate_painter(egui::vec2(width, height + 36.0), egui::Sense::hover());
    let rect = response.rect;
    let fill = ui.visuals().selection.bg_fill;
    let text_color = ui.visuals().text_color();

    for (i, entry) in counts.iter().enumerate() {
        let left = rect.left() + i as f32 * (bar_width + gap);
        let bar_height = bar_fraction(entry.count, max_count) * height;
        let bar = egui::Rect::from_min_max(
            egui::pos2(left, rect.top() + height - bar_height),
            egui::pos2(left + bar_width, rect.top() + height),
        );
        painter.rect_filled(bar, egui::Rounding::same(2.0), fill);
        painter.text(
            egui::pos2(bar.center().x, bar.top() - 2.0),
            egui::Align2::CENTER_BOTTOM,
            entry.count.to_string(),
            egui::FontId::proportional(12.0),
            text_color,
        );
        painter.text(
            egui::pos2(bar.center().x, rect.top() + height + 4.0),
            egui::Align2::CENTER_TOP,
            &entry.role,
            egui::FontId::proportional(12.0),
            text_color,
        );
    }
}

/// Activity log display area
/// Scrollable list of what the app asked the backend and what came back
pub struct ActivityLog {
    /// Buffer of output lines
    lines: Vec<String>,
    /// Maximum number of lines to keep (0 = unlimited)
    max_lines: usize,
    /// Whether to auto-scroll to bottom
    auto_scroll: bool,
}

impl ActivityLog {
    pub fn new(max_lines: usize) -> Self {
        Self {
            lines: Vec::new(),
            max_lines,
            auto_scroll: true,
        }
    }

    pub fn add_line(&mut self, line: String) {
        self.lines.push(line);
        if self.max_lines > 0 && self.lines.len() > self.max_lines {
            self.lines.remove(0);
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Render the log in a scrollable area
    pub fn render(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Activity").strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Clear").clicked() {
                    self.clear();
                }
                ui.checkbox(&mut self.auto_scroll, "Auto-scroll");
            });
        });
        ui.separator();

        egui::ScrollArea::vertical()
            .id_source("activity_scroll")
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                for line in self.lines() {
                    ui.label(egui::RichText::new(line).size(12.0).monospace());
                }
                if self.auto_scroll && !self.lines.is_empty() {
                    ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_log_drops_oldest() {
        let mut log = ActivityLog::new(2);
        log.add_line("one".to_string());
        log.add_line("two".to_string());
        log.add_line("three".to_string());
        assert_eq!(log.lines(), ["two", "three"]);

        log.clear();
        assert!(log.lines().is_empty());
    }

    #[test]
    fn test_bar_fraction() {
        assert_eq!(bar_fraction(5, 10), 0.5);
        assert_eq!(bar_fraction(10, 10), 1.0);
        assert_eq!(bar_fraction(0, 0), 0.0);
    }
}
