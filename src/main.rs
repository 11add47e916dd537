// Leads Dashboard GUI - Main Entry Point
// Native window over the dashboard backend: leads table, role prediction, chat

mod client;
mod state;
mod ui;

use client::{BackendClient, Request, Worker};
use eframe::egui;
use state::AppState;
use ui::{render_app_layout, ActivityLog};

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Supabase Leads Dashboard & AI Prediction")
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Leads Dashboard",
        options,
        Box::new(|cc| {
            let client = match BackendClient::from_env() {
                Ok(client) => client,
                Err(e) => {
                    eprintln!("Failed to create HTTP client: {}", e);
                    std::process::exit(1);
                }
            };
            let worker = Worker::new(client, Some(cc.egui_ctx.clone()));
            let mut app = LeadsDashboardApp::new(worker);
            app.load_initial_data();
            Box::new(app)
        }),
    )
}

/// Main application struct
/// Owns the UI state and the worker that talks to the backend
struct LeadsDashboardApp {
    state: AppState,
    worker: Worker,
    activity: ActivityLog,
}

impl LeadsDashboardApp {
    fn new(worker: Worker) -> Self {
        Self {
            state: AppState::new(),
            worker,
            activity: ActivityLog::new(500),
        }
    }

    /// Fetch what the three tabs need on startup
    fn load_initial_data(&mut self) {
        self.activity.add_line(format!(
            "Connecting to backend at {}",
            self.worker.client().base_url()
        ));
        for request in [
            Request::LoadLeads,
            Request::LoadModelStatus,
            Request::LoadChatStatus,
        ] {
            self.dispatch(request);
        }
    }

    /// Start `request` unless one of the same kind is still running
    fn dispatch(&mut self, request: Request) {
        // Model status depends on the table's columns; fetch it again after a refresh
        let follow_up = matches!(request, Request::RefreshLeads);
        if self.state.begin(&request) {
            self.worker.submit(request);
        }
        if follow_up && self.state.begin(&Request::LoadModelStatus) {
            self.worker.submit(Request::LoadModelStatus);
        }
    }

    fn drain_responses(&mut self) {
        for response in self.worker.poll() {
            let line = self.state.apply(response);
            self.activity.add_line(line);
        }
    }
}

impl eframe::App for LeadsDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_responses();
        let requests = render_app_layout(ctx, &mut self.state, &mut self.activity);
        for request in requests {
            self.dispatch(request);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> LeadsDashboardApp {
        // Nothing listens on port 9; requests fail fast
        let client = BackendClient::new("http://127.0.0.1:9").unwrap();
        LeadsDashboardApp::new(Worker::new(client, None))
    }

    #[test]
    fn test_app_creation() {
        let app = app();
        assert!(app.state.leads.data.is_none());
        assert!(app.activity.lines().is_empty());
    }

    #[test]
    fn test_initial_load_marks_sections_pending() {
        let mut app = app();
        app.load_initial_data();

        assert!(app.state.leads.pending);
        assert!(app.state.prediction.model.pending);
        assert!(app.state.chat.status.pending);
        assert_eq!(app.activity.lines().len(), 1);
    }

    #[test]
    fn test_duplicate_request_is_dropped() {
        let mut app = app();
        app.dispatch(Request::LoadLeads);
        app.dispatch(Request::RefreshLeads);

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
        while app.state.leads.pending && std::time::Instant::now() < deadline {
            app.drain_responses();
            std::thread::sleep(std::time::Duration::from_millis(10));
        }

        // The refresh was dropped, so only one leads response arrives
        let leads_lines = app
            .activity
            .lines()
            .iter()
            .filter(|l| l.contains("leads"))
            .count();
        assert_eq!(leads_lines, 1);
        assert!(app.state.leads.error.is_some());
    }
}
