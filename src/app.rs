use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LaunchDashApp {
    pub state: AppState,
}

impl LaunchDashApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for LaunchDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title and counts ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts over their result tables ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let chart_height = (ui.available_height() - 220.0).max(200.0);
            let state = &self.state;
            ui.columns(2, |cols| {
                plot::outcome_pie(&mut cols[0], state, chart_height);
                panels::summary_table(&mut cols[0], state.outcome_summary());

                plot::payload_scatter_plot(&mut cols[1], state, chart_height);
                panels::scatter_table(&mut cols[1], state.scatter());
            });
        });
    }
}
