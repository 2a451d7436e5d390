use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::insights::{best, worst, SuccessRate};
use crate::data::model::SiteSelection;
use crate::data::query::{OutcomeSummary, ScatterPoint};
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title bar with dataset and selection counts.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Launch Records Dashboard");
        ui.separator();
        ui.label(format!(
            "{} launches loaded, {} in scatter",
            state.dataset().len(),
            state.scatter().len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left panel: site dropdown, payload range, legend, insights.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Site dropdown ----
            ui.strong("Launch Site");
            let mut selected = state.site().clone();
            let sites = state.dataset().sites().to_vec();
            egui::ComboBox::from_id_salt("site_dropdown")
                .selected_text(selected.to_string())
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut selected, SiteSelection::All, "All Sites");
                    for site in sites {
                        let label = site.clone();
                        ui.selectable_value(&mut selected, SiteSelection::Site(site), label);
                    }
                });
            state.set_site(selected);
            ui.separator();

            // ---- Payload range ----
            ui.strong("Payload range (Kg)");
            let slider = state.slider;
            let range = state.payload_range();

            let mut lo = range.lo;
            if ui
                .add(
                    egui::Slider::new(&mut lo, slider.min..=slider.max)
                        .step_by(slider.step)
                        .clamping(egui::SliderClamping::Edits)
                        .text("min"),
                )
                .changed()
            {
                state.set_payload_low(lo);
            }

            let mut hi = state.payload_range().hi;
            if ui
                .add(
                    egui::Slider::new(&mut hi, slider.min..=slider.max)
                        .step_by(slider.step)
                        .clamping(egui::SliderClamping::Edits)
                        .text("max"),
                )
                .changed()
            {
                state.set_payload_high(hi);
            }

            if let (Some(min), Some(max)) =
                (state.dataset().min_payload(), state.dataset().max_payload())
            {
                ui.small(format!("Dataset payloads: {min} – {max} kg"));
            }
            ui.separator();

            // ---- Booster legend ----
            egui::CollapsingHeader::new(RichText::new("Booster Version Category").strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    for (label, color) in state.booster_colors.legend_entries() {
                        ui.label(RichText::new(format!("● {label}")).color(color));
                    }
                });
            ui.separator();

            // ---- Insights ----
            ui.strong("Insights");
            rates_section(ui, "rates_by_site", "By site", &state.insights.by_site);
            rates_section(ui, "rates_by_booster", "By booster category", &state.insights.by_booster);
            rates_section(ui, "rates_by_payload", "By payload range (kg)", &state.insights.by_payload);
        });
}

fn rates_section(ui: &mut Ui, id: &str, title: &str, rates: &[SuccessRate]) {
    egui::CollapsingHeader::new(title)
        .id_salt(id)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            if let (Some(hi), Some(lo)) = (best(rates), worst(rates)) {
                ui.label(format!("Highest: {}  Lowest: {}", hi.label, lo.label));
            }
            ui.push_id(id, |ui: &mut Ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .column(Column::auto())
                    .column(Column::auto())
                    .column(Column::remainder())
                    .header(ROW_HEIGHT, |mut header| {
                        header.col(|ui| {
                            ui.strong("Group");
                        });
                        header.col(|ui| {
                            ui.strong("Success");
                        });
                        header.col(|ui| {
                            ui.strong("Rate");
                        });
                    })
                    .body(|mut body| {
                        for r in rates {
                            body.row(ROW_HEIGHT, |mut row| {
                                row.col(|ui| {
                                    ui.label(&r.label);
                                });
                                row.col(|ui| {
                                    ui.label(format!("{}/{}", r.successes, r.launches));
                                });
                                row.col(|ui| {
                                    ui.label(format!("{:.1}%", r.rate * 100.0));
                                });
                            });
                        }
                    });
            });
        });
}

// ---------------------------------------------------------------------------
// Result tables (below the charts)
// ---------------------------------------------------------------------------

/// Table view of the outcome aggregation result.
pub fn summary_table(ui: &mut Ui, summary: &OutcomeSummary) {
    let (first_header, second_header) = match summary {
        OutcomeSummary::AllSites { .. } => ("Launch Site", "Total Successful Launches"),
        OutcomeSummary::SingleSite { .. } => ("Launch Outcome (class)", "Count"),
    };
    let slices = summary.slices();

    ui.push_id("summary_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(true)
            .max_scroll_height(160.0)
            .column(Column::auto().at_least(120.0))
            .column(Column::remainder())
            .header(ROW_HEIGHT, |mut header| {
                header.col(|ui| {
                    ui.strong(first_header);
                });
                header.col(|ui| {
                    ui.strong(second_header);
                });
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, slices.len(), |mut row| {
                    let (label, value) = &slices[row.index()];
                    row.col(|ui| {
                        ui.label(label);
                    });
                    row.col(|ui| {
                        ui.label(format!("{value}"));
                    });
                });
            });
    });
}

/// Table view of the scatter result, in source order.
pub fn scatter_table(ui: &mut Ui, points: &[ScatterPoint]) {
    ui.push_id("scatter_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(true)
            .max_scroll_height(160.0)
            .column(Column::auto().at_least(120.0))
            .column(Column::auto().at_least(60.0))
            .column(Column::remainder())
            .header(ROW_HEIGHT, |mut header| {
                header.col(|ui| {
                    ui.strong("Payload Mass (kg)");
                });
                header.col(|ui| {
                    ui.strong("class");
                });
                header.col(|ui| {
                    ui.strong("Booster Version Category");
                });
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, points.len(), |mut row| {
                    let p = &points[row.index()];
                    row.col(|ui| {
                        ui.label(format!("{:.1}", p.payload_mass_kg));
                    });
                    row.col(|ui| {
                        ui.label(p.outcome.to_string());
                    });
                    row.col(|ui| {
                        ui.label(&p.booster_version_category);
                    });
                });
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SliderConfig;
    use crate::data::model::{LaunchDataset, LaunchRecord, PayloadRange};

    fn state() -> AppState {
        let records = [500.0, 1500.0, 2490.0]
            .into_iter()
            .map(|payload| LaunchRecord {
                launch_site: "CCAFS LC-40".to_string(),
                payload_mass_kg: Some(payload),
                booster_version_category: "FT".to_string(),
                outcome: 1,
            })
            .collect();
        AppState::new(
            LaunchDataset::from_records(records),
            SliderConfig::default(),
            SiteSelection::All,
        )
    }

    #[test]
    fn idle_frames_keep_the_initial_payload_range() {
        let mut st = state();
        assert_eq!(st.payload_range(), PayloadRange::new(500.0, 2490.0));
        assert_eq!(st.scatter().len(), 3);

        let ctx = egui::Context::default();
        for _ in 0..2 {
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| side_panel(ui, &mut st));
            });
        }

        assert_eq!(st.payload_range(), PayloadRange::new(500.0, 2490.0));
        assert_eq!(st.scatter().len(), 3);
        assert_eq!(st.site(), &SiteSelection::All);
    }
}
