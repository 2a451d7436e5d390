use std::collections::BTreeMap;
use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Legend, Plot, PlotPoints, Points, Polygon};

use crate::color::ColorMap;
use crate::data::query::OutcomeSummary;
use crate::state::AppState;

/// Arc resolution of a full circle.
const PIE_SEGMENTS: f64 = 180.0;

// ---------------------------------------------------------------------------
// Outcome pie chart
// ---------------------------------------------------------------------------

/// Render the outcome aggregation as a pie: one slice per result row.
pub fn outcome_pie(ui: &mut Ui, state: &AppState, height: f32) {
    let summary = state.outcome_summary();
    ui.strong(summary.title());

    let slices = summary.slices();
    let total: f64 = slices.iter().map(|(_, v)| v).sum();

    // Single-site slices are the literal outcome values "0" / "1".
    let outcome_colors;
    let colors = match summary {
        OutcomeSummary::AllSites { .. } => &state.site_colors,
        OutcomeSummary::SingleSite { .. } => {
            let labels: Vec<String> = slices.iter().map(|(l, _)| l.clone()).collect();
            outcome_colors = ColorMap::new(&labels);
            &outcome_colors
        }
    };

    Plot::new("success_pie_chart")
        .height(height)
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_x(-1.1)
        .include_x(1.1)
        .include_y(-1.1)
        .include_y(1.1)
        .show(ui, |plot_ui| {
            if total <= 0.0 {
                return;
            }
            // Clockwise from twelve o'clock.
            let mut start = FRAC_PI_2;
            for (label, value) in &slices {
                if *value <= 0.0 {
                    continue;
                }
                let sweep = value / total * TAU;
                let polygon = Polygon::new(PlotPoints::new(slice_outline(start, sweep)))
                    .name(format!("{label} ({:.1}%)", value / total * 100.0))
                    .fill_color(colors.color_for(label))
                    .stroke(Stroke::new(1.0, Color32::WHITE));
                plot_ui.polygon(polygon);
                start -= sweep;
            }
        });

    if total <= 0.0 {
        ui.label("No launches match the current selection.");
    }
}

/// Outline of a unit-circle slice starting at `start` and sweeping
/// clockwise by `sweep` radians.
fn slice_outline(start: f64, sweep: f64) -> Vec<[f64; 2]> {
    let steps = ((sweep / TAU) * PIE_SEGMENTS).ceil().max(1.0) as usize;
    let mut outline = Vec::with_capacity(steps + 2);
    outline.push([0.0, 0.0]);
    for i in 0..=steps {
        let angle = start - sweep * i as f64 / steps as f64;
        outline.push([angle.cos(), angle.sin()]);
    }
    outline
}

// ---------------------------------------------------------------------------
// Payload / outcome scatter chart
// ---------------------------------------------------------------------------

/// Render the scatter result: payload on x, outcome on y, one series per
/// booster category.
pub fn payload_scatter_plot(ui: &mut Ui, state: &AppState, height: f32) {
    ui.strong(format!("Payload Mass vs. Success for {}", state.site()));

    let mut series: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for p in state.scatter() {
        series
            .entry(p.booster_version_category.as_str())
            .or_default()
            .push([p.payload_mass_kg, f64::from(p.outcome)]);
    }

    let range = state.payload_range();

    Plot::new("success_payload_scatter_chart")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Payload Mass (kg)")
        .y_axis_label("class")
        .include_x(range.lo)
        .include_x(range.hi)
        .include_y(-0.25)
        .include_y(1.25)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (category, points) in series {
                let points = Points::new(PlotPoints::new(points))
                    .name(category)
                    .color(state.booster_colors.color_for(category))
                    .radius(4.0);
                plot_ui.points(points);
            }
        });

    if state.scatter().is_empty() {
        ui.label("No launches in the selected payload range.");
    }
}
