mod app;
mod cli;
mod color;
mod data;
mod error;
mod state;
mod ui;

use anyhow::{Context, Result};
use app::LaunchDashApp;
use clap::Parser;
use cli::Cli;
use data::insights::Report;
use data::model::PayloadRange;
use eframe::egui;
use state::AppState;

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        log::error!("{e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: Cli) -> Result<()> {
    let slider = args.slider()?;
    let site = args.site_selection();

    // Loaded exactly once; read-only for the rest of the process.
    let dataset = data::loader::load_file(&args.data)
        .with_context(|| format!("loading launch table {}", args.data.display()))?;

    if args.report {
        let range = PayloadRange::new(
            dataset.min_payload().unwrap_or(slider.min),
            dataset.max_payload().unwrap_or(slider.max),
        );
        let report = Report::build(&dataset, &site, range, slider.step);
        if args.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("serialising report")?
            );
        } else {
            print!("{report}");
        }
        return Ok(());
    }

    let state = AppState::new(dataset, slider, site);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Launch Records Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(LaunchDashApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}
