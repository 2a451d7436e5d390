//! Command-line configuration.
//!
//! The dashboard needs only the path of the launch table; the remaining
//! options shape the payload-range control and the headless report.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use crate::data::model::{SiteSelection, ALL_SITES};

#[derive(Parser, Debug)]
#[command(name = "launch-dash")]
#[command(author, version, about = "Launch records dashboard: outcomes by site and payload")]
pub struct Cli {
    /// Launch table (.csv, .json or .parquet)
    #[arg(default_value = "spacex_launch_dash.csv")]
    pub data: PathBuf,

    /// Initial site selection ("ALL" or a launch site name)
    #[arg(long, default_value = ALL_SITES)]
    pub site: String,

    /// Lower bound of the payload-range control (kg)
    #[arg(long, default_value_t = 0.0, help_heading = "Payload range")]
    pub slider_min: f64,

    /// Upper bound of the payload-range control (kg)
    #[arg(long, default_value_t = 10_000.0, help_heading = "Payload range")]
    pub slider_max: f64,

    /// Step of the payload-range control (kg); also the report's bucket width
    #[arg(long, default_value_t = 1_000.0, help_heading = "Payload range")]
    pub slider_step: f64,

    /// Print a text report instead of opening the dashboard window
    #[arg(long, help_heading = "Headless")]
    pub report: bool,

    /// With --report: emit the report as JSON
    #[arg(long, requires = "report", help_heading = "Headless")]
    pub json: bool,
}

/// Bounds and granularity of the payload-range control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for SliderConfig {
    fn default() -> Self {
        SliderConfig {
            min: 0.0,
            max: 10_000.0,
            step: 1_000.0,
        }
    }
}

impl Cli {
    pub fn slider(&self) -> Result<SliderConfig> {
        if !(self.slider_min < self.slider_max) {
            bail!(
                "--slider-min ({}) must be below --slider-max ({})",
                self.slider_min,
                self.slider_max
            );
        }
        if !(self.slider_step > 0.0) {
            bail!("--slider-step must be positive, got {}", self.slider_step);
        }
        Ok(SliderConfig {
            min: self.slider_min,
            max: self.slider_max,
            step: self.slider_step,
        })
    }

    pub fn site_selection(&self) -> SiteSelection {
        SiteSelection::parse(&self.site)
    }
}
