use crate::cli::SliderConfig;
use crate::color::ColorMap;
use crate::data::insights::{
    success_rate_by_booster, success_rate_by_payload_bucket, success_rate_by_site, SuccessRate,
};
use crate::data::model::{LaunchDataset, PayloadRange, SiteSelection};
use crate::data::query::{
    outcome_summary, payload_scatter, unknown_site_notice, OutcomeSummary, ScatterPoint,
};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Success-rate tables; the dataset never changes, so they are computed once.
pub struct Insights {
    pub by_site: Vec<SuccessRate>,
    pub by_booster: Vec<SuccessRate>,
    pub by_payload: Vec<SuccessRate>,
}

/// The full UI state, independent of rendering.
///
/// Every control change goes through a setter that recomputes the
/// results depending on that control, so the cached results always
/// reflect the current selection.
pub struct AppState {
    dataset: LaunchDataset,

    pub slider: SliderConfig,

    site: SiteSelection,
    payload_range: PayloadRange,

    /// Result of the outcome aggregation for `site`.
    outcome_summary: OutcomeSummary,
    /// Result of the scatter query for `site` and `payload_range`.
    scatter: Vec<ScatterPoint>,

    pub site_colors: ColorMap,
    pub booster_colors: ColorMap,
    pub insights: Insights,

    /// Status message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Take ownership of the loaded dataset and compute the initial views.
    ///
    /// The payload range starts at the dataset's payload extent, falling
    /// back to the slider bounds when no launch carries a payload.
    pub fn new(dataset: LaunchDataset, slider: SliderConfig, site: SiteSelection) -> Self {
        let payload_range = PayloadRange::new(
            dataset.min_payload().unwrap_or(slider.min),
            dataset.max_payload().unwrap_or(slider.max),
        );
        let insights = Insights {
            by_site: success_rate_by_site(&dataset),
            by_booster: success_rate_by_booster(&dataset),
            by_payload: success_rate_by_payload_bucket(&dataset, slider.step),
        };

        let mut state = Self {
            site_colors: ColorMap::new(dataset.sites()),
            booster_colors: ColorMap::new(dataset.booster_categories()),
            outcome_summary: outcome_summary(&dataset, &SiteSelection::All),
            scatter: Vec::new(),
            dataset,
            slider,
            site: SiteSelection::All,
            payload_range,
            insights,
            status_message: None,
        };
        state.set_site(site);
        state.refresh_scatter();
        state
    }

    pub fn dataset(&self) -> &LaunchDataset {
        &self.dataset
    }

    pub fn site(&self) -> &SiteSelection {
        &self.site
    }

    pub fn payload_range(&self) -> PayloadRange {
        self.payload_range
    }

    pub fn outcome_summary(&self) -> &OutcomeSummary {
        &self.outcome_summary
    }

    pub fn scatter(&self) -> &[ScatterPoint] {
        &self.scatter
    }

    /// Site dropdown changed: both charts depend on it.
    pub fn set_site(&mut self, site: SiteSelection) {
        if site == self.site {
            return;
        }
        self.status_message = unknown_site_notice(&self.dataset, &site);
        self.site = site;
        self.refresh_summary();
        self.refresh_scatter();
    }

    /// Low handle moved; drags the high handle along if it would cross.
    pub fn set_payload_low(&mut self, lo: f64) {
        let hi = self.payload_range.hi.max(lo);
        self.set_payload_range(PayloadRange::new(lo, hi));
    }

    /// High handle moved; drags the low handle along if it would cross.
    pub fn set_payload_high(&mut self, hi: f64) {
        let lo = self.payload_range.lo.min(hi);
        self.set_payload_range(PayloadRange::new(lo, hi));
    }

    /// Payload range changed: only the scatter depends on it.
    pub fn set_payload_range(&mut self, range: PayloadRange) {
        if range == self.payload_range {
            return;
        }
        self.payload_range = range;
        self.refresh_scatter();
    }

    fn refresh_summary(&mut self) {
        self.outcome_summary = outcome_summary(&self.dataset, &self.site);
        log::debug!(
            "outcome summary for {}: {} rows",
            self.site,
            self.outcome_summary.row_count()
        );
    }

    fn refresh_scatter(&mut self) {
        self.scatter = payload_scatter(&self.dataset, &self.site, self.payload_range);
        log::debug!(
            "scatter for {} in {}: {} points",
            self.site,
            self.payload_range,
            self.scatter.len()
        );
    }
}
