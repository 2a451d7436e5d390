use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::model::{LaunchDataset, LaunchRecord, PayloadRange, SiteSelection};
use super::query::{
    outcome_summary, payload_scatter, unknown_site_notice, OutcomeSummary, ScatterPoint,
};

/// Success statistics for one group of launches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuccessRate {
    pub label: String,
    pub launches: u64,
    pub successes: u64,
    pub rate: f64,
}

fn tally<'a, K: Ord>(
    records: impl Iterator<Item = &'a LaunchRecord>,
    key: impl Fn(&LaunchRecord) -> Option<K>,
) -> BTreeMap<K, (u64, u64)> {
    let mut groups: BTreeMap<K, (u64, u64)> = BTreeMap::new();
    for rec in records {
        if let Some(k) = key(rec) {
            let entry = groups.entry(k).or_default();
            entry.0 += 1;
            entry.1 += u64::from(rec.outcome);
        }
    }
    groups
}

fn to_rates<K>(groups: BTreeMap<K, (u64, u64)>, label: impl Fn(&K) -> String) -> Vec<SuccessRate> {
    groups
        .into_iter()
        .map(|(k, (launches, successes))| SuccessRate {
            label: label(&k),
            launches,
            successes,
            rate: successes as f64 / launches as f64,
        })
        .collect()
}

/// Success rate per launch site, sorted by site.
pub fn success_rate_by_site(dataset: &LaunchDataset) -> Vec<SuccessRate> {
    let groups = tally(dataset.records().iter(), |r| Some(r.launch_site.clone()));
    to_rates(groups, String::clone)
}

/// Success rate per booster version category, sorted by category.
pub fn success_rate_by_booster(dataset: &LaunchDataset) -> Vec<SuccessRate> {
    let groups = tally(dataset.records().iter(), |r| {
        Some(r.booster_version_category.clone())
    });
    to_rates(groups, String::clone)
}

/// Success rate per payload bucket `[k*width, (k+1)*width)`, ascending.
///
/// Only buckets holding at least one launch are returned; launches
/// without a payload are skipped.
pub fn success_rate_by_payload_bucket(dataset: &LaunchDataset, width: f64) -> Vec<SuccessRate> {
    if !(width > 0.0) {
        return Vec::new();
    }
    let groups = tally(dataset.records().iter(), |r| {
        r.payload_mass_kg
            .filter(|p| p.is_finite())
            .map(|p| (p / width).floor() as i64)
    });
    to_rates(groups, |k| {
        let lo = *k as f64 * width;
        format!("{lo} - {}", lo + width)
    })
}

/// Entry with the highest rate; ties go to the first in order.
pub fn best(rates: &[SuccessRate]) -> Option<&SuccessRate> {
    rates
        .iter()
        .reduce(|acc, r| if r.rate > acc.rate { r } else { acc })
}

/// Entry with the lowest rate; ties go to the first in order.
pub fn worst(rates: &[SuccessRate]) -> Option<&SuccessRate> {
    rates
        .iter()
        .reduce(|acc, r| if r.rate < acc.rate { r } else { acc })
}

// ---------------------------------------------------------------------------
// Headless report
// ---------------------------------------------------------------------------

/// Everything the dashboard shows, as one serialisable value.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub launches: usize,
    pub min_payload: Option<f64>,
    pub max_payload: Option<f64>,
    pub site: String,
    /// Set when the selected site has no launches in the table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub payload_range: PayloadRange,
    pub outcome_summary: OutcomeSummary,
    pub scatter: Vec<ScatterPoint>,
    pub by_site: Vec<SuccessRate>,
    pub by_booster: Vec<SuccessRate>,
    pub by_payload: Vec<SuccessRate>,
}

impl Report {
    pub fn build(
        dataset: &LaunchDataset,
        site: &SiteSelection,
        range: PayloadRange,
        bucket_width: f64,
    ) -> Self {
        Report {
            launches: dataset.len(),
            min_payload: dataset.min_payload(),
            max_payload: dataset.max_payload(),
            site: site.to_string(),
            notice: unknown_site_notice(dataset, site),
            payload_range: range,
            outcome_summary: outcome_summary(dataset, site),
            scatter: payload_scatter(dataset, site, range),
            by_site: success_rate_by_site(dataset),
            by_booster: success_rate_by_booster(dataset),
            by_payload: success_rate_by_payload_bucket(dataset, bucket_width),
        }
    }
}

/// Plain-text rendering for the terminal.
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Launch records: {}", self.launches)?;
        if let (Some(lo), Some(hi)) = (self.min_payload, self.max_payload) {
            writeln!(f, "Payload extent: {lo} - {hi} kg")?;
        }
        if let Some(notice) = &self.notice {
            writeln!(f, "Note: {notice}")?;
        }

        writeln!(f, "\n{} ({})", self.outcome_summary.title(), self.site)?;
        match &self.outcome_summary {
            OutcomeSummary::AllSites { rows } => {
                for r in rows {
                    writeln!(f, "  {:<24} {:>6}", r.launch_site, r.total_successes)?;
                }
            }
            OutcomeSummary::SingleSite { rows, .. } => {
                for r in rows {
                    writeln!(f, "  class {:<18} {:>6}", r.outcome, r.count)?;
                }
            }
        }
        if self.outcome_summary.is_empty() {
            writeln!(f, "  (no launches)")?;
        }

        writeln!(
            f,
            "\nPayload vs. outcome for {} in {}: {} launches",
            self.site,
            self.payload_range,
            self.scatter.len()
        )?;
        for p in &self.scatter {
            writeln!(
                f,
                "  {:>8.1} kg  class {}  {}",
                p.payload_mass_kg, p.outcome, p.booster_version_category
            )?;
        }

        for (title, rates) in [
            ("Success rate by site", &self.by_site),
            ("Success rate by booster category", &self.by_booster),
            ("Success rate by payload range (kg)", &self.by_payload),
        ] {
            writeln!(f, "\n{title}")?;
            for r in rates {
                writeln!(
                    f,
                    "  {:<24} {:>3}/{:<3} {:>6.1}%",
                    r.label,
                    r.successes,
                    r.launches,
                    r.rate * 100.0
                )?;
            }
            if let (Some(hi), Some(lo)) = (best(rates), worst(rates)) {
                writeln!(f, "  highest: {}  lowest: {}", hi.label, lo.label)?;
            }
        }

        let most = match &self.outcome_summary {
            OutcomeSummary::AllSites { rows } => rows
                .iter()
                .reduce(|acc, r| if r.total_successes > acc.total_successes { r } else { acc }),
            OutcomeSummary::SingleSite { .. } => None,
        };
        if let Some(top) = most {
            writeln!(f, "\nMost successful launches: {}", top.launch_site)?;
        }
        Ok(())
    }
}
