use std::collections::BTreeMap;

use serde::Serialize;

use super::model::{LaunchDataset, PayloadRange, SiteSelection};

// ---------------------------------------------------------------------------
// Result tables
// ---------------------------------------------------------------------------

/// `(launch_site, total_successes)` row of the all-sites aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteSuccesses {
    pub launch_site: String,
    pub total_successes: u64,
}

/// `(outcome_value, count)` row of the single-site aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutcomeCount {
    pub outcome: u8,
    pub count: u64,
}

/// Result of the outcome aggregation, tagged by mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OutcomeSummary {
    AllSites { rows: Vec<SiteSuccesses> },
    SingleSite { site: String, rows: Vec<OutcomeCount> },
}

impl OutcomeSummary {
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn row_count(&self) -> usize {
        match self {
            OutcomeSummary::AllSites { rows } => rows.len(),
            OutcomeSummary::SingleSite { rows, .. } => rows.len(),
        }
    }

    /// Chart title for the current mode.
    pub fn title(&self) -> String {
        match self {
            OutcomeSummary::AllSites { .. } => "Total Successful Launches by Site".to_string(),
            OutcomeSummary::SingleSite { site, .. } => {
                format!("Success vs. Failed Launches for {site}")
            }
        }
    }

    /// `(label, value)` slices, in row order.
    pub fn slices(&self) -> Vec<(String, f64)> {
        match self {
            OutcomeSummary::AllSites { rows } => rows
                .iter()
                .map(|r| (r.launch_site.clone(), r.total_successes as f64))
                .collect(),
            OutcomeSummary::SingleSite { rows, .. } => rows
                .iter()
                .map(|r| (r.outcome.to_string(), r.count as f64))
                .collect(),
        }
    }
}

/// One point of the payload/outcome scatter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub payload_mass_kg: f64,
    pub outcome: u8,
    pub booster_version_category: String,
}

// ---------------------------------------------------------------------------
// Outcome aggregation
// ---------------------------------------------------------------------------

/// Outcome distribution for the selected site.
///
/// * All sites: successes summed per site, one row per site, sorted by site.
/// * One site: count of each observed outcome value among that site's
///   launches, most frequent first (ties: lower outcome value first).
///   An unknown site yields zero rows.
pub fn outcome_summary(dataset: &LaunchDataset, site: &SiteSelection) -> OutcomeSummary {
    match site {
        SiteSelection::All => {
            let mut per_site: BTreeMap<&str, u64> = BTreeMap::new();
            for rec in dataset.records() {
                *per_site.entry(rec.launch_site.as_str()).or_default() += u64::from(rec.outcome);
            }
            let rows = per_site
                .into_iter()
                .map(|(site, total)| SiteSuccesses {
                    launch_site: site.to_string(),
                    total_successes: total,
                })
                .collect();
            OutcomeSummary::AllSites { rows }
        }
        SiteSelection::Site(name) => {
            let mut per_outcome: BTreeMap<u8, u64> = BTreeMap::new();
            for rec in dataset.records().iter().filter(|r| &r.launch_site == name) {
                *per_outcome.entry(rec.outcome).or_default() += 1;
            }
            let mut rows: Vec<OutcomeCount> = per_outcome
                .into_iter()
                .map(|(outcome, count)| OutcomeCount { outcome, count })
                .collect();
            // Stable sort keeps ascending outcome order among equal counts.
            rows.sort_by(|a, b| b.count.cmp(&a.count));
            OutcomeSummary::SingleSite {
                site: name.clone(),
                rows,
            }
        }
    }
}

/// Operator-facing note when a concrete site has no launches in the
/// table; both queries still answer with empty results.
pub fn unknown_site_notice(dataset: &LaunchDataset, site: &SiteSelection) -> Option<String> {
    match site {
        SiteSelection::Site(name) if !dataset.has_site(name) => {
            log::warn!("Selected site '{name}' has no launches");
            Some(format!("No launches recorded for '{name}'"))
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Payload / outcome scatter
// ---------------------------------------------------------------------------

/// Records inside `range` (inclusive) launched from the selected site,
/// in source order.
pub fn payload_scatter(
    dataset: &LaunchDataset,
    site: &SiteSelection,
    range: PayloadRange,
) -> Vec<ScatterPoint> {
    dataset
        .records()
        .iter()
        .filter(|rec| site.matches(&rec.launch_site))
        .filter_map(|rec| {
            let payload = rec.payload_mass_kg?;
            range.contains(Some(payload)).then(|| ScatterPoint {
                payload_mass_kg: payload,
                outcome: rec.outcome,
                booster_version_category: rec.booster_version_category.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::LaunchRecord;

    fn rec(site: &str, payload: f64, outcome: u8, booster: &str) -> LaunchRecord {
        LaunchRecord {
            launch_site: site.to_string(),
            payload_mass_kg: Some(payload),
            booster_version_category: booster.to_string(),
            outcome,
        }
    }

    fn scenario_table() -> LaunchDataset {
        LaunchDataset::from_records(vec![
            rec("A", 500.0, 1, "v1.0"),
            rec("A", 1500.0, 0, "v1.0"),
            rec("B", 3000.0, 1, "FT"),
        ])
    }

    fn larger_table() -> LaunchDataset {
        LaunchDataset::from_records(vec![
            rec("CCAFS LC-40", 0.0, 0, "v1.0"),
            rec("CCAFS LC-40", 525.0, 0, "v1.0"),
            rec("VAFB SLC-4E", 500.0, 0, "v1.1"),
            rec("KSC LC-39A", 2490.0, 1, "FT"),
            rec("CCAFS LC-40", 3136.0, 1, "FT"),
            rec("KSC LC-39A", 5300.0, 1, "FT"),
            rec("VAFB SLC-4E", 9600.0, 1, "FT"),
            rec("CCAFS SLC-40", 4707.0, 1, "B4"),
            rec("KSC LC-39A", 3669.0, 0, "B4"),
            rec("CCAFS SLC-40", 6460.0, 0, "B5"),
            rec("KSC LC-39A", 2205.0, 1, "B4"),
        ])
    }

    fn all_range() -> PayloadRange {
        PayloadRange::new(f64::NEG_INFINITY, f64::INFINITY)
    }

    #[test]
    fn scenario_a_all_sites_successes() {
        let summary = outcome_summary(&scenario_table(), &SiteSelection::All);
        assert_eq!(
            summary,
            OutcomeSummary::AllSites {
                rows: vec![
                    SiteSuccesses { launch_site: "A".into(), total_successes: 1 },
                    SiteSuccesses { launch_site: "B".into(), total_successes: 1 },
                ]
            }
        );
    }

    #[test]
    fn scenario_b_single_site_partition() {
        let summary = outcome_summary(&scenario_table(), &SiteSelection::Site("A".into()));
        let OutcomeSummary::SingleSite { site, rows } = summary else {
            panic!("expected single-site mode");
        };
        assert_eq!(site, "A");
        assert_eq!(
            rows,
            vec![
                OutcomeCount { outcome: 0, count: 1 },
                OutcomeCount { outcome: 1, count: 1 },
            ]
        );
    }

    #[test]
    fn scenario_c_scatter_excludes_out_of_range() {
        let points = payload_scatter(
            &scenario_table(),
            &SiteSelection::parse("ALL"),
            PayloadRange::new(0.0, 2000.0),
        );
        assert_eq!(
            points,
            vec![
                ScatterPoint {
                    payload_mass_kg: 500.0,
                    outcome: 1,
                    booster_version_category: "v1.0".into()
                },
                ScatterPoint {
                    payload_mass_kg: 1500.0,
                    outcome: 0,
                    booster_version_category: "v1.0".into()
                },
            ]
        );
    }

    #[test]
    fn scenario_d_unknown_site_is_empty() {
        let ds = scenario_table();
        let unknown = SiteSelection::Site("C".into());

        assert!(outcome_summary(&ds, &unknown).is_empty());
        assert!(payload_scatter(&ds, &unknown, all_range()).is_empty());
    }

    #[test]
    fn all_sites_total_matches_table_successes() {
        let ds = larger_table();
        let expected: u64 = ds.records().iter().map(|r| u64::from(r.outcome)).sum();

        let OutcomeSummary::AllSites { rows } = outcome_summary(&ds, &SiteSelection::All) else {
            panic!("expected all-sites mode");
        };
        let total: u64 = rows.iter().map(|r| r.total_successes).sum();
        assert_eq!(total, expected);

        let names: Vec<&str> = rows.iter().map(|r| r.launch_site.as_str()).collect();
        assert_eq!(
            names,
            ["CCAFS LC-40", "CCAFS SLC-40", "KSC LC-39A", "VAFB SLC-4E"]
        );
    }

    #[test]
    fn single_site_counts_cover_every_site_launch() {
        let ds = larger_table();
        for site in ds.sites() {
            let launches = ds.records().iter().filter(|r| &r.launch_site == site).count();
            let OutcomeSummary::SingleSite { rows, .. } =
                outcome_summary(&ds, &SiteSelection::Site(site.clone()))
            else {
                panic!("expected single-site mode");
            };
            let counted: u64 = rows.iter().map(|r| r.count).sum();
            assert_eq!(counted as usize, launches, "site {site}");
        }
    }

    #[test]
    fn single_site_sorts_by_count_and_skips_unseen_outcomes() {
        let ds = larger_table();

        let OutcomeSummary::SingleSite { rows, .. } =
            outcome_summary(&ds, &SiteSelection::Site("KSC LC-39A".into()))
        else {
            panic!("expected single-site mode");
        };
        assert_eq!(
            rows,
            vec![
                OutcomeCount { outcome: 1, count: 3 },
                OutcomeCount { outcome: 0, count: 1 },
            ]
        );

        let only_failures = LaunchDataset::from_records(vec![rec("X", 10.0, 0, "v1.0")]);
        let OutcomeSummary::SingleSite { rows, .. } =
            outcome_summary(&only_failures, &SiteSelection::Site("X".into()))
        else {
            panic!("expected single-site mode");
        };
        assert_eq!(rows, vec![OutcomeCount { outcome: 0, count: 1 }]);
    }

    #[test]
    fn unknown_site_notice_only_for_absent_sites() {
        let ds = scenario_table();
        assert_eq!(unknown_site_notice(&ds, &SiteSelection::All), None);
        assert_eq!(unknown_site_notice(&ds, &SiteSelection::Site("A".into())), None);
        assert_eq!(
            unknown_site_notice(&ds, &SiteSelection::Site("C".into())).as_deref(),
            Some("No launches recorded for 'C'")
        );
    }

    #[test]
    fn scatter_returns_exactly_the_matching_records() {
        let ds = larger_table();
        let range = PayloadRange::new(500.0, 5300.0);

        for selection in std::iter::once(SiteSelection::All)
            .chain(ds.sites().iter().cloned().map(SiteSelection::Site))
        {
            let points = payload_scatter(&ds, &selection, range);
            assert!(points
                .iter()
                .all(|p| p.payload_mass_kg >= 500.0 && p.payload_mass_kg <= 5300.0));

            let expected: Vec<ScatterPoint> = ds
                .records()
                .iter()
                .filter(|r| selection.matches(&r.launch_site) && range.contains(r.payload_mass_kg))
                .map(|r| ScatterPoint {
                    payload_mass_kg: r.payload_mass_kg.unwrap_or_default(),
                    outcome: r.outcome,
                    booster_version_category: r.booster_version_category.clone(),
                })
                .collect();
            assert_eq!(points, expected, "selection {selection}");
        }
    }

    #[test]
    fn scatter_preserves_source_order() {
        let ds = larger_table();
        let points = payload_scatter(&ds, &SiteSelection::Site("KSC LC-39A".into()), all_range());
        let payloads: Vec<f64> = points.iter().map(|p| p.payload_mass_kg).collect();
        assert_eq!(payloads, [2490.0, 5300.0, 3669.0, 2205.0]);
    }

    #[test]
    fn widening_range_never_shrinks_scatter() {
        let ds = larger_table();
        let site = SiteSelection::All;
        let mut prev = 0;
        for (lo, hi) in [
            (3000.0, 3000.0),
            (3000.0, 4000.0),
            (2000.0, 4000.0),
            (2000.0, 7000.0),
            (0.0, 7000.0),
            (0.0, 10000.0),
        ] {
            let n = payload_scatter(&ds, &site, PayloadRange::new(lo, hi)).len();
            assert!(n >= prev, "[{lo}, {hi}] returned {n} < {prev}");
            prev = n;
        }
        assert_eq!(prev, ds.len());
    }

    #[test]
    fn inverted_range_and_missing_payloads_are_empty_not_errors() {
        let mut records = vec![rec("A", 100.0, 1, "FT")];
        records.push(LaunchRecord {
            launch_site: "A".into(),
            payload_mass_kg: None,
            booster_version_category: "FT".into(),
            outcome: 1,
        });
        let ds = LaunchDataset::from_records(records);

        assert!(payload_scatter(&ds, &SiteSelection::All, PayloadRange::new(200.0, 100.0)).is_empty());
        assert_eq!(payload_scatter(&ds, &SiteSelection::All, all_range()).len(), 1);
    }

    #[test]
    fn empty_table_gives_empty_results() {
        let ds = LaunchDataset::from_records(Vec::new());
        assert!(outcome_summary(&ds, &SiteSelection::All).is_empty());
        assert!(payload_scatter(&ds, &SiteSelection::All, all_range()).is_empty());
    }
}
