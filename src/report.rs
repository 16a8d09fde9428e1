use std::collections::BTreeMap;

use crate::analysis::describe::{Summary, describe};
use crate::analysis::histogram::{Bin, gaussian_kde, histogram};
use crate::analysis::quantile::{
    Classification, ClassifyError, DEFAULT_QUANTILES, DuplicatePolicy, QuartileLabel, classify,
};
use crate::analysis::regression::{LinearFit, fit_line};
use crate::data::model::{CensusDataset, Column, Entity};

// ---------------------------------------------------------------------------
// Report settings
// ---------------------------------------------------------------------------

/// Knobs that shape a [`Report`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportSettings {
    /// Column the summary, histogram and quantile labels are computed from.
    pub key: Column,
    pub quantiles: usize,
    pub policy: DuplicatePolicy,
    pub x: Column,
    pub y: Column,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            key: Column::MedianFamilyIncome,
            quantiles: DEFAULT_QUANTILES,
            policy: DuplicatePolicy::Raise,
            x: Column::GiniIndex,
            y: Column::PercentUnemployed,
        }
    }
}

// ---------------------------------------------------------------------------
// Report – everything the page draws, computed once per change
// ---------------------------------------------------------------------------

/// Entities with their labels plus one fitted line per label.
#[derive(Debug, Clone)]
pub struct LabeledRows {
    pub classification: Classification,
    /// `(entity, label)` for every row that received a label.
    pub rows: Vec<(Entity, QuartileLabel)>,
    /// Fits of `y` on `x` for the current axes; absent for degenerate groups.
    pub fits: BTreeMap<QuartileLabel, LinearFit>,
}

impl LabeledRows {
    fn new(classification: Classification, entities: &[Entity]) -> Self {
        let rows = classification
            .iter()
            .map(|(pos, label)| (entities[pos], label))
            .collect();
        Self {
            classification,
            rows,
            fits: BTreeMap::new(),
        }
    }

    /// `[x, y]` points of one group.
    pub fn points(&self, label: QuartileLabel, x: Column, y: Column) -> Vec<[f64; 2]> {
        self.rows
            .iter()
            .filter(|(_, l)| *l == label)
            .map(|(e, _)| [x.value(e), y.value(e)])
            .collect()
    }

    fn refit(&mut self, x: Column, y: Column) {
        self.fits = self
            .classification
            .label_range()
            .filter_map(|label| fit_line(&self.points(label, x, y)).map(|fit| (label, fit)))
            .collect();
    }
}

/// The computed page contents.
#[derive(Debug, Clone)]
pub struct Report {
    pub settings: ReportSettings,
    pub rows: usize,
    pub summary: Option<Summary>,
    pub histogram: Vec<Bin>,
    pub density: Vec<[f64; 2]>,
    /// Classification can fail (e.g. duplicate boundaries under `raise`);
    /// the summary and histogram are still shown when it does.
    pub labeled: Result<LabeledRows, ClassifyError>,
}

impl Report {
    pub fn build(dataset: &CensusDataset, settings: ReportSettings) -> Self {
        let key_values = dataset.column(settings.key);

        let labeled = classify(&key_values, settings.quantiles, settings.policy).map(|c| {
            let mut labeled = LabeledRows::new(c, &dataset.entities);
            labeled.refit(settings.x, settings.y);
            labeled
        });

        Report {
            settings,
            rows: dataset.len(),
            summary: describe(&key_values).map(|s| s.rounded()),
            histogram: histogram(&key_values),
            density: gaussian_kde(&key_values),
            labeled,
        }
    }

    /// Change the linear-model axes without reclassifying.
    pub fn set_axes(&mut self, x: Column, y: Column) {
        self.settings.x = x;
        self.settings.y = y;
        if let Ok(labeled) = &mut self.labeled {
            labeled.refit(x, y);
        }
    }

    /// Whether new settings require a full rebuild rather than a refit.
    pub fn needs_rebuild(&self, settings: &ReportSettings) -> bool {
        self.settings.key != settings.key
            || self.settings.quantiles != settings.quantiles
            || self.settings.policy != settings.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(income: f64, unemployed: f64, gini: f64) -> Entity {
        Entity {
            gini_index: gini,
            vacant_housing: 100.0,
            percent_unemployed: unemployed,
            median_family_income: income,
        }
    }

    fn dataset() -> CensusDataset {
        let entities = (1..=8)
            .map(|i| {
                let i = f64::from(i);
                entity(10_000.0 * i, 10.0 - i, 0.3 + 0.01 * i)
            })
            .collect();
        CensusDataset::new(entities, "fixture")
    }

    #[test]
    fn report_labels_income_quartiles() {
        let report = Report::build(&dataset(), ReportSettings::default());
        let labeled = report.labeled.as_ref().unwrap();
        let labels: Vec<QuartileLabel> = labeled.rows.iter().map(|(_, l)| *l).collect();
        assert_eq!(labels, vec![1, 1, 2, 2, 3, 3, 4, 4]);
        assert_eq!(report.summary.as_ref().unwrap().count, 8);
        assert_eq!(report.summary.as_ref().unwrap().median, 45_000.0);
        assert!(!report.histogram.is_empty());
        assert!(!report.density.is_empty());
    }

    #[test]
    fn every_quartile_gets_a_fit() {
        let report = Report::build(&dataset(), ReportSettings::default());
        let labeled = report.labeled.unwrap();
        assert_eq!(labeled.fits.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        // Unemployment falls 1 point per 0.01 of Gini in the fixture.
        assert!((labeled.fits[&1].slope + 100.0).abs() < 1e-6);
    }

    #[test]
    fn changing_axes_refits_without_reclassifying() {
        let mut report = Report::build(&dataset(), ReportSettings::default());
        report.set_axes(Column::MedianFamilyIncome, Column::PercentUnemployed);
        let labeled = report.labeled.as_ref().unwrap();
        assert!((labeled.fits[&2].slope + 0.0001).abs() < 1e-12);
        assert_eq!(labeled.points(2, Column::MedianFamilyIncome, Column::GiniIndex).len(), 2);

        let mut settings = report.settings;
        assert!(!report.needs_rebuild(&settings));
        settings.quantiles = 2;
        assert!(report.needs_rebuild(&settings));
    }

    #[test]
    fn classification_failure_keeps_the_summary() {
        let flat = CensusDataset::new(vec![entity(50_000.0, 5.0, 0.4); 6], "flat");
        let report = Report::build(&flat, ReportSettings::default());
        assert!(matches!(report.labeled, Err(ClassifyError::DuplicateBoundary { .. })));
        assert_eq!(report.summary.unwrap().mean, 50_000.0);

        let merged = Report::build(
            &flat,
            ReportSettings {
                policy: DuplicatePolicy::Merge,
                ..ReportSettings::default()
            },
        );
        let labeled = merged.labeled.unwrap();
        assert_eq!(labeled.classification.effective_k, 1);
        // No spread in x, so no line can be fitted.
        assert!(labeled.fits.is_empty());
    }

    #[test]
    fn empty_dataset_reports_empty_input() {
        let report = Report::build(&CensusDataset::default(), ReportSettings::default());
        assert_eq!(report.labeled.unwrap_err(), ClassifyError::EmptyInput);
        assert!(report.summary.is_none());
        assert!(report.histogram.is_empty());
    }
}
