use std::path::PathBuf;

use crate::color::ColorMap;
use crate::config::Config;
use crate::data::model::CensusDataset;
use crate::data::source::{self, DataSource, FileSource};
use crate::report::{Report, ReportSettings};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Where rows come from; `None` until configured or a file is opened.
    pub source: Option<Box<dyn DataSource>>,

    /// Last fetched snapshot.
    pub dataset: Option<CensusDataset>,

    /// Quantile count, duplicate policy and plot axes.
    pub settings: ReportSettings,

    /// Everything derived from `dataset` under `settings`.
    pub report: Option<Report>,

    /// Colours for the quantile labels of the current report.
    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let settings = ReportSettings {
            quantiles: config.quantiles,
            policy: config.duplicates,
            ..ReportSettings::default()
        };
        Self {
            source: source::from_config(config),
            dataset: None,
            settings,
            report: None,
            color_map: ColorMap::new(settings.quantiles),
            status_message: None,
        }
    }

    /// Replace the data source and fetch from it.
    pub fn set_source(&mut self, source: Box<dyn DataSource>) {
        self.source = Some(source);
        self.reload();
    }

    pub fn open_file(&mut self, path: PathBuf) {
        self.set_source(Box::new(FileSource::new(path)));
    }

    /// Fetch a fresh snapshot from the current source.
    pub fn reload(&mut self) {
        let Some(source) = self.source.as_mut() else {
            return;
        };
        let origin = source.describe();
        match source.fetch() {
            Ok(entities) => {
                log::info!("Fetched {} counties from {origin}", entities.len());
                self.set_dataset(CensusDataset::new(entities, origin));
            }
            Err(e) => {
                log::error!("Failed to fetch census data from {origin}: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly fetched dataset and rebuild the report.
    pub fn set_dataset(&mut self, dataset: CensusDataset) {
        if dataset.is_empty() {
            log::warn!("{} returned no rows", dataset.origin);
        }
        self.dataset = Some(dataset);
        self.rebuild();
    }

    /// Recompute the report from scratch.
    pub fn rebuild(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        let report = Report::build(dataset, self.settings);

        match &report.labeled {
            Ok(labeled) => {
                self.color_map = ColorMap::new(labeled.classification.effective_k);
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("Quantile classification failed: {e}");
                self.color_map = ColorMap::new(self.settings.quantiles);
                self.status_message = Some(format!("Classification error: {e}"));
            }
        }
        self.report = Some(report);
    }

    /// Apply edited settings, refitting or rebuilding only as needed.
    pub fn apply_settings(&mut self, settings: ReportSettings) {
        if settings == self.settings {
            return;
        }
        let rebuild = self
            .report
            .as_ref()
            .map_or(true, |r| r.needs_rebuild(&settings));
        self.settings = settings;

        if rebuild {
            self.rebuild();
        } else if let Some(report) = &mut self.report {
            report.set_axes(settings.x, settings.y);
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, bail};

    use super::*;
    use crate::analysis::quantile::DuplicatePolicy;
    use crate::data::model::{Column, Entity};
    use crate::data::source::MemorySource;

    struct Unreachable;

    impl DataSource for Unreachable {
        fn describe(&self) -> String {
            "unreachable".into()
        }

        fn fetch(&mut self) -> Result<Vec<Entity>> {
            bail!("connection refused")
        }
    }

    fn counties(incomes: &[f64]) -> Vec<Entity> {
        incomes
            .iter()
            .enumerate()
            .map(|(i, &income)| Entity {
                gini_index: 0.4 + i as f64 * 0.001,
                vacant_housing: 500.0,
                percent_unemployed: 4.0 + i as f64 * 0.1,
                median_family_income: income,
            })
            .collect()
    }

    #[test]
    fn starts_empty_without_a_source() {
        let mut state = AppState::new(&Config::default());
        state.reload();
        assert!(state.source.is_none());
        assert!(state.report.is_none());
    }

    #[test]
    fn fetching_builds_the_report() {
        let mut state = AppState::new(&Config::default());
        state.set_source(Box::new(MemorySource::new(
            "fixture",
            counties(&[30.0, 10.0, 20.0, 40.0, 60.0, 50.0, 80.0, 70.0]),
        )));

        let dataset = state.dataset.as_ref().unwrap();
        assert_eq!(dataset.origin, "fixture");
        let report = state.report.as_ref().unwrap();
        let labeled = report.labeled.as_ref().unwrap();
        assert_eq!(labeled.classification.labels, vec![2, 1, 1, 2, 3, 3, 4, 4]);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn fetch_errors_surface_in_the_status_bar() {
        let mut state = AppState::new(&Config::default());
        state.set_source(Box::new(Unreachable));
        assert!(state.dataset.is_none());
        assert!(state.status_message.unwrap().contains("connection refused"));
    }

    #[test]
    fn policy_change_rebuilds_and_axis_change_refits() {
        let mut state = AppState::new(&Config::default());
        state.set_source(Box::new(MemorySource::new("ties", counties(&[1.0, 2.0, 2.0, 3.0]))));
        assert!(state.report.as_ref().unwrap().labeled.is_err());
        assert!(state.status_message.is_some());

        let mut settings = state.settings;
        settings.policy = DuplicatePolicy::Merge;
        state.apply_settings(settings);
        let labeled = state.report.as_ref().unwrap().labeled.as_ref().unwrap();
        assert_eq!(labeled.classification.effective_k, 3);
        assert!(state.status_message.is_none());

        settings.x = Column::VacantHousing;
        state.apply_settings(settings);
        assert_eq!(state.report.as_ref().unwrap().settings.x, Column::VacantHousing);
    }

    #[test]
    fn config_seeds_the_settings() {
        let config = Config {
            quantiles: 3,
            duplicates: DuplicatePolicy::Drop,
            ..Config::default()
        };
        let state = AppState::new(&config);
        assert_eq!(state.settings.quantiles, 3);
        assert_eq!(state.settings.policy, DuplicatePolicy::Drop);
        assert_eq!(state.settings.key, Column::MedianFamilyIncome);
    }
}
