use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Entity – one county-level observation
// ---------------------------------------------------------------------------

/// One row of the census extract.
///
/// Field names match the database columns; the aliases accept the display
/// names so exported spreadsheets load unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(alias = "Gini Index")]
    pub gini_index: f64,
    #[serde(alias = "Vacant Housing")]
    pub vacant_housing: f64,
    #[serde(alias = "Percent Unemployed")]
    pub percent_unemployed: f64,
    #[serde(alias = "Median Family Income")]
    pub median_family_income: f64,
}

// ---------------------------------------------------------------------------
// Column – typed handle on one Entity field
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    GiniIndex,
    VacantHousing,
    PercentUnemployed,
    MedianFamilyIncome,
}

impl Column {
    pub const ALL: [Column; 4] = [
        Column::GiniIndex,
        Column::VacantHousing,
        Column::PercentUnemployed,
        Column::MedianFamilyIncome,
    ];

    /// Human-readable name used in the UI.
    pub fn display_name(self) -> &'static str {
        match self {
            Column::GiniIndex => "Gini Index",
            Column::VacantHousing => "Vacant Housing",
            Column::PercentUnemployed => "Percent Unemployed",
            Column::MedianFamilyIncome => "Median Family Income",
        }
    }

    /// Column name in the `census` table and in file headers.
    pub fn db_name(self) -> &'static str {
        match self {
            Column::GiniIndex => "gini_index",
            Column::VacantHousing => "vacant_housing",
            Column::PercentUnemployed => "percent_unemployed",
            Column::MedianFamilyIncome => "median_family_income",
        }
    }

    pub fn value(self, entity: &Entity) -> f64 {
        match self {
            Column::GiniIndex => entity.gini_index,
            Column::VacantHousing => entity.vacant_housing,
            Column::PercentUnemployed => entity.percent_unemployed,
            Column::MedianFamilyIncome => entity.median_family_income,
        }
    }

    /// Match either the database name or the display name.
    pub fn from_name(name: &str) -> Option<Column> {
        let name = name.trim();
        Column::ALL
            .into_iter()
            .find(|c| c.db_name() == name || c.display_name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// CensusDataset – one fetched snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct CensusDataset {
    pub entities: Vec<Entity>,
    /// Where the rows came from, for the status bar.
    pub origin: String,
}

impl CensusDataset {
    pub fn new(entities: Vec<Entity>, origin: impl Into<String>) -> Self {
        Self {
            entities,
            origin: origin.into(),
        }
    }

    /// All values of one column, in row order.
    pub fn column(&self, column: Column) -> Vec<f64> {
        self.entities.iter().map(|e| column.value(e)).collect()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
