//! Analysis layer: pure functions over numeric columns.
//!
//! ```text
//!   Vec<Entity>
//!        │  key column
//!        ▼
//!   ┌──────────┐
//!   │ quantile │  values + k + policy → Classification (1-based labels)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┬───────────┬────────────┐
//!   │ describe │ histogram │ regression │  summary / bins + KDE / OLS lines
//!   └──────────┴───────────┴────────────┘
//! ```
//!
//! Nothing here logs or touches I/O.

pub mod describe;
pub mod histogram;
pub mod quantile;
pub mod regression;
