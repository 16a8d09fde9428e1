//! Data layer: core types, sources and file loading.
//!
//! Architecture:
//! ```text
//!  postgres `census` table      .parquet / .json / .csv
//!        │                            │
//!        ▼                            ▼
//!   ┌────────────────┐         ┌──────────┐
//!   │ PostgresSource │         │  loader   │  parse file → Vec<Entity>
//!   └────────────────┘         └──────────┘
//!        │                            │
//!        └──────────┬─────────────────┘
//!                   ▼
//!          ┌────────────────┐
//!          │  DataSource     │  fetch() → Vec<Entity>
//!          └────────────────┘
//!                   │
//!                   ▼
//!          ┌────────────────┐
//!          │ CensusDataset   │  typed rows + origin
//!          └────────────────┘
//! ```

pub mod loader;
pub mod model;
pub mod source;
