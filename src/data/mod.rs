//! Data module - CSV loading and normalization

mod loader;
mod normalizer;
pub mod schema;

pub use loader::{DataLoader, LoaderError};
pub use normalizer::{DateColumn, NormalizedTable, Normalizer, NormalizerError};
pub use schema::TableSchema;
