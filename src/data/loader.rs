//! CSV Data Loader Module
//! Handles CSV file loading and column extraction using Polars.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Input file not found: {0}")]
    MissingFile(PathBuf),
    #[error("Failed to read tabular data: {0}")]
    Unreadable(#[from] PolarsError),
}

/// Handles CSV file loading with Polars.
///
/// The file must exist before any read is attempted; a missing path is a
/// fatal [`LoaderError::MissingFile`] and nothing downstream runs.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Load a CSV file, preserving column names and row order.
    pub fn load_csv(&mut self, file_path: &Path) -> Result<&DataFrame, LoaderError> {
        if !file_path.exists() {
            return Err(LoaderError::MissingFile(file_path.to_path_buf()));
        }

        let df = LazyCsvReader::new(file_path.to_string_lossy().as_ref())
            .with_infer_schema_length(Some(10000))
            .finish()?
            .collect()?;

        self.file_path = Some(file_path.to_path_buf());
        Ok(self.df.insert(df))
    }

    /// Get list of column names from the loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    /// Set DataFrame directly (used for async loading).
    pub fn set_dataframe(&mut self, df: DataFrame, path: PathBuf) {
        self.df = Some(df);
        self.file_path = Some(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_path_fails_before_reading() {
        let mut loader = DataLoader::new();
        let err = loader
            .load_csv(Path::new("/definitely/not/here.csv"))
            .unwrap_err();
        assert!(matches!(err, LoaderError::MissingFile(_)));
    }

    #[test]
    fn unreadable_input_is_a_distinct_error() {
        let dir = tempfile::tempdir().unwrap();

        // The path exists but is a directory, so parsing must fail.
        let mut loader = DataLoader::new();
        let err = loader.load_csv(dir.path()).unwrap_err();
        assert!(matches!(err, LoaderError::Unreadable(_)));
    }

    #[test]
    fn loads_columns_and_rows_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("postulaciones.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Empresa,Puesto,Estatus").unwrap();
        writeln!(file, "Acme,Backend,En proceso").unwrap();
        writeln!(file, "Initech,Data,Rechazado").unwrap();

        let mut loader = DataLoader::new();
        loader.load_csv(&path).unwrap();

        assert_eq!(loader.get_columns(), vec!["Empresa", "Puesto", "Estatus"]);
        assert_eq!(loader.get_row_count(), 2);
    }
}
