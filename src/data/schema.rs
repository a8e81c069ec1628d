//! Table Schema Module
//! Fixed column names, sentinel labels and date-column configuration.

use polars::prelude::*;

/// Application status column.
pub const STATUS_COL: &str = "Estatus";
/// Work modality column.
pub const MODALITY_COL: &str = "Modalidad";
/// Company type column.
pub const COMPANY_TYPE_COL: &str = "Tipo de empresa";
/// Company name column (distinct-count only).
pub const COMPANY_COL: &str = "Empresa";
/// Job title / category column.
pub const POSITION_COL: &str = "Puesto";
/// "CV seen" flag column.
pub const CV_SEEN_COL: &str = "CV Visto";
/// "Interview" flag column.
pub const INTERVIEW_COL: &str = "Entrevista";

/// Placeholder for a missing application status.
pub const STATUS_PLACEHOLDER: &str = "Sin especificar";
/// Placeholder for a missing modality or company type.
pub const UNSPECIFIED_PLACEHOLDER: &str = "No especificada";

/// Substring used to discover the date column when none is configured.
const DATE_NAME_TOKEN: &str = "fecha";

/// Column-level configuration for the normalization pipeline.
///
/// Collects the fixed schema in one place: which categorical columns get
/// which placeholder, which columns are binarized into 0/1 flags, and how
/// the date column is resolved.
#[derive(Debug, Clone)]
pub struct TableSchema {
    /// (column, placeholder) pairs for categorical fill.
    pub categorical_fills: Vec<(String, String)>,
    /// Columns coerced to 0/1 flags. Created all-zero when absent.
    pub flag_columns: Vec<String>,
    /// Explicit date column. `None` falls back to name discovery.
    pub date_column: Option<String>,
}

impl Default for TableSchema {
    fn default() -> Self {
        Self {
            categorical_fills: vec![
                (STATUS_COL.to_string(), STATUS_PLACEHOLDER.to_string()),
                (MODALITY_COL.to_string(), UNSPECIFIED_PLACEHOLDER.to_string()),
                (
                    COMPANY_TYPE_COL.to_string(),
                    UNSPECIFIED_PLACEHOLDER.to_string(),
                ),
            ],
            flag_columns: vec![CV_SEEN_COL.to_string(), INTERVIEW_COL.to_string()],
            date_column: None,
        }
    }
}

impl TableSchema {
    /// Resolve the date column for a loaded table.
    ///
    /// The explicit setting wins when the column is actually present;
    /// otherwise the first column whose name contains "fecha"
    /// (case-insensitive) is used, in column order.
    pub fn resolve_date_column(&self, df: &DataFrame) -> Option<String> {
        if let Some(name) = &self.date_column {
            if df.column(name).is_ok() {
                return Some(name.clone());
            }
        }

        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .find(|name| name.to_lowercase().contains(DATE_NAME_TOKEN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn discovers_first_fecha_column() {
        let df = df!(
            "Empresa" => ["A"],
            "Fecha de postulación" => ["2024-01-01"],
            "Fecha de respuesta" => ["2024-01-05"],
        )
        .unwrap();

        let schema = TableSchema::default();
        assert_eq!(
            schema.resolve_date_column(&df).as_deref(),
            Some("Fecha de postulación")
        );
    }

    #[test]
    fn explicit_date_column_wins_over_discovery() {
        let df = df!(
            "Fecha de postulación" => ["2024-01-01"],
            "Fecha de respuesta" => ["2024-01-05"],
        )
        .unwrap();

        let schema = TableSchema {
            date_column: Some("Fecha de respuesta".to_string()),
            ..TableSchema::default()
        };
        assert_eq!(
            schema.resolve_date_column(&df).as_deref(),
            Some("Fecha de respuesta")
        );
    }

    #[test]
    fn missing_explicit_column_falls_back_to_discovery() {
        let df = df!("Fecha" => ["2024-01-01"]).unwrap();

        let schema = TableSchema {
            date_column: Some("Momento".to_string()),
            ..TableSchema::default()
        };
        assert_eq!(schema.resolve_date_column(&df).as_deref(), Some("Fecha"));
    }

    #[test]
    fn no_date_column_yields_none() {
        let df = df!("Empresa" => ["A"], "Puesto" => ["Dev"]).unwrap();
        assert_eq!(TableSchema::default().resolve_date_column(&df), None);
    }
}
