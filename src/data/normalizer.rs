//! Data Normalizer Module
//! Categorical fill, yes/no flag binarization and date coercion.

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use thiserror::Error;

use super::schema::TableSchema;

#[derive(Error, Debug)]
pub enum NormalizerError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Tokens that binarize to 0 after lowercasing and trimming. Everything
/// else, any non-empty text included, becomes 1. The list deliberately only
/// knows the source data's spelling of "no"; `"0"` is in it so that a
/// second pass over an already binarized column changes nothing.
const NEGATIVE_TOKENS: [&str; 4] = ["no", "nan", "", "0"];

/// Date formats tried in order when coercing the date column.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// The resolved date column, coerced row-by-row. Cells that do not parse
/// as a date carry no value instead of failing the pipeline.
#[derive(Debug, Clone)]
pub struct DateColumn {
    pub name: String,
    pub values: Vec<Option<NaiveDate>>,
}

/// Output of the normalization stage. Read-only for all aggregation steps.
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    pub df: DataFrame,
    pub date: Option<DateColumn>,
}

/// Handles the normalization pass between loading and aggregation.
pub struct Normalizer;

impl Normalizer {
    /// Normalize a loaded table against the schema: fill the categorical
    /// columns, binarize the flag columns and coerce the date column.
    /// Row count is never changed.
    pub fn normalize(
        df: &DataFrame,
        schema: &TableSchema,
    ) -> Result<NormalizedTable, NormalizerError> {
        let mut df = df.clone();

        for (column, placeholder) in &schema.categorical_fills {
            df = Self::fill_categorical(df, column, placeholder)?;
        }

        for column in &schema.flag_columns {
            Self::binarize_column(&mut df, column)?;
        }

        let date = schema
            .resolve_date_column(&df)
            .map(|name| Self::coerce_dates(&df, &name))
            .transpose()?;

        Ok(NormalizedTable { df, date })
    }

    /// Replace missing values in one categorical column with its
    /// placeholder. A column absent from the source is left absent.
    fn fill_categorical(
        df: DataFrame,
        column: &str,
        placeholder: &str,
    ) -> PolarsResult<DataFrame> {
        if df.column(column).is_err() {
            return Ok(df);
        }

        df.lazy()
            .with_column(col(column).fill_null(lit(placeholder)))
            .collect()
    }

    /// Coerce one column into a strict 0/1 flag.
    ///
    /// A column missing from the source is created with every value 0
    /// (absence means negative). The transform is one-way: distinct source
    /// spellings collapse to the same flag.
    pub fn binarize_column(df: &mut DataFrame, column: &str) -> PolarsResult<()> {
        let height = df.height();

        let values: Vec<i32> = match df.column(column) {
            Ok(col) => (0..height)
                .map(|i| {
                    let token = col
                        .get(i)
                        .map(|value| Self::cell_token(&value))
                        .unwrap_or_default();
                    i32::from(!NEGATIVE_TOKENS.contains(&token.as_str()))
                })
                .collect(),
            Err(_) => vec![0; height],
        };

        df.with_column(Column::new(column.into(), values))?;
        Ok(())
    }

    /// Parse the date column cell-by-cell. Unparseable cells become `None`.
    fn coerce_dates(df: &DataFrame, column: &str) -> PolarsResult<DateColumn> {
        let col = df.column(column)?;

        let values = (0..df.height())
            .map(|i| match col.get(i) {
                Err(_) => None,
                Ok(value) if value.is_null() => None,
                Ok(AnyValue::Date(days)) => NaiveDate::from_ymd_opt(1970, 1, 1)
                    .and_then(|epoch| epoch.checked_add_signed(chrono::Duration::days(days as i64))),
                Ok(value) => Self::parse_date_text(&value.to_string()),
            })
            .collect();

        Ok(DateColumn {
            name: column.to_string(),
            values,
        })
    }

    /// Lowercased, trimmed text content of a cell; nulls become "".
    fn cell_token(value: &AnyValue) -> String {
        if value.is_null() {
            return String::new();
        }
        value.to_string().trim_matches('"').trim().to_lowercase()
    }

    fn parse_date_text(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim_matches('"').trim();
        if raw.is_empty() {
            return None;
        }

        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
                return Some(date);
            }
        }
        for format in DATETIME_FORMATS {
            if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(datetime.date());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::{CV_SEEN_COL, MODALITY_COL, STATUS_COL, STATUS_PLACEHOLDER};
    use polars::df;

    fn flag_values(df: &DataFrame, column: &str) -> Vec<i32> {
        let col = df.column(column).unwrap();
        (0..df.height())
            .map(|i| match col.get(i).unwrap() {
                AnyValue::Int32(v) => v,
                other => panic!("flag column holds non-flag value {other:?}"),
            })
            .collect()
    }

    #[test]
    fn binarizes_yes_no_variants() {
        let mut df = df!("CV Visto" => &["Sí", "", "NO", "si"]).unwrap();
        Normalizer::binarize_column(&mut df, "CV Visto").unwrap();
        assert_eq!(flag_values(&df, "CV Visto"), vec![1, 0, 0, 1]);
    }

    #[test]
    fn binarization_trims_and_lowercases() {
        let mut df = df!("Entrevista" => &[" sí ", "SI", " No", "nan"]).unwrap();
        Normalizer::binarize_column(&mut df, "Entrevista").unwrap();
        assert_eq!(flag_values(&df, "Entrevista"), vec![1, 1, 0, 0]);
    }

    #[test]
    fn binarization_treats_null_as_negative() {
        let mut df = df!("CV Visto" => &[Some("Sí"), None, Some("yes")]).unwrap();
        Normalizer::binarize_column(&mut df, "CV Visto").unwrap();
        assert_eq!(flag_values(&df, "CV Visto"), vec![1, 0, 1]);
    }

    #[test]
    fn binarization_fabricates_missing_column_as_zero() {
        let mut df = df!("Empresa" => &["Acme", "Initech"]).unwrap();
        Normalizer::binarize_column(&mut df, "CV Visto").unwrap();
        assert_eq!(flag_values(&df, "CV Visto"), vec![0, 0]);
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn binarization_is_idempotent() {
        let mut df = df!("CV Visto" => &["Sí", "no", "", "tal vez"]).unwrap();
        Normalizer::binarize_column(&mut df, "CV Visto").unwrap();
        let once = flag_values(&df, "CV Visto");

        Normalizer::binarize_column(&mut df, "CV Visto").unwrap();
        assert_eq!(flag_values(&df, "CV Visto"), once);
    }

    #[test]
    fn fills_categorical_columns_with_placeholders() {
        let df = df!(
            "Estatus" => &[Some("En proceso"), None, Some("Rechazado")],
            "Modalidad" => &[None::<&str>, None, Some("Remoto")],
        )
        .unwrap();

        let table = Normalizer::normalize(&df, &TableSchema::default()).unwrap();
        let status = table.df.column(STATUS_COL).unwrap();
        let modality = table.df.column(MODALITY_COL).unwrap();

        assert_eq!(status.null_count(), 0);
        assert_eq!(modality.null_count(), 0);
        assert_eq!(
            status.get(1).unwrap().to_string().trim_matches('"'),
            STATUS_PLACEHOLDER
        );
    }

    #[test]
    fn normalization_preserves_row_count() {
        let df = df!(
            "Estatus" => &[Some("A"), None, None, Some("B"), None],
            "CV Visto" => &["Sí", "no", "", "si", "NO"],
        )
        .unwrap();

        let table = Normalizer::normalize(&df, &TableSchema::default()).unwrap();
        assert_eq!(table.df.height(), 5);
    }

    #[test]
    fn missing_categorical_column_is_not_fabricated() {
        let df = df!("Empresa" => &["Acme"]).unwrap();
        let table = Normalizer::normalize(&df, &TableSchema::default()).unwrap();

        assert!(table.df.column(MODALITY_COL).is_err());
        // Flag columns are the only fabricated ones.
        assert_eq!(flag_values(&table.df, CV_SEEN_COL), vec![0]);
    }

    #[test]
    fn coerces_dates_and_drops_unparseable_cells() {
        let df = df!(
            "Fecha de postulación" => &[
                Some("2024-01-03"),
                Some("03/01/2024"),
                Some("garbage"),
                None,
            ],
        )
        .unwrap();

        let table = Normalizer::normalize(&df, &TableSchema::default()).unwrap();
        let date = table.date.expect("date column discovered");

        let expected = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        assert_eq!(date.name, "Fecha de postulación");
        assert_eq!(
            date.values,
            vec![Some(expected), Some(expected), None, None]
        );
    }

    #[test]
    fn no_date_column_means_no_date_view() {
        let df = df!("Empresa" => &["Acme"]).unwrap();
        let table = Normalizer::normalize(&df, &TableSchema::default()).unwrap();
        assert!(table.date.is_none());
    }
}
