//! Polars value and column access helpers.
//!
//! Every consumer of the booking table reads cells through these functions,
//! so text and numeric interpretation is the same in the profiler, the
//! derivation pipeline and the query engine.

use polars::prelude::{
    AnyValue, Column, DataFrame, DataType, Float64Chunked, IntoSeries, PolarsResult, Series,
    StringChunked,
};

/// Converts a Polars `AnyValue` to its display text.
///
/// Returns an empty string for `Null`. Floats drop trailing zeros, so
/// `2.0` renders as `"2"`.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => {
            let s = other.to_string();
            if s.starts_with('"') && s.ends_with('"') && s.len() >= 2 {
                s[1..s.len() - 1].to_string()
            } else {
                s
            }
        }
    }
}

/// Converts `AnyValue` to trimmed text, returning `None` if nothing is left.
pub fn any_to_string_non_empty(value: AnyValue<'_>) -> Option<String> {
    let s = any_to_string(value);
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Formats a float without trailing zeros after the decimal point.
///
/// ```
/// use booking_ingest::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(75.50), "75.5");
/// assert_eq!(format_numeric(100.0), "100");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        s
    }
}

fn integral(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 9.0e15 {
        Some(v as i64)
    } else {
        None
    }
}

/// A cell read as a number.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericCell {
    Missing,
    Value(f64),
    /// The cell holds something that is not a number; the raw text is kept.
    Malformed(String),
}

impl NumericCell {
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Missing | Self::Malformed(_) => None,
        }
    }

    /// The value as a whole number; fractional values count as malformed.
    #[must_use]
    pub fn as_count(&self) -> NumericCell {
        match self {
            Self::Value(v) => match integral(*v) {
                Some(_) => self.clone(),
                None => Self::Malformed(format_numeric(*v)),
            },
            other => other.clone(),
        }
    }
}

/// Reads an `AnyValue` as a number.
///
/// Booleans count as 1 and 0, so a boolean cancellation flag and a 0/1
/// integer flag behave the same. Text is parsed; text that does not parse
/// is malformed rather than missing.
pub fn any_to_numeric(value: AnyValue<'_>) -> NumericCell {
    match value {
        AnyValue::Null => NumericCell::Missing,
        AnyValue::Int8(v) => NumericCell::Value(f64::from(v)),
        AnyValue::Int16(v) => NumericCell::Value(f64::from(v)),
        AnyValue::Int32(v) => NumericCell::Value(f64::from(v)),
        AnyValue::Int64(v) => NumericCell::Value(v as f64),
        AnyValue::UInt8(v) => NumericCell::Value(f64::from(v)),
        AnyValue::UInt16(v) => NumericCell::Value(f64::from(v)),
        AnyValue::UInt32(v) => NumericCell::Value(f64::from(v)),
        AnyValue::UInt64(v) => NumericCell::Value(v as f64),
        AnyValue::Float32(v) => float_cell(f64::from(v)),
        AnyValue::Float64(v) => float_cell(v),
        AnyValue::Boolean(b) => NumericCell::Value(if b { 1.0 } else { 0.0 }),
        AnyValue::String(s) => text_cell(s),
        AnyValue::StringOwned(s) => text_cell(&s),
        other => NumericCell::Malformed(any_to_string(other)),
    }
}

fn float_cell(v: f64) -> NumericCell {
    if v.is_nan() {
        NumericCell::Missing
    } else {
        NumericCell::Value(v)
    }
}

fn text_cell(raw: &str) -> NumericCell {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return NumericCell::Missing;
    }
    match trimmed {
        "true" | "True" | "TRUE" => NumericCell::Value(1.0),
        "false" | "False" | "FALSE" => NumericCell::Value(0.0),
        _ => match trimmed.parse::<f64>() {
            Ok(v) => float_cell(v),
            Err(_) => NumericCell::Malformed(trimmed.to_string()),
        },
    }
}

/// All cells of a column as trimmed text, `None` for missing cells.
///
/// Float `NaN` is missing, as it is for [`clean_series`].
pub fn column_text(column: &Column) -> Vec<Option<String>> {
    (0..column.len())
        .map(|idx| match column.get(idx).unwrap_or(AnyValue::Null) {
            AnyValue::Float32(v) if v.is_nan() => None,
            AnyValue::Float64(v) if v.is_nan() => None,
            value => any_to_string_non_empty(value),
        })
        .collect()
}

/// All cells of a column read as numbers.
pub fn column_numeric(column: &Column) -> Vec<NumericCell> {
    (0..column.len())
        .map(|idx| any_to_numeric(column.get(idx).unwrap_or(AnyValue::Null)))
        .collect()
}

/// Text cells of a named column, or `None` when the column is absent.
pub fn frame_text(df: &DataFrame, name: &str) -> Option<Vec<Option<String>>> {
    df.column(name).ok().map(column_text)
}

/// Numeric cells of a named column, or `None` when the column is absent.
pub fn frame_numeric(df: &DataFrame, name: &str) -> Option<Vec<NumericCell>> {
    df.column(name).ok().map(column_numeric)
}

/// Values of a named column as plain numbers, malformed cells dropped to `None`.
pub fn frame_values(df: &DataFrame, name: &str) -> Option<Vec<Option<f64>>> {
    frame_numeric(df, name).map(|cells| cells.iter().map(NumericCell::value).collect())
}

/// A column with its missing cells made explicit.
///
/// Float `NaN` becomes null and text is trimmed, with blank text becoming
/// null. Other types are returned as they are. Profiling, filtering and
/// grouping all read columns through this, so a cell is missing in one
/// place exactly when it is missing in the others.
///
/// # Errors
///
/// Fails when Polars cannot read the column under its own dtype.
pub fn clean_series(column: &Column) -> PolarsResult<Series> {
    let series = column.as_materialized_series();
    let name = series.name().clone();
    match series.dtype() {
        DataType::Float32 | DataType::Float64 => {
            let floats = series.cast(&DataType::Float64)?;
            let cleaned: Float64Chunked = floats
                .f64()?
                .iter()
                .map(|value| value.filter(|v| !v.is_nan()))
                .collect();
            Ok(cleaned.with_name(name).into_series())
        }
        DataType::String => {
            let cleaned: StringChunked = series
                .str()?
                .iter()
                .map(|value| value.map(str::trim).filter(|text| !text.is_empty()))
                .collect();
            Ok(cleaned.with_name(name).into_series())
        }
        _ => Ok(series.clone()),
    }
}

/// A cleaned column read as `f64`.
///
/// Booleans become 1 and 0; text that does not parse becomes null.
///
/// # Errors
///
/// Fails when the column type cannot be cast to a number at all.
pub fn float_values(column: &Column) -> PolarsResult<Float64Chunked> {
    let numbers = clean_series(column)?.cast(&DataType::Float64)?;
    Ok(numbers.f64()?.clone())
}

/// Copy of `df` with the named columns replaced by their cleaned form.
///
/// Names the frame does not have are ignored.
///
/// # Errors
///
/// Fails when a column cannot be cleaned.
pub fn clean_frame(df: &DataFrame, names: &[&str]) -> PolarsResult<DataFrame> {
    let mut frame = df.clone();
    for name in names {
        if let Ok(column) = df.column(name) {
            frame.with_column(clean_series(column)?)?;
        }
    }
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom};

    #[test]
    fn test_any_to_string_values() {
        assert_eq!(any_to_string(AnyValue::Null), "");
        assert_eq!(any_to_string(AnyValue::Int64(-100)), "-100");
        assert_eq!(any_to_string(AnyValue::Float64(75.0)), "75");
        assert_eq!(any_to_string(AnyValue::Boolean(true)), "true");
        assert_eq!(any_to_string(AnyValue::String("City Hotel")), "City Hotel");
    }

    #[test]
    fn test_any_to_string_non_empty() {
        assert_eq!(any_to_string_non_empty(AnyValue::Null), None);
        assert_eq!(any_to_string_non_empty(AnyValue::String("  ")), None);
        assert_eq!(
            any_to_string_non_empty(AnyValue::String(" PRT ")),
            Some("PRT".to_string())
        );
    }

    #[test]
    fn test_nan_is_missing_as_text_and_as_number() {
        let column = Series::new("adr".into(), [f64::NAN, 75.0, f64::NAN]).into_column();
        assert_eq!(column_text(&column), vec![None, Some("75".to_string()), None]);
        let cleaned = clean_series(&column).unwrap();
        assert_eq!(cleaned.null_count(), 2);
        assert_eq!(cleaned.name().as_str(), "adr");
    }

    #[test]
    fn test_clean_series_blanks_whitespace() {
        let column = Series::new("country".into(), [" PRT ", "   ", "GBR"]).into_column();
        let cleaned = clean_series(&column).unwrap();
        let values: Vec<Option<&str>> = cleaned.str().unwrap().iter().collect();
        assert_eq!(values, [Some("PRT"), None, Some("GBR")]);
    }

    #[test]
    fn test_float_values_parse_text_and_flags() {
        let text = Series::new("lead_time".into(), ["3", "three", ""]).into_column();
        let values: Vec<Option<f64>> = float_values(&text).unwrap().iter().collect();
        assert_eq!(values, [Some(3.0), None, None]);

        let flags = Series::new("is_canceled".into(), [true, false]).into_column();
        let values: Vec<Option<f64>> = float_values(&flags).unwrap().iter().collect();
        assert_eq!(values, [Some(1.0), Some(0.0)]);
    }

    #[test]
    fn test_numeric_cells() {
        assert_eq!(any_to_numeric(AnyValue::Null), NumericCell::Missing);
        assert_eq!(any_to_numeric(AnyValue::Boolean(true)), NumericCell::Value(1.0));
        assert_eq!(any_to_numeric(AnyValue::String(" 3 ")), NumericCell::Value(3.0));
        assert_eq!(
            any_to_numeric(AnyValue::String("three")),
            NumericCell::Malformed("three".to_string())
        );
        assert_eq!(any_to_numeric(AnyValue::Float64(f64::NAN)), NumericCell::Missing);
    }

    #[test]
    fn test_count_cells_reject_fractions() {
        assert_eq!(NumericCell::Value(2.0).as_count(), NumericCell::Value(2.0));
        assert_eq!(
            NumericCell::Value(2.5).as_count(),
            NumericCell::Malformed("2.5".to_string())
        );
    }
}
