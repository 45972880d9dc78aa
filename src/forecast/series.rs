//! Lazy wrapper around the long-format forecast frame and its densification
//! into one row per (station, timestamp) with one column per parameter.

use crate::forecast::error::ForecastError;
use chrono::NaiveDateTime;
use polars::prelude::pivot::pivot_stable;
use polars::prelude::*;

/// Timestamp format used in the `date` column of the long-format files.
/// Lexicographic order equals chronological order for this format, which the
/// range filter relies on.
pub const SERIES_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A wrapper around a Polars `LazyFrame` holding long-format forecast rows
/// (`station_id`, `date`, `parameter`, `value`).
///
/// Obtained via the forecast client; stays lazy until [`ForecastSeries::dense`]
/// or a `collect()` on the inner frame.
#[derive(Clone)]
pub struct ForecastSeries {
    pub frame: LazyFrame,
}

impl ForecastSeries {
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// Applies an arbitrary Polars predicate, returning a new lazy series.
    pub fn filter(&self, predicate: Expr) -> ForecastSeries {
        ForecastSeries::new(self.frame.clone().filter(predicate))
    }

    /// Restricts the series to rows with `start <= date <= end`.
    pub fn get_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> ForecastSeries {
        let start_str = start.format(SERIES_DATE_FORMAT).to_string();
        let end_str = end.format(SERIES_DATE_FORMAT).to_string();
        self.filter(
            col("date")
                .gt_eq(lit(start_str))
                .and(col("date").lt_eq(lit(end_str))),
        )
    }

    /// Concatenates several station series into one.
    pub fn concat(series: Vec<ForecastSeries>) -> Result<ForecastSeries, ForecastError> {
        if series.is_empty() {
            return Err(ForecastError::NoStationsRequested);
        }
        let frames: Vec<LazyFrame> = series.into_iter().map(|s| s.frame).collect();
        let combined = concat(&frames, UnionArgs::default())?;
        Ok(ForecastSeries::new(combined))
    }

    /// Pivots the long rows into a dense table sorted by (station, date):
    /// one column per parameter, gaps filled by linear interpolation.
    pub fn dense(&self) -> Result<DenseSeries, ForecastError> {
        let df = self
            .frame
            .clone()
            .sort(["station_id", "date"], SortMultipleOptions::default())
            .collect()?;

        let pivoted = pivot_stable(
            &df,
            ["parameter"],
            Some(["station_id", "date"]),
            Some(["value"]),
            true,
            None,
            None,
        )?;

        let dense = pivoted
            .lazy()
            .sort(["station_id", "date"], SortMultipleOptions::default())
            .with_columns([all()
                .exclude(["station_id", "date"])
                .interpolate(InterpolationMethod::Linear)])
            .collect()?;

        DenseSeries::from_frame(dense)
    }
}

/// One materialized row of the dense table.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseRow {
    pub station_id: String,
    pub date: NaiveDateTime,
    /// Values aligned with [`DenseSeries::parameters`].
    pub values: Vec<Option<f64>>,
}

/// The dense forecast table, materialized for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseSeries {
    /// Parameter column names, in pivot order.
    pub parameters: Vec<String>,
    pub rows: Vec<DenseRow>,
}

impl DenseSeries {
    fn from_frame(df: DataFrame) -> Result<DenseSeries, ForecastError> {
        let parameters: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .filter(|name| name != "station_id" && name != "date")
            .collect();

        let stations = df
            .column("station_id")
            .map_err(|_| ForecastError::ColumnNotFound("station_id".to_string()))?
            .str()?;
        let dates = df
            .column("date")
            .map_err(|_| ForecastError::ColumnNotFound("date".to_string()))?
            .str()?;

        let mut value_columns = Vec::with_capacity(parameters.len());
        for name in &parameters {
            let column = df
                .column(name.as_str())
                .map_err(|_| ForecastError::ColumnNotFound(name.clone()))?;
            value_columns.push(column.f64()?);
        }

        let mut rows = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            let station_id = stations.get(idx).unwrap_or_default().to_string();
            let date_str = dates.get(idx).unwrap_or_default();
            let date = NaiveDateTime::parse_from_str(date_str, SERIES_DATE_FORMAT)
                .map_err(|_| ForecastError::ColumnNotFound("date".to_string()))?;
            let values = value_columns.iter().map(|ca| ca.get(idx)).collect();
            rows.push(DenseRow {
                station_id,
                date,
                values,
            });
        }

        Ok(DenseSeries { parameters, rows })
    }

    /// Looks up a parameter column index by name.
    pub fn parameter_index(&self, name: &str) -> Option<usize> {
        self.parameters.iter().position(|p| p == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_frame() -> ForecastSeries {
        let df = df!(
            "station_id" => ["10637", "10637", "10637", "10637", "10637", "10637"],
            "date" => [
                "2023-09-04 12:00:00",
                "2023-09-04 12:00:00",
                "2023-09-04 13:00:00",
                "2023-09-04 13:00:00",
                "2023-09-04 14:00:00",
                "2023-09-04 14:00:00",
            ],
            "parameter" => ["TTT", "FF", "TTT", "FF", "TTT", "FF"],
            "value" => [Some(290.0), Some(4.0), None, Some(5.0), Some(292.0), Some(6.0)],
        )
        .unwrap();
        ForecastSeries::new(df.lazy())
    }

    #[test]
    fn dense_pivots_one_row_per_timestamp() {
        let dense = long_frame().dense().unwrap();
        assert_eq!(dense.rows.len(), 3);
        assert_eq!(dense.parameters.len(), 2);
        assert!(dense.parameter_index("TTT").is_some());
        assert!(dense.parameter_index("FF").is_some());
    }

    #[test]
    fn dense_interpolates_interior_gap_linearly() {
        let dense = long_frame().dense().unwrap();
        let ttt = dense.parameter_index("TTT").unwrap();
        // 290.0 at 12:00 and 292.0 at 14:00 with a gap at 13:00.
        assert_eq!(dense.rows[1].values[ttt], Some(291.0));
    }

    #[test]
    fn dense_rows_are_sorted_by_time() {
        let dense = long_frame().dense().unwrap();
        for pair in dense.rows.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }

    #[test]
    fn get_range_filters_lexicographically() {
        let start = NaiveDateTime::parse_from_str("2023-09-04 13:00:00", SERIES_DATE_FORMAT).unwrap();
        let end = NaiveDateTime::parse_from_str("2023-09-04 14:00:00", SERIES_DATE_FORMAT).unwrap();
        let filtered = long_frame().get_range(start, end).frame.collect().unwrap();
        assert_eq!(filtered.height(), 4);
    }

    #[test]
    fn concat_of_nothing_is_an_error() {
        assert!(matches!(
            ForecastSeries::concat(vec![]),
            Err(ForecastError::NoStationsRequested)
        ));
    }
}
