//! HTML rendering of the dense forecast table.
//!
//! Produces a complete document in memory; persisting it is the caller's
//! concern. Timestamps are labeled with German weekday abbreviations, the
//! one locale-sensitive bit of the output.

use crate::forecast::series::DenseSeries;
use crate::render::colormap::beaufort;
use chrono::{Datelike, Weekday};
use std::fmt::Write as _;

/// Parameter name carrying wind speed in m/s; its cells get a Beaufort
/// category class for styling.
const WIND_SPEED_PARAMETER: &str = "FF";

const WEEKDAYS_DE: [&str; 7] = ["Mo", "Di", "Mi", "Do", "Fr", "Sa", "So"];

fn weekday_de(weekday: Weekday) -> &'static str {
    WEEKDAYS_DE[weekday.num_days_from_monday() as usize]
}

pub struct ForecastPage<'a> {
    series: &'a DenseSeries,
}

impl<'a> ForecastPage<'a> {
    pub fn new(series: &'a DenseSeries) -> Self {
        Self { series }
    }

    /// Renders the full HTML document.
    pub fn to_html(&self) -> String {
        let wind_index = self.series.parameter_index(WIND_SPEED_PARAMETER);

        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html lang=\"de\">\n<head>\n");
        out.push_str("<meta charset=\"utf-8\">\n<title>Vorhersage</title>\n");
        out.push_str("<style>\n");
        out.push_str("table { border-collapse: collapse; font-family: sans-serif; }\n");
        out.push_str("th, td { border: 1px solid #ccc; padding: 2px 8px; text-align: right; }\n");
        out.push_str("th { background: #eee; }\n");
        out.push_str("td.station, td.time { text-align: left; }\n");
        for (category, color) in [
            (0, "#f7fbff"),
            (3, "#c6dbef"),
            (6, "#6baed6"),
            (9, "#2171b5"),
            (12, "#08306b"),
        ] {
            let _ = writeln!(out, "td.bft-{} {{ background: {}; }}", category, color);
        }
        out.push_str("</style>\n</head>\n<body>\n<table>\n<tr><th>Station</th><th>Zeit</th>");
        for parameter in &self.series.parameters {
            let _ = write!(out, "<th>{}</th>", escape(parameter));
        }
        out.push_str("</tr>\n");

        for row in &self.series.rows {
            let label = format!(
                "{} {}",
                weekday_de(row.date.weekday()),
                row.date.format("%d.%m. %H:%M")
            );
            let _ = write!(
                out,
                "<tr><td class=\"station\">{}</td><td class=\"time\">{}</td>",
                escape(&row.station_id),
                label
            );
            for (index, value) in row.values.iter().enumerate() {
                match value {
                    Some(v) if wind_index == Some(index) => {
                        let _ = write!(out, "<td class=\"bft-{}\">{:.1}</td>", beaufort(*v), v);
                    }
                    Some(v) => {
                        let _ = write!(out, "<td>{:.1}</td>", v);
                    }
                    None => out.push_str("<td>&ndash;</td>"),
                }
            }
            out.push_str("</tr>\n");
        }

        out.push_str("</table>\n</body>\n</html>\n");
        out
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::series::{DenseRow, DenseSeries};
    use chrono::NaiveDate;

    fn sample() -> DenseSeries {
        let monday_noon = NaiveDate::from_ymd_opt(2023, 9, 4)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        DenseSeries {
            parameters: vec!["TTT".to_string(), "FF".to_string()],
            rows: vec![
                DenseRow {
                    station_id: "10637".to_string(),
                    date: monday_noon,
                    values: vec![Some(291.0), Some(5.0)],
                },
                DenseRow {
                    station_id: "10637".to_string(),
                    date: monday_noon + chrono::Duration::hours(1),
                    values: vec![None, Some(0.1)],
                },
            ],
        }
    }

    #[test]
    fn page_contains_german_weekday_labels() {
        let series = sample();
        let html = ForecastPage::new(&series).to_html();
        assert!(html.contains("Mo 04.09. 12:00"));
        assert!(html.contains("Mo 04.09. 13:00"));
    }

    #[test]
    fn wind_cells_carry_beaufort_classes() {
        let series = sample();
        let html = ForecastPage::new(&series).to_html();
        assert!(html.contains("<td class=\"bft-3\">5.0</td>"));
        assert!(html.contains("<td class=\"bft-0\">0.1</td>"));
    }

    #[test]
    fn missing_values_render_as_dash() {
        let series = sample();
        let html = ForecastPage::new(&series).to_html();
        assert!(html.contains("<td>&ndash;</td>"));
    }

    #[test]
    fn station_names_are_escaped() {
        let mut series = sample();
        series.rows[0].station_id = "a<b".to_string();
        let html = ForecastPage::new(&series).to_html();
        assert!(html.contains("a&lt;b"));
    }
}
