//! Product identifiers for the two data families served by the provider:
//! radar composite products and MOSMIX point-forecast flavors.

use std::fmt;

/// A radar composite product published on the open-data server.
///
/// Each product has a fixed publication cadence; the query window is snapped
/// to that cadence when listing expected frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompositeProduct {
    /// Quantitative precipitation estimate, 5-minute cadence.
    Ry,
    /// Gauge-adjusted hourly precipitation sum, 10-minute publication cadence.
    Rw,
    /// Gauge-adjusted daily precipitation sum.
    Sf,
}

impl CompositeProduct {
    pub(crate) fn path_segment(&self) -> &'static str {
        match self {
            CompositeProduct::Ry => "ry",
            CompositeProduct::Rw => "rw",
            CompositeProduct::Sf => "sf",
        }
    }

    /// Minutes between two consecutive frames of this product.
    pub fn cadence_minutes(&self) -> i64 {
        match self {
            CompositeProduct::Ry => 5,
            CompositeProduct::Rw => 10,
            CompositeProduct::Sf => 60,
        }
    }

    /// Label used in plot captions and artifact prefixes.
    pub fn label(&self) -> &'static str {
        match self {
            CompositeProduct::Ry => "RY",
            CompositeProduct::Rw => "RW",
            CompositeProduct::Sf => "SF",
        }
    }
}

impl fmt::Display for CompositeProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

impl std::str::FromStr for CompositeProduct {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ry" => Ok(CompositeProduct::Ry),
            "rw" => Ok(CompositeProduct::Rw),
            "sf" => Ok(CompositeProduct::Sf),
            other => Err(format!("unknown composite product '{other}'")),
        }
    }
}

/// MOSMIX point-forecast flavor.
///
/// `Small` carries the reduced parameter set updated hourly; `Large` the full
/// set updated four times a day. Both arrive as long-format rows
/// (station, timestamp, parameter, value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MosmixType {
    #[default]
    Small,
    Large,
}

impl MosmixType {
    pub(crate) fn path_segment(&self) -> &'static str {
        match self {
            MosmixType::Small => "small",
            MosmixType::Large => "large",
        }
    }

    pub(crate) fn cache_file_prefix(&self) -> String {
        format!("mosmix-{}-", self.path_segment())
    }

    /// Column names of the long-format station file, in wire order.
    pub(crate) fn schema_column_names(&self) -> Vec<&'static str> {
        // Both flavors share the long layout; they differ only in which
        // parameter names occur in the `parameter` column.
        vec!["station_id", "date", "parameter", "value"]
    }
}

impl fmt::Display for MosmixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

impl std::str::FromStr for MosmixType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "small" => Ok(MosmixType::Small),
            "large" => Ok(MosmixType::Large),
            other => Err(format!("unknown mosmix type '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_round_trips_through_display() {
        for product in [CompositeProduct::Ry, CompositeProduct::Rw, CompositeProduct::Sf] {
            let parsed: CompositeProduct = product.to_string().parse().unwrap();
            assert_eq!(parsed, product);
        }
    }

    #[test]
    fn unknown_product_is_rejected() {
        assert!("rx".parse::<CompositeProduct>().is_err());
    }
}
