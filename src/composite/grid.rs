//! The decoded composite frame: a 2-D precipitation grid tagged with its
//! product label and timestamp.

use chrono::{DateTime, Utc};

/// One decoded composite frame.
///
/// Values are precipitation intensity in mm/h, stored row-major starting at
/// the north-west corner of the composite domain. A grid lives for exactly
/// one iteration of the render loop.
#[derive(Debug, Clone)]
pub struct CompositeGrid {
    pub product_label: String,
    pub timestamp: DateTime<Utc>,
    pub width: usize,
    pub height: usize,
    pub values: Vec<f32>,
}

impl CompositeGrid {
    pub fn new(
        product_label: impl Into<String>,
        timestamp: DateTime<Utc>,
        width: usize,
        height: usize,
        values: Vec<f32>,
    ) -> Self {
        debug_assert_eq!(values.len(), width * height);
        Self {
            product_label: product_label.into(),
            timestamp,
            width,
            height,
            values,
        }
    }

    /// Value at `col` across and `row` down from the north-west corner.
    pub fn value_at(&self, col: usize, row: usize) -> f32 {
        self.values[row * self.width + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn value_at_indexes_row_major_from_north_west() {
        let ts = Utc.with_ymd_and_hms(2023, 9, 4, 12, 0, 0).unwrap();
        let grid = CompositeGrid::new("RY", ts, 3, 2, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(grid.value_at(0, 0), 0.0);
        assert_eq!(grid.value_at(2, 0), 2.0);
        assert_eq!(grid.value_at(0, 1), 3.0);
        assert_eq!(grid.value_at(2, 1), 5.0);
    }
}
