//! Decoding of raw composite payloads into a [`CompositeGrid`].
//!
//! The wire format itself is GRIB2 and is handled entirely by the `grib`
//! crate; this module only locates the precipitation field among the
//! submessages and checks the grid dimensions.

use crate::composite::error::CompositeError;
use crate::composite::grid::CompositeGrid;
use crate::types::product::CompositeProduct;
use chrono::{DateTime, Utc};
use grib::Grib2SubmessageDecoder;
use std::io::Cursor;

// Precipitation rate in GRIB2:
// Discipline 0 (Meteorological), Category 1 (Moisture), Parameter 7.
const DISCIPLINE_METEOROLOGICAL: u8 = 0;
const CATEGORY_MOISTURE: u8 = 1;
const PARAM_PRECIP_RATE: u8 = 7;

// National composite domain is 900x900 km at 1 km resolution; the extended
// domain adds 200 km of rows.
const NATIONAL_WIDTH: usize = 900;
const NATIONAL_HEIGHT: usize = 900;
const EXTENDED_HEIGHT: usize = 1100;

/// Decodes one raw payload into a grid tagged with `product` and `timestamp`.
///
/// A payload without a precipitation submessage, or with a grid of unexpected
/// size, is a fatal decoding error for the run.
pub fn decode_composite(
    product: CompositeProduct,
    timestamp: DateTime<Utc>,
    raw: &[u8],
) -> Result<CompositeGrid, CompositeError> {
    let cursor = Cursor::new(raw);
    let grib2 = grib::from_reader(cursor).map_err(|source| CompositeError::GribDecode {
        timestamp,
        source,
    })?;

    let mut precip: Option<Vec<f32>> = None;

    for (_index, submessage) in grib2.iter() {
        if submessage.indicator().discipline != DISCIPLINE_METEOROLOGICAL {
            continue;
        }

        let prod_def = submessage.prod_def();
        let category = match prod_def.parameter_category() {
            Some(cat) => cat,
            None => continue,
        };
        let parameter = match prod_def.parameter_number() {
            Some(param) => param,
            None => continue,
        };
        if category != CATEGORY_MOISTURE || parameter != PARAM_PRECIP_RATE {
            continue;
        }

        let decoder =
            Grib2SubmessageDecoder::from(submessage).map_err(|source| CompositeError::GribDecode {
                timestamp,
                source,
            })?;
        let values: Vec<f32> = decoder
            .dispatch()
            .map_err(|source| CompositeError::GribDecode { timestamp, source })?
            .collect();
        precip = Some(values);
        break;
    }

    let values = precip.ok_or(CompositeError::FieldNotFound(timestamp))?;

    let height = if values.len() == NATIONAL_WIDTH * NATIONAL_HEIGHT {
        NATIONAL_HEIGHT
    } else if values.len() == NATIONAL_WIDTH * EXTENDED_HEIGHT {
        EXTENDED_HEIGHT
    } else {
        return Err(CompositeError::GridSizeMismatch {
            timestamp,
            found: values.len(),
            expected_national: NATIONAL_WIDTH * NATIONAL_HEIGHT,
            expected_extended: NATIONAL_WIDTH * EXTENDED_HEIGHT,
        });
    };

    Ok(CompositeGrid::new(
        product.label(),
        timestamp,
        NATIONAL_WIDTH,
        height,
        values,
    ))
}
