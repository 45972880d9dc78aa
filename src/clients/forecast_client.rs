//! Provides the `ForecastClient` for fetching station point-forecast series.

use crate::forecast::error::ForecastError;
use crate::forecast::series::ForecastSeries;
use crate::{MosmixType, Radarcast, RadarcastError};
use bon::bon;

/// A client builder for MOSMIX point-forecast data.
///
/// Instances are created by calling [`Radarcast::forecast`]. Start from a
/// single station id or a list of ids, optionally pick a
/// [`MosmixType`] (defaults to `Small`), then `.call().await`.
pub struct ForecastClient<'a> {
    client: &'a Radarcast,
}

#[bon]
impl<'a> ForecastClient<'a> {
    pub(crate) fn new(client: &'a Radarcast) -> Self {
        Self { client }
    }

    /// Fetches the long-format forecast series for a single station.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use radarcast::{Radarcast, RadarcastError, MosmixType};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), RadarcastError> {
    /// let client = Radarcast::new().await?;
    ///
    /// let series = client
    ///     .forecast()
    ///     .station("10637")
    ///     .mosmix_type(MosmixType::Small)
    ///     .call()
    ///     .await?;
    ///
    /// let dense = series.dense()?;
    /// println!("{} rows, {} parameters", dense.rows.len(), dense.parameters.len());
    /// # Ok(())
    /// # }
    /// ```
    #[builder(start_fn = station)]
    #[doc(hidden)]
    pub async fn build_station(
        &self,
        #[builder(start_fn)] station: &str,
        mosmix_type: Option<MosmixType>,
    ) -> Result<ForecastSeries, RadarcastError> {
        let mosmix_type = mosmix_type.unwrap_or_default();
        let frame = self
            .client
            .forecast_loader()
            .get_frame(mosmix_type, station)
            .await?;
        Ok(ForecastSeries::new(frame))
    }

    /// Fetches and concatenates the series of several stations, in the given
    /// order. An empty id list is an error.
    #[builder(start_fn = stations)]
    #[doc(hidden)]
    pub async fn build_stations(
        &self,
        #[builder(start_fn)] stations: &[String],
        mosmix_type: Option<MosmixType>,
    ) -> Result<ForecastSeries, RadarcastError> {
        if stations.is_empty() {
            return Err(RadarcastError::from(ForecastError::NoStationsRequested));
        }
        let mosmix_type = mosmix_type.unwrap_or_default();

        let mut series = Vec::with_capacity(stations.len());
        for station in stations {
            let frame = self
                .client
                .forecast_loader()
                .get_frame(mosmix_type, station)
                .await?;
            series.push(ForecastSeries::new(frame));
        }
        ForecastSeries::concat(series).map_err(RadarcastError::from)
    }
}
