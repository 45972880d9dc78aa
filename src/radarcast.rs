//! This module provides the main entry point for interacting with the
//! open-data provider: radar composite frames via [`Radarcast::composite`],
//! station point forecasts via [`Radarcast::forecast`], and the station
//! catalog via [`Radarcast::stations`].

use crate::clients::composite_client::CompositeClient;
use crate::clients::forecast_client::ForecastClient;
use crate::composite::source::CompositeSource;
use crate::error::RadarcastError;
use crate::forecast::catalog::StationCatalog;
use crate::forecast::loader::ForecastLoader;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use reqwest::Client;
use std::path::PathBuf;

/// The main client struct for accessing provider data.
///
/// Holds the shared HTTP client and the cache directory used for downloaded
/// payloads (forecast parquet files and the station catalog). Composite
/// payloads are not cached here; the rendered artifacts on disk are their
/// cache (see [`crate::ArtifactStore`]).
///
/// Create an instance using [`Radarcast::new()`] for the default cache
/// directory or [`Radarcast::with_cache_folder()`] for a custom location.
///
/// # Examples
///
/// ```rust,no_run
/// # use radarcast::{Radarcast, RadarcastError};
/// # async fn run() -> Result<(), RadarcastError> {
/// let client = Radarcast::new().await?;
/// let catalog = client.stations().await?;
/// println!("{} stations in the catalog", catalog.stations().len());
/// # Ok(())
/// # }
/// ```
pub struct Radarcast {
    http: Client,
    cache_dir: PathBuf,
    composite_source: CompositeSource,
    forecast_loader: ForecastLoader,
}

impl Radarcast {
    /// Creates a client with a specific cache directory, creating the
    /// directory if it does not exist yet.
    pub async fn with_cache_folder(cache_folder: PathBuf) -> Result<Self, RadarcastError> {
        ensure_cache_dir_exists(&cache_folder)
            .await
            .map_err(|e| RadarcastError::CacheDirCreation(cache_folder.clone(), e))?;
        let http = Client::new();
        Ok(Self {
            composite_source: CompositeSource::new(http.clone()),
            forecast_loader: ForecastLoader::new(&cache_folder, http.clone()),
            cache_dir: cache_folder,
            http,
        })
    }

    /// Creates a client using the default cache directory resolved through
    /// the `dirs` crate (e.g. `~/.cache/radarcast_cache` on Linux).
    pub async fn new() -> Result<Self, RadarcastError> {
        let cache_folder = get_cache_dir().map_err(RadarcastError::CacheDirResolution)?;
        Self::with_cache_folder(cache_folder).await
    }

    /// Client builder for radar composite frames.
    pub fn composite(&self) -> CompositeClient<'_> {
        CompositeClient::new(self)
    }

    /// Client builder for station point forecasts.
    pub fn forecast(&self) -> ForecastClient<'_> {
        ForecastClient::new(self)
    }

    /// Loads the provider's station catalog, cached on disk after the first
    /// fetch.
    pub async fn stations(&self) -> Result<StationCatalog, RadarcastError> {
        StationCatalog::load(&self.cache_dir, &self.http)
            .await
            .map_err(RadarcastError::from)
    }

    pub(crate) fn composite_source(&self) -> &CompositeSource {
        &self.composite_source
    }

    pub(crate) fn forecast_loader(&self) -> &ForecastLoader {
        &self.forecast_loader
    }
}
