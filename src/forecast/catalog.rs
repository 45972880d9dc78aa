//! The provider's station catalog: fetched once, cached as JSON, and printed
//! as a fixed-width table when the CLI is run without station arguments.

use crate::forecast::error::ForecastError;
use crate::types::station::Station;
use async_compression::tokio::bufread::GzipDecoder;
use futures_util::TryStreamExt;
use log::info;
use reqwest::Client;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncReadExt;
use tokio_util::io::StreamReader;

const CATALOG_URL: &str =
    "https://opendata.dwd.de/weather/local_forecasts/mosmix/stations.json.gz";
const CATALOG_CACHE_FILE_NAME: &str = "mosmix_stations.json";

#[derive(Debug, Clone)]
pub struct StationCatalog {
    stations: Vec<Station>,
}

impl StationCatalog {
    /// Loads the catalog from the cache file, fetching it from the provider
    /// on a cache miss.
    pub async fn load(cache_dir: &Path, http: &Client) -> Result<Self, ForecastError> {
        let cache_file = cache_dir.join(CATALOG_CACHE_FILE_NAME);

        let stations = if fs::metadata(&cache_file).await.is_ok() {
            info!("Station catalog cache hit at {:?}", cache_file);
            Self::read_cached(&cache_file).await?
        } else {
            info!("Station catalog cache miss. Fetching from {}", CATALOG_URL);
            let stations = Self::fetch(http).await?;
            Self::write_cache(&stations, cache_dir, &cache_file).await?;
            stations
        };

        let mut stations = stations;
        stations.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(StationCatalog { stations })
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn get(&self, id: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == id)
    }

    /// Renders the catalog as a fixed-width text table, one station per line.
    pub fn format_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<8} {:<32} {:>9} {:>9} {:>6}",
            "id", "name", "lat", "lon", "elev"
        );
        for station in &self.stations {
            let elevation = station
                .elevation
                .map(|e| e.to_string())
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(
                out,
                "{:<8} {:<32} {:>9.4} {:>9.4} {:>6}",
                station.id, station.name, station.latitude, station.longitude, elevation
            );
        }
        out
    }

    async fn read_cached(cache_file: &Path) -> Result<Vec<Station>, ForecastError> {
        let bytes = fs::read(cache_file)
            .await
            .map_err(|e| ForecastError::CatalogCacheRead(cache_file.to_path_buf(), e))?;
        serde_json::from_slice(&bytes).map_err(ForecastError::CatalogParse)
    }

    async fn fetch(http: &Client) -> Result<Vec<Station>, ForecastError> {
        let response = http
            .get(CATALOG_URL)
            .send()
            .await
            .map_err(|e| ForecastError::NetworkRequest(CATALOG_URL.to_string(), e))?;
        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                return Err(if let Some(status) = e.status() {
                    ForecastError::HttpStatus {
                        url: CATALOG_URL.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    ForecastError::NetworkRequest(CATALOG_URL.to_string(), e)
                });
            }
        };

        let stream = response
            .bytes_stream()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e));
        let stream_reader = StreamReader::new(stream);
        let mut decoder = GzipDecoder::new(stream_reader);
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed).await?;

        serde_json::from_slice(&decompressed).map_err(ForecastError::CatalogParse)
    }

    async fn write_cache(
        stations: &[Station],
        cache_dir: &Path,
        cache_file: &Path,
    ) -> Result<(), ForecastError> {
        fs::create_dir_all(cache_dir)
            .await
            .map_err(|e| ForecastError::CacheDirCreation(cache_dir.to_path_buf(), e))?;
        let json = serde_json::to_vec_pretty(stations).map_err(ForecastError::CatalogParse)?;
        fs::write(cache_file, json)
            .await
            .map_err(|e| ForecastError::CatalogCacheWrite(cache_file.to_path_buf(), e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StationCatalog {
        StationCatalog {
            stations: vec![
                Station {
                    id: "01001".to_string(),
                    name: "JAN MAYEN".to_string(),
                    latitude: 70.93,
                    longitude: -8.67,
                    elevation: Some(10),
                },
                Station {
                    id: "10637".to_string(),
                    name: "FRANKFURT/M-FLUGH.".to_string(),
                    latitude: 50.05,
                    longitude: 8.6,
                    elevation: None,
                },
            ],
        }
    }

    #[test]
    fn get_finds_station_by_id() {
        let catalog = sample();
        assert_eq!(catalog.get("10637").unwrap().name, "FRANKFURT/M-FLUGH.");
        assert!(catalog.get("99999").is_none());
    }

    #[test]
    fn format_table_has_one_line_per_station_plus_header() {
        let catalog = sample();
        let table = catalog.format_table();
        assert_eq!(table.lines().count(), 3);
        assert!(table.contains("JAN MAYEN"));
        assert!(table.lines().nth(2).unwrap().trim_end().ends_with('-'));
    }

    #[tokio::test]
    async fn cached_catalog_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache_file = dir.path().join(CATALOG_CACHE_FILE_NAME);
        let catalog = sample();
        StationCatalog::write_cache(&catalog.stations, dir.path(), &cache_file)
            .await
            .unwrap();
        let read_back = StationCatalog::read_cached(&cache_file).await.unwrap();
        assert_eq!(read_back, catalog.stations);
    }
}
