//! Download and cache of per-station forecast files.
//!
//! The provider serves one gzipped long-format CSV per station. The loader
//! decompresses the download as a stream, parses it into a DataFrame on a
//! blocking task, caches the result as Snappy parquet, and serves a
//! `LazyFrame` scanned from that cache on subsequent calls.

use crate::forecast::error::ForecastError;
use crate::types::product::MosmixType;
use async_compression::tokio::bufread::GzipDecoder;
use futures_util::TryStreamExt;
use log::{info, warn};
use polars::frame::DataFrame;
use polars::prelude::*;
use reqwest::Client;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::io::AsyncReadExt;
use tokio::{fs, task};
use tokio_util::io::StreamReader;

const MOSMIX_BASE_URL: &str = "https://opendata.dwd.de/weather/local_forecasts/mosmix";

pub struct ForecastLoader {
    cache_dir: PathBuf,
    http: Client,
}

impl ForecastLoader {
    pub fn new(cache_dir: &Path, http: Client) -> ForecastLoader {
        ForecastLoader {
            cache_dir: cache_dir.to_path_buf(),
            http,
        }
    }

    /// Loads the long-format frame for one station, downloading and caching
    /// it if no parquet cache exists yet.
    pub async fn get_frame(
        &self,
        mosmix_type: MosmixType,
        station: &str,
    ) -> Result<LazyFrame, ForecastError> {
        let cache_filename = format!("{}{}.parquet", mosmix_type.cache_file_prefix(), station);
        let parquet_path = self.cache_dir.join(&cache_filename);

        if fs::metadata(&parquet_path).await.is_ok() {
            info!(
                "Cache hit for {} forecast for station {} at {:?}",
                mosmix_type, station, parquet_path
            );
        } else {
            warn!(
                "Cache miss for {} forecast for station {}. Downloading and processing.",
                mosmix_type, station
            );
            let raw_bytes = self.download(mosmix_type, station).await?;
            let df = Self::csv_to_dataframe(raw_bytes, station, mosmix_type).await?;

            fs::create_dir_all(&self.cache_dir)
                .await
                .map_err(|e| ForecastError::CacheDirCreation(self.cache_dir.clone(), e))?;
            Self::cache_dataframe(df, &parquet_path).await?;
            info!(
                "Cached {} forecast for station {} to {:?}",
                mosmix_type, station, parquet_path
            );
        }

        LazyFrame::scan_parquet(&parquet_path, Default::default())
            .map_err(|e| ForecastError::ParquetScan(parquet_path.clone(), e))
    }

    /// Downloads and decompresses the station file.
    async fn download(
        &self,
        mosmix_type: MosmixType,
        station: &str,
    ) -> Result<Vec<u8>, ForecastError> {
        let url = format!(
            "{}/{}/{}.csv.gz",
            MOSMIX_BASE_URL,
            mosmix_type.path_segment(),
            station
        );
        info!("Downloading forecast data from {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ForecastError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    ForecastError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    ForecastError::NetworkRequest(url, e)
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
        info!(
            "Successfully downloaded and decompressed {} bytes for station {}",
            decompressed.len(),
            station
        );
        Ok(decompressed)
    }

    /// Parses raw CSV bytes (without header) into a DataFrame on a blocking
    /// task, assigning the long-format column names.
    async fn csv_to_dataframe(
        bytes: Vec<u8>,
        station: &str,
        mosmix_type: MosmixType,
    ) -> Result<DataFrame, ForecastError> {
        let station_owned = station.to_string();
        let schema_names = mosmix_type.schema_column_names();

        task::spawn_blocking(move || {
            let mut temp_file = NamedTempFile::new().map_err(|e| ForecastError::CsvReadIo {
                station: station_owned.clone(),
                source: e,
            })?;
            temp_file
                .write_all(&bytes)
                .map_err(|e| ForecastError::CsvReadIo {
                    station: station_owned.clone(),
                    source: e,
                })?;
            temp_file.flush().map_err(|e| ForecastError::CsvReadIo {
                station: station_owned.clone(),
                source: e,
            })?;

            let mut df = CsvReadOptions::default()
                .with_has_header(false)
                .try_into_reader_with_file_path(Some(temp_file.path().to_path_buf()))
                .map_err(|e| ForecastError::CsvReadPolars {
                    station: station_owned.clone(),
                    source: e,
                })?
                .finish()
                .map_err(|e| ForecastError::CsvReadPolars {
                    station: station_owned.clone(),
                    source: e,
                })?;

            if df.width() != schema_names.len() {
                warn!(
                    "CSV column count ({}) does not match schema length ({}) for station {} and type {}",
                    df.width(),
                    schema_names.len(),
                    station_owned,
                    mosmix_type
                );
                return Err(ForecastError::SchemaMismatch {
                    station: station_owned,
                    mosmix_type,
                    expected: schema_names.len(),
                    found: df.width(),
                });
            }

            df.set_column_names(schema_names.iter().copied())
                .map_err(|e| ForecastError::ColumnRename {
                    station: station_owned,
                    source: e,
                })?;

            Ok(df)
        })
        .await?
    }

    /// Writes a DataFrame to a Snappy parquet file on a blocking task.
    async fn cache_dataframe(mut df: DataFrame, path: &Path) -> Result<(), ForecastError> {
        let path_buf = path.to_path_buf();
        task::spawn_blocking(move || {
            let file = std::fs::File::create(&path_buf)
                .map_err(|e| ForecastError::ParquetWriteIo(path_buf.clone(), e))?;
            ParquetWriter::new(file)
                .with_compression(ParquetCompression::Snappy)
                .finish(&mut df)
                .map_err(|e| ForecastError::ParquetWritePolars(path_buf, e))?;
            Ok::<(), ForecastError>(())
        })
        .await??;
        Ok(())
    }
}
