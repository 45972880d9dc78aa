mod clients;
mod composite;
mod error;
mod forecast;
mod output;
mod radarcast;
mod render;
mod types;
pub mod utils;

pub use error::RadarcastError;
pub use radarcast::*;

pub use clients::composite_client::*;
pub use clients::forecast_client::*;

pub use composite::decode::decode_composite;
pub use composite::error::CompositeError;
pub use composite::grid::CompositeGrid;
pub use composite::source::{CompositeItem, CompositeSource};

pub use forecast::catalog::StationCatalog;
pub use forecast::error::ForecastError;
pub use forecast::loader::ForecastLoader;
pub use forecast::series::{DenseRow, DenseSeries, ForecastSeries, SERIES_DATE_FORMAT};

pub use output::animate::encode_animation;
pub use output::error::OutputError;
pub use output::ArtifactStore;

pub use render::colormap::{beaufort, RainfallScale, Rgba};
pub use render::error::RenderError;
pub use render::html::ForecastPage;
pub use render::map::{Boundary, MapRenderer, MapStyle};
pub use render::projection::{germany_view, GridGeometry, MercatorPoint, ViewBounds};

pub use types::product::{CompositeProduct, MosmixType};
pub use types::query_window::QueryWindow;
pub use types::station::Station;
