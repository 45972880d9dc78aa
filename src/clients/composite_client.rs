//! Provides the `CompositeClient` for querying and fetching radar composite
//! frames.
//!
//! The client is an intermediate builder obtained via
//! [`Radarcast::composite`]: pick a product, bound the request with a
//! [`QueryWindow`], and execute it. Fetch-and-decode of individual frames is
//! a plain method since every argument is required.

use crate::composite::decode::decode_composite;
use crate::composite::grid::CompositeGrid;
use crate::composite::source::CompositeItem;
use crate::{CompositeProduct, QueryWindow, Radarcast, RadarcastError};
use bon::bon;

/// A client builder for radar composite data.
///
/// Instances are created by calling [`Radarcast::composite`].
pub struct CompositeClient<'a> {
    client: &'a Radarcast,
}

#[bon]
impl<'a> CompositeClient<'a> {
    pub(crate) fn new(client: &'a Radarcast) -> Self {
        Self { client }
    }

    /// Initiates a query for the frames of one product inside a time window.
    ///
    /// Call `.window(window)` and then `.call().await` to execute. Returns
    /// the listed [`CompositeItem`]s ascending by timestamp; the sequence is
    /// finite and restartable on rerun.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use radarcast::{Radarcast, RadarcastError, CompositeProduct, QueryWindow};
    /// # use chrono::{Duration, Utc};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), RadarcastError> {
    /// let client = Radarcast::new().await?;
    /// let window = QueryWindow::trailing(Utc::now(), Duration::minutes(60));
    ///
    /// let items = client
    ///     .composite()
    ///     .query(CompositeProduct::Ry)
    ///     .window(window)
    ///     .call()
    ///     .await?;
    ///
    /// for item in &items {
    ///     let grid = client.composite().fetch_grid(item).await?;
    ///     println!("{}: {}x{} cells", grid.timestamp, grid.width, grid.height);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[builder(start_fn = query)]
    #[doc(hidden)]
    pub async fn build_query(
        &self,
        #[builder(start_fn)] product: CompositeProduct,
        window: QueryWindow,
    ) -> Result<Vec<CompositeItem>, RadarcastError> {
        self.client
            .composite_source()
            .query(product, window)
            .await
            .map_err(RadarcastError::from)
    }

    /// Downloads and decodes one listed frame into a [`CompositeGrid`].
    pub async fn fetch_grid(&self, item: &CompositeItem) -> Result<CompositeGrid, RadarcastError> {
        let raw = self.client.composite_source().fetch(item).await?;
        decode_composite(item.product, item.timestamp, &raw).map_err(RadarcastError::from)
    }
}
