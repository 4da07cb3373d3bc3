//! Full-catalog retrieval.
//!
//! TheCocktailDB has no "list everything" endpoint, so the catalog is built
//! by sweeping the alphabet with the first-letter search. Letters are queried
//! in small concurrent batches with a pause in between to keep the load on
//! the public API reasonable.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use log::{debug, info};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::client::CocktailSource;
use crate::config::CatalogConfig;
use crate::error::CocktailError;
use crate::model::{ApiResponse, CocktailListItem, RawDrinkRecord};
use crate::transform::{sort_by_name, transform_api_response, transform_list_item};

/// Letters swept to build the catalog
pub static ALPHABET: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// How a catalog sweep ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOutcome {
    /// Every letter was fetched; items are sorted by name
    Complete(Vec<CocktailListItem>),
    /// The caller cancelled the sweep; nothing was collected
    Cancelled,
}

impl CatalogOutcome {
    pub fn into_items(self) -> Option<Vec<CocktailListItem>> {
        match self {
            CatalogOutcome::Complete(items) => Some(items),
            CatalogOutcome::Cancelled => None,
        }
    }
}

/// Percentage of letters processed, capped at 100
pub fn progress_percent(processed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let percent = (processed as f64 / total as f64 * 100.0).round();
    percent.min(100.0) as u8
}

pub struct CatalogAggregator {
    source: Arc<dyn CocktailSource>,
    batch_size: usize,
    batch_delay: Duration,
}

impl CatalogAggregator {
    pub fn new(source: Arc<dyn CocktailSource>, config: &CatalogConfig) -> Self {
        Self {
            source,
            batch_size: config.batch_size.max(1),
            batch_delay: Duration::from_millis(config.batch_delay_ms),
        }
    }

    /// Fetches every letter of the alphabet and returns the merged catalog.
    ///
    /// `on_progress` is called once per finished batch with the share of
    /// letters done so far. Cancelling `cancel` aborts in-flight requests and
    /// ends the sweep with [`CatalogOutcome::Cancelled`] instead of an error.
    /// Any other failure fails the whole sweep; partial results are dropped.
    pub async fn fetch_all<P>(
        &self,
        cancel: &CancellationToken,
        mut on_progress: P,
    ) -> Result<CatalogOutcome, CocktailError>
    where
        P: FnMut(u8) + Send,
    {
        let batches: Vec<&[char]> = ALPHABET.chunks(self.batch_size).collect();
        let batch_count = batches.len();
        let mut items: Vec<CocktailListItem> = Vec::new();
        let mut processed = 0;

        for (index, batch) in batches.into_iter().enumerate() {
            if cancel.is_cancelled() {
                debug!("Catalog sweep cancelled before batch {}", index + 1);
                return Ok(CatalogOutcome::Cancelled);
            }

            let responses = tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Catalog sweep cancelled during batch {}", index + 1);
                    return Ok(CatalogOutcome::Cancelled);
                }
                responses = self.fetch_batch(batch) => responses?,
            };

            for response in responses {
                items.extend(transform_api_response(response, |drink| {
                    transform_list_item(&drink)
                }));
            }

            processed += batch.len();
            on_progress(progress_percent(processed, ALPHABET.len()));
            debug!(
                "Catalog batch {}/{} done ({} drinks so far)",
                index + 1,
                batch_count,
                items.len()
            );

            if index + 1 < batch_count {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("Catalog sweep cancelled between batches");
                        return Ok(CatalogOutcome::Cancelled);
                    }
                    _ = sleep(self.batch_delay) => {}
                }
            }
        }

        sort_by_name(&mut items);
        info!("Catalog sweep finished with {} drinks", items.len());
        Ok(CatalogOutcome::Complete(items))
    }

    /// Queries every letter of `batch` concurrently and waits for all of them.
    async fn fetch_batch(
        &self,
        batch: &[char],
    ) -> Result<Vec<ApiResponse<RawDrinkRecord>>, CocktailError> {
        let requests = batch
            .iter()
            .map(|letter| self.source.search_by_first_letter(*letter));

        join_all(requests).await.into_iter().collect()
    }
}
