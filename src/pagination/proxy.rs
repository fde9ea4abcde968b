//! Fetch proxy
//!
//! Turns a single page fetch into a stream of items. This is the one place
//! where the explorer's "no data" error is absorbed: it becomes an empty
//! stream, every other error is passed through unchanged.

use super::types::{ItemSource, ItemStream, PageFetcher};
use crate::error::Result;
use crate::types::Params;
use futures::{stream, StreamExt};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Stream factory that performs exactly one fetch per opened stream
pub struct FetchProxy<F, T> {
    fetcher: Arc<F>,
    _item: PhantomData<fn() -> T>,
}

impl<F, T> FetchProxy<F, T>
where
    F: PageFetcher<T> + 'static,
    T: Send + 'static,
{
    /// Wrap a page fetcher
    pub fn new(fetcher: F) -> Self {
        Self::from_arc(Arc::new(fetcher))
    }

    /// Wrap a shared page fetcher
    pub fn from_arc(fetcher: Arc<F>) -> Self {
        Self {
            fetcher,
            _item: PhantomData,
        }
    }
}

impl<F, T> Clone for FetchProxy<F, T> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            _item: PhantomData,
        }
    }
}

impl<F, T> ItemSource<T> for FetchProxy<F, T>
where
    F: PageFetcher<T> + 'static,
    T: Send + 'static,
{
    fn items(&self, params: Params) -> ItemStream<T> {
        let fetcher = Arc::clone(&self.fetcher);
        stream::once(async move { fetcher.fetch_page(params).await })
            .flat_map(|page| stream::iter(absorb_empty_result(page)))
            .boxed()
    }
}

/// Flatten one fetch result into stream items
fn absorb_empty_result<T>(page: Result<Vec<T>>) -> Vec<Result<T>> {
    match page {
        Ok(items) => items.into_iter().map(Ok).collect(),
        Err(e) if e.is_empty_result() => {
            debug!("Empty result: {e}");
            Vec::new()
        }
        Err(e) => vec![Err(e)],
    }
}
