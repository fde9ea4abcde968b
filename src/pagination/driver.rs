//! Pagination drivers
//!
//! [`Parametrized`] repeats an inner stream factory once per value of a
//! parameter (usually `page`) and flattens the results. [`parse_by_pages`]
//! and [`parse_by_blocks`] are the two shapes the explorer endpoints need.
//!
//! All drivers are strictly sequential: one fetch is in flight at a time and
//! nothing is fetched ahead of the consumer.

use super::intervals::IntervalGenerator;
use super::proxy::FetchProxy;
use super::types::{
    BlockNumberSource, ItemSource, ItemStream, PageFetcher, PaginationState, ParamValues,
};
use crate::error::{Error, Result};
use crate::types::{JsonValue, Params};
use futures::{stream, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::debug;

/// Parameter the page-based drivers inject
pub const PAGE_PARAM: &str = "page";

/// First page number of the explorer APIs
pub const FIRST_PAGE: u64 = 1;

/// Parameter names for the block bounds of a range query
pub const START_BLOCK_PARAM: &str = "start_block";
/// See [`START_BLOCK_PARAM`]
pub const END_BLOCK_PARAM: &str = "end_block";

// ============================================================================
// Parametrized Repetition
// ============================================================================

/// Repeats an inner source once per parameter value
///
/// With `stop_if_empty` the stream ends at the first page that yields no
/// items; otherwise empty pages are skipped until the values run out. An
/// empty page is one with zero items, whether the fetch returned an empty
/// list or the "no data" error absorbed by [`FetchProxy`].
pub struct Parametrized<S> {
    inner: Arc<S>,
    param: String,
    values: ParamValues,
    stop_if_empty: bool,
}

impl<S> Parametrized<S> {
    /// Create a driver
    ///
    /// Fails when `values` is unbounded and `stop_if_empty` is off, since
    /// such a stream could never end.
    pub fn new(
        inner: S,
        param: impl Into<String>,
        values: ParamValues,
        stop_if_empty: bool,
    ) -> Result<Self> {
        let param = param.into();
        if !stop_if_empty && !values.is_bounded() {
            return Err(Error::invalid_argument(
                param,
                "an unbounded value sequence needs stop_if_empty",
            ));
        }
        Ok(Self {
            inner: Arc::new(inner),
            param,
            values,
            stop_if_empty,
        })
    }

    /// Page through `page = 1, 2, …` until the first empty page
    pub fn pages(inner: S) -> Self {
        Self {
            inner: Arc::new(inner),
            param: PAGE_PARAM.to_string(),
            values: ParamValues::count_from(FIRST_PAGE),
            stop_if_empty: true,
        }
    }

    /// Name of the injected parameter
    pub fn param(&self) -> &str {
        &self.param
    }

    /// Whether the driver stops at the first empty page
    pub fn stops_if_empty(&self) -> bool {
        self.stop_if_empty
    }
}

impl<S, T> ItemSource<T> for Parametrized<S>
where
    S: ItemSource<T> + 'static,
    T: Send + 'static,
{
    fn items(&self, params: Params) -> ItemStream<T> {
        let cursor = PageCursor {
            inner: Arc::clone(&self.inner),
            param: self.param.clone(),
            values: self.values.iter(),
            stop_if_empty: self.stop_if_empty,
            base: params,
            state: PaginationState::new(),
        };

        stream::unfold(cursor, |mut cursor| async move {
            let page = cursor.next_page::<T>().await?;
            Some((page, cursor))
        })
        .map_ok(|items| stream::iter(items.into_iter().map(Ok)))
        .try_flatten()
        .boxed()
    }
}

/// Per-invocation iteration state of [`Parametrized`]
struct PageCursor<S> {
    inner: Arc<S>,
    param: String,
    values: Box<dyn Iterator<Item = JsonValue> + Send>,
    stop_if_empty: bool,
    base: Params,
    state: PaginationState,
}

impl<S> PageCursor<S> {
    /// Fetch until a non-empty page, an error, or the end of iteration
    async fn next_page<T>(&mut self) -> Option<Result<Vec<T>>>
    where
        S: ItemSource<T>,
    {
        loop {
            if self.state.done {
                return None;
            }
            let Some(value) = self.values.next() else {
                debug!(
                    "{} values exhausted after {} calls",
                    self.param, self.state.calls
                );
                self.state.mark_done();
                return None;
            };

            let params = self.base.clone().with(self.param.clone(), value.clone());
            self.state.record_call(value);
            let page: Result<Vec<T>> = self.inner.items(params).try_collect().await;

            match page {
                Err(e) => {
                    self.state.mark_done();
                    return Some(Err(e));
                }
                Ok(items) if items.is_empty() => {
                    debug!("{}={:?} is empty", self.param, self.state.current);
                    if self.stop_if_empty {
                        self.state.mark_done();
                        return None;
                    }
                }
                Ok(items) => {
                    debug!(
                        "{}={:?}: {} items",
                        self.param,
                        self.state.current,
                        items.len()
                    );
                    self.state.add_fetched(items.len() as u64);
                    return Some(Ok(items));
                }
            }
        }
    }
}

// ============================================================================
// Page-Based Pagination
// ============================================================================

/// Stream every item of `page = 1, 2, …` until the first empty page
pub fn parse_by_pages<F, T>(fetcher: Arc<F>, params: Params) -> ItemStream<T>
where
    F: PageFetcher<T> + 'static,
    T: Send + 'static,
{
    Parametrized::pages(FetchProxy::<F, T>::from_arc(fetcher)).items(params)
}

// ============================================================================
// Block-Range Pagination
// ============================================================================

/// Block bounds of a range query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    /// First block (inclusive)
    pub start_block: u64,
    /// Last block (inclusive); `None` means the current chain head
    pub end_block: Option<u64>,
    /// Maximum number of blocks per interval
    pub block_limit: u64,
}

impl BlockRange {
    /// Create a block range
    pub fn new(start_block: u64, end_block: Option<u64>, block_limit: u64) -> Self {
        Self {
            start_block,
            end_block,
            block_limit,
        }
    }
}

/// Stream every item in a block range, one page-driven pass per interval
///
/// An open `end_block` is resolved through `head` the first time the stream
/// is polled. Intervals are walked in ascending order and the first error
/// ends the whole stream.
pub fn parse_by_blocks<F, B, T>(
    fetcher: Arc<F>,
    head: Arc<B>,
    params: Params,
    range: BlockRange,
) -> ItemStream<T>
where
    F: PageFetcher<T> + 'static,
    B: BlockNumberSource + ?Sized + 'static,
    T: Send + 'static,
{
    let walk = IntervalWalk {
        pages: Parametrized::pages(FetchProxy::<F, T>::from_arc(fetcher)),
        head,
        params,
        range,
        intervals: None,
        current: None,
        done: false,
    };

    stream::unfold(walk, |mut walk| async move {
        let item = walk.next_item().await?;
        Some((item, walk))
    })
    .boxed()
}

/// Iteration state of [`parse_by_blocks`]
struct IntervalWalk<S, B: ?Sized, T> {
    pages: Parametrized<S>,
    head: Arc<B>,
    params: Params,
    range: BlockRange,
    intervals: Option<IntervalGenerator>,
    current: Option<ItemStream<T>>,
    done: bool,
}

impl<S, B, T> IntervalWalk<S, B, T>
where
    S: ItemSource<T> + 'static,
    B: BlockNumberSource + ?Sized,
    T: Send + 'static,
{
    async fn next_item(&mut self) -> Option<Result<T>> {
        loop {
            if self.done {
                return None;
            }

            if self.intervals.is_none() {
                match resolve_end_block(self.head.as_ref(), self.range.end_block).await {
                    Ok(end_block) => {
                        debug!(
                            "Walking blocks {}..={} in chunks of {}",
                            self.range.start_block, end_block, self.range.block_limit
                        );
                        self.intervals = Some(IntervalGenerator::new(
                            self.range.start_block,
                            end_block,
                            self.range.block_limit,
                        ));
                    }
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                }
            }

            if let Some(current) = self.current.as_mut() {
                match current.next().await {
                    Some(Ok(item)) => return Some(Ok(item)),
                    Some(Err(e)) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                    None => self.current = None,
                }
            }

            let Some(interval) = self.intervals.as_mut().and_then(Iterator::next) else {
                self.done = true;
                return None;
            };
            debug!("Interval {}..={}", interval.start(), interval.end());

            let params = self
                .params
                .clone()
                .with(START_BLOCK_PARAM, interval.start())
                .with(END_BLOCK_PARAM, interval.end());
            self.current = Some(self.pages.items(params));
        }
    }
}

/// Use the explicit end block, or ask the chain head
async fn resolve_end_block<B>(head: &B, end_block: Option<u64>) -> Result<u64>
where
    B: BlockNumberSource + ?Sized,
{
    match end_block {
        Some(end_block) => Ok(end_block),
        None => {
            let head = head.block_number().await?;
            let end_block = parse_hex_block(&head)?;
            debug!("Resolved chain head to block {end_block}");
            Ok(end_block)
        }
    }
}

/// Parse a base-16 block number such as `"0x5"`
pub fn parse_hex_block(value: &str) -> Result<u64> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::decode(format!(
            "Invalid block number '{value}': expected hex digits"
        )));
    }

    u64::from_str_radix(digits, 16)
        .map_err(|e| Error::decode(format!("Invalid block number '{value}': {e}")))
}
