//! Pagination types and traits
//!
//! Defines the core pagination abstractions shared by the fetch proxy and
//! the drivers: the collaborator traits, the stream factory trait and the
//! parameter sequences a driver iterates over.

use crate::error::Result;
use crate::types::{JsonValue, Params};
use async_trait::async_trait;
use futures::Stream;
use std::future::Future;
use std::pin::Pin;

/// Type alias for the item stream produced by every pagination layer
pub type ItemStream<T> = Pin<Box<dyn Stream<Item = Result<T>> + Send>>;

// ============================================================================
// Collaborators
// ============================================================================

/// Something that can fetch one page of items for a set of parameters
///
/// Implementations report "no data for these parameters" with
/// [`crate::Error::EmptyResult`]; any other error is treated as a failure.
#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    /// Fetch a single page
    async fn fetch_page(&self, params: Params) -> Result<Vec<T>>;
}

#[async_trait]
impl<T, F, Fut> PageFetcher<T> for F
where
    F: Fn(Params) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<T>>> + Send,
    T: Send + 'static,
{
    async fn fetch_page(&self, params: Params) -> Result<Vec<T>> {
        (self)(params).await
    }
}

/// Looks up the current highest block number
#[async_trait]
pub trait BlockNumberSource: Send + Sync {
    /// Return the block number as a base-16 string, e.g. `"0x10d4f"`
    async fn block_number(&self) -> Result<String>;
}

#[async_trait]
impl<F, Fut> BlockNumberSource for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<String>> + Send,
{
    async fn block_number(&self) -> Result<String> {
        (self)().await
    }
}

// ============================================================================
// Stream Factories
// ============================================================================

/// A factory of item streams, one stream per parameter set
///
/// Streams are lazy: nothing is fetched until the stream is polled, and
/// dropping a stream early means no further fetches happen.
pub trait ItemSource<T>: Send + Sync {
    /// Open a stream of items for the given parameters
    fn items(&self, params: Params) -> ItemStream<T>;
}

// ============================================================================
// Parameter Sequences
// ============================================================================

/// The ordered values a driver injects into one parameter
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValues {
    /// `start, start + 1, …` without an upper bound
    Count {
        /// First value
        start: u64,
    },
    /// Half-open integer range `start..end`
    Range {
        /// First value
        start: u64,
        /// Exclusive upper bound
        end: u64,
    },
    /// An explicit list of values
    List(Vec<JsonValue>),
}

impl ParamValues {
    /// Unbounded ascending counter
    pub fn count_from(start: u64) -> Self {
        Self::Count { start }
    }

    /// Bounded half-open range
    pub fn range(start: u64, end: u64) -> Self {
        Self::Range { start, end }
    }

    /// Explicit list of values
    pub fn list<V: Into<JsonValue>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }

    /// Whether iteration ends on its own
    pub fn is_bounded(&self) -> bool {
        !matches!(self, Self::Count { .. })
    }

    /// Fresh iterator over the values
    pub fn iter(&self) -> Box<dyn Iterator<Item = JsonValue> + Send> {
        match self {
            Self::Count { start } => Box::new((*start..).map(JsonValue::from)),
            Self::Range { start, end } => Box::new((*start..*end).map(JsonValue::from)),
            Self::List(values) => Box::new(values.clone().into_iter()),
        }
    }
}

// ============================================================================
// Pagination State
// ============================================================================

/// Tracks one driver invocation
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Value injected into the most recent call
    pub current: Option<JsonValue>,
    /// Fetch calls issued so far
    pub calls: u64,
    /// Items yielded so far
    pub total_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a call made with the given parameter value
    pub fn record_call(&mut self, value: JsonValue) {
        self.current = Some(value);
        self.calls += 1;
    }

    /// Add to total fetched
    pub fn add_fetched(&mut self, count: u64) {
        self.total_fetched += count;
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }
}
