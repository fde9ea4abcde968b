//! Pagination module
//!
//! Turns repeated page fetches into one flattened, ordered item stream.
//!
//! # Overview
//!
//! - [`IntervalGenerator`] chunks a block range into bounded intervals
//! - [`FetchProxy`] runs one fetch and absorbs the "no data" error
//! - [`Parametrized`] repeats a source over a parameter sequence
//! - [`parse_by_pages`] / [`parse_by_blocks`] are the two explorer shapes
//!
//! ```text
//! intervals ─► parse_by_blocks ─► Parametrized(page) ─► FetchProxy ─► items
//! ```

mod driver;
mod intervals;
mod proxy;
mod types;

pub use driver::{
    parse_by_blocks, parse_by_pages, parse_hex_block, BlockRange, Parametrized,
    END_BLOCK_PARAM, FIRST_PAGE, PAGE_PARAM, START_BLOCK_PARAM,
};
pub use intervals::{generate_intervals, Interval, IntervalGenerator};
pub use proxy::FetchProxy;
pub use types::{
    BlockNumberSource, ItemSource, ItemStream, PageFetcher, PaginationState, ParamValues,
};
