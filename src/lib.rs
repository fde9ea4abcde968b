// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # scanpager
//!
//! Lazy, page-by-page streaming of Etherscan-family explorer listings.
//!
//! Explorer APIs cap how many records one call returns and how far one
//! query may page. scanpager hides that behind a single ordered stream:
//! block ranges are cut into bounded intervals, each interval is paged until
//! the first empty page, and the explorer's "No transactions found" answer is
//! treated as an empty page instead of a failure.
//!
//! ## Features
//!
//! - **Interval chunking**: Split `[start, end]` block ranges into bounded chunks
//! - **Parametrized paging**: Repeat a fetch over `page = 1, 2, …` or any value list
//! - **Lazy streams**: Nothing is fetched until polled, nothing after you stop
//! - **Explorer client**: URLs for eth/bsc/avax/polygon/optimism/arbitrum/fantom
//! - **HTTP**: Retry, backoff and rate limiting
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use futures::TryStreamExt;
//! use scanpager::{AccountStreams, Client, ClientConfig, TokenStandard, TxRange};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> scanpager::Result<()> {
//!     let client = Arc::new(Client::new(&ClientConfig::new("YourApiKeyToken"))?);
//!     let streams = AccountStreams::new(client);
//!
//!     let mut transfers = streams.token_transfers(
//!         Some("0xddbd2b932c763ba5b1b7ae3b362eac3e8d40121a"),
//!         None,
//!         TokenStandard::Erc20,
//!         TxRange::new().start_block(15_000_000),
//!     )?;
//!     while let Some(transfer) = transfers.try_next().await? {
//!         println!("{transfer}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │   AccountStreams: mined_blocks normal_txs internal_txs ...   │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//! ┌─────────────────┬────────────┴─────────┬─────────────────────┐
//! │   Pagination    │      API client      │        HTTP         │
//! ├─────────────────┼──────────────────────┼─────────────────────┤
//! │ Intervals       │ UrlBuilder           │ Retry               │
//! │ Parametrized    │ Envelope parsing     │ Rate limit          │
//! │ FetchProxy      │ Account / proxy      │ Backoff             │
//! └─────────────────┴──────────────────────┴─────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP client with retry and rate limiting
pub mod http;

/// Explorer API client
pub mod api;

/// Interval chunking and page-driven streaming
pub mod pagination;

/// Account listings as item streams
pub mod streams;

/// Client configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result, ResultExt};
pub use types::*;

// Re-export commonly used types
pub use api::{AccountAction, ApiKind, BlockType, Client, SortOrder, TokenStandard, UrlBuilder};
pub use config::ClientConfig;
pub use pagination::{
    generate_intervals, parse_by_blocks, parse_by_pages, FetchProxy, ItemSource, ItemStream,
    PageFetcher, Parametrized, ParamValues,
};
pub use streams::{AccountStreams, TxRange};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
