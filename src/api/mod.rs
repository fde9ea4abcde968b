//! Explorer API client
//!
//! Thin glue between the pagination drivers and an Etherscan-family
//! explorer:
//!
//! - [`UrlBuilder`] / [`LinkHelper`] know where each network lives
//! - [`Client`] signs queries and unwraps the `{status, message, result}` envelope
//! - [`AccountEndpoint`] exposes one account listing as a [`crate::pagination::PageFetcher`]
//! - [`Client`] implements [`crate::pagination::BlockNumberSource`] via `eth_blockNumber`

mod account;
mod client;
mod proxy;
mod response;
mod urls;

pub use account::{
    account_query, AccountAction, AccountEndpoint, BlockType, SortOrder, TokenStandard,
};
pub use client::Client;
pub use response::{expect_records, parse_response};
pub use urls::{ApiKind, LinkHelper, UrlBuilder, MAIN_NETWORK};

#[cfg(test)]
mod tests;
