//! CLI module
//!
//! Command-line interface for streaming explorer listings.
//!
//! # Commands
//!
//! - `block-number` - Print the current highest block
//! - `mined-blocks` - Blocks mined by an address
//! - `normal-txs` - Normal transactions of an address
//! - `internal-txs` - Internal transactions of an address or transaction
//! - `token-transfers` - ERC-20/721/1155 transfers

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, RangeArgs};
pub use runner::Runner;
