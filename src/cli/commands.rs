//! CLI commands and argument parsing

use crate::api::{ApiKind, BlockType, SortOrder, TokenStandard};
use crate::config::API_KEY_ENV;
use crate::streams::TxRange;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Stream Etherscan-family account listings as JSON lines
#[derive(Parser, Debug)]
#[command(name = "scanpager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Explorer API key
    #[arg(long, global = true, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Explorer family (eth, bsc, avax, polygon, optimism, arbitrum, fantom)
    #[arg(long, global = true)]
    pub api_kind: Option<ApiKind>,

    /// Network name (main, goerli, sepolia, testnet, …)
    #[arg(long, global = true)]
    pub network: Option<String>,

    /// Override the API endpoint URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Records per page
    #[arg(long, global = true)]
    pub offset: Option<u64>,

    /// Blocks per interval
    #[arg(long, global = true)]
    pub block_limit: Option<u64>,

    /// Stop after this many records
    #[arg(short, long, global = true)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the current highest block number
    BlockNumber,

    /// List blocks mined by an address
    MinedBlocks {
        /// Miner address
        address: String,

        /// Canonical blocks or uncles
        #[arg(long, value_enum, default_value = "blocks")]
        block_type: BlockType,
    },

    /// List normal transactions of an address
    NormalTxs {
        /// Account address
        address: String,

        #[command(flatten)]
        range: RangeArgs,
    },

    /// List internal transactions of an address or a transaction
    InternalTxs {
        /// Account address
        #[arg(long)]
        address: Option<String>,

        /// Transaction hash
        #[arg(long)]
        txhash: Option<String>,

        #[command(flatten)]
        range: RangeArgs,
    },

    /// List token transfers of an address and/or a token contract
    TokenTransfers {
        /// Account address
        #[arg(long)]
        address: Option<String>,

        /// Token contract address
        #[arg(long)]
        contract_address: Option<String>,

        /// Token standard
        #[arg(long, value_enum, default_value = "erc20")]
        standard: TokenStandard,

        #[command(flatten)]
        range: RangeArgs,
    },
}

/// Block range options shared by the range listings
#[derive(Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// First block (inclusive)
    #[arg(long, default_value = "0")]
    pub start_block: u64,

    /// Last block (inclusive), defaults to the chain head
    #[arg(long)]
    pub end_block: Option<u64>,

    /// Ordering inside each page
    #[arg(long, value_enum)]
    pub sort: Option<SortOrder>,
}

impl From<&RangeArgs> for TxRange {
    fn from(args: &RangeArgs) -> Self {
        TxRange {
            start_block: args.start_block,
            end_block: args.end_block,
            sort: args.sort,
        }
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one record per line)
    Json,
    /// Human-readable output
    Pretty,
}
