//! CLI runner - executes commands

use crate::api::Client;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::pagination::{parse_hex_block, ItemStream};
use crate::streams::{AccountStreams, TxRange};
use futures::StreamExt;
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command, writing records to stdout
    pub async fn run(&self) -> Result<()> {
        self.run_to(&mut std::io::stdout()).await
    }

    /// Run the CLI command, writing records to `out`
    pub async fn run_to<W: Write>(&self, out: &mut W) -> Result<()> {
        let config = self.load_config()?;
        if config.api_key.is_empty() {
            warn!("No API key configured, requests will be heavily rate limited");
        }
        let client = Arc::new(Client::new(&config)?);
        let streams = AccountStreams::with_defaults(Arc::clone(&client), config.streams);

        let stream = match &self.cli.command {
            Commands::BlockNumber => {
                let hex = client.block_number().await?;
                let block_number = parse_hex_block(&hex)?;
                let message = json!({"hex": hex, "block_number": block_number});
                return self.output_message(out, &message);
            }
            Commands::MinedBlocks {
                address,
                block_type,
            } => streams.mined_blocks(address, *block_type)?,
            Commands::NormalTxs { address, range } => {
                streams.normal_txs(address, TxRange::from(range))?
            }
            Commands::InternalTxs {
                address,
                txhash,
                range,
            } => streams.internal_txs(
                address.as_deref(),
                txhash.as_deref(),
                TxRange::from(range),
            )?,
            Commands::TokenTransfers {
                address,
                contract_address,
                standard,
                range,
            } => streams.token_transfers(
                address.as_deref(),
                contract_address.as_deref(),
                *standard,
                TxRange::from(range),
            )?,
        };

        self.drain(stream, out).await
    }

    /// Load configuration: file, then environment, then flags
    fn load_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        };

        if let Some(api_key) = &self.cli.api_key {
            config.api_key.clone_from(api_key);
        }
        if let Some(api_kind) = self.cli.api_kind {
            config.api_kind = api_kind;
        }
        if let Some(network) = &self.cli.network {
            config.network.clone_from(network);
        }
        if let Some(api_url) = &self.cli.api_url {
            config.api_url = Some(api_url.clone());
        }
        if let Some(offset) = self.cli.offset {
            config.streams.offset = offset;
        }
        if let Some(block_limit) = self.cli.block_limit {
            config.streams.block_limit = block_limit;
        }

        let config = config.with_env_api_key();
        config.validate()?;
        Ok(config)
    }

    /// Print every record, stopping at the first error or the record limit
    async fn drain<W: Write>(&self, stream: ItemStream<Value>, out: &mut W) -> Result<()> {
        let started = Instant::now();
        let mut stream = match self.cli.limit {
            Some(limit) => stream.take(limit).boxed(),
            None => stream,
        };

        let mut count = 0usize;
        while let Some(record) = stream.next().await {
            self.output_message(out, &record?)?;
            count += 1;
        }

        info!("Emitted {count} records in {:?}", started.elapsed());
        Ok(())
    }

    /// Output a message
    fn output_message<W: Write>(&self, out: &mut W, msg: &Value) -> Result<()> {
        let line = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(msg)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(msg)?,
        };
        writeln!(out, "{line}").map_err(Error::from)
    }
}
