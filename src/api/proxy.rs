//! Geth/Parity proxy module endpoints

use super::client::Client;
use crate::error::{Error, Result};
use crate::pagination::{parse_hex_block, BlockNumberSource};
use crate::types::StringMap;
use async_trait::async_trait;

impl Client {
    /// Current highest block number as returned by `eth_blockNumber`, e.g. `"0x10d4f"`
    pub async fn block_number(&self) -> Result<String> {
        let result = self
            .call("proxy", "eth_blockNumber", StringMap::new())
            .await?;
        match result.as_str() {
            Some(hex) => Ok(hex.to_string()),
            None => Err(Error::decode(format!(
                "Expected a hex block number, got: {result}"
            ))),
        }
    }

    /// Current highest block number, decoded
    pub async fn latest_block(&self) -> Result<u64> {
        parse_hex_block(&self.block_number().await?)
    }
}

#[async_trait]
impl BlockNumberSource for Client {
    async fn block_number(&self) -> Result<String> {
        Client::block_number(self).await
    }
}
