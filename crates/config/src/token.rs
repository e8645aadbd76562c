//! Token client configuration.
//!
//! Everything here is fixed once the client is built; there is no process-wide
//! mutable default.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Gas price used when none is configured: 20 gwei.
pub const DEFAULT_GAS_PRICE: u128 = 20_000_000_000;

/// Gas limit attached to `approve` transactions.
pub const DEFAULT_APPROVE_GAS_LIMIT: u64 = 50_000;

/// Gas limit attached to `transfer` transactions.
pub const DEFAULT_TRANSFER_GAS_LIMIT: u64 = 50_000;

/// Gas limit attached to `transferFrom` transactions.
pub const DEFAULT_TRANSFER_FROM_GAS_LIMIT: u64 = 50_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for [`TokenConfig`]
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config parsed but holds an unusable value
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Which chain state read calls are evaluated against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadState {
    /// The node's latest block
    #[default]
    Latest,
    /// The node's pending block, including transactions not yet mined
    Pending,
}

/// Gas-limit ceilings per write method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasLimits {
    pub approve: u64,
    pub transfer: u64,
    pub transfer_from: u64,
}

impl Default for GasLimits {
    fn default() -> Self {
        Self {
            approve: DEFAULT_APPROVE_GAS_LIMIT,
            transfer: DEFAULT_TRANSFER_GAS_LIMIT,
            transfer_from: DEFAULT_TRANSFER_FROM_GAS_LIMIT,
        }
    }
}

/// Top-level token client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// JSON-RPC endpoint url
    pub rpc_url: String,

    /// Token contract address, hex with optional 0x prefix
    pub contract_address: String,

    /// Gas price in wei; [`DEFAULT_GAS_PRICE`] when unset
    #[serde(default)]
    pub gas_price: Option<u128>,

    /// State read calls are evaluated against
    #[serde(default)]
    pub read_state: ReadState,

    /// Per-method gas limits
    #[serde(default)]
    pub gas_limits: GasLimits,
}

impl TokenConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;

        Ok(config)
    }

    /// The configured gas price, or [`DEFAULT_GAS_PRICE`] when none was given.
    pub const fn effective_gas_price(&self) -> u128 {
        match self.gas_price {
            Some(gas_price) => gas_price,
            None => DEFAULT_GAS_PRICE,
        }
    }

    /// Reject values that would only fail later at the node.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rpc_url.trim().is_empty() {
            return Err(ConfigError::Invalid("rpc_url is empty".to_string()));
        }

        if self.contract_address.trim().is_empty() {
            return Err(ConfigError::Invalid("contract_address is empty".to_string()));
        }

        if self.gas_price == Some(0) {
            return Err(ConfigError::Invalid("gas_price must be non-zero".to_string()));
        }

        let limits = &self.gas_limits;
        if limits.approve == 0 || limits.transfer == 0 || limits.transfer_from == 0 {
            return Err(ConfigError::Invalid("gas limits must be non-zero".to_string()));
        }

        Ok(())
    }
}

/// Builder for token client configurations.
#[derive(Debug, Clone)]
pub struct TokenConfigBuilder {
    config: TokenConfig,
}

impl TokenConfigBuilder {
    /// Start from an endpoint and contract with every other field defaulted.
    pub fn new(rpc_url: impl Into<String>, contract_address: impl Into<String>) -> Self {
        Self {
            config: TokenConfig {
                rpc_url: rpc_url.into(),
                contract_address: contract_address.into(),
                gas_price: None,
                read_state: ReadState::Latest,
                gas_limits: GasLimits::default(),
            },
        }
    }

    /// Override the gas price (wei).
    pub const fn gas_price(mut self, gas_price: u128) -> Self {
        self.config.gas_price = Some(gas_price);
        self
    }

    /// Read against pending state instead of the latest block.
    pub const fn pending_reads(mut self) -> Self {
        self.config.read_state = ReadState::Pending;
        self
    }

    /// Override the gas-limit table.
    pub const fn gas_limits(mut self, gas_limits: GasLimits) -> Self {
        self.config.gas_limits = gas_limits;
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<TokenConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
