//! Configuration types for the token client.
//!
//! This crate provides:
//! - The canonical gas price and per-method gas-limit defaults
//! - The read policy (latest or pending state)
//! - TOML loading and validation of a [`TokenConfig`]

pub mod token;

pub use token::{
    ConfigError, GasLimits, ReadState, TokenConfig, TokenConfigBuilder, DEFAULT_APPROVE_GAS_LIMIT,
    DEFAULT_GAS_PRICE, DEFAULT_TRANSFER_FROM_GAS_LIMIT, DEFAULT_TRANSFER_GAS_LIMIT,
};
