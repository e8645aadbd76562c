//! Thin client for a single ERC20 token contract over Ethereum JSON-RPC.
//!
//! [`TokenClient`] parses caller-supplied hex addresses, attaches the
//! configured gas price and a fixed per-method gas limit, and forwards to a
//! [`ContractCaller`]. The production caller, [`Erc20Caller`], talks to the
//! contract through the `binding` crate over an alloy provider.
//!
//! Writes return as soon as the node accepts the raw transaction into its
//! pool; nothing here waits for a receipt, retries, or tracks nonces across
//! calls. Concurrent writes signed by the same key may race on the pending
//! nonce and should be serialised by the caller.

pub mod address;
pub mod caller;
pub mod context;
pub mod error;
pub mod token;

pub use address::parse_address;
pub use caller::Erc20Caller;
pub use config::{GasLimits, ReadState, TokenConfig};
pub use context::CallContext;
pub use error::TokenError;
pub use token::{ClientSettings, TokenClient};

use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_rpc_types_eth::BlockId;
use alloy_signer_local::PrivateKeySigner;
use std::future::Future;

/// Options for a read-only contract call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallOpts {
    /// Block the call is evaluated against
    pub block: BlockId,
}

impl From<ReadState> for CallOpts {
    fn from(state: ReadState) -> Self {
        let block = match state {
            ReadState::Latest => BlockId::latest(),
            ReadState::Pending => BlockId::pending(),
        };
        Self { block }
    }
}

/// Options for a state-changing contract call.
#[derive(Debug, Clone, Copy)]
pub struct TransactOpts<'a> {
    /// Key that signs the transaction
    pub signer: &'a PrivateKeySigner,
    /// Gas-limit ceiling attached to the transaction
    pub gas_limit: u64,
    /// Legacy gas price in wei
    pub gas_price: u128,
}

/// A transaction accepted by the node but not necessarily mined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedTransaction {
    /// Transaction hash reported by the node
    pub hash: TxHash,
    /// Signer address
    pub from: Address,
    /// Token contract address
    pub to: Address,
    pub nonce: u64,
    pub gas_limit: u64,
    pub gas_price: u128,
    pub chain_id: u64,
    /// Signed EIP-2718 encoded transaction
    pub raw: Bytes,
}

/// The ERC20 methods the token client needs, bound to one contract.
///
/// Reads map failures to [`TokenError::Call`], writes to
/// [`TokenError::Transaction`].
pub trait ContractCaller: Send + Sync {
    /// `balanceOf(account)`
    fn balance_of(
        &self,
        opts: &CallOpts,
        account: Address,
    ) -> impl Future<Output = Result<U256, TokenError>> + Send;

    /// `allowance(owner, spender)`
    fn allowance(
        &self,
        opts: &CallOpts,
        owner: Address,
        spender: Address,
    ) -> impl Future<Output = Result<U256, TokenError>> + Send;

    /// `totalSupply()`
    fn total_supply(&self, opts: &CallOpts)
        -> impl Future<Output = Result<U256, TokenError>> + Send;

    /// `approve(spender, amount)`
    fn approve(
        &self,
        opts: &TransactOpts<'_>,
        spender: Address,
        amount: U256,
    ) -> impl Future<Output = Result<SubmittedTransaction, TokenError>> + Send;

    /// `transfer(recipient, amount)`
    fn transfer(
        &self,
        opts: &TransactOpts<'_>,
        recipient: Address,
        amount: U256,
    ) -> impl Future<Output = Result<SubmittedTransaction, TokenError>> + Send;

    /// `transferFrom(from, to, amount)`
    fn transfer_from(
        &self,
        opts: &TransactOpts<'_>,
        from: Address,
        to: Address,
        amount: U256,
    ) -> impl Future<Output = Result<SubmittedTransaction, TokenError>> + Send;
}

/// The six token operations, as exposed to applications.
///
/// [`TokenClient`] implements this over any [`ContractCaller`]; code that only
/// needs the token surface can take `impl TokenApi` and be tested against a
/// stand-in.
pub trait TokenApi: Send + Sync {
    fn balance_of(&self, address: &str) -> impl Future<Output = Result<U256, TokenError>> + Send;

    fn allowance_of(
        &self,
        owner: &str,
        spender: &str,
    ) -> impl Future<Output = Result<U256, TokenError>> + Send;

    fn total_supply(&self) -> impl Future<Output = Result<U256, TokenError>> + Send;

    fn approve(
        &self,
        key: &PrivateKeySigner,
        spender: &str,
        amount: U256,
    ) -> impl Future<Output = Result<SubmittedTransaction, TokenError>> + Send;

    fn transfer(
        &self,
        key: &PrivateKeySigner,
        recipient: &str,
        amount: U256,
    ) -> impl Future<Output = Result<SubmittedTransaction, TokenError>> + Send;

    fn transfer_from(
        &self,
        key: &PrivateKeySigner,
        from: &str,
        to: &str,
        amount: U256,
    ) -> impl Future<Output = Result<SubmittedTransaction, TokenError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_rpc_types_eth::BlockNumberOrTag;

    #[test]
    fn test_call_opts_from_read_state() {
        let latest = CallOpts::from(ReadState::Latest);
        assert_eq!(latest.block, BlockId::Number(BlockNumberOrTag::Latest));

        let pending = CallOpts::from(ReadState::Pending);
        assert_eq!(pending.block, BlockId::Number(BlockNumberOrTag::Pending));
    }
}
