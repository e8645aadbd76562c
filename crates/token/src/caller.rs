use crate::{CallOpts, ContractCaller, SubmittedTransaction, TokenError, TransactOpts};
use alloy_consensus::Transaction;
use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, Bytes, U256};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use binding::IERC20;
use tracing::{debug, info};

/// [`ContractCaller`] backed by the generated ERC20 binding over an alloy provider.
#[derive(Debug, Clone)]
pub struct Erc20Caller<P> {
    provider: P,
    address: Address,
    chain_id: u64,
}

impl<P> Erc20Caller<P>
where
    P: Provider + Clone,
{
    /// Bind the contract at `address`. `chain_id` is used for EIP-155 signing.
    pub const fn new(provider: P, address: Address, chain_id: u64) -> Self {
        Self {
            provider,
            address,
            chain_id,
        }
    }

    pub const fn address(&self) -> Address {
        self.address
    }

    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Fill, sign and broadcast a call to the token contract.
    async fn submit(
        &self,
        opts: &TransactOpts<'_>,
        method: &str,
        input: Bytes,
    ) -> Result<SubmittedTransaction, TokenError> {
        let from = opts.signer.address();

        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(self.address)
            .with_input(input)
            .with_gas_limit(opts.gas_limit)
            .with_gas_price(opts.gas_price);

        let filled = client::fill_transaction(tx, &self.provider, from, self.chain_id)
            .await
            .map_err(|e| TokenError::Transaction(format!("{method}: {e}")))?;

        let (envelope, raw) = client::sign_transaction(filled, opts.signer)
            .await
            .map_err(|e| TokenError::Transaction(format!("{method}: signing failed: {e}")))?;

        let pending = self
            .provider
            .send_raw_transaction(&raw)
            .await
            .map_err(|e| TokenError::Transaction(format!("{method}: {e}")))?;
        let hash = *pending.tx_hash();

        info!(
            "Submitted {}: hash={}, from={}, nonce={}, gas_limit={}",
            method,
            hash,
            from,
            envelope.nonce(),
            envelope.gas_limit()
        );

        Ok(SubmittedTransaction {
            hash,
            from,
            to: self.address,
            nonce: envelope.nonce(),
            gas_limit: envelope.gas_limit(),
            gas_price: opts.gas_price,
            chain_id: self.chain_id,
            raw,
        })
    }
}

impl<P> ContractCaller for Erc20Caller<P>
where
    P: Provider + Clone,
{
    async fn balance_of(&self, opts: &CallOpts, account: Address) -> Result<U256, TokenError> {
        debug!(
            "Querying token balance: token={}, account={}, block={:?}",
            self.address, account, opts.block
        );

        let contract = IERC20::new(self.address, &self.provider);
        contract
            .balanceOf(account)
            .block(opts.block)
            .call()
            .await
            .map_err(|e| TokenError::Call(format!("balanceOf: {e}")))
    }

    async fn allowance(
        &self,
        opts: &CallOpts,
        owner: Address,
        spender: Address,
    ) -> Result<U256, TokenError> {
        debug!(
            "Querying token allowance: token={}, owner={}, spender={}, block={:?}",
            self.address, owner, spender, opts.block
        );

        let contract = IERC20::new(self.address, &self.provider);
        contract
            .allowance(owner, spender)
            .block(opts.block)
            .call()
            .await
            .map_err(|e| TokenError::Call(format!("allowance: {e}")))
    }

    async fn total_supply(&self, opts: &CallOpts) -> Result<U256, TokenError> {
        debug!(
            "Querying total supply: token={}, block={:?}",
            self.address, opts.block
        );

        let contract = IERC20::new(self.address, &self.provider);
        contract
            .totalSupply()
            .block(opts.block)
            .call()
            .await
            .map_err(|e| TokenError::Call(format!("totalSupply: {e}")))
    }

    async fn approve(
        &self,
        opts: &TransactOpts<'_>,
        spender: Address,
        amount: U256,
    ) -> Result<SubmittedTransaction, TokenError> {
        let contract = IERC20::new(self.address, &self.provider);
        let input = contract.approve(spender, amount).calldata().clone();

        self.submit(opts, "approve", input).await
    }

    async fn transfer(
        &self,
        opts: &TransactOpts<'_>,
        recipient: Address,
        amount: U256,
    ) -> Result<SubmittedTransaction, TokenError> {
        let contract = IERC20::new(self.address, &self.provider);
        let input = contract.transfer(recipient, amount).calldata().clone();

        self.submit(opts, "transfer", input).await
    }

    async fn transfer_from(
        &self,
        opts: &TransactOpts<'_>,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<SubmittedTransaction, TokenError> {
        let contract = IERC20::new(self.address, &self.provider);
        let input = contract.transferFrom(from, to, amount).calldata().clone();

        self.submit(opts, "transferFrom", input).await
    }
}
