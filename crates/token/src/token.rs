use crate::{
    parse_address, CallContext, CallOpts, ContractCaller, Erc20Caller, SubmittedTransaction,
    TokenApi, TokenError, TransactOpts,
};
use alloy_primitives::U256;
use alloy_provider::DynProvider;
use alloy_rpc_types_eth::BlockId;
use alloy_signer_local::PrivateKeySigner;
use config::{GasLimits, ReadState, TokenConfig, DEFAULT_GAS_PRICE};
use tracing::info;

/// Per-client transaction and read parameters, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientSettings {
    /// Legacy gas price in wei
    pub gas_price: u128,
    /// Gas-limit ceiling per write method
    pub gas_limits: GasLimits,
    /// State reads are evaluated against
    pub read_state: ReadState,
}

impl ClientSettings {
    /// Settings with the default gas-limit table and latest-state reads.
    ///
    /// A missing gas price falls back to [`DEFAULT_GAS_PRICE`].
    pub fn new(gas_price: Option<u128>) -> Self {
        Self {
            gas_price: gas_price.unwrap_or(DEFAULT_GAS_PRICE),
            gas_limits: GasLimits::default(),
            read_state: ReadState::Latest,
        }
    }

    pub fn from_config(config: &TokenConfig) -> Self {
        Self {
            gas_price: config.effective_gas_price(),
            gas_limits: config.gas_limits,
            read_state: config.read_state,
        }
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Handle to one deployed ERC20 contract.
///
/// Every operation comes in two forms: `op_with` takes a [`CallContext`], and
/// `op` is the same call under [`CallContext::background`]. String addresses
/// are parsed before anything is sent, so a malformed address never reaches
/// the node.
#[derive(Debug, Clone)]
pub struct TokenClient<C> {
    caller: C,
    settings: ClientSettings,
}

impl TokenClient<Erc20Caller<DynProvider>> {
    /// Dial `endpoint` and bind the token contract at `contract_address`.
    pub async fn connect(
        endpoint: &str,
        gas_price: Option<u128>,
        contract_address: &str,
    ) -> Result<Self, TokenError> {
        Self::dial(endpoint, contract_address, ClientSettings::new(gas_price)).await
    }

    /// Dial and bind using a loaded [`TokenConfig`].
    pub async fn from_config(config: &TokenConfig) -> Result<Self, TokenError> {
        Self::dial(
            &config.rpc_url,
            &config.contract_address,
            ClientSettings::from_config(config),
        )
        .await
    }

    async fn dial(
        endpoint: &str,
        contract_address: &str,
        settings: ClientSettings,
    ) -> Result<Self, TokenError> {
        let contract = parse_address(contract_address)?;
        let (provider, chain_id) = client::dial(endpoint).await?;

        info!(
            "Connected to {}: chain_id={}, token={}, gas_price={}",
            endpoint, chain_id, contract, settings.gas_price
        );

        let caller = Erc20Caller::new(provider, contract, chain_id);
        Ok(Self::new(caller, settings))
    }
}

impl<C> TokenClient<C>
where
    C: ContractCaller,
{
    pub const fn new(caller: C, settings: ClientSettings) -> Self {
        Self { caller, settings }
    }

    pub const fn caller(&self) -> &C {
        &self.caller
    }

    pub const fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub const fn gas_price(&self) -> u128 {
        self.settings.gas_price
    }

    /// Options for read calls under the configured read policy.
    pub fn call_opts(&self) -> CallOpts {
        CallOpts::from(self.settings.read_state)
    }

    /// Options for a write signed by `signer` with the given gas-limit ceiling.
    pub const fn transact_opts<'a>(
        &self,
        signer: &'a PrivateKeySigner,
        gas_limit: u64,
    ) -> TransactOpts<'a> {
        TransactOpts {
            signer,
            gas_limit,
            gas_price: self.settings.gas_price,
        }
    }

    pub async fn balance_of(&self, address: &str) -> Result<U256, TokenError> {
        self.balance_of_with(&CallContext::background(), address)
            .await
    }

    pub async fn balance_of_with(
        &self,
        ctx: &CallContext,
        address: &str,
    ) -> Result<U256, TokenError> {
        let account = parse_address(address)?;
        let opts = self.call_opts();

        ctx.run("balanceOf", self.caller.balance_of(&opts, account))
            .await
    }

    pub async fn allowance_of(&self, owner: &str, spender: &str) -> Result<U256, TokenError> {
        self.allowance_of_with(&CallContext::background(), owner, spender)
            .await
    }

    pub async fn allowance_of_with(
        &self,
        ctx: &CallContext,
        owner: &str,
        spender: &str,
    ) -> Result<U256, TokenError> {
        let owner = parse_address(owner)?;
        let spender = parse_address(spender)?;
        let opts = self.call_opts();

        ctx.run("allowance", self.caller.allowance(&opts, owner, spender))
            .await
    }

    pub async fn total_supply(&self) -> Result<U256, TokenError> {
        self.total_supply_with(&CallContext::background()).await
    }

    pub async fn total_supply_with(&self, ctx: &CallContext) -> Result<U256, TokenError> {
        let opts = self.call_opts();

        ctx.run("totalSupply", self.caller.total_supply(&opts))
            .await
    }

    /// Total supply at a pinned block, independent of the read policy.
    pub async fn total_supply_at(&self, block: BlockId) -> Result<U256, TokenError> {
        self.total_supply_at_with(&CallContext::background(), block)
            .await
    }

    pub async fn total_supply_at_with(
        &self,
        ctx: &CallContext,
        block: BlockId,
    ) -> Result<U256, TokenError> {
        let opts = CallOpts { block };

        ctx.run("totalSupply", self.caller.total_supply(&opts))
            .await
    }

    pub async fn approve(
        &self,
        key: &PrivateKeySigner,
        spender: &str,
        amount: U256,
    ) -> Result<SubmittedTransaction, TokenError> {
        self.approve_with(&CallContext::background(), key, spender, amount)
            .await
    }

    pub async fn approve_with(
        &self,
        ctx: &CallContext,
        key: &PrivateKeySigner,
        spender: &str,
        amount: U256,
    ) -> Result<SubmittedTransaction, TokenError> {
        let spender = parse_address(spender)?;
        let opts = self.transact_opts(key, self.settings.gas_limits.approve);

        ctx.run("approve", self.caller.approve(&opts, spender, amount))
            .await
    }

    pub async fn transfer(
        &self,
        key: &PrivateKeySigner,
        recipient: &str,
        amount: U256,
    ) -> Result<SubmittedTransaction, TokenError> {
        self.transfer_with(&CallContext::background(), key, recipient, amount)
            .await
    }

    pub async fn transfer_with(
        &self,
        ctx: &CallContext,
        key: &PrivateKeySigner,
        recipient: &str,
        amount: U256,
    ) -> Result<SubmittedTransaction, TokenError> {
        let recipient = parse_address(recipient)?;
        let opts = self.transact_opts(key, self.settings.gas_limits.transfer);

        ctx.run("transfer", self.caller.transfer(&opts, recipient, amount))
            .await
    }

    pub async fn transfer_from(
        &self,
        key: &PrivateKeySigner,
        from: &str,
        to: &str,
        amount: U256,
    ) -> Result<SubmittedTransaction, TokenError> {
        self.transfer_from_with(&CallContext::background(), key, from, to, amount)
            .await
    }

    pub async fn transfer_from_with(
        &self,
        ctx: &CallContext,
        key: &PrivateKeySigner,
        from: &str,
        to: &str,
        amount: U256,
    ) -> Result<SubmittedTransaction, TokenError> {
        let from = parse_address(from)?;
        let to = parse_address(to)?;
        let opts = self.transact_opts(key, self.settings.gas_limits.transfer_from);

        ctx.run(
            "transferFrom",
            self.caller.transfer_from(&opts, from, to, amount),
        )
        .await
    }
}

impl<C> TokenApi for TokenClient<C>
where
    C: ContractCaller,
{
    async fn balance_of(&self, address: &str) -> Result<U256, TokenError> {
        Self::balance_of(self, address).await
    }

    async fn allowance_of(&self, owner: &str, spender: &str) -> Result<U256, TokenError> {
        Self::allowance_of(self, owner, spender).await
    }

    async fn total_supply(&self) -> Result<U256, TokenError> {
        Self::total_supply(self).await
    }

    async fn approve(
        &self,
        key: &PrivateKeySigner,
        spender: &str,
        amount: U256,
    ) -> Result<SubmittedTransaction, TokenError> {
        Self::approve(self, key, spender, amount).await
    }

    async fn transfer(
        &self,
        key: &PrivateKeySigner,
        recipient: &str,
        amount: U256,
    ) -> Result<SubmittedTransaction, TokenError> {
        Self::transfer(self, key, recipient, amount).await
    }

    async fn transfer_from(
        &self,
        key: &PrivateKeySigner,
        from: &str,
        to: &str,
        amount: U256,
    ) -> Result<SubmittedTransaction, TokenError> {
        Self::transfer_from(self, key, from, to, amount).await
    }
}
