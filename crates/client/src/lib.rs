//! RPC provider construction and local transaction signing.

use alloy_consensus::TxEnvelope;
use alloy_network::{eip2718::Encodable2718, EthereumWallet, TransactionBuilder};
use alloy_primitives::{Address, Bytes};
use alloy_provider::{DynProvider, Provider, ProviderBuilder, WsConnect};
use alloy_rpc_types::TransactionRequest;
use alloy_signer_local::PrivateKeySigner;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Error parsing or validating URLs
    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),

    /// Error connecting to the RPC endpoint
    #[error("Connection error: {0}")]
    Connection(String),
}

/// Parse an RPC url, accepting http(s) and ws(s) endpoints.
pub fn parse_rpc_url(rpc_url: &str) -> Result<reqwest::Url, ClientError> {
    let url: reqwest::Url = rpc_url
        .parse()
        .map_err(|e| ClientError::InvalidUrl(format!("{}", e)))?;

    match url.scheme() {
        "http" | "https" | "ws" | "wss" => Ok(url),
        other => Err(ClientError::InvalidUrl(format!(
            "unsupported scheme {other:?}, expected http, https, ws or wss"
        ))),
    }
}

/// Convenience function to create an ethereum rpc provider from url.
///
/// HTTP providers connect lazily; WebSocket providers open the socket here
/// and fail with [`ClientError::Connection`] when nothing answers.
pub async fn create_provider(rpc_url: &str) -> Result<DynProvider, ClientError> {
    let url = parse_rpc_url(rpc_url)?;

    let provider = match url.scheme() {
        "ws" | "wss" => ProviderBuilder::new()
            .connect_ws(WsConnect::new(url.as_str()))
            .await
            .map_err(|e| ClientError::Connection(format!("{}: {}", rpc_url, e)))?
            .erased(),
        _ => ProviderBuilder::new().connect_http(url).erased(),
    };

    Ok(provider)
}

/// Create a provider and confirm the endpoint answers, returning its chain id.
pub async fn dial(rpc_url: &str) -> Result<(DynProvider, u64), ClientError> {
    let provider = create_provider(rpc_url).await?;
    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ClientError::Connection(format!("{}: {}", rpc_url, e)))?;

    Ok((provider, chain_id))
}

/// Fill the fields a legacy transaction still lacks using the provider.
///
/// Gas limit and gas price are the caller's responsibility and are never
/// estimated here.
pub async fn fill_transaction<P>(
    mut tx: TransactionRequest,
    provider: &P,
    from: Address,
    chain_id: u64,
) -> eyre::Result<TransactionRequest>
where
    P: Provider,
{
    if tx.gas.is_none() || tx.gas_price.is_none() {
        eyre::bail!("gas limit and gas price must be set before filling");
    }

    if tx.from.is_none() {
        tx.from = Some(from);
    }

    if tx.chain_id.is_none() {
        tx.chain_id = Some(chain_id);
    }

    // Pending count so back-to-back submissions from one key don't collide
    if tx.nonce.is_none() {
        let nonce = provider.get_transaction_count(from).pending().await?;
        debug!("Filled nonce {} for {}", nonce, from);
        tx.nonce = Some(nonce);
    }

    Ok(tx)
}

/// Sign a filled transaction request with a local key.
///
/// Returns the signed envelope and its EIP-2718 encoding, ready for
/// `eth_sendRawTransaction`.
pub async fn sign_transaction(
    tx: TransactionRequest,
    signer: &PrivateKeySigner,
) -> eyre::Result<(TxEnvelope, Bytes)> {
    let wallet = EthereumWallet::from(signer.clone());

    let tx_envelope: TxEnvelope = tx
        .build(&wallet)
        .await
        .map_err(|e| eyre::eyre!("{}", e))?;

    let mut encoded = Vec::new();
    tx_envelope.encode_2718(&mut encoded);

    Ok((tx_envelope, Bytes::from(encoded)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_consensus::Transaction;
    use alloy_network::eip2718::Decodable2718;
    use alloy_provider::{network::Ethereum, RootProvider};

    // anvil account #0
    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    /// Provider that must never be reached.
    #[derive(Clone)]
    struct MockProvider;

    impl Provider for MockProvider {
        fn root(&self) -> &RootProvider<Ethereum> {
            todo!()
        }
    }

    fn full_request() -> TransactionRequest {
        TransactionRequest::default()
            .with_to(Address::repeat_byte(0x11))
            .with_input(Bytes::from_static(&[0xa9, 0x05, 0x9c, 0xbb]))
            .with_gas_limit(50_000)
            .with_gas_price(20_000_000_000)
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let result = create_provider("not a url").await;
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_rejects_unsupported_scheme() {
        let result = parse_rpc_url("ftp://localhost:8545");
        assert!(result.unwrap_err().to_string().contains("unsupported scheme"));

        assert!(parse_rpc_url("https://rpc.example.org").is_ok());
        assert!(parse_rpc_url("ws://localhost:8546").is_ok());
        assert!(parse_rpc_url("wss://rpc.example.org/ws").is_ok());
    }

    #[tokio::test]
    async fn test_ws_dead_endpoint_is_connection_error() {
        // nothing listens on the discard port
        let result = dial("ws://127.0.0.1:9").await;

        match result {
            Err(ClientError::Connection(message)) => {
                assert!(!message.contains("unsupported scheme"));
            }
            Err(other) => panic!("expected Connection error, got {other}"),
            Ok(_) => panic!("dial succeeded against a dead endpoint"),
        }
    }

    #[tokio::test]
    async fn test_fill_keeps_preset_fields() {
        let tx = full_request().with_nonce(7).with_chain_id(31337);
        let from = Address::repeat_byte(0x22);

        let filled = fill_transaction(tx, &MockProvider, from, 1).await.unwrap();
        assert_eq!(filled.from, Some(from));
        assert_eq!(filled.nonce, Some(7));
        assert_eq!(filled.chain_id, Some(31337));
    }

    #[tokio::test]
    async fn test_fill_requires_gas_before_nonce_lookup() {
        // no nonce set: reaching the provider would hit MockProvider's todo!()
        let tx = TransactionRequest::default();

        let result = fill_transaction(tx, &MockProvider, Address::ZERO, 1).await;
        assert!(result.unwrap_err().to_string().contains("gas limit"));
    }

    #[tokio::test]
    async fn test_sign_legacy_transaction() {
        let signer: PrivateKeySigner = KEY.parse().unwrap();
        let tx = full_request()
            .with_from(signer.address())
            .with_nonce(3)
            .with_chain_id(31337);

        let (envelope, raw) = sign_transaction(tx, &signer).await.unwrap();
        assert!(envelope.is_legacy());

        let decoded = TxEnvelope::decode_2718(&mut raw.as_ref()).unwrap();
        assert_eq!(decoded.gas_limit(), 50_000);
        assert_eq!(decoded.gas_price(), Some(20_000_000_000));
        assert_eq!(decoded.nonce(), 3);
        assert_eq!(decoded.chain_id(), Some(31337));
    }
}
