use client::ClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenError {
    /// Endpoint unreachable or misconfigured
    #[error("Connection error: {0}")]
    Connection(String),

    /// Malformed hex address
    #[error("Invalid address {input:?}: {reason}")]
    InvalidAddress { input: String, reason: String },

    /// Read call failed at the RPC or decoding layer
    #[error("Contract call failed: {0}")]
    Call(String),

    /// Write failed while filling, signing, submitting, or was rejected by the node
    #[error("Transaction failed: {0}")]
    Transaction(String),

    /// Cancellation token fired or the deadline elapsed
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<ClientError> for TokenError {
    fn from(err: ClientError) -> Self {
        Self::Connection(err.to_string())
    }
}
