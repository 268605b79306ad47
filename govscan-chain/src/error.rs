use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    /// HTTP or connection-level failure reaching the endpoint.
    #[error("transport error: {0}")]
    Transport(String),
    /// The endpoint answered with a JSON-RPC error object.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    /// The endpoint answered 200 but the payload was not what the method
    /// contract promises.
    #[error("unexpected rpc response: {0}")]
    InvalidResponse(String),
    /// Returned log or call data did not decode against the expected ABI.
    #[error("abi decode failure: {0}")]
    AbiDecode(String),
    /// The governance contract reports no snapshot block for this proposal.
    #[error("proposal {0} not found: governor reports no snapshot block")]
    ProposalNotFound(String),
}

impl From<reqwest::Error> for ChainError {
    fn from(err: reqwest::Error) -> Self {
        ChainError::Transport(err.to_string())
    }
}
