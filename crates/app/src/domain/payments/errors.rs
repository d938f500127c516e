//! Payment provider errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentError {
    /// Authentication against the provider failed.
    #[error("payment provider authentication failed: {0}")]
    Unauthorized(String),

    /// The provider answered but did not collect the funds.
    #[error("payment not completed, provider status {0}")]
    NotCompleted(String),

    /// The provider order carries no approval link.
    #[error("payment provider returned no approval link")]
    MissingApprovalLink,

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response from payment provider: {0}")]
    UnexpectedResponse(String),
}
