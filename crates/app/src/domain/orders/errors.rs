//! Orders service errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order not found")]
    NotFound,

    #[error("order rejected by shop API: {0}")]
    Rejected(String),

    #[error("http error")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response from shop API: {0}")]
    UnexpectedResponse(String),
}
