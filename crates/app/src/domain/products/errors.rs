//! Products service errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductsServiceError {
    #[error("product not found")]
    NotFound,

    #[error("product {0} is out of stock")]
    OutOfStock(String),

    #[error("http error")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response from shop API: {0}")]
    UnexpectedResponse(String),
}
