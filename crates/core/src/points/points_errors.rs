use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PointsError {
    #[error("Invalid points quantity: {0}")]
    InvalidQuantity(String),

    #[error("Invalid unit price: {0}")]
    InvalidPrice(String),

    #[error("Invalid quote time-to-live: {0} minutes")]
    InvalidTtl(i64),

    #[error("A user id is required")]
    MissingUser,

    #[error("Points quote not found: {0}")]
    QuoteNotFound(String),

    #[error("Unknown quote status: {0}")]
    InvalidStatus(String),
}
