use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    NotFound(Uuid),

    #[error("Product with name '{0}' already exists")]
    DuplicateName(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error(
        "Insufficient stock for product {product_id}: available {available}, requested {requested}"
    )]
    InsufficientStock {
        product_id: Uuid,
        available: i32,
        requested: i32,
    },

    #[error("Store error: {0}")]
    Store(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
