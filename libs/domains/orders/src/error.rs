use domain_catalog::CatalogError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(Uuid),

    #[error("No order exists for user {0}")]
    NotFoundForUser(Uuid),

    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    #[error("Product {0} is already in the order")]
    DuplicateItem(Uuid),

    #[error("Order contains no item for product {0}")]
    ItemNotFound(Uuid),

    #[error("Item for product {0} is already bought and cannot be modified")]
    ItemAlreadyBought(Uuid),

    #[error("Invalid amount {0}: must be positive")]
    InvalidAmount(i32),

    #[error(
        "Insufficient stock for product {product_id}: available {available}, requested {requested}"
    )]
    OutOfStock {
        product_id: Uuid,
        available: i32,
        requested: i32,
    },

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Store error: {0}")]
    Store(String),
}

pub type OrderResult<T> = Result<T, OrderError>;
