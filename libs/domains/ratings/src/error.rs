use domain_catalog::CatalogError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum RatingError {
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    #[error("User {user_id} has no rating for product {product_id}")]
    RatingNotFound { product_id: Uuid, user_id: Uuid },

    #[error("Rating value {0} is outside the allowed range 0..=100")]
    ValueOutOfRange(i32),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Store error: {0}")]
    Store(String),
}

pub type RatingResult<T> = Result<T, RatingError>;
