use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::RatingResult;
use crate::models::ProductRating;

/// Repository trait for ProductRating persistence
///
/// Ratings are keyed by the `(product_id, user_id)` pair; `upsert`
/// inserts on first rating and overwrites on re-rating.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingRepository: Send + Sync {
    /// Get one user's rating for a product
    async fn get(&self, product_id: Uuid, user_id: Uuid) -> RatingResult<Option<ProductRating>>;

    /// Get all ratings for a product
    async fn list_by_product(&self, product_id: Uuid) -> RatingResult<Vec<ProductRating>>;

    /// Insert or overwrite a rating
    async fn upsert(&self, rating: ProductRating) -> RatingResult<ProductRating>;

    /// Delete a rating; returns whether one existed
    async fn delete(&self, product_id: Uuid, user_id: Uuid) -> RatingResult<bool>;
}

/// In-memory implementation of RatingRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryRatingRepository {
    ratings: Arc<RwLock<HashMap<(Uuid, Uuid), ProductRating>>>,
}

impl InMemoryRatingRepository {
    pub fn new() -> Self {
        Self {
            ratings: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl RatingRepository for InMemoryRatingRepository {
    async fn get(&self, product_id: Uuid, user_id: Uuid) -> RatingResult<Option<ProductRating>> {
        let ratings = self.ratings.read().await;
        Ok(ratings.get(&(product_id, user_id)).cloned())
    }

    async fn list_by_product(&self, product_id: Uuid) -> RatingResult<Vec<ProductRating>> {
        let ratings = self.ratings.read().await;
        Ok(ratings
            .values()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn upsert(&self, rating: ProductRating) -> RatingResult<ProductRating> {
        let mut ratings = self.ratings.write().await;

        tracing::debug!(
            product_id = %rating.product_id,
            user_id = %rating.user_id,
            value = rating.value,
            "Upserted rating"
        );
        ratings.insert((rating.product_id, rating.user_id), rating.clone());
        Ok(rating)
    }

    async fn delete(&self, product_id: Uuid, user_id: Uuid) -> RatingResult<bool> {
        let mut ratings = self.ratings.write().await;

        if ratings.remove(&(product_id, user_id)).is_some() {
            tracing::debug!(product_id = %product_id, user_id = %user_id, "Deleted rating");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
