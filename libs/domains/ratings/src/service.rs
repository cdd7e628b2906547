//! Rating Service - per-user ratings and aggregate recomputation

use std::sync::Arc;

use domain_catalog::{Product, ProductRepository};
use keyed_lock::KeyedMutex;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{RatingError, RatingResult};
use crate::models::{MAX_RATING, MIN_RATING, ProductRating};
use crate::repository::RatingRepository;

/// Rating service owning the per-(product, user) ratings and the
/// derived `aggregate_rating` on the product record.
///
/// Rate and unrate serialize per product through a [`KeyedMutex`] so
/// that the read-recompute-write cycle on the aggregate cannot lose
/// updates under concurrent calls.
pub struct RatingService<R: RatingRepository, P: ProductRepository> {
    ratings: Arc<R>,
    products: Arc<P>,
    product_locks: KeyedMutex<Uuid>,
}

impl<R: RatingRepository, P: ProductRepository> RatingService<R, P> {
    /// Create a new RatingService.
    ///
    /// The product repository is taken as `Arc` because it is shared
    /// with the catalog and order services.
    pub fn new(ratings: R, products: Arc<P>) -> Self {
        Self {
            ratings: Arc::new(ratings),
            products,
            product_locks: KeyedMutex::new(),
        }
    }

    /// Rate a product on behalf of a user, overwriting any previous
    /// rating by the same user, and recompute the product's aggregate.
    ///
    /// Returns the product with its refreshed `aggregate_rating`.
    #[instrument(skip(self))]
    pub async fn rate(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        value: i32,
    ) -> RatingResult<Product> {
        if !(MIN_RATING..=MAX_RATING).contains(&value) {
            return Err(RatingError::ValueOutOfRange(value));
        }

        let _guard = self.product_locks.lock(product_id).await;

        self.products
            .get_by_id(product_id)
            .await?
            .ok_or(RatingError::ProductNotFound(product_id))?;

        self.ratings
            .upsert(ProductRating::new(product_id, user_id, value))
            .await?;

        let all = self.ratings.list_by_product(product_id).await?;
        let aggregate = aggregate_of(&all);
        let product = self
            .products
            .set_aggregate_rating(product_id, aggregate)
            .await?;

        tracing::info!(user_id = %user_id, product_id = %product_id, value, aggregate, "Rated product");
        Ok(product)
    }

    /// Remove a user's rating for a product and recompute the
    /// aggregate (0 when no ratings remain).
    #[instrument(skip(self))]
    pub async fn unrate(&self, user_id: Uuid, product_id: Uuid) -> RatingResult<()> {
        let _guard = self.product_locks.lock(product_id).await;

        self.products
            .get_by_id(product_id)
            .await?
            .ok_or(RatingError::ProductNotFound(product_id))?;

        if !self.ratings.delete(product_id, user_id).await? {
            return Err(RatingError::RatingNotFound {
                product_id,
                user_id,
            });
        }

        let all = self.ratings.list_by_product(product_id).await?;
        let aggregate = aggregate_of(&all);
        self.products
            .set_aggregate_rating(product_id, aggregate)
            .await?;

        tracing::info!(user_id = %user_id, product_id = %product_id, aggregate, "Removed rating");
        Ok(())
    }
}

impl<R: RatingRepository, P: ProductRepository> Clone for RatingService<R, P> {
    fn clone(&self) -> Self {
        Self {
            ratings: Arc::clone(&self.ratings),
            products: Arc::clone(&self.products),
            product_locks: self.product_locks.clone(),
        }
    }
}

/// Truncated integer mean of all rating values, 0 when empty.
fn aggregate_of(ratings: &[ProductRating]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i64 = ratings.iter().map(|r| i64::from(r.value)).sum();
    (sum / ratings.len() as i64) as i32
}
