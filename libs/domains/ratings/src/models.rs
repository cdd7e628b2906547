use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lowest accepted rating value
pub const MIN_RATING: i32 = 0;
/// Highest accepted rating value
pub const MAX_RATING: i32 = 100;

/// One user's rating of one product.
///
/// Identified by the `(product_id, user_id)` pair; a user holds at
/// most one rating per product and re-rating overwrites it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRating {
    pub product_id: Uuid,
    pub user_id: Uuid,
    /// Rating value in `0..=100`
    pub value: i32,
    pub rated_at: DateTime<Utc>,
}

impl ProductRating {
    pub fn new(product_id: Uuid, user_id: Uuid, value: i32) -> Self {
        Self {
            product_id,
            user_id,
            value,
            rated_at: Utc::now(),
        }
    }
}
