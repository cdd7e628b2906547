use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;
use validator::Validate;

/// Platform a product is released for
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Platform {
    #[default]
    Pc,
    PlayStation,
    Xbox,
    Switch,
    Mobile,
}

/// Product genre
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Genre {
    Action,
    Adventure,
    Rpg,
    Strategy,
    Simulation,
    Sports,
    Racing,
    Puzzle,
    Shooter,
    #[default]
    Other,
}

/// Age classification (ESRB-style)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AgeRating {
    #[default]
    Everyone,
    EveryonePlus,
    Teen,
    Mature,
    AdultsOnly,
}

/// Product entity - the catalog record shared by the order and rating engines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier
    pub id: Uuid,
    /// Product name
    pub name: String,
    pub platform: Platform,
    pub genre: Genre,
    pub age_rating: AgeRating,
    /// Price in cents (for precision)
    pub price: i64,
    /// Units in stock; never negative, mutated only by settlement
    pub stock_count: i32,
    /// Truncated integer mean of all user ratings (0-100), mutated only
    /// by the rating engine; 0 when the product has no ratings
    pub aggregate_rating: i32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default)]
    pub genre: Genre,
    #[serde(default)]
    pub age_rating: AgeRating,
    /// Price in cents
    #[validate(range(min = 0))]
    pub price: i64,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub stock_count: i32,
}

/// DTO for updating an existing product
///
/// Stock and aggregate rating are deliberately absent: stock is owned
/// by settlement and the aggregate by the rating engine.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub platform: Option<Platform>,
    pub genre: Option<Genre>,
    pub age_rating: Option<AgeRating>,
    #[validate(range(min = 0))]
    pub price: Option<i64>,
}

/// Query filters for listing products
#[derive(Debug, Clone, Deserialize)]
pub struct ProductFilter {
    pub platform: Option<Platform>,
    pub genre: Option<Genre>,
    pub age_rating: Option<AgeRating>,
    /// Case-insensitive substring match on name
    pub search: Option<String>,
    /// Maximum number of results
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Number of results to skip
    #[serde(default)]
    pub offset: usize,
}

/// One line of an atomic stock settlement batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockDeduction {
    pub product_id: Uuid,
    /// Units to deduct, always positive
    pub quantity: i32,
}

fn default_limit() -> usize {
    50
}

// Kept in sync with the serde defaults above so that a
// default-constructed filter windows the same way as a deserialized
// empty query.
impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            platform: None,
            genre: None,
            age_rating: None,
            search: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl Product {
    /// Create a new product from CreateProduct DTO
    pub fn new(input: CreateProduct) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            platform: input.platform,
            genre: input.genre,
            age_rating: input.age_rating,
            price: input.price,
            stock_count: input.stock_count,
            aggregate_rating: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply updates from UpdateProduct DTO
    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(platform) = update.platform {
            self.platform = platform;
        }
        if let Some(genre) = update.genre {
            self.genre = genre;
        }
        if let Some(age_rating) = update.age_rating {
            self.age_rating = age_rating;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        self.updated_at = Utc::now();
    }
}
