//! Ratings Domain
//!
//! Per-user product ratings and the derived aggregate rating. Each
//! `(product, user)` pair holds at most one rating in `0..=100`;
//! every change recomputes the product's `aggregate_rating` as the
//! truncated integer mean over all ratings for that product.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← Range checks, per-product serialization
//! └──────┬──────┘
//!        │
//! ┌──────▼──────────────────────────┐
//! │ Repository │ + catalog ProductRepository (aggregate writes)
//! └──────┬──────────────────────────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← ProductRating
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use domain_catalog::InMemoryProductRepository;
//! use domain_ratings::{repository::InMemoryRatingRepository, service::RatingService};
//!
//! let products = Arc::new(InMemoryProductRepository::new());
//! let service = RatingService::new(InMemoryRatingRepository::new(), products);
//! ```

pub mod error;
pub mod models;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{RatingError, RatingResult};
pub use models::{MAX_RATING, MIN_RATING, ProductRating};
pub use repository::{InMemoryRatingRepository, RatingRepository};
pub use service::RatingService;
