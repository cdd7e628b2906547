//! Catalog Domain
//!
//! Product store for the commerce core. Holds the catalog records
//! whose `stock_count` is settled by the order engine and whose
//! `aggregate_rating` is derived by the rating engine.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← Business logic, validation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + in-memory implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use domain_catalog::{repository::InMemoryProductRepository, service::CatalogService};
//!
//! let repository = InMemoryProductRepository::new();
//! let service = CatalogService::new(repository);
//! ```

pub mod error;
pub mod models;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{CatalogError, CatalogResult};
pub use models::{
    AgeRating, CreateProduct, Genre, Platform, Product, ProductFilter, StockDeduction,
    UpdateProduct,
};
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::CatalogService;
