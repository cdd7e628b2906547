//! Orders Domain
//!
//! Order lifecycle and inventory settlement. Each user owns at most
//! one order aggregate, created lazily on first item placement and
//! deleted when its last item is removed; it accumulates both settled
//! and unsettled items. Settlement converts unbought items into bought
//! ones while decrementing the matching product stock as one atomic
//! batch.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← Lifecycle rules, per-user serialization
//! └──────┬──────┘
//!        │
//! ┌──────▼──────────────────────────┐
//! │ Repository │ + catalog ProductRepository (stock settlement)
//! └──────┬──────────────────────────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Order aggregate, OrderItem
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use domain_catalog::InMemoryProductRepository;
//! use domain_orders::{repository::InMemoryOrderRepository, service::OrderService};
//!
//! let products = Arc::new(InMemoryProductRepository::new());
//! let service = OrderService::new(InMemoryOrderRepository::new(), products);
//! ```

pub mod error;
pub mod models;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{OrderError, OrderResult};
pub use models::{Order, OrderItem};
pub use repository::{InMemoryOrderRepository, OrderRepository};
pub use service::OrderService;
