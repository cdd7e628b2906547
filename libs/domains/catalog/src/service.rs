//! Catalog Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{CreateProduct, Product, ProductFilter, UpdateProduct};
use crate::repository::ProductRepository;

/// Catalog service providing business logic operations
///
/// The service layer handles validation, business rules, and orchestrates
/// repository operations. Stock and aggregate ratings are not mutated
/// here; those fields belong to the settlement and rating engines.
pub struct CatalogService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> CatalogService<R> {
    /// Create a new CatalogService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new product
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> CatalogResult<Product> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        if self.repository.exists_by_name(&input.name).await? {
            return Err(CatalogError::DuplicateName(input.name));
        }

        self.repository.create(input).await
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> CatalogResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    /// Find a product by name (case-insensitive)
    #[instrument(skip(self))]
    pub async fn find_by_name(&self, name: &str) -> CatalogResult<Option<Product>> {
        self.repository.get_by_name(name).await
    }

    /// List products with optional filters
    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: ProductFilter) -> CatalogResult<Vec<Product>> {
        self.repository.list(filter).await
    }

    /// Update an existing product
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: Uuid, input: UpdateProduct) -> CatalogResult<Product> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        let existing = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        // Check for duplicate name if name is being changed
        if let Some(ref new_name) = input.name {
            if new_name != &existing.name && self.repository.exists_by_name(new_name).await? {
                return Err(CatalogError::DuplicateName(new_name.clone()));
            }
        }

        self.repository.update(id, input).await
    }

    /// Delete a product
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> CatalogResult<()> {
        if !self.repository.delete(id).await? {
            return Err(CatalogError::NotFound(id));
        }
        Ok(())
    }
}

impl<R: ProductRepository> Clone for CatalogService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
