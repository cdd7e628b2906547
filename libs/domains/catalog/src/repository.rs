use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{CreateProduct, Product, ProductFilter, StockDeduction, UpdateProduct};

/// Repository trait for Product persistence
///
/// This trait defines the data access interface for products.
/// Implementations can use different storage backends; whichever is
/// chosen must keep `commit_stock` atomic, since the settlement
/// engine relies on it for its all-or-nothing contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Create a new product
    async fn create(&self, input: CreateProduct) -> CatalogResult<Product>;

    /// Get a product by ID
    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<Product>>;

    /// Get a product by name (case-insensitive)
    async fn get_by_name(&self, name: &str) -> CatalogResult<Option<Product>>;

    /// List products with optional filters
    async fn list(&self, filter: ProductFilter) -> CatalogResult<Vec<Product>>;

    /// Update an existing product
    async fn update(&self, id: Uuid, input: UpdateProduct) -> CatalogResult<Product>;

    /// Delete a product by ID
    async fn delete(&self, id: Uuid) -> CatalogResult<bool>;

    /// Check if a product name exists
    async fn exists_by_name(&self, name: &str) -> CatalogResult<bool>;

    /// Apply a batch of stock deductions atomically.
    ///
    /// Either every deduction clears its availability check and all of
    /// them are applied, or the call fails (`NotFound` or
    /// `InsufficientStock`) with no stock mutated.
    async fn commit_stock(&self, deductions: &[StockDeduction]) -> CatalogResult<()>;

    /// Re-credit a previously committed batch of deductions.
    ///
    /// Compensation path for callers whose own persist step fails
    /// after `commit_stock` succeeded. No availability checks; applied
    /// atomically like `commit_stock`.
    async fn restock(&self, deductions: &[StockDeduction]) -> CatalogResult<()>;

    /// Overwrite the derived aggregate rating for a product
    async fn set_aggregate_rating(&self, id: Uuid, value: i32) -> CatalogResult<Product>;
}

/// In-memory implementation of ProductRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            products: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: CreateProduct) -> CatalogResult<Product> {
        let mut products = self.products.write().await;

        let name_exists = products
            .values()
            .any(|p| p.name.to_lowercase() == input.name.to_lowercase());
        if name_exists {
            return Err(CatalogError::DuplicateName(input.name));
        }

        let product = Product::new(input);
        products.insert(product.id, product.clone());

        tracing::info!(product_id = %product.id, "Created product");
        Ok(product)
    }

    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> CatalogResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products
            .values()
            .find(|p| p.name.to_lowercase() == name.to_lowercase())
            .cloned())
    }

    async fn list(&self, filter: ProductFilter) -> CatalogResult<Vec<Product>> {
        let products = self.products.read().await;

        let mut result: Vec<Product> = products
            .values()
            .filter(|p| {
                if let Some(platform) = filter.platform {
                    if p.platform != platform {
                        return false;
                    }
                }
                if let Some(genre) = filter.genre {
                    if p.genre != genre {
                        return false;
                    }
                }
                if let Some(age_rating) = filter.age_rating {
                    if p.age_rating != age_rating {
                        return false;
                    }
                }
                if let Some(ref search) = filter.search {
                    if !p.name.to_lowercase().contains(&search.to_lowercase()) {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();

        // Sort by created_at descending (newest first)
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let result: Vec<Product> = result
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .collect();

        Ok(result)
    }

    async fn update(&self, id: Uuid, input: UpdateProduct) -> CatalogResult<Product> {
        let mut products = self.products.write().await;

        if !products.contains_key(&id) {
            return Err(CatalogError::NotFound(id));
        }

        if let Some(ref new_name) = input.name {
            let name_exists = products
                .values()
                .any(|p| p.id != id && p.name.to_lowercase() == new_name.to_lowercase());
            if name_exists {
                return Err(CatalogError::DuplicateName(new_name.clone()));
            }
        }

        let product = products.get_mut(&id).ok_or(CatalogError::NotFound(id))?;
        product.apply_update(input);
        let updated = product.clone();

        tracing::info!(product_id = %id, "Updated product");
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> CatalogResult<bool> {
        let mut products = self.products.write().await;

        if products.remove(&id).is_some() {
            tracing::info!(product_id = %id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn exists_by_name(&self, name: &str) -> CatalogResult<bool> {
        let products = self.products.read().await;
        let exists = products
            .values()
            .any(|p| p.name.to_lowercase() == name.to_lowercase());
        Ok(exists)
    }

    async fn commit_stock(&self, deductions: &[StockDeduction]) -> CatalogResult<()> {
        let mut products = self.products.write().await;

        // Stage: every line must clear before anything is mutated.
        for deduction in deductions {
            let product = products
                .get(&deduction.product_id)
                .ok_or(CatalogError::NotFound(deduction.product_id))?;
            if product.stock_count < deduction.quantity {
                return Err(CatalogError::InsufficientStock {
                    product_id: deduction.product_id,
                    available: product.stock_count,
                    requested: deduction.quantity,
                });
            }
        }

        // Commit under the same write lock.
        for deduction in deductions {
            let product = products
                .get_mut(&deduction.product_id)
                .ok_or(CatalogError::NotFound(deduction.product_id))?;
            product.stock_count -= deduction.quantity;
            product.updated_at = chrono::Utc::now();
            tracing::debug!(
                product_id = %deduction.product_id,
                quantity = deduction.quantity,
                remaining = product.stock_count,
                "Committed stock deduction"
            );
        }

        Ok(())
    }

    async fn restock(&self, deductions: &[StockDeduction]) -> CatalogResult<()> {
        let mut products = self.products.write().await;

        for deduction in deductions {
            let product = products
                .get_mut(&deduction.product_id)
                .ok_or(CatalogError::NotFound(deduction.product_id))?;
            product.stock_count += deduction.quantity;
            product.updated_at = chrono::Utc::now();
            tracing::debug!(
                product_id = %deduction.product_id,
                quantity = deduction.quantity,
                remaining = product.stock_count,
                "Re-credited stock deduction"
            );
        }

        Ok(())
    }

    async fn set_aggregate_rating(&self, id: Uuid, value: i32) -> CatalogResult<Product> {
        let mut products = self.products.write().await;

        let product = products.get_mut(&id).ok_or(CatalogError::NotFound(id))?;
        product.aggregate_rating = value;
        product.updated_at = chrono::Utc::now();
        let updated = product.clone();

        tracing::debug!(product_id = %id, aggregate_rating = value, "Updated aggregate rating");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgeRating, Genre, Platform};

    fn sample_input(name: &str, stock_count: i32) -> CreateProduct {
        CreateProduct {
            name: name.to_string(),
            platform: Platform::Pc,
            genre: Genre::Rpg,
            age_rating: AgeRating::Teen,
            price: 5999,
            stock_count,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_product() {
        let repo = InMemoryProductRepository::new();

        let product = repo.create(sample_input("Elden Throne", 10)).await.unwrap();
        assert_eq!(product.name, "Elden Throne");
        assert_eq!(product.aggregate_rating, 0);

        let fetched = repo.get_by_id(product.id).await.unwrap();
        assert_eq!(fetched.unwrap().id, product.id);

        let by_name = repo.get_by_name("elden throne").await.unwrap();
        assert_eq!(by_name.unwrap().id, product.id);
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let repo = InMemoryProductRepository::new();
        repo.create(sample_input("Star Drift", 5)).await.unwrap();

        let err = repo.create(sample_input("star drift", 5)).await.unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateName(_)));
    }

    #[tokio::test]
    async fn test_list_filters_and_windowing() {
        let repo = InMemoryProductRepository::new();
        repo.create(sample_input("Alpha", 1)).await.unwrap();
        repo.create(CreateProduct {
            platform: Platform::Switch,
            ..sample_input("Beta", 1)
        })
        .await
        .unwrap();

        let only_switch = repo
            .list(ProductFilter {
                platform: Some(Platform::Switch),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(only_switch.len(), 1);
        assert_eq!(only_switch[0].name, "Beta");

        let windowed = repo
            .list(ProductFilter {
                limit: 1,
                offset: 1,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(windowed.len(), 1);
    }

    #[tokio::test]
    async fn test_commit_stock_applies_whole_batch() {
        let repo = InMemoryProductRepository::new();
        let p1 = repo.create(sample_input("First", 10)).await.unwrap();
        let p2 = repo.create(sample_input("Second", 4)).await.unwrap();

        repo.commit_stock(&[
            StockDeduction {
                product_id: p1.id,
                quantity: 3,
            },
            StockDeduction {
                product_id: p2.id,
                quantity: 4,
            },
        ])
        .await
        .unwrap();

        assert_eq!(repo.get_by_id(p1.id).await.unwrap().unwrap().stock_count, 7);
        assert_eq!(repo.get_by_id(p2.id).await.unwrap().unwrap().stock_count, 0);
    }

    #[tokio::test]
    async fn test_commit_stock_is_all_or_nothing() {
        let repo = InMemoryProductRepository::new();
        let p1 = repo.create(sample_input("First", 10)).await.unwrap();
        let p2 = repo.create(sample_input("Second", 5)).await.unwrap();

        let err = repo
            .commit_stock(&[
                StockDeduction {
                    product_id: p1.id,
                    quantity: 3,
                },
                StockDeduction {
                    product_id: p2.id,
                    quantity: 100,
                },
            ])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CatalogError::InsufficientStock {
                available: 5,
                requested: 100,
                ..
            }
        ));
        // Nothing was applied, including the line that would have cleared.
        assert_eq!(
            repo.get_by_id(p1.id).await.unwrap().unwrap().stock_count,
            10
        );
        assert_eq!(repo.get_by_id(p2.id).await.unwrap().unwrap().stock_count, 5);
    }

    #[tokio::test]
    async fn test_list_with_default_filter_returns_everything() {
        let repo = InMemoryProductRepository::new();
        repo.create(sample_input("Alpha", 1)).await.unwrap();
        repo.create(sample_input("Beta", 1)).await.unwrap();

        // A default-constructed filter must window like an empty
        // query, not an empty page.
        let all = repo.list(ProductFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(ProductFilter::default().limit, 50);
    }

    #[tokio::test]
    async fn test_restock_reverses_commit() {
        let repo = InMemoryProductRepository::new();
        let p1 = repo.create(sample_input("First", 10)).await.unwrap();
        let p2 = repo.create(sample_input("Second", 4)).await.unwrap();

        let batch = [
            StockDeduction {
                product_id: p1.id,
                quantity: 3,
            },
            StockDeduction {
                product_id: p2.id,
                quantity: 4,
            },
        ];
        repo.commit_stock(&batch).await.unwrap();
        repo.restock(&batch).await.unwrap();

        assert_eq!(
            repo.get_by_id(p1.id).await.unwrap().unwrap().stock_count,
            10
        );
        assert_eq!(repo.get_by_id(p2.id).await.unwrap().unwrap().stock_count, 4);
    }

    #[tokio::test]
    async fn test_commit_stock_unknown_product() {
        let repo = InMemoryProductRepository::new();
        let p1 = repo.create(sample_input("First", 10)).await.unwrap();

        let err = repo
            .commit_stock(&[
                StockDeduction {
                    product_id: p1.id,
                    quantity: 1,
                },
                StockDeduction {
                    product_id: Uuid::now_v7(),
                    quantity: 1,
                },
            ])
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::NotFound(_)));
        assert_eq!(
            repo.get_by_id(p1.id).await.unwrap().unwrap().stock_count,
            10
        );
    }

    #[tokio::test]
    async fn test_set_aggregate_rating() {
        let repo = InMemoryProductRepository::new();
        let product = repo.create(sample_input("Rated", 1)).await.unwrap();

        let updated = repo.set_aggregate_rating(product.id, 85).await.unwrap();
        assert_eq!(updated.aggregate_rating, 85);

        let err = repo
            .set_aggregate_rating(Uuid::now_v7(), 10)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }
}
