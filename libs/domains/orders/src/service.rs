//! Order Service - order lifecycle and stock settlement

use std::sync::Arc;

use chrono::Utc;
use domain_catalog::{CatalogError, ProductRepository, StockDeduction};
use keyed_lock::KeyedMutex;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{OrderError, OrderResult};
use crate::models::{Order, OrderItem};
use crate::repository::OrderRepository;

/// Order service owning the order lifecycle: item placement,
/// modification, removal, and settlement against product stock.
///
/// Mutating operations serialize per user through a [`KeyedMutex`], so
/// concurrent calls for the same user cannot create duplicate
/// aggregates or double-settle; stock itself is protected by the
/// product store's atomic `commit_stock` batch.
pub struct OrderService<R: OrderRepository, P: ProductRepository> {
    orders: Arc<R>,
    products: Arc<P>,
    user_locks: KeyedMutex<Uuid>,
}

impl<R: OrderRepository, P: ProductRepository> OrderService<R, P> {
    /// Create a new OrderService.
    ///
    /// The product repository is taken as `Arc` because it is shared
    /// with the catalog and rating services.
    pub fn new(orders: R, products: Arc<P>) -> Self {
        Self {
            orders: Arc::new(orders),
            products,
            user_locks: KeyedMutex::new(),
        }
    }

    /// Place a product into the user's order.
    ///
    /// Creates the order lazily on first placement and refreshes its
    /// `creation_date`. A product already present in the order is
    /// rejected with `DuplicateItem` regardless of its bought state;
    /// amounts are never merged.
    #[instrument(skip(self))]
    pub async fn place_item(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        amount: i32,
    ) -> OrderResult<Order> {
        if amount <= 0 {
            return Err(OrderError::InvalidAmount(amount));
        }

        let _guard = self.user_locks.lock(user_id).await;

        self.products
            .get_by_id(product_id)
            .await?
            .ok_or(OrderError::ProductNotFound(product_id))?;

        let mut order = match self.orders.get_by_user(user_id).await? {
            Some(order) => order,
            None => Order::new(user_id),
        };

        if order.contains(product_id) {
            return Err(OrderError::DuplicateItem(product_id));
        }

        order.items.push(OrderItem::new(product_id, amount));
        order.creation_date = Utc::now();

        tracing::info!(user_id = %user_id, product_id = %product_id, amount, "Placed item");
        self.orders.upsert(order).await
    }

    /// Resolve an order by user, or by explicit order id when given.
    ///
    /// Lookup by id deliberately crosses users; access control is the
    /// caller's responsibility.
    #[instrument(skip(self))]
    pub async fn get_order(&self, user_id: Uuid, order_id: Option<Uuid>) -> OrderResult<Order> {
        match order_id {
            Some(id) => self
                .orders
                .get_by_id(id)
                .await?
                .ok_or(OrderError::NotFound(id)),
            None => self
                .orders
                .get_by_user(user_id)
                .await?
                .ok_or(OrderError::NotFoundForUser(user_id)),
        }
    }

    /// Change the requested amount of an unsettled item.
    #[instrument(skip(self))]
    pub async fn update_item_amount(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        new_amount: i32,
    ) -> OrderResult<Order> {
        if new_amount <= 0 {
            return Err(OrderError::InvalidAmount(new_amount));
        }

        let _guard = self.user_locks.lock(user_id).await;

        let mut order = self
            .orders
            .get_by_user(user_id)
            .await?
            .ok_or(OrderError::NotFoundForUser(user_id))?;

        let item = order
            .item_mut(product_id)
            .ok_or(OrderError::ItemNotFound(product_id))?;
        if item.is_bought {
            return Err(OrderError::ItemAlreadyBought(product_id));
        }
        item.amount = new_amount;

        tracing::info!(user_id = %user_id, product_id = %product_id, new_amount, "Updated item amount");
        self.orders.upsert(order).await
    }

    /// Remove an item from the user's order, bought or not.
    ///
    /// Deletes the whole order when the last item is removed; an empty
    /// order is never left behind.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, user_id: Uuid, product_id: Uuid) -> OrderResult<()> {
        let _guard = self.user_locks.lock(user_id).await;

        let mut order = self
            .orders
            .get_by_user(user_id)
            .await?
            .ok_or(OrderError::NotFoundForUser(user_id))?;

        let before = order.items.len();
        order.items.retain(|i| i.product_id != product_id);
        if order.items.len() == before {
            return Err(OrderError::ItemNotFound(product_id));
        }

        if order.is_empty() {
            tracing::info!(user_id = %user_id, order_id = %order.id, "Removed last item, deleting order");
            self.orders.delete(order.id).await?;
        } else {
            tracing::info!(user_id = %user_id, product_id = %product_id, "Removed item");
            self.orders.upsert(order).await?;
        }
        Ok(())
    }

    /// Settle every unsettled item in the user's order.
    ///
    /// All-or-nothing: the stock deductions for all unsettled items are
    /// committed as one atomic batch, and items are marked bought only
    /// after the batch succeeds. A failed settle leaves both the order
    /// and all stock counts exactly as they were. An order with nothing
    /// left to settle succeeds as a no-op.
    #[instrument(skip(self))]
    pub async fn settle(&self, user_id: Uuid) -> OrderResult<()> {
        let _guard = self.user_locks.lock(user_id).await;

        let mut order = self
            .orders
            .get_by_user(user_id)
            .await?
            .ok_or(OrderError::NotFoundForUser(user_id))?;

        let deductions: Vec<StockDeduction> = order
            .unsettled()
            .map(|i| StockDeduction {
                product_id: i.product_id,
                quantity: i.amount,
            })
            .collect();
        if deductions.is_empty() {
            tracing::debug!(user_id = %user_id, "Nothing to settle");
            return Ok(());
        }

        match self.products.commit_stock(&deductions).await {
            Ok(()) => {}
            Err(CatalogError::InsufficientStock {
                product_id,
                available,
                requested,
            }) => {
                return Err(OrderError::OutOfStock {
                    product_id,
                    available,
                    requested,
                });
            }
            Err(CatalogError::NotFound(id)) => return Err(OrderError::ProductNotFound(id)),
            Err(e) => return Err(e.into()),
        }

        for item in order.items.iter_mut().filter(|i| !i.is_bought) {
            item.is_bought = true;
        }

        // The bought flags must land together with the stock commit;
        // if persisting them fails, re-credit the whole batch.
        if let Err(e) = self.orders.upsert(order).await {
            tracing::warn!(user_id = %user_id, error = %e, "Settle persist failed, re-crediting stock");
            if let Err(restock_err) = self.products.restock(&deductions).await {
                tracing::error!(
                    user_id = %user_id,
                    error = %restock_err,
                    "Failed to re-credit stock after settle persist failure"
                );
            }
            return Err(e);
        }

        tracing::info!(user_id = %user_id, settled = deductions.len(), "Settled order");
        Ok(())
    }
}

impl<R: OrderRepository, P: ProductRepository> Clone for OrderService<R, P> {
    fn clone(&self) -> Self {
        Self {
            orders: Arc::clone(&self.orders),
            products: Arc::clone(&self.products),
            user_locks: self.user_locks.clone(),
        }
    }
}
