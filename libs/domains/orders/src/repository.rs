use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::OrderResult;
use crate::models::Order;

/// Repository trait for Order persistence
///
/// Orders are stored as whole aggregates keyed by user: at most one
/// order exists per `user_id`, and `upsert` replaces the entire
/// aggregate (items included) in one operation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Get the order aggregate for a user, items included
    async fn get_by_user(&self, user_id: Uuid) -> OrderResult<Option<Order>>;

    /// Get an order by its own identity (cross-user lookups permitted)
    async fn get_by_id(&self, id: Uuid) -> OrderResult<Option<Order>>;

    /// Insert or replace the order aggregate for `order.user_id`
    async fn upsert(&self, order: Order) -> OrderResult<Order>;

    /// Delete an order by its identity
    async fn delete(&self, id: Uuid) -> OrderResult<bool>;
}

/// In-memory implementation of OrderRepository (for development/testing)
///
/// Keys the map by `user_id`, which makes the one-order-per-user
/// invariant structural rather than checked.
#[derive(Debug, Default, Clone)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<HashMap<Uuid, Order>>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self {
            orders: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn get_by_user(&self, user_id: Uuid) -> OrderResult<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&user_id).cloned())
    }

    async fn get_by_id(&self, id: Uuid) -> OrderResult<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.values().find(|o| o.id == id).cloned())
    }

    async fn upsert(&self, order: Order) -> OrderResult<Order> {
        let mut orders = self.orders.write().await;

        tracing::debug!(
            order_id = %order.id,
            user_id = %order.user_id,
            items = order.items.len(),
            "Upserted order"
        );
        orders.insert(order.user_id, order.clone());
        Ok(order)
    }

    async fn delete(&self, id: Uuid) -> OrderResult<bool> {
        let mut orders = self.orders.write().await;

        let user_id = orders
            .values()
            .find(|o| o.id == id)
            .map(|o| o.user_id);

        match user_id {
            Some(user_id) => {
                orders.remove(&user_id);
                tracing::info!(order_id = %id, user_id = %user_id, "Deleted order");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
