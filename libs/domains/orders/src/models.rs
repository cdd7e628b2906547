use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single product line inside an order aggregate.
///
/// Identified by `product_id` within its order; a product appears at
/// most once per order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: Uuid,
    /// Requested quantity, always positive
    pub amount: i32,
    /// Set by settlement; a bought item is immutable except for removal
    pub is_bought: bool,
}

impl OrderItem {
    pub fn new(product_id: Uuid, amount: i32) -> Self {
        Self {
            product_id,
            amount,
            is_bought: false,
        }
    }
}

/// Per-user order aggregate.
///
/// A running cart-plus-history rather than a per-purchase receipt:
/// settled and unsettled items coexist until they are removed. At most
/// one order exists per user; it is created lazily on first placement
/// and deleted when its last item is removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Refreshed on every new item placement
    pub creation_date: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Create a new empty order for a user
    pub fn new(user_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            creation_date: Utc::now(),
            items: Vec::new(),
        }
    }

    pub fn contains(&self, product_id: Uuid) -> bool {
        self.items.iter().any(|i| i.product_id == product_id)
    }

    pub fn item(&self, product_id: Uuid) -> Option<&OrderItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    pub fn item_mut(&mut self, product_id: Uuid) -> Option<&mut OrderItem> {
        self.items.iter_mut().find(|i| i.product_id == product_id)
    }

    /// Items not yet settled
    pub fn unsettled(&self) -> impl Iterator<Item = &OrderItem> {
        self.items.iter().filter(|i| !i.is_bought)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_lookup_and_unsettled() {
        let mut order = Order::new(Uuid::now_v7());
        let p1 = Uuid::now_v7();
        let p2 = Uuid::now_v7();
        order.items.push(OrderItem::new(p1, 2));
        order.items.push(OrderItem {
            is_bought: true,
            ..OrderItem::new(p2, 1)
        });

        assert!(order.contains(p1));
        assert!(!order.contains(Uuid::now_v7()));
        assert_eq!(order.item(p2).unwrap().amount, 1);

        let unsettled: Vec<_> = order.unsettled().collect();
        assert_eq!(unsettled.len(), 1);
        assert_eq!(unsettled[0].product_id, p1);
    }
}
