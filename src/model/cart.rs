use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Adding to a line would push its quantity outside the `i32` range.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("quantity of {product_id} cannot grow from {current} by {added}")]
pub struct QuantityOverflow {
    pub product_id: String,
    pub current: i32,
    pub added: i32,
}

/// A single product line in a [`Cart`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    pub quantity: i32,
}

impl CartItem {
    pub fn new(product_id: impl Into<String>, quantity: i32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// The set of items a user currently holds.
///
/// Items keep the order in which each product was first added. A product id
/// appears at most once; adding it again accumulates into the existing line.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cart {
    pub user_id: String,
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Creates a cart with no items for `user_id`.
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            items: Vec::new(),
        }
    }

    /// Creates a cart holding exactly one item.
    pub fn with_item(user_id: impl Into<String>, item: CartItem) -> Self {
        Self {
            user_id: user_id.into(),
            items: vec![item],
        }
    }

    /// Adds `quantity` of `product_id`, incrementing the existing line if the
    /// product is already present and appending a new line otherwise.
    ///
    /// The cart is left unchanged when the new quantity would overflow.
    pub fn add(&mut self, product_id: &str, quantity: i32) -> Result<(), QuantityOverflow> {
        match self.items.iter_mut().find(|item| item.product_id == product_id) {
            Some(item) => {
                item.quantity = item.quantity.checked_add(quantity).ok_or_else(|| QuantityOverflow {
                    product_id: product_id.to_string(),
                    current: item.quantity,
                    added: quantity,
                })?;
            }
            None => self.items.push(CartItem::new(product_id, quantity)),
        }
        Ok(())
    }

    /// Quantity held for `product_id`, if the cart contains it.
    pub fn quantity_of(&self, product_id: &str) -> Option<i32> {
        self.items
            .iter()
            .find(|item| item.product_id == product_id)
            .map(|item| item.quantity)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_accumulates_same_product() {
        let mut cart = Cart::empty("user_1");
        cart.add("OLJCESPC7Z", 2).unwrap();
        cart.add("OLJCESPC7Z", 3).unwrap();

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.quantity_of("OLJCESPC7Z"), Some(5));
    }

    #[test]
    fn test_add_appends_in_first_add_order() {
        let mut cart = Cart::with_item("user_1", CartItem::new("p2", 1));
        cart.add("p1", 4).unwrap();
        cart.add("p2", 1).unwrap();

        let ids: Vec<_> = cart.items.iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, ["p2", "p1"]);
        assert_eq!(cart.quantity_of("p2"), Some(2));
        assert_eq!(cart.quantity_of("missing"), None);
    }

    #[test]
    fn test_add_rejects_overflow_and_keeps_quantity() {
        let mut cart = Cart::with_item("user_1", CartItem::new("p1", i32::MAX));

        let err = cart.add("p1", 1).unwrap_err();

        assert_eq!(err.current, i32::MAX);
        assert_eq!(err.added, 1);
        assert_eq!(cart.quantity_of("p1"), Some(i32::MAX));

        let mut low = Cart::with_item("user_1", CartItem::new("p1", i32::MIN));
        assert!(low.add("p1", -1).is_err());
        assert_eq!(low.quantity_of("p1"), Some(i32::MIN));
    }
}
