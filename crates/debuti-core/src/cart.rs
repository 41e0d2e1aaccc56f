//! # Cart Store
//!
//! The shopping bag: one line per product, with quantity and pricing.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  Storefront Action        Store Call              Collection Change     │
//! │  ─────────────────        ──────────              ─────────────────     │
//! │                                                                         │
//! │  "Add to bag" ───────────► add_to_cart() ───────► merge or push line   │
//! │                                                                         │
//! │  +/- buttons ────────────► update_quantity() ───► line.quantity = n    │
//! │                             (n < 1 → no-op)                             │
//! │                                                                         │
//! │  Trash icon ─────────────► remove_item() ───────► line removed         │
//! │                                                                         │
//! │  "Clear bag" ────────────► clear() ─────────────► empty                │
//! │                                                                         │
//! │  Badge / summary ────────► totals() ────────────► (read only)          │
//! │                                                                         │
//! │  NOTE: observers hear about a change only when the collection changed. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Pricing
//! `subtotal = Σ price × quantity`, then shipping from [`ShippingPolicy`]:
//! free when the subtotal is strictly above the threshold, a flat fee
//! otherwise, and nothing for an empty cart.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::store::{Mutation, ObservableStore, Unsubscribe};
use crate::types::{CartProduct, ProductId};

/// Color recorded when the product page sent none.
pub const DEFAULT_COLOR: &str = "Default";

/// Size recorded when the product page sent none.
pub const DEFAULT_SIZE: &str = "One Size";

// =============================================================================
// Cart Item
// =============================================================================

/// A line in the cart.
///
/// Name, price and variant are frozen from the first add; later adds of the
/// same id only bump the quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub color: String,
    pub size: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CartItem {
    /// Creates a line with quantity 1, filling in variant defaults.
    pub fn from_product(product: CartProduct) -> Self {
        CartItem {
            id: product.id,
            name: product.name,
            price: product.price,
            color: product.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            size: product.size.unwrap_or_else(|| DEFAULT_SIZE.to_string()),
            quantity: 1,
            image: product.image,
        }
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.price.times(self.quantity)
    }
}

// =============================================================================
// Shipping Policy
// =============================================================================

/// Flat-fee shipping with a free-shipping threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct ShippingPolicy {
    /// Orders with a subtotal strictly above this ship free.
    pub free_shipping_threshold: Money,
    /// Charged at or below the threshold.
    pub flat_fee: Money,
}

impl ShippingPolicy {
    pub const fn new(free_shipping_threshold: Money, flat_fee: Money) -> Self {
        Self {
            free_shipping_threshold,
            flat_fee,
        }
    }

    /// The premium storefront variant: free over $200.00, else $15.99.
    pub const fn premium() -> Self {
        Self::new(Money::from_cents(20000), Money::from_cents(1599))
    }

    /// Shipping for a cart with the given subtotal.
    ///
    /// An empty cart ships nothing and is charged nothing, so `is_empty`
    /// zeroes the fee even though a zero subtotal is below the threshold.
    pub fn shipping_for(&self, subtotal: Money, is_empty: bool) -> Money {
        if is_empty || subtotal > self.free_shipping_threshold {
            Money::zero()
        } else {
            self.flat_fee
        }
    }

    /// How much more the shopper must spend before shipping is free.
    ///
    /// Shipping is free strictly above the threshold, so at exactly the
    /// threshold one more cent is still needed.
    pub fn remaining_for_free_shipping(&self, subtotal: Money) -> Money {
        if subtotal > self.free_shipping_threshold {
            Money::zero()
        } else {
            (self.free_shipping_threshold + Money::from_cents(1)).saturating_sub(subtotal)
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.free_shipping_threshold.is_negative() {
            return Err(CoreError::InvalidSetting {
                name: "free_shipping_threshold".to_string(),
                reason: "must not be negative".to_string(),
            });
        }
        if self.flat_fee.is_negative() {
            return Err(CoreError::InvalidSetting {
                name: "flat_fee".to_string(),
                reason: "must not be negative".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for ShippingPolicy {
    /// Free over $50.00, else $4.99.
    fn default() -> Self {
        Self::new(Money::from_cents(5000), Money::from_cents(499))
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Cart summary for the bag drawer and the checkout button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: u64,
    pub subtotal: Money,
    pub shipping: Money,
    pub total: Money,
    pub free_shipping_remaining: Money,
}

impl CartTotals {
    pub fn compute(items: &[CartItem], policy: &ShippingPolicy) -> Self {
        let subtotal: Money = items.iter().map(CartItem::line_total).sum();
        let shipping = policy.shipping_for(subtotal, items.is_empty());

        CartTotals {
            item_count: items.len(),
            total_quantity: items.iter().map(|item| u64::from(item.quantity)).sum(),
            subtotal,
            shipping,
            total: subtotal + shipping,
            free_shipping_remaining: policy.remaining_for_free_shipping(subtotal),
        }
    }
}

// =============================================================================
// Cart Store
// =============================================================================

/// Observable cart. Clones share the same cart.
#[derive(Debug, Clone)]
pub struct CartStore {
    store: ObservableStore<CartItem>,
    policy: ShippingPolicy,
}

impl CartStore {
    pub fn new(policy: ShippingPolicy) -> Self {
        Self {
            store: ObservableStore::new("cart"),
            policy,
        }
    }

    pub fn policy(&self) -> ShippingPolicy {
        self.policy
    }

    pub fn subscribe<F>(&self, callback: F) -> Unsubscribe
    where
        F: Fn(&[CartItem]) + Send + Sync + 'static,
    {
        self.store.subscribe(callback)
    }

    pub fn observer_count(&self) -> usize {
        self.store.observer_count()
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Adds one unit of `product`.
    ///
    /// An existing line for the same id gets quantity + 1 and keeps its
    /// other fields. Always returns `true`.
    pub fn add_to_cart(&self, product: CartProduct) -> bool {
        let id = product.id;
        self.store.mutate(|items| {
            match items.iter_mut().find(|item| item.id == id) {
                Some(item) => item.quantity = item.quantity.saturating_add(1),
                None => items.push(CartItem::from_product(product)),
            }
            Mutation::Commit(())
        });
        tracing::debug!(product_id = %id, "Added to cart");
        true
    }

    /// Sets a line's quantity exactly.
    ///
    /// No-op when `new_quantity < 1`, when it does not fit a `u32`, when
    /// the id is absent, or when the quantity is already `new_quantity`.
    pub fn update_quantity(&self, id: ProductId, new_quantity: i64) {
        let Ok(quantity) = u32::try_from(new_quantity) else {
            return;
        };
        if quantity < 1 {
            return;
        }

        self.store.mutate(|items| match items.iter_mut().find(|item| item.id == id) {
            Some(item) if item.quantity != quantity => {
                item.quantity = quantity;
                Mutation::Commit(())
            }
            _ => Mutation::Skip(()),
        });
    }

    /// Removes a line. Returns `false` if the id was not in the cart.
    pub fn remove_item(&self, id: ProductId) -> bool {
        self.store.mutate(|items| {
            let before = items.len();
            items.retain(|item| item.id != id);
            if items.len() == before {
                Mutation::Skip(false)
            } else {
                Mutation::Commit(true)
            }
        })
    }

    pub fn clear(&self) {
        self.store.mutate(|items| {
            if items.is_empty() {
                Mutation::Skip(())
            } else {
                items.clear();
                Mutation::Commit(())
            }
        });
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn items(&self) -> Vec<CartItem> {
        self.store.snapshot()
    }

    pub fn get(&self, id: ProductId) -> Option<CartItem> {
        self.store
            .read(|items| items.iter().find(|item| item.id == id).cloned())
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.store.read(|items| items.iter().any(|item| item.id == id))
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.store.len()
    }

    /// Sum of all quantities (the bag badge).
    pub fn total_quantity(&self) -> u64 {
        self.store
            .read(|items| items.iter().map(|item| u64::from(item.quantity)).sum())
    }

    pub fn subtotal(&self) -> Money {
        self.store
            .read(|items| items.iter().map(CartItem::line_total).sum())
    }

    pub fn shipping(&self) -> Money {
        self.totals().shipping
    }

    pub fn total(&self) -> Money {
        self.totals().total
    }

    pub fn totals(&self) -> CartTotals {
        self.store
            .read(|items| CartTotals::compute(items, &self.policy))
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new(ShippingPolicy::default())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use proptest::prelude::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn product(id: u64, cents: i64) -> CartProduct {
        CartProduct::new(id, format!("Product {id}"), Money::from_cents(cents))
    }

    fn counted(cart: &CartStore) -> Arc<AtomicUsize> {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        cart.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        calls
    }

    #[test]
    fn test_add_fills_defaults() {
        let cart = CartStore::default();
        assert!(cart.add_to_cart(product(1, 2999)));

        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 1);
        assert_eq!(items[0].color, DEFAULT_COLOR);
        assert_eq!(items[0].size, DEFAULT_SIZE);
    }

    #[test]
    fn test_add_same_product_merges() {
        let cart = CartStore::default();
        cart.add_to_cart(product(1, 2999).with_color("Navy"));
        cart.add_to_cart(product(1, 1).with_color("Red").with_size("XL"));

        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].price, Money::from_cents(2999));
        assert_eq!(items[0].color, "Navy");
        assert_eq!(items[0].size, DEFAULT_SIZE);
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let cart = CartStore::default();
        cart.add_to_cart(product(3, 100));
        cart.add_to_cart(product(1, 100));
        cart.add_to_cart(product(3, 100));

        let ids: Vec<u64> = cart.items().iter().map(|item| item.id.get()).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_update_quantity_sets_exactly() {
        let cart = CartStore::default();
        cart.add_to_cart(product(1, 1000));
        cart.update_quantity(ProductId(1), 5);
        assert_eq!(cart.get(ProductId(1)).map(|item| item.quantity), Some(5));
    }

    #[test]
    fn test_quantity_floor_is_a_silent_no_op() {
        let cart = CartStore::default();
        cart.add_to_cart(product(1, 1000));
        cart.update_quantity(ProductId(1), 3);
        let calls = counted(&cart);

        cart.update_quantity(ProductId(1), 0);
        cart.update_quantity(ProductId(1), -1);

        assert_eq!(cart.get(ProductId(1)).map(|item| item.quantity), Some(3));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_update_unknown_id_is_a_no_op() {
        let cart = CartStore::default();
        let calls = counted(&cart);
        cart.update_quantity(ProductId(404), 2);
        assert!(cart.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_remove_item() {
        let cart = CartStore::default();
        cart.add_to_cart(product(1, 1000));
        cart.add_to_cart(product(2, 1000));
        let calls = counted(&cart);

        assert!(cart.remove_item(ProductId(1)));
        assert!(!cart.remove_item(ProductId(1)));
        assert!(!cart.contains(ProductId(1)));
        assert!(cart.contains(ProductId(2)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_clear_notifies_only_when_non_empty() {
        let cart = CartStore::default();
        let calls = counted(&cart);

        cart.clear();
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        cart.add_to_cart(product(1, 1000));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_observer_receives_snapshot() {
        let cart = CartStore::default();
        let last = Arc::new(Mutex::new(Vec::new()));
        let sink = last.clone();
        cart.subscribe(move |items| *sink.lock() = items.to_vec());

        cart.add_to_cart(product(7, 500));
        cart.add_to_cart(product(7, 500));

        let last = last.lock();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].quantity, 2);
    }

    #[test]
    fn test_totals_below_threshold() {
        let cart = CartStore::default();
        cart.add_to_cart(product(1, 1000));
        cart.add_to_cart(product(1, 1000));
        cart.add_to_cart(product(2, 500));

        let totals = cart.totals();
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_quantity, 3);
        assert_eq!(totals.subtotal, Money::from_cents(2500));
        assert_eq!(totals.shipping, Money::from_cents(499));
        assert_eq!(totals.total, Money::from_cents(2999));
        assert_eq!(totals.free_shipping_remaining, Money::from_cents(2501));
    }

    #[test]
    fn test_shipping_is_free_strictly_above_threshold() {
        let policy = ShippingPolicy::default();
        assert_eq!(policy.shipping_for(Money::from_cents(5000), false), Money::from_cents(499));
        assert!(policy.shipping_for(Money::from_cents(5001), false).is_zero());
        assert_eq!(policy.remaining_for_free_shipping(Money::from_cents(5000)), Money::from_cents(1));
        assert!(policy.remaining_for_free_shipping(Money::from_cents(5001)).is_zero());
    }

    #[test]
    fn test_empty_cart_has_no_shipping() {
        let cart = CartStore::default();
        let totals = cart.totals();
        assert!(totals.subtotal.is_zero());
        assert!(totals.shipping.is_zero());
        assert!(totals.total.is_zero());
    }

    #[test]
    fn test_huge_quantity_totals_saturate() {
        let cart = CartStore::default();
        cart.add_to_cart(product(1, 3_000_000_000));
        cart.update_quantity(ProductId(1), i64::from(u32::MAX));
        assert_eq!(cart.get(ProductId(1)).map(|item| item.quantity), Some(u32::MAX));

        let totals = cart.totals();
        assert_eq!(totals.subtotal.cents(), i64::MAX);
        assert!(totals.shipping.is_zero());
        assert_eq!(totals.total.cents(), i64::MAX);
    }

    #[test]
    fn test_premium_policy() {
        let cart = CartStore::new(ShippingPolicy::premium());
        cart.add_to_cart(product(1, 15000));
        assert_eq!(cart.shipping(), Money::from_cents(1599));
        cart.add_to_cart(product(2, 6000));
        assert!(cart.shipping().is_zero());
        assert_eq!(cart.total(), Money::from_cents(21000));
    }

    #[test]
    fn test_policy_validation() {
        assert!(ShippingPolicy::default().validate().is_ok());
        let bad = ShippingPolicy::new(Money::from_cents(5000), Money::from_cents(-1));
        assert!(matches!(bad.validate(), Err(CoreError::InvalidSetting { .. })));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(u64),
        Update(u64, i64),
        Remove(u64),
        Clear,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0u64..8).prop_map(Op::Add),
            2 => (0u64..8, -3i64..6).prop_map(|(id, qty)| Op::Update(id, qty)),
            1 => (0u64..8).prop_map(Op::Remove),
            1 => Just(Op::Clear),
        ]
    }

    proptest! {
        #[test]
        fn prop_lines_unique_and_positive(ops in proptest::collection::vec(op(), 0..60)) {
            let cart = CartStore::default();
            for op in ops {
                match op {
                    Op::Add(id) => { cart.add_to_cart(product(id, 250)); }
                    Op::Update(id, qty) => cart.update_quantity(ProductId(id), qty),
                    Op::Remove(id) => { cart.remove_item(ProductId(id)); }
                    Op::Clear => cart.clear(),
                }
            }

            let items = cart.items();
            let ids: HashSet<ProductId> = items.iter().map(|item| item.id).collect();
            prop_assert_eq!(ids.len(), items.len());
            prop_assert!(items.iter().all(|item| item.quantity >= 1));

            let totals = cart.totals();
            prop_assert_eq!(totals.subtotal.cents(), 250 * totals.total_quantity as i64);
            prop_assert_eq!(totals.total, totals.subtotal + totals.shipping);
        }
    }
}
