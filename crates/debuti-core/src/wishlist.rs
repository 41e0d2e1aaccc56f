//! # Wishlist Store
//!
//! Saved products, de-duplicated by id. The wishlist never prices anything;
//! `price` is carried for display only.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::store::{Mutation, ObservableStore, Unsubscribe};
use crate::types::{CartProduct, ProductId, WishlistProduct};

// =============================================================================
// Wishlist Item
// =============================================================================

/// A saved product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct WishlistItem {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl From<WishlistProduct> for WishlistItem {
    fn from(product: WishlistProduct) -> Self {
        WishlistItem {
            id: product.id,
            name: product.name,
            price: product.price,
            image: product.image,
            category: product.category,
            color: product.color,
        }
    }
}

/// "Add to bag" from the wishlist drawer. No size is selected there, so the
/// cart applies its default.
impl From<&WishlistItem> for CartProduct {
    fn from(item: &WishlistItem) -> Self {
        CartProduct {
            id: item.id,
            name: item.name.clone(),
            price: item.price,
            color: item.color.clone(),
            size: None,
            image: item.image.clone(),
        }
    }
}

// =============================================================================
// Wishlist Store
// =============================================================================

#[derive(Debug, Clone)]
pub struct WishlistStore {
    store: ObservableStore<WishlistItem>,
}

impl WishlistStore {
    pub fn new() -> Self {
        Self {
            store: ObservableStore::new("wishlist"),
        }
    }

    pub fn subscribe<F>(&self, callback: F) -> Unsubscribe
    where
        F: Fn(&[WishlistItem]) + Send + Sync + 'static,
    {
        self.store.subscribe(callback)
    }

    pub fn observer_count(&self) -> usize {
        self.store.observer_count()
    }

    /// Saves a product. Returns `false` (and changes nothing) if it is
    /// already saved.
    pub fn add_item(&self, product: WishlistProduct) -> bool {
        let id = product.id;
        let added = self.store.mutate(|items| {
            if items.iter().any(|item| item.id == id) {
                Mutation::Skip(false)
            } else {
                items.push(product.into());
                Mutation::Commit(true)
            }
        });
        tracing::debug!(product_id = %id, added, "Wishlist add");
        added
    }

    /// Returns `true` if the product was saved and is now removed.
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

    /// Adds when absent, removes when present. Returns the new membership.
    pub fn toggle(&self, product: WishlistProduct) -> bool {
        let id = product.id;
        if self.remove_item(id) {
            false
        } else {
            self.add_item(product)
        }
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

    pub fn is_in_wishlist(&self, id: ProductId) -> bool {
        self.store.read(|items| items.iter().any(|item| item.id == id))
    }

    pub fn get(&self, id: ProductId) -> Option<WishlistItem> {
        self.store
            .read(|items| items.iter().find(|item| item.id == id).cloned())
    }

    pub fn items(&self) -> Vec<WishlistItem> {
        self.store.snapshot()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl Default for WishlistStore {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn dress(id: u64) -> WishlistProduct {
        WishlistProduct::new(id, "Silk Midi Dress", Money::from_cents(18900))
            .with_category("Dresses")
            .with_color("Emerald")
    }

    #[test]
    fn test_add_rejects_duplicates() {
        let wishlist = WishlistStore::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        wishlist.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        assert!(wishlist.add_item(dress(1)));
        assert!(!wishlist.add_item(dress(1)));

        assert_eq!(wishlist.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_remove_and_membership() {
        let wishlist = WishlistStore::new();
        wishlist.add_item(dress(1));
        wishlist.add_item(dress(2));

        assert!(wishlist.is_in_wishlist(ProductId(2)));
        assert!(wishlist.remove_item(ProductId(2)));
        assert!(!wishlist.remove_item(ProductId(2)));
        assert!(!wishlist.is_in_wishlist(ProductId(2)));
        assert_eq!(wishlist.len(), 1);
    }

    #[test]
    fn test_toggle() {
        let wishlist = WishlistStore::new();
        assert!(wishlist.toggle(dress(4)));
        assert!(wishlist.is_in_wishlist(ProductId(4)));
        assert!(!wishlist.toggle(dress(4)));
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_clear() {
        let wishlist = WishlistStore::new();
        wishlist.add_item(dress(1));
        wishlist.add_item(dress(2));
        wishlist.clear();
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_item_converts_to_cart_product() {
        let wishlist = WishlistStore::new();
        wishlist.add_item(dress(9));

        let item = wishlist.get(ProductId(9)).unwrap();
        let cart_product = CartProduct::from(&item);
        assert_eq!(cart_product.id, ProductId(9));
        assert_eq!(cart_product.price, Money::from_cents(18900));
        assert_eq!(cart_product.color.as_deref(), Some("Emerald"));
        assert!(cart_product.size.is_none());
    }
}
