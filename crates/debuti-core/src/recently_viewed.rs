//! # Recently-Viewed Store
//!
//! Bounded, most-recent-first list of product ids.
//!
//! ```text
//!   max_items = 3
//!
//!   view A   → [A]
//!   view B   → [B, A]
//!   view C   → [C, B, A]
//!   view A   → [A, C, B]        prior A removed, A moved to front
//!   view D   → [D, A, C]        B evicted from the back
//! ```
//!
//! The store holds ids only; [`RecentlyViewedStore::resolve`] joins them
//! against a [`Catalog`] when the strip is rendered.

use crate::catalog::Catalog;
use crate::store::{Mutation, ObservableStore, Unsubscribe};
use crate::types::{CatalogProduct, ProductId};

/// Default strip length.
pub const DEFAULT_MAX_ITEMS: usize = 6;

#[derive(Debug, Clone)]
pub struct RecentlyViewedStore {
    store: ObservableStore<ProductId>,
    max_items: usize,
}

impl RecentlyViewedStore {
    /// Creates an empty store. A `max_items` of 0 is raised to 1.
    pub fn new(max_items: usize) -> Self {
        Self {
            store: ObservableStore::new("recently_viewed"),
            max_items: max_items.max(1),
        }
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    pub fn subscribe<F>(&self, callback: F) -> Unsubscribe
    where
        F: Fn(&[ProductId]) + Send + Sync + 'static,
    {
        self.store.subscribe(callback)
    }

    pub fn observer_count(&self) -> usize {
        self.store.observer_count()
    }

    /// Records a product view.
    ///
    /// Viewing the product that is already first changes nothing and
    /// notifies nobody.
    pub fn add_item(&self, id: ProductId) {
        let max_items = self.max_items;
        self.store.mutate(|items| {
            if items.first() == Some(&id) {
                return Mutation::Skip(());
            }
            items.retain(|existing| *existing != id);
            items.insert(0, id);
            items.truncate(max_items);
            Mutation::Commit(())
        });
    }

    /// Ids, most recent first.
    pub fn get_items(&self) -> Vec<ProductId> {
        self.store.snapshot()
    }

    /// Full products for the stored ids, most recent first. Ids the catalog
    /// does not know are skipped.
    pub fn resolve(&self, catalog: &Catalog) -> Vec<CatalogProduct> {
        self.store.read(|ids| {
            ids.iter()
                .filter_map(|id| catalog.get(*id).cloned())
                .collect()
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

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl Default for RecentlyViewedStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITEMS)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
