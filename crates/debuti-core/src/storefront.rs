//! # Storefront
//!
//! The composition root: one instance of each store, built from settings
//! and handed to whatever drives the UI.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Storefront                                     │
//! │                                                                         │
//! │   StorefrontSettings ──► ┌───────────┐ ┌──────────────┐                 │
//! │                          │ CartStore │ │ WishlistStore│                 │
//! │                          └───────────┘ └──────────────┘                 │
//! │                          ┌────────────────────┐ ┌───────────┐           │
//! │                          │RecentlyViewedStore │ │ AuthStore │           │
//! │                          └────────────────────┘ └───────────┘           │
//! │                          ┌─────────┐                                    │
//! │                          │ Catalog │  (read-only, for lookups)          │
//! │                          └─────────┘                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stores share no state with each other. Two `Storefront`s are fully
//! isolated, which is what tests rely on.

use serde::{Deserialize, Serialize};

use crate::auth::{AuthStore, RoleDirectory};
use crate::cart::{CartStore, ShippingPolicy};
use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult};
use crate::recently_viewed::{RecentlyViewedStore, DEFAULT_MAX_ITEMS};
use crate::types::{CatalogProduct, DisplayVariant, ProductId};
use crate::wishlist::WishlistStore;

/// Upper bound accepted for the recently-viewed strip.
pub const MAX_RECENTLY_VIEWED: usize = 50;

// =============================================================================
// Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontSettings {
    pub shipping: ShippingPolicy,
    pub recently_viewed_max: usize,
    pub roles: RoleDirectory,
    pub display: DisplayVariant,
}

impl StorefrontSettings {
    pub fn validate(&self) -> CoreResult<()> {
        self.shipping.validate()?;

        if self.recently_viewed_max > MAX_RECENTLY_VIEWED {
            return Err(CoreError::InvalidSetting {
                name: "recently_viewed_max".to_string(),
                reason: format!("must be at most {MAX_RECENTLY_VIEWED}"),
            });
        }

        Ok(())
    }
}

impl Default for StorefrontSettings {
    fn default() -> Self {
        Self {
            shipping: ShippingPolicy::default(),
            recently_viewed_max: DEFAULT_MAX_ITEMS,
            roles: RoleDirectory::default(),
            display: DisplayVariant::default(),
        }
    }
}

// =============================================================================
// Storefront
// =============================================================================

#[derive(Debug, Clone)]
pub struct Storefront {
    cart: CartStore,
    wishlist: WishlistStore,
    recently_viewed: RecentlyViewedStore,
    auth: AuthStore,
    catalog: Catalog,
    display: DisplayVariant,
}

impl Storefront {
    /// Builds a storefront with an empty catalog.
    pub fn new(settings: StorefrontSettings) -> CoreResult<Self> {
        Self::with_catalog(settings, Catalog::default())
    }

    pub fn with_catalog(settings: StorefrontSettings, catalog: Catalog) -> CoreResult<Self> {
        settings.validate()?;

        tracing::debug!(
            recently_viewed_max = settings.recently_viewed_max,
            catalog_size = catalog.len(),
            "Storefront created"
        );

        Ok(Self {
            cart: CartStore::new(settings.shipping),
            wishlist: WishlistStore::new(),
            recently_viewed: RecentlyViewedStore::new(settings.recently_viewed_max),
            auth: AuthStore::new(settings.roles),
            catalog,
            display: settings.display,
        })
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn wishlist(&self) -> &WishlistStore {
        &self.wishlist
    }

    pub fn recently_viewed(&self) -> &RecentlyViewedStore {
        &self.recently_viewed
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn display(&self) -> DisplayVariant {
        self.display
    }

    // -------------------------------------------------------------------------
    // Cross-store actions
    // -------------------------------------------------------------------------

    /// Puts one unit of a saved product in the cart. The product stays in
    /// the wishlist. Returns `false` if it was not saved.
    pub fn add_wishlist_item_to_cart(&self, id: ProductId) -> bool {
        match self.wishlist.get(id) {
            Some(item) => self.cart.add_to_cart((&item).into()),
            None => false,
        }
    }

    /// Adds every saved product to the cart. Returns how many were added.
    pub fn add_all_wishlist_items_to_cart(&self) -> usize {
        self.wishlist
            .items()
            .iter()
            .filter(|item| self.cart.add_to_cart((*item).into()))
            .count()
    }

    /// Adds a catalog product to the cart by id.
    pub fn add_catalog_product_to_cart(&self, id: ProductId) -> CoreResult<()> {
        let product = self.catalog.require(id)?;
        self.cart.add_to_cart(product.to_cart_product());
        Ok(())
    }

    /// Records a product page visit and returns the product, if known.
    ///
    /// Unknown ids are not recorded, so they never take a recently-viewed slot.
    pub fn view_product(&self, id: ProductId) -> Option<&CatalogProduct> {
        let product = self.catalog.get(id)?;
        self.recently_viewed.add_item(id);
        Some(product)
    }

    /// The recently-viewed strip, resolved against this storefront's catalog.
    pub fn recently_viewed_products(&self) -> Vec<CatalogProduct> {
        self.recently_viewed.resolve(&self.catalog)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
