//! # Domain Types
//!
//! Product records shared by the storefront stores.
//!
//! ## One Record Per Store
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Product Records                                 │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CartProduct    │   │ WishlistProduct │   │ CatalogProduct  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  name           │   │  name           │   │  name           │       │
//! │  │  price          │   │  price          │   │  price          │       │
//! │  │  color?         │   │  image?         │   │  image          │       │
//! │  │  size?          │   │  category?      │   │  category       │       │
//! │  │  image?         │   │  color?         │   │  color          │       │
//! │  └─────────────────┘   └─────────────────┘   │  description    │       │
//! │                                              └─────────────────┘       │
//! │  Recently-viewed stores bare ProductIds and resolves them              │
//! │  against the Catalog on read.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every record is keyed by [`ProductId`]. No two entries in one store share
//! an id.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product Id
// =============================================================================

/// Stable product identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct ProductId(pub u64);

impl ProductId {
    #[inline]
    pub const fn new(id: u64) -> Self {
        ProductId(id)
    }

    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        ProductId(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Cart Product
// =============================================================================

/// What a product page hands to the cart.
///
/// `color` and `size` are optional here; the cart fills in defaults when the
/// line is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CartProduct {
    /// A product with no variant selected.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            color: None,
            size: None,
            image: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

// =============================================================================
// Wishlist Product
// =============================================================================

/// What a product card hands to the wishlist. Price is display data only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct WishlistProduct {
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

impl WishlistProduct {
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: None,
            category: None,
            color: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

// =============================================================================
// Catalog Product
// =============================================================================

/// A fully described product, as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub image: String,
    pub category: String,
    pub color: String,
    pub description: String,
}

impl CatalogProduct {
    /// The record the cart receives when this product is added without a
    /// size selection.
    pub fn to_cart_product(&self) -> CartProduct {
        CartProduct {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            color: Some(self.color.clone()),
            size: None,
            image: Some(self.image.clone()),
        }
    }

    pub fn to_wishlist_product(&self) -> WishlistProduct {
        WishlistProduct {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            image: Some(self.image.clone()),
            category: Some(self.category.clone()),
            color: Some(self.color.clone()),
        }
    }
}

// =============================================================================
// Display Variant
// =============================================================================

/// Visual theme for the product widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Theme {
    #[default]
    Classic,
    Luxury,
}

/// How a product collection is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Layout {
    #[default]
    Grid,
    Carousel,
}

/// Display configuration for the collection widgets.
///
/// The frontend picks its rendering from this value; nothing here renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DisplayVariant {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub layout: Layout,
}

// =============================================================================
// Unit Tests
// =============================================================================
