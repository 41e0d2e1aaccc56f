//! # debuti-core: Pure Storefront Logic
//!
//! The non-visual heart of the DebutiStyle storefront: observable stores for
//! the cart, wishlist and recently-viewed strip, integer money, the role and
//! permission model, and the offline shopping assistant.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Debuti Storefront Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Storefront UI (TypeScript)                   │   │
//! │  │   Product page ──► Bag drawer ──► Wishlist ──► Chat widget      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ subscribe / snapshot                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ debuti-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   store   │  │   cart    │  │ wishlist  │  │  recently │  │   │
//! │  │   │ observers │  │ shipping  │  │  de-dup   │  │   viewed  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   auth    │  │ assistant │  │  catalog  │  │   money   │  │   │
//! │  │   │  roles    │  │  canned   │  │  lookups  │  │   cents   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                 │                                   │                   │
//! │  ┌──────────────▼──────────────┐    ┌───────────────▼──────────────┐   │
//! │  │  debuti-db (session slot)   │    │  debuti-chat (POST /api/chat)│   │
//! │  └─────────────────────────────┘    └──────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`store`] - Generic observable collection
//! - [`cart`] - Cart lines, shipping policy, totals
//! - [`wishlist`] - Saved products
//! - [`recently_viewed`] - Bounded view history
//! - [`catalog`] - Product lookups
//! - [`auth`] - Roles, permissions, mock login, admin guard
//! - [`assistant`] - Canned replies and the conversation log
//! - [`storefront`] - Composition root
//! - [`money`] - Integer money (no floating point!)
//! - [`types`] - Product records
//! - [`error`] - Domain error types
//! - [`validation`] - Input rules
//!
//! ## Example Usage
//!
//! ```rust
//! use debuti_core::{CartProduct, Money, Storefront, StorefrontSettings};
//!
//! let shop = Storefront::new(StorefrontSettings::default()).unwrap();
//! shop.cart().add_to_cart(CartProduct::new(1u64, "Linen Shirt", Money::from_cents(1000)));
//! shop.cart().add_to_cart(CartProduct::new(1u64, "Linen Shirt", Money::from_cents(1000)));
//!
//! let totals = shop.cart().totals();
//! assert_eq!(totals.subtotal.cents(), 2000);
//! assert_eq!(totals.shipping.cents(), 499); // under the $50 threshold
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod assistant;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod recently_viewed;
pub mod store;
pub mod storefront;
pub mod types;
pub mod validation;
pub mod wishlist;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use auth::{AdminAccess, AuthStore, Permission, Role, RoleDirectory, User};
pub use cart::{CartItem, CartStore, CartTotals, ShippingPolicy};
pub use catalog::Catalog;
pub use error::{AuthError, CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use recently_viewed::RecentlyViewedStore;
pub use store::{Mutation, ObservableStore, Unsubscribe};
pub use storefront::{Storefront, StorefrontSettings};
pub use types::*;
pub use wishlist::{WishlistItem, WishlistStore};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Longest chat message accepted from a shopper, in characters.
pub const MAX_CHAT_MESSAGE_LEN: usize = 2000;
