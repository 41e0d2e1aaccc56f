//! # Catalog
//!
//! Read-only product listing used to turn stored ids back into full product
//! records (the recently-viewed strip stores ids only).

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::types::{CatalogProduct, ProductId};

/// Products in listing order, indexed by id.
///
/// When two products share an id the first one wins.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<CatalogProduct>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    pub fn new(products: impl IntoIterator<Item = CatalogProduct>) -> Self {
        let mut catalog = Catalog::default();
        for product in products {
            if catalog.index.contains_key(&product.id) {
                tracing::warn!(product_id = %product.id, "Duplicate catalog id ignored");
                continue;
            }
            catalog.index.insert(product.id, catalog.products.len());
            catalog.products.push(product);
        }
        catalog
    }

    pub fn get(&self, id: ProductId) -> Option<&CatalogProduct> {
        self.index.get(&id).map(|&position| &self.products[position])
    }

    /// Like [`Catalog::get`], for callers that must have the product.
    pub fn require(&self, id: ProductId) -> CoreResult<&CatalogProduct> {
        self.get(id).ok_or(CoreError::ProductNotFound(id.get()))
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn products(&self) -> &[CatalogProduct] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl FromIterator<CatalogProduct> for Catalog {
    fn from_iter<I: IntoIterator<Item = CatalogProduct>>(iter: I) -> Self {
        Catalog::new(iter)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_lookup() {
        let catalog = sample_catalog();
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.get(ProductId(4)).map(|p| p.name.as_str()), Some("Leather Ankle Boots"));
        assert!(catalog.get(ProductId(99)).is_none());
        assert!(matches!(
            catalog.require(ProductId(99)),
            Err(CoreError::ProductNotFound(99))
        ));
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let catalog: Catalog = [
            product(1, "First", 100, "A"),
            product(1, "Second", 200, "B"),
        ]
        .into_iter()
        .collect();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.require(ProductId(1)).unwrap().name, "First");
    }
}
