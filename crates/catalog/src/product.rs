use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgerdash_core::{DomainError, DomainResult, ProductId};

/// Catalog entry for a product or service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// HSN/SAC code copied onto line items.
    pub tax_code: String,
    /// Default unit rate.
    pub rate: Decimal,
}

/// Product lookup by identifier.
pub trait ProductCatalog {
    fn lookup(&self, id: &ProductId) -> Option<Product>;
}

impl<T: ProductCatalog + ?Sized> ProductCatalog for &T {
    fn lookup(&self, id: &ProductId) -> Option<Product> {
        (**self).lookup(id)
    }
}

impl<T: ProductCatalog + ?Sized> ProductCatalog for Arc<T> {
    fn lookup(&self, id: &ProductId) -> Option<Product> {
        (**self).lookup(id)
    }
}

/// Ordered in-memory product catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryProductCatalog {
    products: Vec<Product>,
}

impl InMemoryProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog, rejecting duplicate ids and negative rates.
    pub fn from_products(products: Vec<Product>) -> DomainResult<Self> {
        let mut catalog = Self::new();
        for product in products {
            catalog.insert(product)?;
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, product: Product) -> DomainResult<()> {
        if product.rate < Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "product {} has a negative rate",
                product.id
            )));
        }
        if self.products.iter().any(|p| p.id == product.id) {
            return Err(DomainError::duplicate(format!("product id {}", product.id)));
        }
        self.products.push(product);
        Ok(())
    }

    /// Products in catalog order (for the line-item product picker).
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductCatalog for InMemoryProductCatalog {
    fn lookup(&self, id: &ProductId) -> Option<Product> {
        self.products.iter().find(|p| &p.id == id).cloned()
    }
}
