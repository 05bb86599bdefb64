//! Reference data bundle loaded by the host (customers, suppliers, products).

use serde::{Deserialize, Serialize};

use ledgerdash_core::{DomainResult, PartyId};

use crate::party::{Counterparty, InMemoryCounterpartyCatalog, PartyKind};
use crate::product::{InMemoryProductCatalog, Product};

/// Party entry as written in a reference file; the kind comes from the list it is in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyEntry {
    pub id: PartyId,
    pub name: String,
    #[serde(default)]
    pub address: String,
}

/// Serialized reference data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub customers: Vec<PartyEntry>,
    #[serde(default)]
    pub suppliers: Vec<PartyEntry>,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Validated catalogs built from [`ReferenceData`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalogs {
    pub products: InMemoryProductCatalog,
    pub customers: InMemoryCounterpartyCatalog,
    pub suppliers: InMemoryCounterpartyCatalog,
}

impl Default for Catalogs {
    fn default() -> Self {
        Self {
            products: InMemoryProductCatalog::new(),
            customers: InMemoryCounterpartyCatalog::new(PartyKind::Customer),
            suppliers: InMemoryCounterpartyCatalog::new(PartyKind::Supplier),
        }
    }
}

impl ReferenceData {
    pub fn into_catalogs(self) -> DomainResult<Catalogs> {
        Ok(Catalogs {
            products: InMemoryProductCatalog::from_products(self.products)?,
            customers: parties(PartyKind::Customer, self.customers)?,
            suppliers: parties(PartyKind::Supplier, self.suppliers)?,
        })
    }
}

fn parties(kind: PartyKind, entries: Vec<PartyEntry>) -> DomainResult<InMemoryCounterpartyCatalog> {
    InMemoryCounterpartyCatalog::from_parties(
        kind,
        entries
            .into_iter()
            .map(|entry| Counterparty {
                id: entry.id,
                kind,
                name: entry.name,
                address: entry.address,
            })
            .collect(),
    )
}
