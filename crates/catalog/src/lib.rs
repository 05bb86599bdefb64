//! Reference catalogs (products, customers, suppliers) and the counterparty
//! resolver used by the journal forms.
//!
//! Catalogs are collaborators: the journal engine only sees them through the
//! [`ProductCatalog`] and [`CounterpartyCatalog`] traits.

pub mod party;
pub mod product;
pub mod reference;
pub mod resolver;

pub use party::{Counterparty, CounterpartyCatalog, InMemoryCounterpartyCatalog, PartyKind};
pub use product::{InMemoryProductCatalog, Product, ProductCatalog};
pub use reference::{Catalogs, PartyEntry, ReferenceData};
pub use resolver::{CounterpartyResolver, SearchOutcome};
