use serde::{Deserialize, Serialize};

use ledgerdash_core::{DomainError, DomainResult, PartyId};

/// Party kind: customer (sales journal) or supplier (purchase journal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyKind {
    Customer,
    Supplier,
}

impl PartyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartyKind::Customer => "customer",
            PartyKind::Supplier => "supplier",
        }
    }
}

/// A customer or supplier as shown in the counterparty picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterparty {
    pub id: PartyId,
    pub kind: PartyKind,
    /// Display name matched by the resolver.
    pub name: String,
    /// Free-text postal address; by convention the last comma segment is the state.
    pub address: String,
}

/// Read access to an ordered counterparty catalog.
pub trait CounterpartyCatalog {
    fn counterparties(&self) -> &[Counterparty];
}

impl<T: CounterpartyCatalog + ?Sized> CounterpartyCatalog for &T {
    fn counterparties(&self) -> &[Counterparty] {
        (**self).counterparties()
    }
}

/// In-memory catalog holding parties of a single kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryCounterpartyCatalog {
    kind: PartyKind,
    parties: Vec<Counterparty>,
}

impl InMemoryCounterpartyCatalog {
    pub fn new(kind: PartyKind) -> Self {
        Self {
            kind,
            parties: Vec::new(),
        }
    }

    pub fn from_parties(kind: PartyKind, parties: Vec<Counterparty>) -> DomainResult<Self> {
        let mut catalog = Self::new(kind);
        for party in parties {
            catalog.insert(party)?;
        }
        Ok(catalog)
    }

    pub fn kind(&self) -> PartyKind {
        self.kind
    }

    /// Invariant: every party in the catalog has the catalog's kind.
    pub fn insert(&mut self, party: Counterparty) -> DomainResult<()> {
        if party.kind != self.kind {
            return Err(DomainError::validation(format!(
                "{} {} cannot be added to a {} catalog",
                party.kind.as_str(),
                party.id,
                self.kind.as_str()
            )));
        }
        if party.name.trim().is_empty() {
            return Err(DomainError::validation(format!(
                "{} {} has an empty name",
                party.kind.as_str(),
                party.id
            )));
        }
        if self.parties.iter().any(|p| p.id == party.id) {
            return Err(DomainError::duplicate(format!("party id {}", party.id)));
        }
        self.parties.push(party);
        Ok(())
    }

    pub fn get(&self, id: &PartyId) -> Option<&Counterparty> {
        self.parties.iter().find(|p| &p.id == id)
    }
}

impl CounterpartyCatalog for InMemoryCounterpartyCatalog {
    fn counterparties(&self) -> &[Counterparty] {
        &self.parties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(code: &str, name: &str) -> Counterparty {
        Counterparty {
            id: code.parse().unwrap(),
            kind: PartyKind::Customer,
            name: name.to_string(),
            address: "12 Anna Salai, Chennai, Tamil Nadu".to_string(),
        }
    }

    #[test]
    fn insert_keeps_catalog_order() {
        let catalog = InMemoryCounterpartyCatalog::from_parties(
            PartyKind::Customer,
            vec![customer("C-2", "Zenith Traders"), customer("C-1", "Acme Corp")],
        )
        .unwrap();

        let names: Vec<&str> = catalog
            .counterparties()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Zenith Traders", "Acme Corp"]);
        assert!(catalog.get(&"C-1".parse().unwrap()).is_some());
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let mut catalog = InMemoryCounterpartyCatalog::new(PartyKind::Supplier);
        let err = catalog.insert(customer("C-1", "Acme Corp")).unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("supplier catalog") => {}
            _ => panic!("Expected Validation error for kind mismatch"),
        }
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut catalog = InMemoryCounterpartyCatalog::new(PartyKind::Customer);
        assert!(catalog.insert(customer("C-1", "   ")).is_err());
    }
}
