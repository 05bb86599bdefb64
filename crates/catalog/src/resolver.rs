//! Counterparty search for the journal forms' party picker.

use serde::Serialize;

use crate::party::{Counterparty, CounterpartyCatalog};

/// Result of a counterparty search.
///
/// `Inactive` (blank query, picker closed) is distinct from `Matches(vec![])`
/// (picker open, nothing found).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "matches", rename_all = "snake_case")]
pub enum SearchOutcome {
    Inactive,
    Matches(Vec<Counterparty>),
}

impl SearchOutcome {
    pub fn is_active(&self) -> bool {
        matches!(self, SearchOutcome::Matches(_))
    }

    pub fn matches(&self) -> &[Counterparty] {
        match self {
            SearchOutcome::Inactive => &[],
            SearchOutcome::Matches(found) => found,
        }
    }
}

/// Case-insensitive substring search over a counterparty catalog.
#[derive(Debug, Clone)]
pub struct CounterpartyResolver<C> {
    catalog: C,
}

impl<C: CounterpartyCatalog> CounterpartyResolver<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Search display names; catalog order is preserved. Surrounding
    /// whitespace in the query is ignored.
    pub fn search(&self, query: &str) -> SearchOutcome {
        let query = query.trim();
        if query.is_empty() {
            return SearchOutcome::Inactive;
        }

        let needle = query.to_lowercase();
        let found: Vec<Counterparty> = self
            .catalog
            .counterparties()
            .iter()
            .filter(|party| party.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        tracing::debug!(query, matches = found.len(), "counterparty search");
        SearchOutcome::Matches(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::party::{InMemoryCounterpartyCatalog, PartyKind};
    use proptest::prelude::*;

    fn catalog() -> InMemoryCounterpartyCatalog {
        let parties = [
            ("C-1", "Secure Finance Corp.", "5 MG Road, Bengaluru, Karnataka"),
            ("C-2", "Sunrise Textiles", "Plot 9, Tiruppur, Tamil Nadu"),
            ("C-3", "Blue Ocean Exports", "Harbour Rd, Kochi, Kerala"),
        ];
        InMemoryCounterpartyCatalog::from_parties(
            PartyKind::Customer,
            parties
                .iter()
                .map(|(id, name, address)| Counterparty {
                    id: id.parse().unwrap(),
                    kind: PartyKind::Customer,
                    name: name.to_string(),
                    address: address.to_string(),
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn empty_query_is_inactive() {
        let resolver = CounterpartyResolver::new(catalog());
        assert_eq!(resolver.search(""), SearchOutcome::Inactive);
        assert_eq!(resolver.search("   "), SearchOutcome::Inactive);
        assert!(!resolver.search("").is_active());
    }

    #[test]
    fn no_match_is_active_and_empty() {
        let resolver = CounterpartyResolver::new(catalog());
        let outcome = resolver.search("zzz");
        assert!(outcome.is_active());
        assert!(outcome.matches().is_empty());
    }

    #[test]
    fn match_is_case_insensitive_substring_in_catalog_order() {
        let resolver = CounterpartyResolver::new(catalog());
        let outcome = resolver.search("S");
        let names: Vec<&str> = outcome.matches().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Secure Finance Corp.", "Sunrise Textiles", "Blue Ocean Exports"]
        );

        let outcome = resolver.search("TEXT");
        assert_eq!(outcome.matches().len(), 1);
        assert_eq!(outcome.matches()[0].name, "Sunrise Textiles");
    }

    #[test]
    fn padded_query_matches_like_trimmed_one() {
        let resolver = CounterpartyResolver::new(catalog());
        assert_eq!(resolver.search("  sunrise "), resolver.search("sunrise"));
        assert_eq!(resolver.search(" sunrise").matches().len(), 1);
    }

    proptest! {
        /// Property: every match contains the trimmed query, case-insensitively.
        #[test]
        fn every_match_contains_query(query in "[a-zA-Z .]{1,6}") {
            let resolver = CounterpartyResolver::new(catalog());
            let outcome = resolver.search(&query);
            for party in outcome.matches() {
                prop_assert!(party.name.to_lowercase().contains(&query.trim().to_lowercase()));
            }
        }
    }
}
