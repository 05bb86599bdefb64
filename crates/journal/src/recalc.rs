//! Totals derivation for a journal document.
//!
//! `recalculate` is pure: same items + same place of supply + same policy give
//! identical totals. Documents call it after every applied event; nothing
//! patches totals incrementally.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgerdash_core::{DomainError, DomainResult, ValueObject, percent_of};

use crate::line_item::LineItem;

/// Whether a supply stays inside the business's registered state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Jurisdiction {
    /// CGST + SGST, split evenly.
    Intrastate,
    /// IGST only.
    Interstate,
}

/// Tax policy: the registered home state of the business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxPolicy {
    home_state: String,
}

impl TaxPolicy {
    pub fn new(home_state: impl Into<String>) -> DomainResult<Self> {
        let home_state = home_state.into().trim().to_string();
        if home_state.is_empty() {
            return Err(DomainError::validation("home state must not be empty"));
        }
        Ok(Self { home_state })
    }

    pub fn home_state(&self) -> &str {
        &self.home_state
    }

    /// Classify a place of supply against the home state.
    ///
    /// Comparison is trimmed and case-insensitive. A blank place of supply is
    /// never treated as the home state.
    pub fn classify(&self, place_of_supply: &str) -> Jurisdiction {
        let place = normalize(place_of_supply);
        if !place.is_empty() && place == normalize(&self.home_state) {
            Jurisdiction::Intrastate
        } else {
            Jurisdiction::Interstate
        }
    }
}

impl Default for TaxPolicy {
    fn default() -> Self {
        Self {
            home_state: "Tamil Nadu".to_string(),
        }
    }
}

fn normalize(state: &str) -> String {
    state.trim().to_lowercase()
}

/// Tax owed on one line item, by component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaxSplit {
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
}

impl ValueObject for TaxSplit {}

impl TaxSplit {
    pub fn total(&self) -> Decimal {
        self.cgst.saturating_add(self.sgst).saturating_add(self.igst)
    }
}

/// Decimal places kept on intrastate tax before it is halved.
const SPLIT_SCALE: u32 = 27;

/// Tax on a single item: `amount × rate / 100`, all IGST or halved into CGST/SGST.
pub fn item_tax(item: &LineItem, jurisdiction: Jurisdiction) -> TaxSplit {
    let tax = percent_of(item.amount(), item.tax_rate_percent());
    match jurisdiction {
        Jurisdiction::Interstate => TaxSplit {
            igst: tax,
            ..TaxSplit::default()
        },
        Jurisdiction::Intrastate => {
            // Halving a 28th-place digit is not representable; hold the tax to
            // 27 places first so both halves are exact.
            let tax = tax.round_dp(SPLIT_SCALE);
            let cgst = tax / Decimal::TWO;
            TaxSplit {
                cgst,
                sgst: tax - cgst,
                igst: Decimal::ZERO,
            }
        }
    }
}

/// Document-level totals. Only [`recalculate`] builds a non-zero one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentTotals {
    jurisdiction: Option<Jurisdiction>,
    sub_total: Decimal,
    cgst: Decimal,
    sgst: Decimal,
    igst: Decimal,
    grand_total: Decimal,
}

impl ValueObject for DocumentTotals {}

impl DocumentTotals {
    /// Jurisdiction used for the split; `None` only for the default snapshot.
    pub fn jurisdiction(&self) -> Option<Jurisdiction> {
        self.jurisdiction
    }

    pub fn sub_total(&self) -> Decimal {
        self.sub_total
    }

    pub fn cgst(&self) -> Decimal {
        self.cgst
    }

    pub fn sgst(&self) -> Decimal {
        self.sgst
    }

    pub fn igst(&self) -> Decimal {
        self.igst
    }

    /// Saturates like the components themselves.
    pub fn total_tax(&self) -> Decimal {
        self.cgst.saturating_add(self.sgst).saturating_add(self.igst)
    }

    pub fn grand_total(&self) -> Decimal {
        self.grand_total
    }
}

/// Derive totals from scratch.
pub fn recalculate(items: &[LineItem], place_of_supply: &str, policy: &TaxPolicy) -> DocumentTotals {
    let jurisdiction = policy.classify(place_of_supply);

    let mut sub_total = Decimal::ZERO;
    let mut tax = TaxSplit::default();
    for item in items {
        sub_total = sub_total.saturating_add(item.amount());
        let split = item_tax(item, jurisdiction);
        tax.cgst = tax.cgst.saturating_add(split.cgst);
        tax.sgst = tax.sgst.saturating_add(split.sgst);
        tax.igst = tax.igst.saturating_add(split.igst);
    }

    let grand_total = sub_total
        .saturating_add(tax.cgst)
        .saturating_add(tax.sgst)
        .saturating_add(tax.igst);

    DocumentTotals {
        jurisdiction: Some(jurisdiction),
        sub_total,
        cgst: tax.cgst,
        sgst: tax.sgst,
        igst: tax.igst,
        grand_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn policy() -> TaxPolicy {
        TaxPolicy::new("Tamil Nadu").unwrap()
    }

    fn two_by_hundred() -> Vec<LineItem> {
        vec![LineItem::free_text("Widget", dec!(2), dec!(100), dec!(18))]
    }

    #[test]
    fn intrastate_splits_evenly() {
        let totals = recalculate(&two_by_hundred(), "Tamil Nadu", &policy());
        assert_eq!(totals.sub_total(), dec!(200));
        assert_eq!(totals.cgst(), dec!(18));
        assert_eq!(totals.sgst(), dec!(18));
        assert_eq!(totals.igst(), Decimal::ZERO);
        assert_eq!(totals.grand_total(), dec!(236));
        assert_eq!(totals.jurisdiction(), Some(Jurisdiction::Intrastate));
    }

    #[test]
    fn interstate_is_all_igst() {
        let totals = recalculate(&two_by_hundred(), "Karnataka", &policy());
        assert_eq!(totals.cgst(), Decimal::ZERO);
        assert_eq!(totals.sgst(), Decimal::ZERO);
        assert_eq!(totals.igst(), dec!(36));
        assert_eq!(totals.grand_total(), dec!(236));
    }

    #[test]
    fn blank_place_of_supply_is_interstate() {
        let totals = recalculate(&two_by_hundred(), "", &policy());
        assert_eq!(totals.igst(), dec!(36));
        assert_eq!(totals.cgst(), Decimal::ZERO);
        assert_eq!(totals.sgst(), Decimal::ZERO);
        assert_eq!(totals.jurisdiction(), Some(Jurisdiction::Interstate));
    }

    #[test]
    fn home_state_match_ignores_case_and_padding() {
        assert_eq!(policy().classify("  tamil NADU "), Jurisdiction::Intrastate);
        assert_eq!(policy().classify("Tamil"), Jurisdiction::Interstate);
        assert_eq!(policy().classify("   "), Jurisdiction::Interstate);
    }

    #[test]
    fn empty_document_is_all_zero() {
        let totals = recalculate(&[], "Tamil Nadu", &policy());
        assert_eq!(totals.sub_total(), Decimal::ZERO);
        assert_eq!(totals.cgst(), Decimal::ZERO);
        assert_eq!(totals.sgst(), Decimal::ZERO);
        assert_eq!(totals.igst(), Decimal::ZERO);
        assert_eq!(totals.grand_total(), Decimal::ZERO);
    }

    #[test]
    fn per_item_rates_are_respected() {
        let items = vec![
            LineItem::free_text("Books", dec!(1), dec!(500), dec!(0)),
            LineItem::free_text("Pens", dec!(10), dec!(12.50), dec!(12)),
            LineItem::free_text("Laptop", dec!(1), dec!(40000), dec!(28)),
        ];
        let totals = recalculate(&items, "Kerala", &policy());
        assert_eq!(totals.sub_total(), dec!(40625));
        assert_eq!(totals.igst(), dec!(15.00) + dec!(11200));
        assert_eq!(totals.grand_total(), dec!(40625) + dec!(11215));
    }

    #[test]
    fn odd_tax_halves_still_sum_to_item_tax() {
        let item = LineItem::free_text("Odd", dec!(1), dec!(0.01), dec!(5));
        let split = item_tax(&item, Jurisdiction::Intrastate);
        assert_eq!(split.cgst + split.sgst, dec!(0.0005));
        assert_eq!(split.cgst, split.sgst);
    }

    #[test]
    fn smallest_representable_tax_still_splits_evenly() {
        let item = LineItem::free_text("Dust", Decimal::new(1, 28), Decimal::ONE, dec!(100));
        let split = item_tax(&item, Jurisdiction::Intrastate);
        assert_eq!(split.cgst, split.sgst);

        let item = LineItem::free_text("Dust", Decimal::new(2, 27), Decimal::ONE, dec!(100));
        let split = item_tax(&item, Jurisdiction::Intrastate);
        assert_eq!(split.cgst, Decimal::new(1, 27));
        assert_eq!(split.sgst, Decimal::new(1, 27));
    }

    #[test]
    fn saturated_totals_report_tax_without_overflow() {
        let items: Vec<LineItem> = (0..300)
            .map(|_| LineItem::free_text("Bulk", Decimal::MAX, Decimal::MAX, dec!(18)))
            .collect();
        let totals = recalculate(&items, "Tamil Nadu", &policy());
        assert_eq!(totals.cgst(), Decimal::MAX);
        assert_eq!(totals.sgst(), Decimal::MAX);
        assert_eq!(totals.total_tax(), Decimal::MAX);
        assert_eq!(totals.grand_total(), Decimal::MAX);

        let split = TaxSplit {
            cgst: Decimal::MAX,
            sgst: Decimal::MAX,
            igst: Decimal::ZERO,
        };
        assert_eq!(split.total(), Decimal::MAX);
    }

    #[test]
    fn blank_home_state_is_rejected() {
        assert!(TaxPolicy::new("  ").is_err());
    }

    fn item_strategy() -> impl Strategy<Value = LineItem> {
        (0u32..1_000, 0u32..1_000_000, 0u32..=28).prop_map(|(qty, paise, rate)| {
            LineItem::free_text(
                "item",
                Decimal::from(qty),
                Decimal::new(i64::from(paise), 2),
                Decimal::from(rate),
            )
        })
    }

    fn place_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("Tamil Nadu".to_string()),
            Just(" tamil nadu".to_string()),
            Just("Karnataka".to_string()),
            Just("".to_string()),
            "[A-Za-z ]{0,12}",
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: sub_total is the sum of amounts and grand_total adds every tax component.
        #[test]
        fn totals_are_consistent(
            items in prop::collection::vec(item_strategy(), 0..12),
            place in place_strategy()
        ) {
            let totals = recalculate(&items, &place, &policy());
            let sum: Decimal = items.iter().map(|i| i.amount()).sum();
            prop_assert_eq!(totals.sub_total(), sum);
            prop_assert_eq!(
                totals.grand_total(),
                totals.sub_total() + totals.cgst() + totals.sgst() + totals.igst()
            );
        }

        /// Property: tax goes entirely to IGST or evenly to CGST/SGST, never both.
        #[test]
        fn split_is_exclusive(
            items in prop::collection::vec(item_strategy(), 1..12),
            place in place_strategy()
        ) {
            let jurisdiction = policy().classify(&place);
            for item in &items {
                let split = item_tax(item, jurisdiction);
                let tax = item.amount() * item.tax_rate_percent() / Decimal::ONE_HUNDRED;
                match jurisdiction {
                    Jurisdiction::Interstate => {
                        prop_assert_eq!(split.igst, tax);
                        prop_assert!(split.cgst.is_zero() && split.sgst.is_zero());
                    }
                    Jurisdiction::Intrastate => {
                        prop_assert!(split.igst.is_zero());
                        prop_assert_eq!(split.cgst, split.sgst);
                        prop_assert_eq!(split.cgst + split.sgst, tax);
                    }
                }
            }
        }

        /// Property: recalculation is idempotent.
        #[test]
        fn recalculation_is_idempotent(
            items in prop::collection::vec(item_strategy(), 0..12),
            place in place_strategy()
        ) {
            let first = recalculate(&items, &place, &policy());
            let second = recalculate(&items, &place, &policy());
            prop_assert_eq!(first, second);
        }
    }
}
