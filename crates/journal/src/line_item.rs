use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgerdash_catalog::ProductCatalog;
use ledgerdash_core::{ProductId, ValueObject, coerce_non_negative};

/// Editable field of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineField {
    Product,
    Description,
    TaxCode,
    Quantity,
    UnitRate,
    TaxRatePercent,
}

/// One row of a journal document.
///
/// `amount` is private and always equals `quantity × unit_rate`: every way of
/// building or editing an item goes through [`LineItem::recomputed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    product_ref: Option<ProductId>,
    description: String,
    tax_code: String,
    quantity: Decimal,
    unit_rate: Decimal,
    amount: Decimal,
    tax_rate_percent: Decimal,
}

impl ValueObject for LineItem {}

impl LineItem {
    /// A blank row: quantity 1, rate 0, the given tax rate.
    pub fn blank(tax_rate_percent: Decimal) -> Self {
        Self {
            product_ref: None,
            description: String::new(),
            tax_code: String::new(),
            quantity: Decimal::ONE,
            unit_rate: Decimal::ZERO,
            amount: Decimal::ZERO,
            tax_rate_percent,
        }
    }

    /// A free-text row with explicit figures. Negative figures clamp to zero.
    pub fn free_text(
        description: impl Into<String>,
        quantity: Decimal,
        unit_rate: Decimal,
        tax_rate_percent: Decimal,
    ) -> Self {
        Self {
            product_ref: None,
            description: description.into(),
            tax_code: String::new(),
            quantity: quantity.max(Decimal::ZERO),
            unit_rate: unit_rate.max(Decimal::ZERO),
            amount: Decimal::ZERO,
            tax_rate_percent: tax_rate_percent.max(Decimal::ZERO),
        }
        .recomputed()
    }

    pub fn product_ref(&self) -> Option<&ProductId> {
        self.product_ref.as_ref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tax_code(&self) -> &str {
        &self.tax_code
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn unit_rate(&self) -> Decimal {
        self.unit_rate
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn tax_rate_percent(&self) -> Decimal {
        self.tax_rate_percent
    }

    /// Returns a copy of this item with `field` set to `value`.
    ///
    /// Selecting a product that the catalog knows overwrites description, tax
    /// code and rate, even if they were edited by hand. Numeric fields coerce
    /// non-numeric or negative text to zero. `amount` is recomputed last.
    pub fn edited<P: ProductCatalog + ?Sized>(
        &self,
        field: LineField,
        value: &str,
        catalog: &P,
    ) -> LineItem {
        let mut next = self.clone();
        match field {
            LineField::Product => next.select_product(value, catalog),
            LineField::Description => next.description = value.to_string(),
            LineField::TaxCode => next.tax_code = value.to_string(),
            LineField::Quantity => next.quantity = coerce_non_negative(value),
            LineField::UnitRate => next.unit_rate = coerce_non_negative(value),
            LineField::TaxRatePercent => next.tax_rate_percent = coerce_non_negative(value),
        }
        next.recomputed()
    }

    fn select_product<P: ProductCatalog + ?Sized>(&mut self, value: &str, catalog: &P) {
        let Ok(id) = value.parse::<ProductId>() else {
            self.product_ref = None;
            return;
        };

        match catalog.lookup(&id) {
            Some(product) => {
                self.description = product.name;
                self.tax_code = product.tax_code;
                self.unit_rate = product.rate.max(Decimal::ZERO);
            }
            None => {
                tracing::debug!(product = %id, "product not in catalog; keeping line fields");
            }
        }
        self.product_ref = Some(id);
    }

    fn recomputed(mut self) -> Self {
        self.amount = self.quantity.saturating_mul(self.unit_rate);
        self
    }
}

/// Ordered line items of one document, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LineItemStore {
    items: Vec<LineItem>,
}

impl LineItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&LineItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append an item at the end.
    pub fn push(&mut self, item: LineItem) {
        self.items.push(item);
    }

    /// Append a blank item at the end.
    pub fn add_item(&mut self, tax_rate_percent: Decimal) {
        self.push(LineItem::blank(tax_rate_percent));
    }

    /// Remove the item at `index`; out of range is a no-op.
    pub fn remove_item(&mut self, index: usize) -> Option<LineItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            tracing::debug!(index, len = self.items.len(), "remove out of range ignored");
            None
        }
    }

    /// Swap in a whole item at `index`; out of range is a no-op.
    ///
    /// Multi-field edits (catalog overwrite) land through here in one step.
    pub fn replace(&mut self, index: usize, item: LineItem) -> bool {
        match self.items.get_mut(index) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    /// Edit one field of the item at `index`; out of range is a no-op.
    pub fn update_item<P: ProductCatalog + ?Sized>(
        &mut self,
        index: usize,
        field: LineField,
        value: &str,
        catalog: &P,
    ) -> bool {
        let Some(next) = self.items.get(index).map(|item| item.edited(field, value, catalog))
        else {
            tracing::debug!(index, len = self.items.len(), "update out of range ignored");
            return false;
        };
        self.replace(index, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerdash_catalog::{InMemoryProductCatalog, Product};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn catalog() -> InMemoryProductCatalog {
        InMemoryProductCatalog::from_products(vec![
            Product {
                id: "P-1".parse().unwrap(),
                name: "A4 Paper Ream".to_string(),
                tax_code: "4802".to_string(),
                rate: dec!(240),
            },
            Product {
                id: "P-2".parse().unwrap(),
                name: "Toner Cartridge".to_string(),
                tax_code: "8443".to_string(),
                rate: dec!(1800),
            },
        ])
        .unwrap()
    }

    #[test]
    fn blank_item_defaults() {
        let item = LineItem::blank(dec!(18));
        assert_eq!(item.quantity(), Decimal::ONE);
        assert_eq!(item.unit_rate(), Decimal::ZERO);
        assert_eq!(item.amount(), Decimal::ZERO);
        assert_eq!(item.tax_rate_percent(), dec!(18));
        assert!(item.product_ref().is_none());
    }

    #[test]
    fn quantity_and_rate_edits_recompute_amount() {
        let catalog = catalog();
        let item = LineItem::blank(dec!(18))
            .edited(LineField::Quantity, "2", &catalog)
            .edited(LineField::UnitRate, "100", &catalog);
        assert_eq!(item.amount(), dec!(200));
    }

    #[test]
    fn non_numeric_quantity_reads_as_zero() {
        let catalog = catalog();
        let item = LineItem::blank(dec!(18))
            .edited(LineField::UnitRate, "100", &catalog)
            .edited(LineField::Quantity, "two", &catalog);
        assert_eq!(item.quantity(), Decimal::ZERO);
        assert_eq!(item.amount(), Decimal::ZERO);
    }

    #[test]
    fn product_selection_overwrites_manual_edits() {
        let catalog = catalog();
        let item = LineItem::blank(dec!(18))
            .edited(LineField::Description, "hand typed", &catalog)
            .edited(LineField::UnitRate, "5", &catalog)
            .edited(LineField::Quantity, "3", &catalog)
            .edited(LineField::Product, "P-1", &catalog);

        assert_eq!(item.description(), "A4 Paper Ream");
        assert_eq!(item.tax_code(), "4802");
        assert_eq!(item.unit_rate(), dec!(240));
        assert_eq!(item.amount(), dec!(720));

        let item = item.edited(LineField::Product, "P-2", &catalog);
        assert_eq!(item.description(), "Toner Cartridge");
        assert_eq!(item.amount(), dec!(5400));
    }

    #[test]
    fn unknown_product_keeps_fields() {
        let catalog = catalog();
        let before = LineItem::free_text("Courier", dec!(1), dec!(90), dec!(18));
        let after = before.edited(LineField::Product, "P-404", &catalog);

        assert_eq!(after.product_ref().map(|p| p.as_str()), Some("P-404"));
        assert_eq!(after.description(), "Courier");
        assert_eq!(after.unit_rate(), dec!(90));
        assert_eq!(after.amount(), dec!(90));
    }

    #[test]
    fn blank_product_clears_reference() {
        let catalog = catalog();
        let item = LineItem::blank(dec!(18))
            .edited(LineField::Product, "P-1", &catalog)
            .edited(LineField::Product, "", &catalog);
        assert!(item.product_ref().is_none());
        assert_eq!(item.description(), "A4 Paper Ream");
    }

    #[test]
    fn store_remove_out_of_range_is_noop() {
        let mut store = LineItemStore::new();
        store.push(LineItem::free_text("a", dec!(1), dec!(1), dec!(18)));
        store.push(LineItem::free_text("b", dec!(1), dec!(2), dec!(18)));

        assert!(store.remove_item(7).is_none());
        assert_eq!(store.len(), 2);
        assert_eq!(store.items()[0].description(), "a");
        assert_eq!(store.items()[1].description(), "b");

        assert!(store.remove_item(0).is_some());
        assert_eq!(store.items()[0].description(), "b");
        assert!(store.remove_item(0).is_some());
        assert!(store.is_empty());
    }

    #[test]
    fn store_update_out_of_range_is_noop() {
        let catalog = catalog();
        let mut store = LineItemStore::new();
        store.add_item(dec!(18));
        assert!(!store.update_item(3, LineField::Quantity, "9", &catalog));
        assert_eq!(store.items()[0].quantity(), Decimal::ONE);
        assert!(store.update_item(0, LineField::Quantity, "9", &catalog));
        assert_eq!(store.items()[0].quantity(), dec!(9));
    }

    fn field_strategy() -> impl Strategy<Value = LineField> {
        prop_oneof![
            Just(LineField::Product),
            Just(LineField::Description),
            Just(LineField::TaxCode),
            Just(LineField::Quantity),
            Just(LineField::UnitRate),
            Just(LineField::TaxRatePercent),
        ]
    }

    fn value_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            (0u32..10_000).prop_map(|n| n.to_string()),
            (0u32..100_000, 0u32..100).prop_map(|(a, b)| format!("{a}.{b:02}")),
            Just("P-1".to_string()),
            Just("P-2".to_string()),
            Just("P-404".to_string()),
            Just("".to_string()),
            Just("abc".to_string()),
            Just("-3".to_string()),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: after any edit sequence, amount == quantity × unit_rate.
        #[test]
        fn amount_tracks_quantity_times_rate(
            edits in prop::collection::vec((field_strategy(), value_strategy()), 0..30)
        ) {
            let catalog = catalog();
            let mut item = LineItem::blank(dec!(18));
            for (field, value) in &edits {
                item = item.edited(*field, value, &catalog);
                prop_assert_eq!(item.amount(), item.quantity() * item.unit_rate());
                prop_assert!(!item.quantity().is_sign_negative());
                prop_assert!(!item.unit_rate().is_sign_negative());
            }
        }
    }
}
