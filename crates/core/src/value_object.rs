//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**: two line items with the same fields or
/// two totals snapshots with the same figures are interchangeable. They are
/// replaced wholesale rather than patched field by field.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct TaxSplit {
///     cgst: Decimal,
///     sgst: Decimal,
///     igst: Decimal,
/// }
///
/// impl ValueObject for TaxSplit {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
