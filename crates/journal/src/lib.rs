//! Journal domain module: sales and purchase journal documents.
//!
//! A document owns an ordered list of line items and a totals snapshot that
//! is re-derived after every edit, splitting tax into CGST + SGST for supplies
//! inside the home state and IGST for everything else. Pure domain logic: no
//! IO, no UI state.

pub mod document;
pub mod line_item;
pub mod recalc;

pub use document::{
    AddItem, ApplyCounterparty, CounterpartyApplied, Document, DocumentHeader, DocumentId,
    HeaderChange, HeaderField, HeaderUpdated, JournalCommand, JournalEvent, JournalKind,
    JournalSettings, LineItemAdded, LineItemRemoved, LineItemUpdated, Purchase, PurchaseJournal,
    RemoveItem, Sales, SalesJournal, UpdateHeaderField, UpdateItem, place_of_supply_from_address,
};
pub use line_item::{LineField, LineItem, LineItemStore};
pub use recalc::{DocumentTotals, Jurisdiction, TaxPolicy, TaxSplit, item_tax, recalculate};
