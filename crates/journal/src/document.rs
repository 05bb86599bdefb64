use core::convert::Infallible;
use core::marker::PhantomData;

use chrono::{DateTime, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgerdash_catalog::{Counterparty, PartyKind, ProductCatalog};
use ledgerdash_core::{Aggregate, AggregateId, AggregateRoot};
use ledgerdash_events::Event;

use crate::line_item::{LineField, LineItem, LineItemStore};
use crate::recalc::{DocumentTotals, TaxPolicy, recalculate};

/// Journal document identifier (one per open form).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub AggregateId);

impl DocumentId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// What distinguishes a sales journal from a purchase journal.
pub trait JournalKind: Clone + Copy + core::fmt::Debug + Default + Send + Sync + 'static {
    /// Kind of counterparty this journal accepts.
    const PARTY_KIND: PartyKind;
    /// Whether a selected counterparty's address also fills the secondary address.
    const COPIES_SECONDARY_ADDRESS: bool;
    const NUMBER_PREFIX: &'static str;
    const LABEL: &'static str;

    /// Document number for the `seq`-th document of this kind, e.g. `INV-007`.
    fn document_number(seq: u32) -> String {
        format!("{}-{seq:03}", Self::NUMBER_PREFIX)
    }
}

/// Sales journal: customer, billing + shipping address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sales;

impl JournalKind for Sales {
    const PARTY_KIND: PartyKind = PartyKind::Customer;
    const COPIES_SECONDARY_ADDRESS: bool = true;
    const NUMBER_PREFIX: &'static str = "INV";
    const LABEL: &'static str = "sales";
}

/// Purchase journal: supplier, supplier address only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Purchase;

impl JournalKind for Purchase {
    const PARTY_KIND: PartyKind = PartyKind::Supplier;
    const COPIES_SECONDARY_ADDRESS: bool = false;
    const NUMBER_PREFIX: &'static str = "BILL";
    const LABEL: &'static str = "purchase";
}

pub type SalesJournal<P> = Document<Sales, P>;
pub type PurchaseJournal<P> = Document<Purchase, P>;

/// Settings shared by every document a host opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalSettings {
    pub policy: TaxPolicy,
    /// Tax rate given to new line items.
    pub default_tax_rate: Decimal,
    /// Due date offset from the document date for new documents.
    pub due_days: u32,
}

impl Default for JournalSettings {
    fn default() -> Self {
        Self {
            policy: TaxPolicy::default(),
            default_tax_rate: Decimal::from(18),
            due_days: 30,
        }
    }
}

/// Header fields of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentHeader {
    pub document_number: String,
    pub document_date: NaiveDate,
    pub due_date: NaiveDate,
    pub counterparty: Option<Counterparty>,
    /// Billing address (sales) or supplier address (purchase).
    pub primary_address: String,
    /// Shipping address (sales only).
    pub secondary_address: String,
    pub place_of_supply: String,
}

/// Editable header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderField {
    DocumentNumber,
    DocumentDate,
    DueDate,
    PrimaryAddress,
    SecondaryAddress,
    PlaceOfSupply,
}

/// A resolved header change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum HeaderChange {
    DocumentNumber(String),
    DocumentDate(NaiveDate),
    DueDate(NaiveDate),
    PrimaryAddress(String),
    SecondaryAddress(String),
    PlaceOfSupply(String),
}

/// State segment of an address: the last comma-delimited token, trimmed.
///
/// Assumes addresses end with the state name. An address without one yields
/// whatever the trailing segment is, which then classifies as interstate
/// unless it happens to equal the home state.
pub fn place_of_supply_from_address(address: &str) -> String {
    address
        .rsplit(',')
        .next()
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

/// Aggregate root: a sales or purchase journal document.
///
/// Generic over the journal kind and the product catalog it resolves line
/// items against. Every applied event re-derives [`DocumentTotals`], so
/// header, items and totals are never observed out of sync.
#[derive(Debug, Clone)]
pub struct Document<K: JournalKind, P> {
    id: DocumentId,
    header: DocumentHeader,
    items: LineItemStore,
    totals: DocumentTotals,
    settings: JournalSettings,
    catalog: P,
    version: u64,
    kind: PhantomData<K>,
}

impl<K: JournalKind, P: ProductCatalog> Document<K, P> {
    /// Open a fresh document: one blank line item, dated `today`.
    pub fn open(
        id: DocumentId,
        document_number: impl Into<String>,
        today: NaiveDate,
        settings: JournalSettings,
        catalog: P,
    ) -> Self {
        let due_date = today
            .checked_add_days(Days::new(u64::from(settings.due_days)))
            .unwrap_or(today);

        let mut items = LineItemStore::new();
        items.add_item(settings.default_tax_rate);

        let header = DocumentHeader {
            document_number: document_number.into(),
            document_date: today,
            due_date,
            counterparty: None,
            primary_address: String::new(),
            secondary_address: String::new(),
            place_of_supply: String::new(),
        };
        let totals = recalculate(items.items(), &header.place_of_supply, &settings.policy);

        Self {
            id,
            header,
            items,
            totals,
            settings,
            catalog,
            version: 0,
            kind: PhantomData,
        }
    }

    pub fn id_typed(&self) -> DocumentId {
        self.id
    }

    pub fn header(&self) -> &DocumentHeader {
        &self.header
    }

    pub fn items(&self) -> &[LineItem] {
        self.items.items()
    }

    pub fn totals(&self) -> &DocumentTotals {
        &self.totals
    }

    pub fn settings(&self) -> &JournalSettings {
        &self.settings
    }

    pub fn update_header_field(&mut self, field: HeaderField, value: &str) -> Vec<JournalEvent> {
        self.run(JournalCommand::UpdateHeaderField(UpdateHeaderField {
            field,
            value: value.to_string(),
            occurred_at: Utc::now(),
        }))
    }

    pub fn add_item(&mut self) -> Vec<JournalEvent> {
        self.run(JournalCommand::AddItem(AddItem {
            occurred_at: Utc::now(),
        }))
    }

    /// Out of range is a no-op. Removing the last item leaves an empty document.
    pub fn remove_item(&mut self, index: usize) -> Vec<JournalEvent> {
        self.run(JournalCommand::RemoveItem(RemoveItem {
            index,
            occurred_at: Utc::now(),
        }))
    }

    pub fn update_item(
        &mut self,
        index: usize,
        field: LineField,
        value: &str,
    ) -> Vec<JournalEvent> {
        self.run(JournalCommand::UpdateItem(UpdateItem {
            index,
            field,
            value: value.to_string(),
            occurred_at: Utc::now(),
        }))
    }

    pub fn apply_counterparty(&mut self, counterparty: Counterparty) -> Vec<JournalEvent> {
        self.run(JournalCommand::ApplyCounterparty(ApplyCounterparty {
            counterparty,
            occurred_at: Utc::now(),
        }))
    }

    /// Every public mutation goes through here and returns the events it applied.
    /// A no-op edit returns an empty list.
    fn run(&mut self, command: JournalCommand) -> Vec<JournalEvent> {
        let Ok(events) = self.execute(&command);
        for event in &events {
            tracing::debug!(
                document = %self.id,
                event = event.event_type(),
                schema = event.version(),
                occurred_at = %event.occurred_at(),
                version = self.version,
                "journal event applied"
            );
        }
        events
    }
}

impl<K: JournalKind, P> AggregateRoot for Document<K, P> {
    type Id = DocumentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: UpdateHeaderField.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateHeaderField {
    pub field: HeaderField,
    pub value: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItem {
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveItem {
    pub index: usize,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateItem {
    pub index: usize,
    pub field: LineField,
    pub value: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ApplyCounterparty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyCounterparty {
    pub counterparty: Counterparty,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JournalCommand {
    UpdateHeaderField(UpdateHeaderField),
    AddItem(AddItem),
    RemoveItem(RemoveItem),
    UpdateItem(UpdateItem),
    ApplyCounterparty(ApplyCounterparty),
}

/// Event: HeaderUpdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderUpdated {
    pub document_id: DocumentId,
    pub change: HeaderChange,
    pub occurred_at: DateTime<Utc>,
}

/// Event: LineItemAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItemAdded {
    pub document_id: DocumentId,
    pub item: LineItem,
    pub occurred_at: DateTime<Utc>,
}

/// Event: LineItemRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItemRemoved {
    pub document_id: DocumentId,
    pub index: usize,
    pub occurred_at: DateTime<Utc>,
}

/// Event: LineItemUpdated. Carries the whole post-edit item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItemUpdated {
    pub document_id: DocumentId,
    pub index: usize,
    pub item: LineItem,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CounterpartyApplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterpartyApplied {
    pub document_id: DocumentId,
    pub counterparty: Counterparty,
    pub primary_address: String,
    /// `None` leaves the secondary address untouched.
    pub secondary_address: Option<String>,
    pub place_of_supply: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum JournalEvent {
    HeaderUpdated(HeaderUpdated),
    LineItemAdded(LineItemAdded),
    LineItemRemoved(LineItemRemoved),
    LineItemUpdated(LineItemUpdated),
    CounterpartyApplied(CounterpartyApplied),
}

impl Event for JournalEvent {
    fn event_type(&self) -> &'static str {
        match self {
            JournalEvent::HeaderUpdated(_) => "journal.header.updated",
            JournalEvent::LineItemAdded(_) => "journal.line_item.added",
            JournalEvent::LineItemRemoved(_) => "journal.line_item.removed",
            JournalEvent::LineItemUpdated(_) => "journal.line_item.updated",
            JournalEvent::CounterpartyApplied(_) => "journal.counterparty.applied",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            JournalEvent::HeaderUpdated(e) => e.occurred_at,
            JournalEvent::LineItemAdded(e) => e.occurred_at,
            JournalEvent::LineItemRemoved(e) => e.occurred_at,
            JournalEvent::LineItemUpdated(e) => e.occurred_at,
            JournalEvent::CounterpartyApplied(e) => e.occurred_at,
        }
    }
}

impl<K: JournalKind, P: ProductCatalog> Aggregate for Document<K, P> {
    type Command = JournalCommand;
    type Event = JournalEvent;
    type Error = Infallible;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            JournalEvent::HeaderUpdated(e) => match &e.change {
                HeaderChange::DocumentNumber(v) => self.header.document_number = v.clone(),
                HeaderChange::DocumentDate(d) => self.header.document_date = *d,
                HeaderChange::DueDate(d) => self.header.due_date = *d,
                HeaderChange::PrimaryAddress(v) => self.header.primary_address = v.clone(),
                HeaderChange::SecondaryAddress(v) => self.header.secondary_address = v.clone(),
                HeaderChange::PlaceOfSupply(v) => self.header.place_of_supply = v.clone(),
            },
            JournalEvent::LineItemAdded(e) => {
                self.items.push(e.item.clone());
            }
            JournalEvent::LineItemRemoved(e) => {
                self.items.remove_item(e.index);
            }
            JournalEvent::LineItemUpdated(e) => {
                self.items.replace(e.index, e.item.clone());
            }
            JournalEvent::CounterpartyApplied(e) => {
                self.header.counterparty = Some(e.counterparty.clone());
                self.header.primary_address = e.primary_address.clone();
                if let Some(secondary) = &e.secondary_address {
                    self.header.secondary_address = secondary.clone();
                }
                self.header.place_of_supply = e.place_of_supply.clone();
            }
        }

        self.totals = recalculate(
            self.items.items(),
            &self.header.place_of_supply,
            &self.settings.policy,
        );

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        let events = match command {
            JournalCommand::UpdateHeaderField(cmd) => self.handle_update_header(cmd),
            JournalCommand::AddItem(cmd) => self.handle_add_item(cmd),
            JournalCommand::RemoveItem(cmd) => self.handle_remove_item(cmd),
            JournalCommand::UpdateItem(cmd) => self.handle_update_item(cmd),
            JournalCommand::ApplyCounterparty(cmd) => self.handle_apply_counterparty(cmd),
        };
        Ok(events)
    }
}

impl<K: JournalKind, P: ProductCatalog> Document<K, P> {
    fn handle_update_header(&self, cmd: &UpdateHeaderField) -> Vec<JournalEvent> {
        let change = match cmd.field {
            HeaderField::DocumentNumber => HeaderChange::DocumentNumber(cmd.value.clone()),
            HeaderField::PrimaryAddress => HeaderChange::PrimaryAddress(cmd.value.clone()),
            HeaderField::SecondaryAddress => HeaderChange::SecondaryAddress(cmd.value.clone()),
            HeaderField::PlaceOfSupply => HeaderChange::PlaceOfSupply(cmd.value.clone()),
            HeaderField::DocumentDate | HeaderField::DueDate => {
                let Ok(date) = NaiveDate::parse_from_str(cmd.value.trim(), "%Y-%m-%d") else {
                    tracing::debug!(
                        document = %self.id,
                        field = ?cmd.field,
                        value = %cmd.value,
                        "unparseable date ignored"
                    );
                    return Vec::new();
                };
                if cmd.field == HeaderField::DocumentDate {
                    HeaderChange::DocumentDate(date)
                } else {
                    HeaderChange::DueDate(date)
                }
            }
        };

        vec![JournalEvent::HeaderUpdated(HeaderUpdated {
            document_id: self.id,
            change,
            occurred_at: cmd.occurred_at,
        })]
    }

    fn handle_add_item(&self, cmd: &AddItem) -> Vec<JournalEvent> {
        vec![JournalEvent::LineItemAdded(LineItemAdded {
            document_id: self.id,
            item: LineItem::blank(self.settings.default_tax_rate),
            occurred_at: cmd.occurred_at,
        })]
    }

    fn handle_remove_item(&self, cmd: &RemoveItem) -> Vec<JournalEvent> {
        if cmd.index >= self.items.len() {
            tracing::debug!(
                document = %self.id,
                index = cmd.index,
                len = self.items.len(),
                "remove out of range ignored"
            );
            return Vec::new();
        }

        vec![JournalEvent::LineItemRemoved(LineItemRemoved {
            document_id: self.id,
            index: cmd.index,
            occurred_at: cmd.occurred_at,
        })]
    }

    fn handle_update_item(&self, cmd: &UpdateItem) -> Vec<JournalEvent> {
        let Some(current) = self.items.get(cmd.index) else {
            tracing::debug!(
                document = %self.id,
                index = cmd.index,
                len = self.items.len(),
                "update out of range ignored"
            );
            return Vec::new();
        };

        vec![JournalEvent::LineItemUpdated(LineItemUpdated {
            document_id: self.id,
            index: cmd.index,
            item: current.edited(cmd.field, &cmd.value, &self.catalog),
            occurred_at: cmd.occurred_at,
        })]
    }

    fn handle_apply_counterparty(&self, cmd: &ApplyCounterparty) -> Vec<JournalEvent> {
        let party = &cmd.counterparty;
        if party.kind != K::PARTY_KIND {
            tracing::warn!(
                document = %self.id,
                journal = K::LABEL,
                party = %party.id,
                kind = party.kind.as_str(),
                "counterparty of the wrong kind ignored"
            );
            return Vec::new();
        }

        let secondary_address = K::COPIES_SECONDARY_ADDRESS.then(|| party.address.clone());

        vec![JournalEvent::CounterpartyApplied(CounterpartyApplied {
            document_id: self.id,
            counterparty: party.clone(),
            primary_address: party.address.clone(),
            secondary_address,
            place_of_supply: place_of_supply_from_address(&party.address),
            occurred_at: cmd.occurred_at,
        })]
    }
}
