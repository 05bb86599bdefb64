//! Headless dashboard session: shell state plus at most one open journal form.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ledgerdash_catalog::{
    Catalogs, CounterpartyResolver, InMemoryCounterpartyCatalog, InMemoryProductCatalog,
    SearchOutcome,
};
use ledgerdash_core::{AggregateId, AggregateRoot, PartyId};
use ledgerdash_dashboard::{
    Appearance, CardBoard, CardId, CommandPalette, NewEntry, Navigator, PaletteCommand,
    PaletteKey, Screen,
};
use ledgerdash_journal::{
    Document, DocumentHeader, DocumentId, DocumentTotals, HeaderField, JournalEvent, JournalKind,
    JournalSettings, LineField, LineItem, Purchase, PurchaseJournal, Sales, SalesJournal,
};

type Products = Arc<InMemoryProductCatalog>;

/// One user intent, as received from the host's input stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    ToggleTheme,
    ToggleBold,
    ToggleFont,
    ToggleFontMenu,
    SelectFont { index: usize },
    CloseFontMenu,

    ToggleRearrange,
    BeginDrag { card: CardId },
    DragOver { card: CardId },
    EndDrag,

    OpenPalette,
    ClosePalette,
    PaletteQuery { query: String },
    PressKey { key: PaletteKey },

    Navigate { screen: Screen },
    Back,
    NewEntry { entry: NewEntry },

    UpdateHeader { field: HeaderField, value: String },
    AddItem,
    RemoveItem { index: usize },
    UpdateItem { index: usize, field: LineField, value: String },
    SearchCounterparty { query: String },
    SelectCounterparty { id: PartyId },
    Save,
    CloseJournal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("no journal form is open")]
    NoOpenJournal,

    #[error("unknown {kind} `{id}`")]
    UnknownCounterparty { kind: &'static str, id: PartyId },
}

/// The journal form currently on screen.
#[derive(Debug)]
pub enum OpenJournal {
    Sales(SalesJournal<Products>),
    Purchase(PurchaseJournal<Products>),
}

macro_rules! with_document {
    ($journal:expr, $doc:ident => $body:expr) => {
        match $journal {
            OpenJournal::Sales($doc) => $body,
            OpenJournal::Purchase($doc) => $body,
        }
    };
}

impl OpenJournal {
    pub fn screen(&self) -> Screen {
        match self {
            OpenJournal::Sales(_) => Screen::SalesJournal,
            OpenJournal::Purchase(_) => Screen::PurchaseJournal,
        }
    }

    pub fn header(&self) -> &DocumentHeader {
        with_document!(self, doc => doc.header())
    }

    pub fn items(&self) -> &[LineItem] {
        with_document!(self, doc => doc.items())
    }

    pub fn totals(&self) -> &DocumentTotals {
        with_document!(self, doc => doc.totals())
    }

    fn view(&self) -> JournalView {
        with_document!(self, doc => JournalView::of(doc))
    }
}

/// Serializable state of the open journal form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalView {
    pub kind: &'static str,
    pub id: DocumentId,
    pub version: u64,
    pub header: DocumentHeader,
    pub items: Vec<LineItem>,
    pub totals: DocumentTotals,
}

impl JournalView {
    fn of<K: JournalKind>(doc: &Document<K, Products>) -> Self {
        Self {
            kind: K::LABEL,
            id: doc.id_typed(),
            version: doc.version(),
            header: doc.header().clone(),
            items: doc.items().to_vec(),
            totals: doc.totals().clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaletteView {
    pub open: bool,
    pub query: String,
    pub selected: usize,
    pub results: Vec<&'static str>,
}

/// Everything a renderer needs after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub screen: Screen,
    pub appearance: Appearance,
    pub font_family: &'static str,
    pub font_weight: u16,
    pub board: CardBoard,
    pub palette: PaletteView,
    pub journal: Option<JournalView>,
    pub counterparty_search: SearchOutcome,
}

pub struct Workspace {
    settings: JournalSettings,
    today: NaiveDate,
    products: Products,
    customers: CounterpartyResolver<InMemoryCounterpartyCatalog>,
    suppliers: CounterpartyResolver<InMemoryCounterpartyCatalog>,

    appearance: Appearance,
    board: CardBoard,
    palette: CommandPalette,
    navigator: Navigator,

    journal: Option<OpenJournal>,
    search: SearchOutcome,
    sales_seq: u32,
    purchase_seq: u32,
}

impl Workspace {
    pub fn new(settings: JournalSettings, catalogs: Catalogs, today: NaiveDate) -> Self {
        Self {
            settings,
            today,
            products: Arc::new(catalogs.products),
            customers: CounterpartyResolver::new(catalogs.customers),
            suppliers: CounterpartyResolver::new(catalogs.suppliers),
            appearance: Appearance::default(),
            board: CardBoard::default(),
            palette: CommandPalette::default(),
            navigator: Navigator::default(),
            journal: None,
            search: SearchOutcome::Inactive,
            sales_seq: 0,
            purchase_seq: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.navigator.current()
    }

    pub fn journal(&self) -> Option<&OpenJournal> {
        self.journal.as_ref()
    }

    pub fn appearance(&self) -> &Appearance {
        &self.appearance
    }

    pub fn board(&self) -> &CardBoard {
        &self.board
    }

    pub fn palette(&self) -> &CommandPalette {
        &self.palette
    }

    pub fn counterparty_search(&self) -> &SearchOutcome {
        &self.search
    }

    /// Apply one action. Returns the journal events it produced, empty for
    /// shell actions and for journal edits that changed nothing.
    pub fn dispatch(&mut self, action: Action) -> Result<Vec<JournalEvent>, ActionError> {
        tracing::debug!(?action, "dispatch");
        let mut events = Vec::new();
        match action {
            Action::ToggleTheme => self.appearance.toggle_theme(),
            Action::ToggleBold => self.appearance.toggle_bold(),
            Action::ToggleFont => self.appearance.toggle_font(),
            Action::ToggleFontMenu => self.appearance.toggle_font_menu(),
            Action::SelectFont { index } => self.appearance.select_font(index),
            Action::CloseFontMenu => self.appearance.close_font_menu(),

            Action::ToggleRearrange => self.board.toggle_rearrange(),
            Action::BeginDrag { card } => {
                self.board.begin_drag(&card);
            }
            Action::DragOver { card } => self.board.drag_over(&card),
            Action::EndDrag => self.board.end_drag(),

            Action::OpenPalette => self.palette.open(),
            Action::ClosePalette => self.palette.close(),
            Action::PaletteQuery { query } => self.palette.set_query(&query),
            Action::PressKey { key } => {
                if let Some(command) = self.palette.press(key) {
                    self.run_palette_command(command);
                }
            }

            Action::Navigate { screen } => self.show(screen),
            Action::Back => {
                let screen = self.navigator.back();
                self.sync_journal(screen);
            }
            Action::NewEntry { entry } => match entry.screen() {
                Some(screen) => self.start(screen),
                None => tracing::info!(entry = entry.label(), "entry type has no form yet"),
            },

            Action::UpdateHeader { field, value } => {
                events = with_document!(self.journal_mut()?, doc => {
                    doc.update_header_field(field, &value)
                });
            }
            Action::AddItem => {
                events = with_document!(self.journal_mut()?, doc => doc.add_item());
            }
            Action::RemoveItem { index } => {
                events = with_document!(self.journal_mut()?, doc => doc.remove_item(index));
            }
            Action::UpdateItem {
                index,
                field,
                value,
            } => {
                events = with_document!(self.journal_mut()?, doc => {
                    doc.update_item(index, field, &value)
                });
            }
            Action::SearchCounterparty { query } => {
                self.search = match self.journal.as_ref().ok_or(ActionError::NoOpenJournal)? {
                    OpenJournal::Sales(_) => self.customers.search(&query),
                    OpenJournal::Purchase(_) => self.suppliers.search(&query),
                };
            }
            Action::SelectCounterparty { id } => events = self.select_counterparty(&id)?,
            Action::Save => {
                let journal = self.journal.as_ref().ok_or(ActionError::NoOpenJournal)?;
                tracing::info!(
                    document = %journal.header().document_number,
                    tax = %journal.totals().total_tax(),
                    grand_total = %journal.totals().grand_total(),
                    "save requested; documents are not persisted"
                );
            }
            Action::CloseJournal => {
                self.discard_journal();
                self.navigator.home();
            }
        }
        Ok(events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            screen: self.navigator.current(),
            appearance: self.appearance.clone(),
            font_family: self.appearance.font_family(),
            font_weight: self.appearance.boldness.css_weight(),
            board: self.board.clone(),
            palette: PaletteView {
                open: self.palette.is_open(),
                query: self.palette.query().to_string(),
                selected: self.palette.selected(),
                results: self.palette.results().iter().map(|e| e.label).collect(),
            },
            journal: self.journal.as_ref().map(OpenJournal::view),
            counterparty_search: self.search.clone(),
        }
    }

    fn journal_mut(&mut self) -> Result<&mut OpenJournal, ActionError> {
        self.journal.as_mut().ok_or(ActionError::NoOpenJournal)
    }

    fn run_palette_command(&mut self, command: PaletteCommand) {
        match command {
            PaletteCommand::Open(screen) => self.start(screen),
            PaletteCommand::ToggleTheme => self.appearance.toggle_theme(),
            PaletteCommand::ToggleBold => self.appearance.toggle_bold(),
            PaletteCommand::ToggleFont => self.appearance.toggle_font(),
            PaletteCommand::ToggleRearrange => self.board.toggle_rearrange(),
        }
    }

    /// Go to `screen`, keeping an already open form of the same kind.
    fn show(&mut self, screen: Screen) {
        self.navigator.go(screen);
        self.sync_journal(screen);
    }

    /// Go to `screen` with a fresh form if it is a journal screen.
    fn start(&mut self, screen: Screen) {
        self.discard_journal();
        self.show(screen);
    }

    /// Make the open form match `screen`: leaving a journal screen discards
    /// the form, entering one opens a fresh form when none of that kind is open.
    fn sync_journal(&mut self, screen: Screen) {
        if self.journal.as_ref().map(OpenJournal::screen) == Some(screen) {
            return;
        }
        self.discard_journal();
        self.journal = match screen {
            Screen::Dashboard => None,
            Screen::SalesJournal => {
                self.sales_seq += 1;
                Some(OpenJournal::Sales(self.open_document::<Sales>(self.sales_seq)))
            }
            Screen::PurchaseJournal => {
                self.purchase_seq += 1;
                Some(OpenJournal::Purchase(
                    self.open_document::<Purchase>(self.purchase_seq),
                ))
            }
        };
    }

    fn open_document<K: JournalKind>(&self, seq: u32) -> Document<K, Products> {
        let doc = Document::open(
            DocumentId::new(AggregateId::new()),
            K::document_number(seq),
            self.today,
            self.settings.clone(),
            Arc::clone(&self.products),
        );
        tracing::info!(
            kind = K::LABEL,
            document = %doc.header().document_number,
            id = %doc.id_typed(),
            "journal opened"
        );
        doc
    }

    fn discard_journal(&mut self) {
        self.search = SearchOutcome::Inactive;
        if let Some(journal) = self.journal.take() {
            tracing::info!(
                document = %journal.header().document_number,
                "journal discarded"
            );
        }
    }

    fn select_counterparty(&mut self, id: &PartyId) -> Result<Vec<JournalEvent>, ActionError> {
        let journal = self.journal.as_mut().ok_or(ActionError::NoOpenJournal)?;
        let (resolver, kind) = match journal {
            OpenJournal::Sales(_) => (&self.customers, Sales::PARTY_KIND),
            OpenJournal::Purchase(_) => (&self.suppliers, Purchase::PARTY_KIND),
        };
        let party = resolver
            .catalog()
            .get(id)
            .cloned()
            .ok_or_else(|| ActionError::UnknownCounterparty {
                kind: kind.as_str(),
                id: id.clone(),
            })?;

        let events = with_document!(journal, doc => doc.apply_counterparty(party));
        self.search = SearchOutcome::Inactive;
        Ok(events)
    }
}
