//! Headless host for the ledgerdash dashboard and journal forms.
//!
//! Wires configuration, reference catalogs and the dashboard shell into a
//! [`workspace::Workspace`] that is driven by JSON actions.

pub mod config;
pub mod host;
pub mod workspace;

pub use config::{AppConfig, ConfigError};
pub use host::{Response, run};
pub use workspace::{Action, ActionError, JournalView, OpenJournal, Snapshot, Workspace};
