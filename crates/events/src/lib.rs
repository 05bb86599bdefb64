//! Domain events emitted by journal documents.

pub mod event;

pub use event::Event;
