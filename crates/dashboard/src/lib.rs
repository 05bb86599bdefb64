//! Dashboard shell: appearance toggles, rearrangeable summary cards, the
//! command palette and screen routing.
//!
//! Nothing here feeds the journal engine; the host passes appearance to its
//! renderer as read-only presentation state.

pub mod appearance;
pub mod board;
pub mod palette;
pub mod screen;

pub use appearance::{Appearance, Boldness, FONT_FAMILIES, Theme};
pub use board::{Card, CardBoard, CardId, CardKind};
pub use palette::{CommandPalette, PaletteCommand, PaletteEntry, PaletteKey};
pub use screen::{NewEntry, Navigator, Screen};
