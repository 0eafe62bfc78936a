//! Terminal front end for the account panel.

pub mod keymap;
pub mod panel;

pub use keymap::{map_key, KeyIntent, RowCursor};
pub use panel::run_panel_tui;
