//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer takes the *core* page tree and turns it into rows on the
//! terminal.  No catalog I/O happens here.

pub mod help;
pub mod layout;
pub mod scroll;
pub mod storefront;
pub mod theme;
