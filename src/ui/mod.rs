//! User interface
//!
//! - Flow layout and scroll offsets (layout.rs)
//! - Toolbar, section headers and photo cells (grid.rs)

pub mod grid;
pub mod layout;

/// Height of the toolbar above the grid
pub const TOOLBAR_HEIGHT: f32 = 64.0;

/// Width taken by the grid's vertical scrollbar
pub const SCROLLBAR_WIDTH: f32 = 12.0;
