//! State management module
//!
//! This module handles all application state, including:
//! - Shared data structures (data.rs)
//! - Completed searches, newest first (session.rs)
//! - Photos selected for sharing (selection.rs)
//! - Reusable grid cell slots (cells.rs)
//! - Expansion, sharing and image-load bookkeeping (controller.rs)

pub mod cells;
pub mod controller;
pub mod data;
pub mod selection;
pub mod session;

pub use controller::{GridController, HostRequest, RequestQueue, ShareOutcome};
pub use data::{ItemIndex, Photo, PhotoId, PhotoImage, SearchResult};
