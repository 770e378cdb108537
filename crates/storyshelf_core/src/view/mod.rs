//! View state, navigation and render instructions.
//!
//! # Responsibility
//! - Track process-wide view flags and the last visible sequence.
//! - Translate query/grouping output into platform-neutral view
//!   instructions (cards, sections, chips, detail pane, form).
//!
//! # Invariants
//! - This layer never owns story data; it holds ids and rendered copies.

pub mod navigation;
pub mod render;
pub mod state;
