//! Core use-case services.
//!
//! # Responsibility
//! - Turn raw form input into validated repository writes.
//! - Keep the controller decoupled from storage details.

pub mod story_service;
