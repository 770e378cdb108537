//! Core logic for the story shelf.
//! This crate is the single source of truth for story invariants.

pub mod app;
pub mod config;
pub mod document;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;
pub mod view;

pub use app::ShelfApp;
pub use config::{ConfigError, ShelfConfig, TagScope};
pub use document::{
    export_document, load_document, parse_document, write_export, DocumentError, LoadStatus,
    LoadedDocument, DEFAULT_DOCUMENT_NAME,
};
pub use logging::{default_log_level, init_logging, log_shelf_config, logging_status};
pub use model::story::{Story, StoryDraft, StoryId, StoryValidationError, SECRET_TAG};
pub use query::tags::{build_tag_index, CpTag, TagIndex};
pub use query::timeline::{group_by_day, DayGroup};
pub use query::{query, Filter, SortOrder, Visibility};
pub use repo::story_repo::{
    MemoryStoryRepository, RepoError, RepoResult, StoryPatch, StoryRepository,
};
pub use service::story_service::{parse_tag_fields, StoryService, StoryServiceError};
pub use view::render::{
    BrowseBody, BrowseView, ContentSegment, DetailPane, Screen, StoryCard, StoryForm, TagChip,
    TagChips, TimelineSection,
};
pub use view::state::{ViewMode, ViewState};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
