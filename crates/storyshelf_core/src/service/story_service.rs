//! Story use-case service.
//!
//! # Responsibility
//! - Provide create/update/favorite/delete/lookup over a story repository.
//! - Trim form input and parse free-text tag fields.
//!
//! # Invariants
//! - Title and content are trimmed before validation and storage.
//! - Tag fields are split on `[,\s]+`; empty tokens are dropped, duplicates
//!   are kept, field order is preserved.
//! - New stories start with `favorite = false` and are prepended.

use crate::model::story::{Story, StoryDraft, StoryId, StoryValidationError};
use crate::repo::story_repo::{RepoError, StoryPatch, StoryRepository};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static TAG_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,\s]+").expect("valid tag separator regex"));

/// Service error for story use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoryServiceError {
    /// Draft input failed validation; nothing was committed.
    Validation(StoryValidationError),
    /// Storage-layer rejection.
    Repo(RepoError),
}

impl Display for StoryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoryServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for StoryServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<StoryValidationError> for StoryServiceError {
    fn from(value: StoryValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Story service facade over repository implementations.
pub struct StoryService<R: StoryRepository> {
    repo: R,
}

impl<R: StoryRepository> StoryService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one story from form input and returns the stored record.
    pub fn create_story(&mut self, draft: &StoryDraft) -> Result<Story, StoryServiceError> {
        let patch = normalize_draft(draft)?;
        let story = Story::new(patch.title, patch.content, patch.tags);
        let created = story.clone();
        let id = self.repo.insert_front(story)?;
        info!(
            "event=story_create module=service status=ok story_id={} tag_count={}",
            id,
            created.tags.len()
        );
        Ok(created)
    }

    /// Replaces title/content/tags of an existing story.
    ///
    /// Returns `Ok(None)` without side effects when `id` is unknown.
    pub fn update_story(
        &mut self,
        id: &str,
        draft: &StoryDraft,
    ) -> Result<Option<Story>, StoryServiceError> {
        let patch = normalize_draft(draft)?;
        match self.repo.update_story(id, patch)? {
            Some(story) => {
                info!("event=story_update module=service status=ok story_id={id}");
                Ok(Some(story.clone()))
            }
            None => {
                debug!("event=story_update module=service status=skipped reason=not_found story_id={id}");
                Ok(None)
            }
        }
    }

    /// Flips the favorite flag; `None` when `id` is unknown.
    pub fn toggle_favorite(&mut self, id: &str) -> Option<bool> {
        let toggled = self.repo.toggle_favorite(id);
        match toggled {
            Some(value) => {
                info!("event=story_favorite module=service status=ok story_id={id} favorite={value}")
            }
            None => debug!(
                "event=story_favorite module=service status=skipped reason=not_found story_id={id}"
            ),
        }
        toggled
    }

    /// Removes one story; `None` when `id` is unknown.
    ///
    /// Callers own user confirmation.
    pub fn delete_story(&mut self, id: &str) -> Option<Story> {
        let removed = self.repo.delete_story(id);
        if removed.is_some() {
            warn!("event=story_delete module=service status=ok story_id={id}");
        } else {
            debug!("event=story_delete module=service status=skipped reason=not_found story_id={id}");
        }
        removed
    }

    /// Gets one story by id.
    pub fn find_story(&self, id: &str) -> Option<&Story> {
        self.repo.get_story(id)
    }

    /// All stories in collection order (newest insertion first).
    pub fn list_stories(&self) -> &[Story] {
        self.repo.list_stories()
    }

    /// Ids of all stories in collection order.
    pub fn story_ids(&self) -> Vec<StoryId> {
        self.repo
            .list_stories()
            .iter()
            .map(|story| story.id.clone())
            .collect()
    }
}

/// Splits free-text tag fields into a flat tag list.
///
/// Rules:
/// - each field is split on commas and whitespace runs;
/// - tokens are trimmed and empty ones discarded;
/// - fields are concatenated in input order, duplicates kept.
pub fn parse_tag_fields<S: AsRef<str>>(fields: &[S]) -> Vec<String> {
    fields
        .iter()
        .flat_map(|field| TAG_SEPARATOR_RE.split(field.as_ref()))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn normalize_draft(draft: &StoryDraft) -> Result<StoryPatch, StoryValidationError> {
    let title = draft.title.trim();
    let content = draft.content.trim();
    if title.is_empty() {
        return Err(StoryValidationError::EmptyTitle);
    }
    if content.is_empty() {
        return Err(StoryValidationError::EmptyContent);
    }

    Ok(StoryPatch {
        title: title.to_string(),
        content: content.to_string(),
        tags: parse_tag_fields(&draft.tag_fields),
    })
}

#[cfg(test)]
mod tests {
    use super::{normalize_draft, parse_tag_fields};
    use crate::model::story::{StoryDraft, StoryValidationError};

    #[test]
    fn tag_fields_split_on_commas_and_whitespace() {
        let tags = parse_tag_fields(&["a, b  c", "", " ,d,,e\tf ", "CP:Alice"]);
        assert_eq!(tags, vec!["a", "b", "c", "d", "e", "f", "CP:Alice"]);
    }

    #[test]
    fn tag_fields_keep_duplicates_in_order() {
        let tags = parse_tag_fields(&["x y", "x"]);
        assert_eq!(tags, vec!["x", "y", "x"]);
    }

    #[test]
    fn normalize_draft_trims_and_rejects_blank_fields() {
        let patch = normalize_draft(&StoryDraft::new("  t  ", "\nbody\n")).unwrap();
        assert_eq!(patch.title, "t");
        assert_eq!(patch.content, "body");

        let err = normalize_draft(&StoryDraft::new("title", "   ")).unwrap_err();
        assert_eq!(err, StoryValidationError::EmptyContent);
    }
}
