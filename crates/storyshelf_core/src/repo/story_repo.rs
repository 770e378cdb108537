//! Story repository contract and in-memory implementation.
//!
//! # Responsibility
//! - Provide insert/update/toggle/delete/lookup over the story collection.
//! - Keep collection order: newest insertion first, independent of
//!   `created_at`.
//!
//! # Invariants
//! - `id` is unique across the collection.
//! - `update_story` never touches `id`, `favorite` or `created_at`.
//! - Deletion is immediate and permanent for the process lifetime.

use crate::model::story::{Story, StoryId, StoryValidationError};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for story write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    /// Write rejected by story validation.
    Validation(StoryValidationError),
    /// Another story already owns this id.
    DuplicateId(StoryId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "story id already exists: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::DuplicateId(_) => None,
        }
    }
}

impl From<StoryValidationError> for RepoError {
    fn from(value: StoryValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Replacement values for the editable story fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryPatch {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// Repository interface for story operations.
pub trait StoryRepository {
    /// Prepends one story to the collection and returns its id.
    fn insert_front(&mut self, story: Story) -> RepoResult<StoryId>;
    /// Overwrites title/content/tags in place.
    ///
    /// Returns `Ok(None)` when `id` is unknown.
    fn update_story(&mut self, id: &str, patch: StoryPatch) -> RepoResult<Option<&Story>>;
    /// Flips the favorite flag and returns the new value.
    fn toggle_favorite(&mut self, id: &str) -> Option<bool>;
    /// Removes one story and returns it.
    fn delete_story(&mut self, id: &str) -> Option<Story>;
    /// Gets one story by id.
    fn get_story(&self, id: &str) -> Option<&Story>;
    /// Lists all stories in collection order.
    fn list_stories(&self) -> &[Story];
}

/// Process-memory story store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStoryRepository {
    stories: Vec<Story>,
}

impl MemoryStoryRepository {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from an already-ordered collection.
    ///
    /// Loaded records are taken as-is (no title/content validation), but ids
    /// must be unique.
    pub fn from_stories(stories: Vec<Story>) -> RepoResult<Self> {
        let mut seen = HashSet::with_capacity(stories.len());
        for story in &stories {
            if !seen.insert(story.id.as_str()) {
                return Err(RepoError::DuplicateId(story.id.clone()));
            }
        }
        Ok(Self { stories })
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.stories.iter().position(|story| story.id == id)
    }
}

impl StoryRepository for MemoryStoryRepository {
    fn insert_front(&mut self, story: Story) -> RepoResult<StoryId> {
        story.validate()?;
        if self.position(&story.id).is_some() {
            return Err(RepoError::DuplicateId(story.id));
        }

        let id = story.id.clone();
        self.stories.insert(0, story);
        Ok(id)
    }

    fn update_story(&mut self, id: &str, patch: StoryPatch) -> RepoResult<Option<&Story>> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };

        let mut candidate = self.stories[index].clone();
        candidate.title = patch.title;
        candidate.content = patch.content;
        candidate.tags = patch.tags;
        candidate.validate()?;

        self.stories[index] = candidate;
        Ok(Some(&self.stories[index]))
    }

    fn toggle_favorite(&mut self, id: &str) -> Option<bool> {
        let story = self.stories.iter_mut().find(|story| story.id == id)?;
        story.favorite = !story.favorite;
        Some(story.favorite)
    }

    fn delete_story(&mut self, id: &str) -> Option<Story> {
        let index = self.position(id)?;
        Some(self.stories.remove(index))
    }

    fn get_story(&self, id: &str) -> Option<&Story> {
        self.stories.iter().find(|story| story.id == id)
    }

    fn list_stories(&self) -> &[Story] {
        &self.stories
    }
}
