//! Derived story views: filtering, sorting, tag index and day grouping.
//!
//! # Responsibility
//! - Produce ordered views of the story collection from view-state inputs.
//! - Keep every derivation a pure function of its arguments.
//!
//! # Invariants
//! - The secret/non-secret partition is applied before any other filter.
//! - Sorting is stable: equal `created_at` keeps input (collection) order.
//! - Inputs are never mutated; results are fresh sequences.

pub mod tags;
pub mod timeline;

use crate::model::story::Story;

/// Secret-visibility partition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    /// Only stories without the `secret` tag.
    #[default]
    NonSecret,
    /// Only stories carrying the `secret` tag.
    SecretOnly,
}

impl Visibility {
    /// Returns the opposite partition.
    pub fn toggled(self) -> Self {
        match self {
            Self::NonSecret => Self::SecretOnly,
            Self::SecretOnly => Self::NonSecret,
        }
    }

    /// Whether `story` falls into this partition.
    pub fn admits(self, story: &Story) -> bool {
        match self {
            Self::NonSecret => !story.is_secret(),
            Self::SecretOnly => story.is_secret(),
        }
    }
}

/// Secondary filter applied after the visibility partition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Filter {
    /// No further restriction.
    #[default]
    None,
    /// Exact tag match, `CP:` tags included as opaque strings.
    Tag(String),
    /// Only favorites.
    FavoritesOnly,
}

impl Filter {
    /// Whether `story` passes this filter.
    pub fn admits(&self, story: &Story) -> bool {
        match self {
            Self::None => true,
            Self::Tag(tag) => story.has_tag(tag),
            Self::FavoritesOnly => story.favorite,
        }
    }
}

/// Ordering by creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest first.
    #[default]
    Desc,
    /// Oldest first.
    Asc,
}

impl SortOrder {
    /// Returns the opposite order.
    pub fn toggled(self) -> Self {
        match self {
            Self::Desc => Self::Asc,
            Self::Asc => Self::Desc,
        }
    }
}

/// Combined visibility + filter predicate shared by list and timeline views.
pub fn matches(story: &Story, visibility: Visibility, filter: &Filter) -> bool {
    visibility.admits(story) && filter.admits(story)
}

/// Stable in-place sort by `created_at`.
pub fn sort_by_created(stories: &mut [Story], order: SortOrder) {
    match order {
        SortOrder::Desc => stories.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::Asc => stories.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
    }
}

/// Produces the list-mode view of `stories`.
pub fn query(
    stories: &[Story],
    visibility: Visibility,
    filter: &Filter,
    order: SortOrder,
) -> Vec<Story> {
    let mut view: Vec<Story> = stories
        .iter()
        .filter(|story| matches(story, visibility, filter))
        .cloned()
        .collect();
    sort_by_created(&mut view, order);
    view
}
