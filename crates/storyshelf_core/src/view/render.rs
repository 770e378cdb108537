//! Render coordinator: view instructions for the platform shell.
//!
//! # Responsibility
//! - Build list cards, timeline sections, tag chips, the detail pane and
//!   the create/edit form from core data.
//! - Apply the display-only `CP:` content emphasis.
//!
//! # Invariants
//! - Nothing here mutates stories or view state.

use crate::model::story::{format_timestamp, Story, StoryId};
use crate::query::tags::TagIndex;
use crate::query::timeline::DayGroup;
use crate::query::{Filter, SortOrder, Visibility};
use crate::view::navigation::Navigation;
use crate::view::state::ViewMode;
use once_cell::sync::Lazy;
use regex::Regex;

static CP_CONTENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^CP:([^\r\n]+)").expect("valid CP content regex"));

/// Compact story summary shown in list and timeline modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryCard {
    pub id: StoryId,
    pub title: String,
    pub favorite: bool,
    pub tags: Vec<String>,
}

impl From<&Story> for StoryCard {
    fn from(story: &Story) -> Self {
        Self {
            id: story.id.clone(),
            title: story.title.clone(),
            favorite: story.favorite,
            tags: story.tags.clone(),
        }
    }
}

/// Cards of one timeline day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineSection {
    pub date_key: String,
    pub cards: Vec<StoryCard>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseBody {
    List(Vec<StoryCard>),
    Timeline(Vec<TimelineSection>),
}

impl BrowseBody {
    pub fn card_count(&self) -> usize {
        match self {
            Self::List(cards) => cards.len(),
            Self::Timeline(sections) => sections.iter().map(|section| section.cards.len()).sum(),
        }
    }
}

/// One filter chip; selecting it applies `filter`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagChip {
    pub label: String,
    pub filter: Filter,
    pub emphasized: bool,
    pub active: bool,
}

/// Filter chips grouped for display. Empty groups are left out by shells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagChips {
    /// "show all" and "favorites", always present.
    pub fixed: Vec<TagChip>,
    pub cp: Vec<TagChip>,
    pub general: Vec<TagChip>,
}

/// Browse screen instructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseView {
    pub mode: ViewMode,
    pub visibility: Visibility,
    pub sort_order: SortOrder,
    pub filter: Filter,
    pub chips: TagChips,
    pub body: BrowseBody,
    /// Offset the shell should scroll to after rendering.
    pub scroll_offset: usize,
}

/// Piece of formatted story content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSegment {
    Text(String),
    /// Bold text from a leading `CP:` marker.
    Emphasis(String),
    LineBreak,
}

/// Detail screen instructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPane {
    pub id: StoryId,
    pub title: String,
    pub content: Vec<ContentSegment>,
    pub tags: Vec<String>,
    pub favorite: bool,
    pub created_at: String,
    pub has_prev: bool,
    pub has_next: bool,
    /// Position inside the visible sequence, if present there.
    pub position: Option<usize>,
    pub visible_len: usize,
}

/// Create/edit form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryForm {
    /// `Some` while editing an existing story.
    pub editing: Option<StoryId>,
    pub title: String,
    pub content: String,
    /// Tags joined with `", "` for the edit prefill.
    pub tags: String,
    /// Blocking validation message from the last submit.
    pub error: Option<String>,
}

impl StoryForm {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn prefill(story: &Story) -> Self {
        Self {
            editing: Some(story.id.clone()),
            title: story.title.clone(),
            content: story.content.clone(),
            tags: story.tags.join(", "),
            error: None,
        }
    }
}

/// Whatever the shell should currently display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Browse(BrowseView),
    Detail(DetailPane),
    Form(StoryForm),
}

pub fn list_body(stories: &[Story]) -> BrowseBody {
    BrowseBody::List(stories.iter().map(StoryCard::from).collect())
}

pub fn timeline_body(groups: &[DayGroup]) -> BrowseBody {
    BrowseBody::Timeline(
        groups
            .iter()
            .map(|group| TimelineSection {
                date_key: group.date_key.clone(),
                cards: group.stories.iter().map(StoryCard::from).collect(),
            })
            .collect(),
    )
}

/// Builds chips from a tag index, marking the one matching `active`.
pub fn tag_chips(index: &TagIndex, active: &Filter) -> TagChips {
    let chip = |label: String, filter: Filter, emphasized: bool| TagChip {
        active: &filter == active,
        label,
        filter,
        emphasized,
    };

    TagChips {
        fixed: vec![
            chip("show all".to_string(), Filter::None, false),
            chip("favorites".to_string(), Filter::FavoritesOnly, false),
        ],
        cp: index
            .cp_tags
            .iter()
            .map(|cp| chip(format!("#{}", cp.name), Filter::Tag(cp.tag.clone()), true))
            .collect(),
        general: index
            .tags
            .iter()
            .map(|tag| chip(format!("#{tag}"), Filter::Tag(tag.clone()), false))
            .collect(),
    }
}

pub fn sort_label(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Desc => "newest first",
        SortOrder::Asc => "oldest first",
    }
}

/// Label of the control that switches away from `mode`.
pub fn view_toggle_label(mode: ViewMode) -> &'static str {
    match mode {
        ViewMode::List => "timeline mode",
        ViewMode::Timeline => "list mode",
    }
}

pub fn detail_pane(story: &Story, navigation: &Navigation, visible_len: usize) -> DetailPane {
    DetailPane {
        id: story.id.clone(),
        title: story.title.clone(),
        content: format_content(&story.content),
        tags: story.tags.clone(),
        favorite: story.favorite,
        created_at: format_timestamp(&story.created_at),
        has_prev: navigation.has_prev(),
        has_next: navigation.has_next(visible_len),
        position: navigation.focus().and_then(|focus| focus.index),
        visible_len,
    }
}

/// Splits content into display segments.
///
/// A first line of the form `CP:<text>` becomes an emphasis segment; the
/// remaining text follows as plain lines.
pub fn format_content(content: &str) -> Vec<ContentSegment> {
    let mut segments = Vec::new();
    let rest = match CP_CONTENT_RE.captures(content) {
        Some(caps) => {
            let marker_end = caps.get(0).map_or(0, |whole| whole.end());
            if let Some(text) = caps.get(1) {
                segments.push(ContentSegment::Emphasis(text.as_str().to_string()));
            }
            &content[marker_end..]
        }
        None => content,
    };

    for (line_no, line) in rest.split('\n').enumerate() {
        if line_no > 0 {
            segments.push(ContentSegment::LineBreak);
        }
        let line = line.strip_suffix('\r').unwrap_or(line);
        if !line.is_empty() {
            segments.push(ContentSegment::Text(line.to_string()));
        }
    }
    segments
}
