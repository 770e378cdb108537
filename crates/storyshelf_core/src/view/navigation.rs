//! Detail focus and prev/next traversal.
//!
//! # Invariants
//! - The focused index is recomputed by id lookup on every open.
//! - Both bounds checks use the visible sequence, never the whole store.
//! - A focus outside the visible sequence has no previous entry; its next
//!   entry is the first visible story.
//! - The scroll offset is captured when detail is entered from the browse
//!   screen and survives prev/next steps.

use crate::model::story::StoryId;

/// Currently open story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailFocus {
    pub story_id: StoryId,
    /// Position inside the visible sequence, if present there.
    pub index: Option<usize>,
}

/// Selection state for the detail pane.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigation {
    focus: Option<DetailFocus>,
    return_scroll: usize,
}

impl Navigation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the browse scroll offset to restore on close.
    pub fn capture_scroll(&mut self, offset: usize) {
        self.return_scroll = offset;
    }

    /// Focuses `story_id` and locates it in `visible`.
    pub fn open(&mut self, visible: &[StoryId], story_id: &str) -> &DetailFocus {
        let index = visible.iter().position(|id| id == story_id);
        self.focus.insert(DetailFocus {
            story_id: story_id.to_string(),
            index,
        })
    }

    pub fn focus(&self) -> Option<&DetailFocus> {
        self.focus.as_ref()
    }

    pub fn has_prev(&self) -> bool {
        matches!(self.focus, Some(DetailFocus { index: Some(index), .. }) if index > 0)
    }

    pub fn has_next(&self, visible_len: usize) -> bool {
        self.next_index().is_some_and(|next| next < visible_len)
    }

    /// Id one step back in `visible`.
    pub fn prev_target<'a>(&self, visible: &'a [StoryId]) -> Option<&'a StoryId> {
        if !self.has_prev() {
            return None;
        }
        let index = self.focus.as_ref()?.index?;
        visible.get(index - 1)
    }

    /// Id one step forward in `visible`.
    pub fn next_target<'a>(&self, visible: &'a [StoryId]) -> Option<&'a StoryId> {
        visible.get(self.next_index()?)
    }

    /// Clears focus and returns the scroll offset to restore.
    pub fn close(&mut self) -> usize {
        self.focus = None;
        self.return_scroll
    }

    fn next_index(&self) -> Option<usize> {
        let focus = self.focus.as_ref()?;
        Some(focus.index.map_or(0, |index| index + 1))
    }
}
