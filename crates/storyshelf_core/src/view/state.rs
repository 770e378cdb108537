//! Process-wide view flags.

use crate::model::story::StoryId;
use crate::query::{Filter, SortOrder, Visibility};

/// Presentation of the browse screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    List,
    Timeline,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::List => Self::Timeline,
            Self::Timeline => Self::List,
        }
    }
}

/// Non-persisted view state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub visibility: Visibility,
    pub filter: Filter,
    pub sort_order: SortOrder,
    pub view_mode: ViewMode,
    /// Ids of the last rendered browse sequence (list order or
    /// timeline bucket-then-item order).
    pub visible: Vec<StoryId>,
}
