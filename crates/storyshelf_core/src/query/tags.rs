//! Tag index for filter chips.
//!
//! # Invariants
//! - Tags are distinct and in ascending lexical order within each group.
//! - The literal `secret` tag is never offered as a general tag.
//! - `CP:` tags are listed with their full tag plus the stripped name.

use crate::model::story::{cp_display_name, Story, SECRET_TAG};
use std::collections::BTreeSet;

/// One `CP:` tag entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpTag {
    /// Full tag as stored, used as the filter value.
    pub tag: String,
    /// Suffix after `CP:`, used for display.
    pub name: String,
}

/// Distinct tags split into the CP subgroup and everything else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagIndex {
    pub cp_tags: Vec<CpTag>,
    pub tags: Vec<String>,
}

impl TagIndex {
    pub fn is_empty(&self) -> bool {
        self.cp_tags.is_empty() && self.tags.is_empty()
    }
}

/// Collects distinct tags across `stories`.
pub fn build_tag_index<'a>(stories: impl IntoIterator<Item = &'a Story>) -> TagIndex {
    let distinct: BTreeSet<&str> = stories
        .into_iter()
        .flat_map(|story| story.tags.iter().map(String::as_str))
        .collect();

    let mut index = TagIndex::default();
    for tag in distinct {
        if let Some(name) = cp_display_name(tag) {
            index.cp_tags.push(CpTag {
                tag: tag.to_string(),
                name: name.to_string(),
            });
        } else if tag != SECRET_TAG {
            index.tags.push(tag.to_string());
        }
    }
    index
}
