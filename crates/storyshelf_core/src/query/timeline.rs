//! Timeline grouping by UTC calendar day.
//!
//! # Invariants
//! - Membership equals `query` with the same arguments.
//! - Day keys are `YYYY-MM-DD` in UTC; buckets sort by key string.
//! - Stories inside a bucket sort by `created_at`, stable on ties.

use super::{matches, sort_by_created, Filter, SortOrder, Visibility};
use crate::model::story::{Story, StoryId};
use std::collections::BTreeMap;

/// One day bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayGroup {
    pub date_key: String,
    pub stories: Vec<Story>,
}

/// Groups matching stories by creation day.
pub fn group_by_day(
    stories: &[Story],
    visibility: Visibility,
    filter: &Filter,
    order: SortOrder,
) -> Vec<DayGroup> {
    let mut buckets: BTreeMap<String, Vec<Story>> = BTreeMap::new();
    for story in stories
        .iter()
        .filter(|story| matches(story, visibility, filter))
    {
        buckets
            .entry(story.date_key())
            .or_default()
            .push(story.clone());
    }

    let mut groups: Vec<DayGroup> = buckets
        .into_iter()
        .map(|(date_key, mut stories)| {
            sort_by_created(&mut stories, order);
            DayGroup { date_key, stories }
        })
        .collect();
    if order == SortOrder::Desc {
        groups.reverse();
    }
    groups
}

/// Bucket-then-item order of ids, used as the navigation sequence.
pub fn flatten_ids(groups: &[DayGroup]) -> Vec<StoryId> {
    groups
        .iter()
        .flat_map(|group| group.stories.iter().map(|story| story.id.clone()))
        .collect()
}
