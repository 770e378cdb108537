//! Story record and draft input.
//!
//! # Responsibility
//! - Define `Story`, the single mutable record owned by the story store.
//! - Define `StoryDraft`, the raw form input for create/edit.
//! - Provide timestamp helpers used by sorting, grouping and export.
//!
//! # Invariants
//! - `id` is assigned once at creation and never reassigned.
//! - `created_at` is assigned once at creation and never changes.
//! - `title`/`content` are non-empty after trim whenever a story is written
//!   through the create/edit boundary (`Story::validate`).
//! - The literal tag `secret` gates visibility; `CP:` tags form a display
//!   subgroup named by the suffix.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque story identifier.
///
/// Kept as a type alias: documents written by older clients carry free-form
/// strings, new stories get a UUID v4 in string form.
pub type StoryId = String;

/// Tag that moves a story into secret visibility.
pub const SECRET_TAG: &str = "secret";

/// Prefix of the distinguished CP tag subgroup.
pub const CP_TAG_PREFIX: &str = "CP:";

/// Validation failures at the create/edit boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoryValidationError {
    /// Title is empty after trimming.
    EmptyTitle,
    /// Content is empty after trimming.
    EmptyContent,
    /// Tag at the given position is empty after trimming.
    EmptyTag(usize),
}

impl Display for StoryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title and content are required (title is empty)"),
            Self::EmptyContent => write!(f, "title and content are required (content is empty)"),
            Self::EmptyTag(index) => write!(f, "tag #{index} is empty"),
        }
    }
}

impl Error for StoryValidationError {}

/// A short narrative entry.
///
/// Field order matches the exported document shape:
/// `id, title, content, tags, favorite, createdAt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    /// Stable identifier, unique within the store.
    #[serde(deserialize_with = "id_wire::deserialize")]
    pub id: StoryId,
    pub title: String,
    pub content: String,
    /// Ordered, set-like tag list. Duplicates are tolerated.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub favorite: bool,
    /// Creation instant, normalized to UTC.
    #[serde(with = "timestamp_wire")]
    pub created_at: DateTime<Utc>,
}

impl Story {
    /// Creates a story with a fresh UUID and the current instant.
    ///
    /// Does not validate; the service layer trims and validates draft input
    /// before calling this.
    pub fn new(title: impl Into<String>, content: impl Into<String>, tags: Vec<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), title, content, tags, Utc::now())
    }

    /// Creates a story with caller-provided identity and creation time.
    ///
    /// Used by document import and tests where identity already exists.
    pub fn with_id(
        id: impl Into<StoryId>,
        title: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            tags,
            favorite: false,
            created_at,
        }
    }

    /// Checks the create/edit boundary invariants.
    pub fn validate(&self) -> Result<(), StoryValidationError> {
        if self.title.trim().is_empty() {
            return Err(StoryValidationError::EmptyTitle);
        }
        if self.content.trim().is_empty() {
            return Err(StoryValidationError::EmptyContent);
        }
        if let Some(index) = self.tags.iter().position(|tag| tag.trim().is_empty()) {
            return Err(StoryValidationError::EmptyTag(index));
        }
        Ok(())
    }

    /// Exact-match tag membership.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate == tag)
    }

    /// Whether the story belongs to the secret partition.
    pub fn is_secret(&self) -> bool {
        self.has_tag(SECRET_TAG)
    }

    /// UTC calendar day of `created_at`, formatted `YYYY-MM-DD`.
    pub fn date_key(&self) -> String {
        date_key(&self.created_at)
    }
}

/// Raw create/edit form input.
///
/// Tags arrive as several free-text fields, each holding comma- or
/// whitespace-separated tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryDraft {
    pub title: String,
    pub content: String,
    pub tag_fields: Vec<String>,
}

impl StoryDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tag_fields: Vec::new(),
        }
    }

    /// Appends one free-text tag field.
    pub fn with_tag_field(mut self, field: impl Into<String>) -> Self {
        self.tag_fields.push(field.into());
        self
    }
}

/// Returns the display name of a `CP:` tag, or `None` for other tags.
pub fn cp_display_name(tag: &str) -> Option<&str> {
    tag.strip_prefix(CP_TAG_PREFIX)
}

/// Formats a creation instant the way exported documents carry it.
///
/// Sub-second digits are kept at the shortest of 0, 3, 6 or 9 places that
/// holds the stored value, so a parsed instant formats back losslessly.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parses a document timestamp into UTC.
///
/// Accepts RFC 3339 with any offset. Offset-less date-times and bare dates
/// are read as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let trimmed = raw.trim();
    if let Ok(value) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(value.with_timezone(&Utc));
    }
    if let Ok(value) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(value.and_utc());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

/// UTC calendar day key (`YYYY-MM-DD`) for timeline grouping.
pub fn date_key(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d").to_string()
}

mod timestamp_wire {
    use super::{format_timestamp, parse_timestamp};
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw)
            .map_err(|err| serde::de::Error::custom(format!("invalid createdAt `{raw}`: {err}")))
    }
}

mod id_wire {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum WireId {
        Text(String),
        Integer(i64),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        match WireId::deserialize(deserializer)? {
            WireId::Text(value) => Ok(value),
            WireId::Integer(value) => Ok(value.to_string()),
        }
    }
}
