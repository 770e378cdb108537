//! JSON document codec and file boundary.
//!
//! # Side effects
//! - `load_document` reads one file and emits `document_load` events.
//! - `write_export` creates parent directories and writes one file.

use super::{DocumentError, DocumentResult};
use crate::model::story::Story;
use log::{error, info, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Outcome of the startup load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Document parsed; `dropped` counts records with an already-seen id.
    Loaded { count: usize, dropped: usize },
    /// Document unreadable or malformed; collection starts empty.
    Fallback { reason: String },
}

/// Stories read at startup plus how they were obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    pub stories: Vec<Story>,
    pub status: LoadStatus,
}

/// Parses a story document.
///
/// Returns the stories in document order and the number of records dropped
/// because their id repeated an earlier record.
pub fn parse_document(raw: &str) -> DocumentResult<(Vec<Story>, usize)> {
    let parsed: Vec<Story> = serde_json::from_str(raw)?;
    let mut seen = HashSet::with_capacity(parsed.len());
    let mut dropped = 0;
    let mut stories = Vec::with_capacity(parsed.len());
    for story in parsed {
        if seen.insert(story.id.clone()) {
            stories.push(story);
        } else {
            warn!(
                "event=document_parse module=document status=dropped reason=duplicate_id story_id={}",
                story.id
            );
            dropped += 1;
        }
    }
    Ok((stories, dropped))
}

/// Loads the startup document, falling back to an empty collection.
pub fn load_document(path: impl AsRef<Path>) -> LoadedDocument {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!(
        "event=document_load module=document status=start path={}",
        path.display()
    );

    let result = std::fs::read_to_string(path)
        .map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })
        .and_then(|raw| parse_document(&raw));

    match result {
        Ok((stories, dropped)) => {
            info!(
                "event=document_load module=document status=ok count={} dropped={} duration_ms={}",
                stories.len(),
                dropped,
                started_at.elapsed().as_millis()
            );
            LoadedDocument {
                status: LoadStatus::Loaded {
                    count: stories.len(),
                    dropped,
                },
                stories,
            }
        }
        Err(err) => {
            error!(
                "event=document_load module=document status=fallback duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            LoadedDocument {
                stories: Vec::new(),
                status: LoadStatus::Fallback {
                    reason: err.to_string(),
                },
            }
        }
    }
}

/// Serializes stories as a pretty-printed (2-space) JSON array.
pub fn export_document(stories: &[Story]) -> DocumentResult<String> {
    Ok(serde_json::to_string_pretty(stories)?)
}

/// Writes an export snapshot to `path`, creating parent directories.
pub fn write_export(path: impl AsRef<Path>, stories: &[Story]) -> DocumentResult<PathBuf> {
    let path = path.as_ref();
    let body = export_document(stories)?;
    let io_error = |source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(path, body).map_err(io_error)?;

    info!(
        "event=document_export module=document status=ok count={} path={}",
        stories.len(),
        path.display()
    );
    Ok(path.to_path_buf())
}
