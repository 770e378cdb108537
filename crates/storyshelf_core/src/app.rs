//! Application controller.
//!
//! # Responsibility
//! - Own the story service and all view state in one explicit object.
//! - Expose every user action as a method that mutates state and returns
//!   fresh view instructions.
//!
//! # Invariants
//! - Single writer: all mutation goes through `&mut self`.
//! - Every browse render recomputes the visible sequence used for prev/next
//!   and drops the detail focus.
//! - Prev/next only act while the detail screen is current.
//! - Lookup misses are silent no-ops (`None`), logged at debug level.
//! - A failed form submit commits nothing and leaves the form open.

use crate::config::TagScope;
use crate::document::{export_document, write_export, DocumentResult, LoadedDocument};
use crate::model::story::{Story, StoryDraft, StoryId};
use crate::query::tags::build_tag_index;
use crate::query::timeline::{flatten_ids, group_by_day};
use crate::query::{query, Filter};
use crate::repo::story_repo::{MemoryStoryRepository, RepoResult, StoryRepository};
use crate::service::story_service::{StoryService, StoryServiceError};
use crate::view::navigation::Navigation;
use crate::view::render::{
    detail_pane, list_body, tag_chips, timeline_body, BrowseView, DetailPane, Screen, StoryForm,
};
use crate::view::state::{ViewMode, ViewState};
use log::{debug, info};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScreenKind {
    Browse,
    Detail,
    Form,
}

/// The story shelf: store plus view state behind one controller.
pub struct ShelfApp<R: StoryRepository = MemoryStoryRepository> {
    service: StoryService<R>,
    view: ViewState,
    navigation: Navigation,
    form: Option<StoryForm>,
    screen: ScreenKind,
    tag_scope: TagScope,
}

impl ShelfApp<MemoryStoryRepository> {
    /// Builds an app over the stories read at startup.
    pub fn from_document(document: LoadedDocument, tag_scope: TagScope) -> RepoResult<Self> {
        let repo = MemoryStoryRepository::from_stories(document.stories)?;
        Ok(Self::new(repo, tag_scope))
    }
}

impl<R: StoryRepository> ShelfApp<R> {
    pub fn new(repo: R, tag_scope: TagScope) -> Self {
        Self {
            service: StoryService::new(repo),
            view: ViewState::default(),
            navigation: Navigation::new(),
            form: None,
            screen: ScreenKind::Browse,
            tag_scope,
        }
    }

    pub fn stories(&self) -> &[Story] {
        self.service.list_stories()
    }

    pub fn find_story(&self, id: &str) -> Option<&Story> {
        self.service.find_story(id)
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    /// Ids of the last rendered browse sequence.
    pub fn visible_story_ids(&self) -> &[StoryId] {
        &self.view.visible
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    /// Re-renders whatever screen is current.
    pub fn render(&mut self) -> Screen {
        match self.screen {
            ScreenKind::Detail => match self.current_detail() {
                Some(pane) => Screen::Detail(pane),
                None => Screen::Browse(self.return_to_browse()),
            },
            ScreenKind::Form => match self.form.clone() {
                Some(form) => Screen::Form(form),
                None => Screen::Browse(self.browse(0)),
            },
            ScreenKind::Browse => Screen::Browse(self.browse(0)),
        }
    }

    /// Applies a chip selection and re-renders the current view mode.
    pub fn select_filter(&mut self, filter: Filter) -> BrowseView {
        debug!("event=filter_select module=app status=ok filter={filter:?}");
        self.view.filter = filter;
        self.browse(0)
    }

    pub fn toggle_secret(&mut self) -> BrowseView {
        self.view.visibility = self.view.visibility.toggled();
        info!(
            "event=visibility_toggle module=app status=ok visibility={:?}",
            self.view.visibility
        );
        self.browse(0)
    }

    pub fn toggle_sort(&mut self) -> BrowseView {
        self.view.sort_order = self.view.sort_order.toggled();
        debug!(
            "event=sort_toggle module=app status=ok order={:?}",
            self.view.sort_order
        );
        self.browse(0)
    }

    pub fn toggle_view_mode(&mut self) -> BrowseView {
        self.view.view_mode = self.view.view_mode.toggled();
        debug!(
            "event=view_toggle module=app status=ok mode={:?}",
            self.view.view_mode
        );
        self.browse(0)
    }

    /// Opens the detail pane from the browse screen, capturing its scroll.
    pub fn open_story(&mut self, id: &str, scroll_offset: usize) -> Option<DetailPane> {
        if self.service.find_story(id).is_none() {
            debug!("event=story_open module=app status=skipped reason=not_found story_id={id}");
            return None;
        }
        self.navigation.capture_scroll(scroll_offset);
        self.show_detail(id)
    }

    /// The story open in the detail pane, if the detail screen is current.
    pub fn open_story_id(&self) -> Option<&str> {
        if self.screen != ScreenKind::Detail {
            return None;
        }
        self.navigation
            .focus()
            .map(|focus| focus.story_id.as_str())
    }

    pub fn show_prev(&mut self) -> Option<DetailPane> {
        if self.screen != ScreenKind::Detail {
            return None;
        }
        let target = self.navigation.prev_target(&self.view.visible)?.clone();
        self.show_detail(&target)
    }

    pub fn show_next(&mut self) -> Option<DetailPane> {
        if self.screen != ScreenKind::Detail {
            return None;
        }
        let target = self.navigation.next_target(&self.view.visible)?.clone();
        self.show_detail(&target)
    }

    /// Leaves the detail pane and restores the captured scroll offset.
    pub fn close_detail(&mut self) -> BrowseView {
        self.return_to_browse()
    }

    /// Flips favorite on `id` and re-renders its detail pane.
    pub fn toggle_favorite(&mut self, id: &str) -> Option<DetailPane> {
        self.service.toggle_favorite(id)?;
        self.show_detail(id)
    }

    /// Deletes `id` once `confirm` agrees.
    ///
    /// Unknown ids and declined confirmations change nothing and return
    /// `None`; a confirmed delete returns to the browse screen.
    pub fn delete_story(
        &mut self,
        id: &str,
        confirm: impl FnOnce(&Story) -> bool,
    ) -> Option<BrowseView> {
        let story = self.service.find_story(id)?;
        if !confirm(story) {
            debug!("event=story_delete module=app status=skipped reason=declined story_id={id}");
            return None;
        }
        self.service.delete_story(id)?;
        Some(self.return_to_browse())
    }

    pub fn begin_new_story(&mut self) -> StoryForm {
        self.open_form(StoryForm::blank())
    }

    pub fn begin_edit_story(&mut self, id: &str) -> Option<StoryForm> {
        let form = StoryForm::prefill(self.service.find_story(id)?);
        Some(self.open_form(form))
    }

    /// The open form, if any.
    pub fn form(&self) -> Option<&StoryForm> {
        self.form.as_ref()
    }

    /// Commits the open form (create or edit).
    ///
    /// On validation failure the form stays open with `error` set and the
    /// error is returned.
    pub fn submit_form(&mut self, draft: StoryDraft) -> Result<BrowseView, StoryServiceError> {
        let editing = self.form.as_ref().and_then(|form| form.editing.clone());
        let result = match editing.as_deref() {
            Some(id) => self.service.update_story(id, &draft).map(|_| ()),
            None => self.service.create_story(&draft).map(|_| ()),
        };

        match result {
            Ok(()) => {
                self.form = None;
                Ok(self.browse(0))
            }
            Err(err) => {
                let form = self.form.get_or_insert_with(StoryForm::blank);
                form.title = draft.title;
                form.content = draft.content;
                form.tags = draft
                    .tag_fields
                    .iter()
                    .map(|field| field.trim())
                    .filter(|field| !field.is_empty())
                    .collect::<Vec<_>>()
                    .join(", ");
                form.error = Some(err.to_string());
                self.screen = ScreenKind::Form;
                Err(err)
            }
        }
    }

    pub fn cancel_form(&mut self) -> BrowseView {
        self.form = None;
        self.browse(0)
    }

    /// Pretty-printed snapshot of the whole collection.
    pub fn export_json(&self) -> DocumentResult<String> {
        export_document(self.service.list_stories())
    }

    pub fn export_to(&self, path: impl AsRef<Path>) -> DocumentResult<PathBuf> {
        write_export(path, self.service.list_stories())
    }

    fn open_form(&mut self, form: StoryForm) -> StoryForm {
        self.form = Some(form.clone());
        self.screen = ScreenKind::Form;
        form
    }

    fn show_detail(&mut self, id: &str) -> Option<DetailPane> {
        let story = self.service.find_story(id)?;
        self.navigation.open(&self.view.visible, id);
        self.screen = ScreenKind::Detail;
        Some(detail_pane(story, &self.navigation, self.view.visible.len()))
    }

    fn current_detail(&self) -> Option<DetailPane> {
        let focus = self.navigation.focus()?;
        let story = self.service.find_story(&focus.story_id)?;
        Some(detail_pane(story, &self.navigation, self.view.visible.len()))
    }

    fn return_to_browse(&mut self) -> BrowseView {
        let scroll_offset = self.navigation.close();
        self.browse(scroll_offset)
    }

    fn browse(&mut self, scroll_offset: usize) -> BrowseView {
        let stories = self.service.list_stories();
        let ViewState {
            visibility,
            filter,
            sort_order,
            view_mode,
            ..
        } = &self.view;

        let (body, visible) = match view_mode {
            ViewMode::List => {
                let listed = query(stories, *visibility, filter, *sort_order);
                let ids: Vec<StoryId> = listed.iter().map(|story| story.id.clone()).collect();
                (list_body(&listed), ids)
            }
            ViewMode::Timeline => {
                let groups = group_by_day(stories, *visibility, filter, *sort_order);
                (timeline_body(&groups), flatten_ids(&groups))
            }
        };

        let index = match self.tag_scope {
            TagScope::Collection => build_tag_index(stories),
            TagScope::Visible => {
                build_tag_index(stories.iter().filter(|story| visibility.admits(story)))
            }
        };

        let view = BrowseView {
            mode: *view_mode,
            visibility: *visibility,
            sort_order: *sort_order,
            filter: filter.clone(),
            chips: tag_chips(&index, filter),
            body,
            scroll_offset,
        };
        self.view.visible = visible;
        self.navigation.close();
        self.screen = ScreenKind::Browse;
        view
    }
}
