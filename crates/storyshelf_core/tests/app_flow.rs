use storyshelf_core::model::story::parse_timestamp;
use storyshelf_core::{
    BrowseBody, ContentSegment, Filter, MemoryStoryRepository, Screen, ShelfApp, SortOrder, Story,
    StoryDraft, StoryServiceError, TagScope, ViewMode, Visibility,
};

fn story(id: &str, tags: &[&str], favorite: bool, created_at: &str) -> Story {
    let mut story = Story::with_id(
        id,
        format!("title {id}"),
        format!("body {id}"),
        tags.iter().map(|tag| tag.to_string()).collect(),
        parse_timestamp(created_at).unwrap(),
    );
    story.favorite = favorite;
    story
}

fn app_with(scope: TagScope) -> ShelfApp {
    let repo = MemoryStoryRepository::from_stories(vec![
        story("p1", &["x", "CP:Bob"], false, "2024-01-02T10:00:00Z"),
        story("p2", &["y"], true, "2024-01-02T08:00:00Z"),
        story("s1", &["secret", "hidden"], false, "2024-01-01T00:00:00Z"),
    ])
    .unwrap();
    ShelfApp::new(repo, scope)
}

fn card_ids(body: &BrowseBody) -> Vec<String> {
    match body {
        BrowseBody::List(cards) => cards.iter().map(|card| card.id.clone()).collect(),
        BrowseBody::Timeline(sections) => sections
            .iter()
            .flat_map(|section| section.cards.iter().map(|card| card.id.clone()))
            .collect(),
    }
}

#[test]
fn initial_render_is_non_secret_newest_first_list() {
    let mut app = app_with(TagScope::Collection);
    let Screen::Browse(view) = app.render() else {
        panic!("expected browse screen");
    };

    assert_eq!(view.mode, ViewMode::List);
    assert_eq!(view.visibility, Visibility::NonSecret);
    assert_eq!(view.sort_order, SortOrder::Desc);
    assert_eq!(view.filter, Filter::None);
    assert_eq!(card_ids(&view.body), vec!["p1", "p2"]);
    assert_eq!(view.scroll_offset, 0);
}

#[test]
fn chips_cover_whole_collection_by_default() {
    let mut app = app_with(TagScope::Collection);
    let view = app.select_filter(Filter::Tag("x".to_string()));

    let fixed: Vec<&str> = view.chips.fixed.iter().map(|chip| chip.label.as_str()).collect();
    assert_eq!(fixed, vec!["show all", "favorites"]);
    assert_eq!(view.chips.cp.len(), 1);
    assert_eq!(view.chips.cp[0].label, "#Bob");
    assert!(view.chips.cp[0].emphasized);
    assert_eq!(view.chips.cp[0].filter, Filter::Tag("CP:Bob".to_string()));

    let general: Vec<(&str, bool)> = view
        .chips
        .general
        .iter()
        .map(|chip| (chip.label.as_str(), chip.active))
        .collect();
    assert_eq!(general, vec![("#hidden", false), ("#x", true), ("#y", false)]);
}

#[test]
fn visible_tag_scope_hides_tags_of_the_other_partition() {
    let mut app = app_with(TagScope::Visible);
    let view = app.select_filter(Filter::None);
    let general: Vec<&str> = view.chips.general.iter().map(|chip| chip.label.as_str()).collect();
    assert_eq!(general, vec!["#x", "#y"]);

    let secret_view = app.toggle_secret();
    assert!(secret_view.chips.cp.is_empty());
    let general: Vec<&str> = secret_view
        .chips
        .general
        .iter()
        .map(|chip| chip.label.as_str())
        .collect();
    assert_eq!(general, vec!["#hidden"]);
}

#[test]
fn toggles_keep_filter_and_view_mode() {
    let mut app = app_with(TagScope::Collection);
    app.select_filter(Filter::FavoritesOnly);

    let timeline = app.toggle_view_mode();
    assert_eq!(timeline.mode, ViewMode::Timeline);
    assert_eq!(timeline.filter, Filter::FavoritesOnly);
    assert_eq!(card_ids(&timeline.body), vec!["p2"]);

    let chip_view = app.select_filter(Filter::None);
    assert_eq!(chip_view.mode, ViewMode::Timeline);
    assert_eq!(card_ids(&chip_view.body), vec!["p1", "p2"]);

    let sorted = app.toggle_sort();
    assert_eq!(sorted.sort_order, SortOrder::Asc);
    assert_eq!(card_ids(&sorted.body), vec!["p2", "p1"]);

    let secret = app.toggle_secret();
    assert_eq!(secret.visibility, Visibility::SecretOnly);
    assert_eq!(card_ids(&secret.body), vec!["s1"]);
    assert_eq!(app.visible_story_ids(), &["s1".to_string()][..]);
}

#[test]
fn new_story_form_commits_and_returns_to_browse() {
    let mut app = app_with(TagScope::Collection);
    let form = app.begin_new_story();
    assert!(form.editing.is_none());
    assert!(matches!(app.render(), Screen::Form(_)));

    let view = app
        .submit_form(
            StoryDraft::new("Fresh", "CP:Alice\nmore")
                .with_tag_field("CP:Alice new")
                .with_tag_field(""),
        )
        .unwrap();

    assert!(app.form().is_none());
    assert_eq!(app.stories().len(), 4);
    let created = &app.stories()[0];
    assert_eq!(created.tags, vec!["CP:Alice", "new"]);
    assert!(card_ids(&view.body).contains(&created.id));
}

#[test]
fn invalid_submit_keeps_form_open_with_message() {
    let mut app = app_with(TagScope::Collection);
    app.begin_new_story();

    let err = app
        .submit_form(StoryDraft::new("", "body").with_tag_field("t"))
        .unwrap_err();
    assert!(matches!(err, StoryServiceError::Validation(_)));
    assert_eq!(app.stories().len(), 3);

    let Screen::Form(form) = app.render() else {
        panic!("form should stay open");
    };
    assert_eq!(form.content, "body");
    assert!(form.error.unwrap().contains("required"));
}

#[test]
fn edit_form_prefills_and_updates_in_place() {
    let mut app = app_with(TagScope::Collection);
    let form = app.begin_edit_story("p1").unwrap();
    assert_eq!(form.editing.as_deref(), Some("p1"));
    assert_eq!(form.title, "title p1");
    assert_eq!(form.tags, "x, CP:Bob");

    app.submit_form(StoryDraft::new("renamed", "new body").with_tag_field(&form.tags))
        .unwrap();

    let story = app.find_story("p1").unwrap();
    assert_eq!(story.title, "renamed");
    assert_eq!(story.tags, vec!["x", "CP:Bob"]);
    assert_eq!(app.stories()[0].id, "p1");
    assert!(app.begin_edit_story("missing").is_none());
}

#[test]
fn cancel_form_discards_input() {
    let mut app = app_with(TagScope::Collection);
    app.begin_new_story();
    let view = app.cancel_form();

    assert!(app.form().is_none());
    assert_eq!(card_ids(&view.body), vec!["p1", "p2"]);
}

#[test]
fn favorite_toggle_rerenders_detail() {
    let mut app = app_with(TagScope::Collection);
    app.render();
    let pane = app.open_story("p1", 0).unwrap();
    assert!(!pane.favorite);

    let pane = app.toggle_favorite("p1").unwrap();
    assert!(pane.favorite);
    assert!(matches!(app.render(), Screen::Detail(ref detail) if detail.favorite));
    assert!(app.toggle_favorite("missing").is_none());
}

#[test]
fn delete_requires_confirmation() {
    let mut app = app_with(TagScope::Collection);
    app.render();
    app.open_story("p2", 64).unwrap();

    assert!(app.delete_story("p2", |_| false).is_none());
    assert!(app.find_story("p2").is_some());
    assert!(matches!(app.render(), Screen::Detail(_)));

    let mut asked = None;
    let view = app
        .delete_story("p2", |story| {
            asked = Some(story.title.clone());
            true
        })
        .unwrap();
    assert_eq!(asked.as_deref(), Some("title p2"));
    assert!(app.find_story("p2").is_none());
    assert_eq!(view.scroll_offset, 64);
    assert_eq!(card_ids(&view.body), vec!["p1"]);

    assert!(app.delete_story("p2", |_| true).is_none());
    assert_eq!(app.stories().len(), 2);
}

#[test]
fn detail_pane_formats_cp_content() {
    let mut app = app_with(TagScope::Collection);
    app.begin_new_story();
    app.submit_form(StoryDraft::new("t", "CP:Alice & Bob\nline")).unwrap();
    let id = app.stories()[0].id.clone();

    let pane = app.open_story(&id, 0).unwrap();
    assert_eq!(
        pane.content,
        vec![
            ContentSegment::Emphasis("Alice & Bob".to_string()),
            ContentSegment::LineBreak,
            ContentSegment::Text("line".to_string()),
        ]
    );
    assert_eq!(pane.position, Some(0));
}

#[test]
fn export_json_reflects_in_memory_state() {
    let mut app = app_with(TagScope::Collection);
    app.delete_story("s1", |_| true).unwrap();

    let exported = app.export_json().unwrap();
    let parsed: Vec<serde_json::Value> = serde_json::from_str(&exported).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0]["id"], "p1");
}
