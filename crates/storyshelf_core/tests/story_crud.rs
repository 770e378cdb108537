use chrono::Utc;
use storyshelf_core::{
    MemoryStoryRepository, RepoError, Story, StoryDraft, StoryRepository, StoryService,
    StoryServiceError, StoryValidationError,
};

fn service() -> StoryService<MemoryStoryRepository> {
    StoryService::new(MemoryStoryRepository::new())
}

#[test]
fn create_stores_trimmed_story_with_defaults() {
    let mut service = service();
    let before = Utc::now();
    let created = service
        .create_story(
            &StoryDraft::new("  Title ", " body \n")
                .with_tag_field("a, b")
                .with_tag_field("  ")
                .with_tag_field("c"),
        )
        .unwrap();
    let after = Utc::now();

    let loaded = service.find_story(&created.id).unwrap();
    assert_eq!(loaded, &created);
    assert_eq!(loaded.title, "Title");
    assert_eq!(loaded.content, "body");
    assert_eq!(loaded.tags, vec!["a", "b", "c"]);
    assert!(!loaded.favorite);
    assert!(loaded.created_at >= before && loaded.created_at <= after);
}

#[test]
fn create_prepends_to_collection_order() {
    let mut service = service();
    let first = service.create_story(&StoryDraft::new("1", "x")).unwrap();
    let second = service.create_story(&StoryDraft::new("2", "y")).unwrap();

    assert_eq!(service.story_ids(), vec![second.id, first.id]);
}

#[test]
fn create_rejects_empty_title_and_leaves_store_unchanged() {
    let mut service = service();
    let err = service.create_story(&StoryDraft::new("", "body")).unwrap_err();

    assert_eq!(err, StoryServiceError::Validation(StoryValidationError::EmptyTitle));
    assert!(service.list_stories().is_empty());

    let err = service.create_story(&StoryDraft::new("t", "   ")).unwrap_err();
    assert_eq!(err, StoryServiceError::Validation(StoryValidationError::EmptyContent));
    assert!(service.list_stories().is_empty());
}

#[test]
fn update_replaces_editable_fields_only() {
    let mut service = service();
    let created = service
        .create_story(&StoryDraft::new("old", "old body").with_tag_field("x"))
        .unwrap();
    service.toggle_favorite(&created.id);

    let updated = service
        .update_story(&created.id, &StoryDraft::new("new", "new body").with_tag_field("y z"))
        .unwrap()
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.favorite);
    assert_eq!(updated.title, "new");
    assert_eq!(updated.content, "new body");
    assert_eq!(updated.tags, vec!["y", "z"]);
}

#[test]
fn update_unknown_id_is_a_no_op() {
    let mut service = service();
    let created = service.create_story(&StoryDraft::new("t", "c")).unwrap();

    let result = service
        .update_story("missing", &StoryDraft::new("n", "m"))
        .unwrap();
    assert!(result.is_none());
    assert_eq!(service.list_stories(), &[created]);
}

#[test]
fn update_with_blank_content_keeps_previous_values() {
    let mut service = service();
    let created = service.create_story(&StoryDraft::new("t", "c")).unwrap();

    let err = service
        .update_story(&created.id, &StoryDraft::new("t2", " "))
        .unwrap_err();
    assert!(matches!(err, StoryServiceError::Validation(_)));
    assert_eq!(service.find_story(&created.id), Some(&created));
}

#[test]
fn toggle_favorite_flips_and_misses_silently() {
    let mut service = service();
    let created = service.create_story(&StoryDraft::new("t", "c")).unwrap();

    assert_eq!(service.toggle_favorite(&created.id), Some(true));
    assert_eq!(service.toggle_favorite(&created.id), Some(false));
    assert_eq!(service.toggle_favorite("missing"), None);
}

#[test]
fn delete_removes_story_and_ignores_unknown_ids() {
    let mut service = service();
    let keep = service.create_story(&StoryDraft::new("keep", "c")).unwrap();
    let doomed = service.create_story(&StoryDraft::new("drop", "c")).unwrap();

    assert!(service.delete_story("missing").is_none());
    assert_eq!(service.list_stories().len(), 2);

    let removed = service.delete_story(&doomed.id).unwrap();
    assert_eq!(removed.id, doomed.id);
    assert_eq!(service.story_ids(), vec![keep.id]);
    assert!(service.find_story(&doomed.id).is_none());
}

#[test]
fn repository_rejects_duplicate_ids() {
    let created_at = Utc::now();
    let mut repo = MemoryStoryRepository::new();
    repo.insert_front(Story::with_id("same", "a", "b", Vec::new(), created_at))
        .unwrap();

    let err = repo
        .insert_front(Story::with_id("same", "c", "d", Vec::new(), created_at))
        .unwrap_err();
    assert_eq!(err, RepoError::DuplicateId("same".to_string()));

    let err = MemoryStoryRepository::from_stories(vec![
        Story::with_id("dup", "a", "b", Vec::new(), created_at),
        Story::with_id("dup", "c", "d", Vec::new(), created_at),
    ])
    .unwrap_err();
    assert_eq!(err, RepoError::DuplicateId("dup".to_string()));
}
