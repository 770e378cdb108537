use storyshelf_core::{
    export_document, load_document, parse_document, write_export, LoadStatus, ShelfApp,
    StoryDraft, TagScope,
};
use tempfile::TempDir;

const SAMPLE_DOCUMENT: &str = r#"[
  {
    "id": "1",
    "title": "A",
    "content": "x",
    "tags": ["secret"],
    "favorite": false,
    "createdAt": "2024-01-01T00:00:00Z"
  },
  {
    "id": "2",
    "title": "B",
    "content": "CP:bold\nrest",
    "tags": ["x", "CP:Alice"],
    "favorite": true,
    "createdAt": "2024-02-01T00:00:00.000Z"
  }
]"#;

fn write_file(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn load_reads_stories_in_document_order() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "stories.json", SAMPLE_DOCUMENT);

    let loaded = load_document(&path);
    assert_eq!(loaded.status, LoadStatus::Loaded { count: 2, dropped: 0 });
    let ids: Vec<&str> = loaded.stories.iter().map(|story| story.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert!(loaded.stories[1].favorite);
}

#[test]
fn missing_document_falls_back_to_empty_collection() {
    let dir = TempDir::new().unwrap();
    let loaded = load_document(dir.path().join("absent.json"));

    assert!(loaded.stories.is_empty());
    assert!(matches!(loaded.status, LoadStatus::Fallback { .. }));
}

#[test]
fn malformed_document_falls_back_to_empty_collection() {
    let dir = TempDir::new().unwrap();
    for (name, body) in [
        ("not-json.json", "{ nope"),
        ("not-array.json", r#"{"id": "1"}"#),
        ("bad-date.json", r#"[{"id":"1","title":"t","content":"c","tags":[],"favorite":false,"createdAt":"soon"}]"#),
    ] {
        let loaded = load_document(write_file(&dir, name, body));
        assert!(loaded.stories.is_empty(), "{name}");
        assert!(matches!(loaded.status, LoadStatus::Fallback { .. }), "{name}");
    }
}

#[test]
fn duplicate_ids_keep_the_first_record() {
    let raw = r#"[
        {"id":"1","title":"first","content":"c","tags":[],"favorite":false,"createdAt":"2024-01-01T00:00:00Z"},
        {"id":"1","title":"second","content":"c","tags":[],"favorite":false,"createdAt":"2024-01-02T00:00:00Z"}
    ]"#;

    let (stories, dropped) = parse_document(raw).unwrap();
    assert_eq!(dropped, 1);
    assert_eq!(stories.len(), 1);
    assert_eq!(stories[0].title, "first");
}

#[test]
fn export_is_pretty_printed_with_two_spaces() {
    let (stories, _) = parse_document(SAMPLE_DOCUMENT).unwrap();
    let exported = export_document(&stories).unwrap();

    assert!(exported.starts_with("[\n  {\n    \"id\": \"1\",\n    \"title\": \"A\","));
    assert!(exported.contains("\"createdAt\": \"2024-01-01T00:00:00Z\""));
    assert_eq!(export_document(&[]).unwrap(), "[]");
}

const PRECISE_DOCUMENT: &str = r#"[
  {"id":"1","title":"A","content":"x","tags":["secret"],"favorite":false,"createdAt":"2024-01-01T00:00:00.123456Z"},
  {"id":"2","title":"B","content":"CP:bold\nrest","tags":["x","CP:Alice"],"favorite":true,"createdAt":"2024-02-01T00:00:00+09:00"}
]"#;

#[test]
fn export_then_reload_round_trips_every_field() {
    let dir = TempDir::new().unwrap();
    let source = write_file(&dir, "stories.json", PRECISE_DOCUMENT);
    let mut app = ShelfApp::from_document(load_document(&source), TagScope::Collection).unwrap();
    app.begin_new_story();
    app.submit_form(StoryDraft::new("new", "fresh body").with_tag_field("a b"))
        .unwrap();
    let first_id = app.stories()[0].id.clone();
    app.toggle_favorite(&first_id).unwrap();

    let target = dir.path().join("out").join("stories.json");
    let written = app.export_to(&target).unwrap();
    assert_eq!(written, target);

    let reloaded = load_document(&target);
    assert_eq!(reloaded.status, LoadStatus::Loaded { count: 3, dropped: 0 });
    assert_eq!(reloaded.stories, app.stories());

    let exported = std::fs::read_to_string(&target).unwrap();
    assert!(exported.contains("\"createdAt\": \"2024-01-01T00:00:00.123456Z\""));
}

#[test]
fn write_export_reports_unwritable_target() {
    let dir = TempDir::new().unwrap();
    let blocker = write_file(&dir, "blocker", "file, not a directory");

    let err = write_export(blocker.join("stories.json"), &[]).unwrap_err();
    assert!(err.to_string().contains("stories.json"), "unexpected error: {err}");
}
