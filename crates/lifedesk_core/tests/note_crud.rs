use lifedesk_core::db::open_db_in_memory;
use lifedesk_core::{
    CategoryRepository, NoteService, NoteServiceError, SqliteCategoryRepository,
    SqliteNoteRepository,
};
use uuid::Uuid;

fn setup() -> rusqlite::Connection {
    open_db_in_memory().unwrap()
}

fn create_category(conn: &rusqlite::Connection, name: &str) -> Uuid {
    SqliteCategoryRepository::try_new(conn)
        .unwrap()
        .create_category(None, name, None)
        .unwrap()
        .uuid
}

fn note_service(
    conn: &rusqlite::Connection,
) -> NoteService<SqliteCategoryRepository<'_>, SqliteNoteRepository<'_>> {
    NoteService::new(
        SqliteCategoryRepository::try_new(conn).unwrap(),
        SqliteNoteRepository::new(conn),
    )
}

#[test]
fn create_note_derives_preview_text() {
    let conn = setup();
    let category = create_category(&conn, "Journal");
    let service = note_service(&conn);

    let note = service
        .create_note(category, "Trip plan", "# Plan\n\n- pack **bags**")
        .unwrap();

    assert_eq!(note.category_uuid, category);
    assert_eq!(note.title, "Trip plan");
    let preview = note.preview_text.unwrap();
    assert!(preview.contains("Plan"));
    assert!(!preview.contains('#'));
    assert!(!preview.contains('*'));
}

#[test]
fn create_note_rejects_blank_title() {
    let conn = setup();
    let category = create_category(&conn, "Journal");
    let service = note_service(&conn);

    let err = service.create_note(category, "   ", "body").unwrap_err();
    assert!(matches!(err, NoteServiceError::InvalidTitle));
}

#[test]
fn update_note_replaces_content_and_recomputes_preview() {
    let conn = setup();
    let category = create_category(&conn, "Journal");
    let service = note_service(&conn);

    let note = service.create_note(category, "Draft", "first body").unwrap();
    let updated = service
        .update_note(note.uuid, "Final", "second body")
        .unwrap();

    assert_eq!(updated.uuid, note.uuid);
    assert_eq!(updated.title, "Final");
    assert_eq!(updated.body, "second body");
    assert_eq!(updated.preview_text.as_deref(), Some("second body"));
}

#[test]
fn create_note_under_soft_deleted_category_is_rejected() {
    let conn = setup();
    let category = create_category(&conn, "Doomed");
    SqliteCategoryRepository::try_new(&conn)
        .unwrap()
        .soft_delete_category(category)
        .unwrap();
    let service = note_service(&conn);

    let err = service.create_note(category, "Orphan", "body").unwrap_err();
    assert!(matches!(err, NoteServiceError::CategoryNotFound(id) if id == category));
}

#[test]
fn create_note_under_unknown_category_is_rejected() {
    let conn = setup();
    let service = note_service(&conn);

    let ghost = Uuid::new_v4();
    let err = service.create_note(ghost, "Orphan", "body").unwrap_err();
    assert!(matches!(err, NoteServiceError::CategoryNotFound(id) if id == ghost));
}

#[test]
fn update_note_under_soft_deleted_category_is_rejected() {
    let conn = setup();
    let category = create_category(&conn, "Doomed");
    let service = note_service(&conn);
    let note = service.create_note(category, "Draft", "body").unwrap();

    SqliteCategoryRepository::try_new(&conn)
        .unwrap()
        .soft_delete_category(category)
        .unwrap();

    let err = service
        .update_note(note.uuid, "Final", "new body")
        .unwrap_err();
    assert!(matches!(err, NoteServiceError::CategoryNotFound(id) if id == category));
}

#[test]
fn update_missing_note_returns_not_found() {
    let conn = setup();
    let service = note_service(&conn);

    let ghost = Uuid::new_v4();
    let err = service.update_note(ghost, "Title", "body").unwrap_err();
    assert!(matches!(err, NoteServiceError::NoteNotFound(id) if id == ghost));
}

#[test]
fn soft_deleted_note_disappears_from_reads() {
    let conn = setup();
    let category = create_category(&conn, "Journal");
    let service = note_service(&conn);

    let note = service.create_note(category, "Gone soon", "body").unwrap();
    service.soft_delete_note(note.uuid).unwrap();

    assert!(service.get_note(note.uuid).unwrap().is_none());
    assert!(service
        .notes_for_categories(&[category])
        .unwrap()
        .is_empty());

    let err = service.soft_delete_note(note.uuid).unwrap_err();
    assert!(matches!(err, NoteServiceError::NoteNotFound(id) if id == note.uuid));
}

#[test]
fn notes_for_categories_spans_the_id_set_in_insertion_order() {
    let conn = setup();
    let first_category = create_category(&conn, "First");
    let second_category = create_category(&conn, "Second");
    let service = note_service(&conn);

    let a = service.create_note(first_category, "A", "").unwrap();
    let b = service.create_note(second_category, "B", "").unwrap();
    let c = service.create_note(first_category, "C", "").unwrap();

    let notes = service
        .notes_for_categories(&[first_category, second_category])
        .unwrap();
    let titles: Vec<&str> = notes.iter().map(|note| note.title.as_str()).collect();
    assert_eq!(notes.len(), 3);
    assert!(titles.contains(&"A"));
    assert!(titles.contains(&"B"));
    assert!(titles.contains(&"C"));
    assert!(notes.iter().any(|note| note.uuid == a.uuid));
    assert!(notes.iter().any(|note| note.uuid == b.uuid));
    assert!(notes.iter().any(|note| note.uuid == c.uuid));
}

#[test]
fn notes_under_soft_deleted_category_are_not_listed() {
    let conn = setup();
    let category = create_category(&conn, "Doomed");
    let service = note_service(&conn);
    let note = service.create_note(category, "Survivor", "body").unwrap();

    SqliteCategoryRepository::try_new(&conn)
        .unwrap()
        .soft_delete_category(category)
        .unwrap();

    assert!(service.notes_for_categories(&[category]).unwrap().is_empty());
    // The note record itself is untouched by the category tombstone.
    assert!(service.get_note(note.uuid).unwrap().is_some());
}

#[test]
fn note_serializes_with_stable_field_names() {
    let conn = setup();
    let category = create_category(&conn, "Journal");
    let service = note_service(&conn);

    let note = service.create_note(category, "Wire shape", "body").unwrap();
    let value = serde_json::to_value(&note).unwrap();

    assert!(value.get("uuid").is_some());
    assert!(value.get("category_uuid").is_some());
    assert!(value.get("title").is_some());
    assert!(value.get("body").is_some());
    assert!(value.get("preview_text").is_some());
    assert_eq!(value.get("is_deleted").unwrap(), false);
}
