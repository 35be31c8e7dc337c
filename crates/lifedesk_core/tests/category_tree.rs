use lifedesk_core::db::open_db_in_memory;
use lifedesk_core::{
    CategoryRepoError, CategoryRepository, CategoryService, CategoryServiceError, Note,
    NoteRepository, SqliteCategoryRepository, SqliteNoteRepository,
};
use uuid::Uuid;

fn setup() -> rusqlite::Connection {
    open_db_in_memory().unwrap()
}

fn insert_note(conn: &rusqlite::Connection, category_uuid: Uuid, title: &str) -> Note {
    let note = Note {
        uuid: Uuid::new_v4(),
        category_uuid,
        title: title.to_string(),
        body: String::new(),
        preview_text: None,
        is_deleted: false,
        created_at: 0,
        updated_at: 0,
    };
    SqliteNoteRepository::new(conn).create_note(&note).unwrap();
    note
}

#[test]
fn repository_requires_migrated_connection() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    let err = SqliteCategoryRepository::try_new(&conn).unwrap_err();
    assert!(matches!(
        err,
        CategoryRepoError::UninitializedConnection { .. }
    ));
}

#[test]
fn create_and_list_children_keeps_deterministic_order() {
    let conn = setup();
    let repo = SqliteCategoryRepository::try_new(&conn).unwrap();
    let service = CategoryService::new(repo);

    let root = service.create_category(None, "Root", None).unwrap();
    let alpha = service
        .create_category(Some(root.uuid), "Alpha", None)
        .unwrap();
    let beta = service
        .create_category(Some(root.uuid), "Beta", None)
        .unwrap();

    let roots = service.list_children(None).unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].uuid, root.uuid);

    let children = service.list_children(Some(root.uuid)).unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].uuid, alpha.uuid);
    assert_eq!(children[1].uuid, beta.uuid);
}

#[test]
fn create_rejects_blank_name_and_missing_parent() {
    let conn = setup();
    let repo = SqliteCategoryRepository::try_new(&conn).unwrap();
    let service = CategoryService::new(repo);

    let err = service.create_category(None, "   ", None).unwrap_err();
    assert!(matches!(err, CategoryServiceError::InvalidName));

    let ghost = Uuid::new_v4();
    let err = service.create_category(Some(ghost), "Child", None).unwrap_err();
    assert!(matches!(err, CategoryServiceError::ParentNotFound(id) if id == ghost));
}

#[test]
fn rename_and_soft_delete_category() {
    let conn = setup();
    let repo = SqliteCategoryRepository::try_new(&conn).unwrap();
    let service = CategoryService::new(repo);

    let category = service.create_category(None, "Old name", None).unwrap();
    service.rename_category(category.uuid, "New name").unwrap();

    let renamed = service.get_category(category.uuid).unwrap().unwrap();
    assert_eq!(renamed.name, "New name");

    service.soft_delete_category(category.uuid).unwrap();
    assert!(service.get_category(category.uuid).unwrap().is_none());

    let err = service.rename_category(category.uuid, "Again").unwrap_err();
    assert!(matches!(err, CategoryServiceError::CategoryNotFound(id) if id == category.uuid));
}

#[test]
fn any_has_notes_answers_per_id_set() {
    let conn = setup();
    let repo = SqliteCategoryRepository::try_new(&conn).unwrap();

    let with_notes = repo.create_category(None, "Has notes", None).unwrap();
    let without_notes = repo.create_category(None, "Empty", None).unwrap();
    insert_note(&conn, with_notes.uuid, "A note");

    assert!(repo.any_has_notes(&[with_notes.uuid]).unwrap());
    assert!(!repo.any_has_notes(&[without_notes.uuid]).unwrap());
    assert!(repo
        .any_has_notes(&[without_notes.uuid, with_notes.uuid])
        .unwrap());
    assert!(!repo.any_has_notes(&[]).unwrap());
}

#[test]
fn any_has_notes_ignores_soft_deleted_notes() {
    let conn = setup();
    let repo = SqliteCategoryRepository::try_new(&conn).unwrap();
    let notes = SqliteNoteRepository::new(&conn);

    let category = repo.create_category(None, "Docs", None).unwrap();
    let note = insert_note(&conn, category.uuid, "Tombstoned");
    notes.soft_delete_note(note.uuid).unwrap();

    assert!(!repo.any_has_notes(&[category.uuid]).unwrap());
}

#[test]
fn children_ids_unions_over_the_id_set() {
    let conn = setup();
    let repo = SqliteCategoryRepository::try_new(&conn).unwrap();

    let left = repo.create_category(None, "Left", None).unwrap();
    let right = repo.create_category(None, "Right", None).unwrap();
    let left_child = repo
        .create_category(Some(left.uuid), "Left child", None)
        .unwrap();
    let right_child = repo
        .create_category(Some(right.uuid), "Right child", None)
        .unwrap();

    let mut expected = vec![left_child.uuid, right_child.uuid];
    expected.sort();

    let ids = repo.children_ids(&[left.uuid, right.uuid]).unwrap();
    assert_eq!(ids, expected);
    assert!(repo.children_ids(&[]).unwrap().is_empty());
}

#[test]
fn children_ids_skips_soft_deleted_children() {
    let conn = setup();
    let repo = SqliteCategoryRepository::try_new(&conn).unwrap();

    let root = repo.create_category(None, "Root", None).unwrap();
    let child = repo.create_category(Some(root.uuid), "Child", None).unwrap();
    repo.soft_delete_category(child.uuid).unwrap();

    assert!(repo.children_ids(&[root.uuid]).unwrap().is_empty());
}
