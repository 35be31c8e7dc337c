use lifedesk_core::db::open_db_in_memory;
use lifedesk_core::{
    AuthContext, LockRegistryGuard, LockRepository, LockService, LockServiceError, LockState,
    ModuleId, ResourceGuard, ResourceKind, SqliteLockRepository, ROLE_SEE_LOCKED_RESOURCES,
};

fn setup() -> rusqlite::Connection {
    open_db_in_memory().unwrap()
}

#[test]
fn toggle_flips_between_locked_and_unlocked() {
    let conn = setup();
    let service = LockService::new(SqliteLockRepository::new(&conn));

    let state = service
        .toggle_lock("note-1", ResourceKind::Entity, ModuleId::Notes)
        .unwrap();
    assert_eq!(state, LockState::Locked);
    assert!(service
        .is_locked("note-1", ResourceKind::Entity, ModuleId::Notes)
        .unwrap());

    let state = service
        .toggle_lock("note-1", ResourceKind::Entity, ModuleId::Notes)
        .unwrap();
    assert_eq!(state, LockState::Unlocked);
    assert!(!service
        .is_locked("note-1", ResourceKind::Entity, ModuleId::Notes)
        .unwrap());
}

#[test]
fn toggle_rejects_blank_resource_id() {
    let conn = setup();
    let service = LockService::new(SqliteLockRepository::new(&conn));

    let err = service
        .toggle_lock("   ", ResourceKind::Entity, ModuleId::Notes)
        .unwrap_err();
    assert!(matches!(err, LockServiceError::InvalidResourceId));
}

#[test]
fn lock_is_scoped_to_the_full_triple() {
    let conn = setup();
    let service = LockService::new(SqliteLockRepository::new(&conn));

    service
        .toggle_lock("shared-id", ResourceKind::Entity, ModuleId::Notes)
        .unwrap();

    assert!(!service
        .is_locked("shared-id", ResourceKind::Entity, ModuleId::NotesCategory)
        .unwrap());
    assert!(!service
        .is_locked("shared-id", ResourceKind::Directory, ModuleId::Notes)
        .unwrap());
}

#[test]
fn list_locks_is_sorted_and_reflects_toggles() {
    let conn = setup();
    let service = LockService::new(SqliteLockRepository::new(&conn));

    service
        .toggle_lock("b", ResourceKind::Entity, ModuleId::Todo)
        .unwrap();
    service
        .toggle_lock("a", ResourceKind::Entity, ModuleId::Notes)
        .unwrap();
    service
        .toggle_lock("files/private", ResourceKind::Directory, ModuleId::Notes)
        .unwrap();

    let locks = service.list_locks().unwrap();
    assert_eq!(locks.len(), 3);
    assert_eq!(locks[0].module, ModuleId::Notes);
    assert_eq!(locks[0].resource_id, "files/private");
    assert_eq!(locks[1].resource_id, "a");
    assert_eq!(locks[2].module, ModuleId::Todo);

    service
        .toggle_lock("b", ResourceKind::Entity, ModuleId::Todo)
        .unwrap();
    assert_eq!(service.list_locks().unwrap().len(), 2);
}

#[test]
fn guard_denies_locked_resource_without_role() {
    let conn = setup();
    let locks = SqliteLockRepository::new(&conn);
    locks
        .insert_lock("note-1", ResourceKind::Entity, ModuleId::Notes)
        .unwrap();

    let context = AuthContext::new();
    let guard = LockRegistryGuard::new(&locks, &context);

    assert!(!guard
        .is_allowed_to_see("note-1", ResourceKind::Entity, ModuleId::Notes)
        .unwrap());
    assert!(guard
        .is_allowed_to_see("note-2", ResourceKind::Entity, ModuleId::Notes)
        .unwrap());
}

#[test]
fn unlock_role_bypasses_lock_markers() {
    let conn = setup();
    let locks = SqliteLockRepository::new(&conn);
    locks
        .insert_lock("note-1", ResourceKind::Entity, ModuleId::Notes)
        .unwrap();

    let context = AuthContext::with_roles([ROLE_SEE_LOCKED_RESOURCES]);
    let guard = LockRegistryGuard::new(&locks, &context);

    assert!(guard
        .is_allowed_to_see("note-1", ResourceKind::Entity, ModuleId::Notes)
        .unwrap());
}

#[test]
fn revoking_the_role_restores_lock_enforcement() {
    let conn = setup();
    let locks = SqliteLockRepository::new(&conn);
    locks
        .insert_lock("note-1", ResourceKind::Entity, ModuleId::Notes)
        .unwrap();

    let mut context = AuthContext::with_roles([ROLE_SEE_LOCKED_RESOURCES]);
    context.revoke_roles([ROLE_SEE_LOCKED_RESOURCES]);
    let guard = LockRegistryGuard::new(&locks, &context);

    assert!(!guard
        .is_allowed_to_see("note-1", ResourceKind::Entity, ModuleId::Notes)
        .unwrap());
}
