use anyhow::Result;
use team_invite_bot::database::connection::DatabaseManager;
use team_invite_bot::error::DirectoryError;
use team_invite_bot::services::{AccessGate, Role, UserDirectory};
use tempfile::{tempdir, TempDir};

async fn setup_test_db() -> Result<(DatabaseManager, TempDir)> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().join("test.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let db_manager = DatabaseManager::new(&database_url).await?;
    db_manager.run_migrations().await?;

    Ok((db_manager, temp_dir))
}

fn gate(db: &DatabaseManager, admins: &[&str]) -> (UserDirectory, AccessGate) {
    let directory = UserDirectory::new(db.pool.clone());
    let admins = admins.iter().map(|s| s.to_string()).collect();
    (directory.clone(), AccessGate::new(directory, admins))
}

#[tokio::test]
async fn test_unregistered_actor_is_denied() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let (_, gate) = gate(&db, &["boss"]);

    assert!(!gate.check_registered(1).await);
    assert!(!gate.check_admin(1).await);

    Ok(())
}

#[tokio::test]
async fn test_member_and_admin_checks() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let (directory, gate) = gate(&db, &[]);

    directory.register(1, "member", 10, false).await?;
    directory.register(2, "boss", 20, true).await?;

    assert!(gate.check_registered(1).await);
    assert!(!gate.check_admin(1).await);
    assert!(gate.check_registered(2).await);
    assert!(gate.check_admin(2).await);

    Ok(())
}

#[tokio::test]
async fn test_checks_fail_closed_on_storage_error() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let (directory, gate) = gate(&db, &[]);

    directory.register(2, "boss", 20, true).await?;
    db.pool.close().await;

    assert!(!gate.check_registered(2).await);
    assert!(!gate.check_admin(2).await);
    assert!(directory.exists(2).await.is_err());

    Ok(())
}

#[tokio::test]
async fn test_configured_admin_handles_match_exactly() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let (_, gate) = gate(&db, &["Boss", "ops"]);

    assert!(gate.is_configured_admin_handle("Boss"));
    assert!(gate.is_configured_admin_handle("ops"));
    assert!(!gate.is_configured_admin_handle("boss"));
    assert!(!gate.is_configured_admin_handle("@Boss"));
    assert!(!gate.is_configured_admin_handle(""));

    Ok(())
}

#[tokio::test]
async fn test_empty_handle_never_matches() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let (_, gate) = gate(&db, &[""]);

    assert!(!gate.is_configured_admin_handle(""));

    Ok(())
}

#[tokio::test]
async fn test_privileged_admin_change() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let (directory, gate) = gate(&db, &[]);

    directory.register(1, "member", 10, false).await?;
    directory.set_admin_status(1, true).await?;
    assert!(gate.check_admin(1).await);

    directory.set_admin_status(1, false).await?;
    assert!(!gate.check_admin(1).await);

    let err = directory.set_admin_status(99, true).await.unwrap_err();
    assert!(matches!(err, DirectoryError::NotFound(99)));

    Ok(())
}

#[tokio::test]
async fn test_roles() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let (directory, _) = gate(&db, &[]);

    let member = directory.register(1, "member", 10, false).await?;
    let admin = directory.register(2, "boss", 20, true).await?;

    assert_eq!(Role::of(None), Role::Guest);
    assert_eq!(Role::of(Some(&member)), Role::Member);
    assert_eq!(Role::of(Some(&admin)), Role::Admin);

    Ok(())
}

#[tokio::test]
async fn test_directory_lookups() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let (directory, _) = gate(&db, &[]);

    directory.register(1, "member", 10, false).await?;

    assert_eq!(directory.get_by_handle("member").await?.map(|u| u.id), Some(1));
    assert_eq!(directory.get_by_chat(10).await?.map(|u| u.id), Some(1));
    assert!(directory.get_by_id(2).await?.is_none());

    let err = directory.set_personal_info(2, "A", "B").await.unwrap_err();
    assert!(matches!(err, DirectoryError::NotFound(2)));

    Ok(())
}

#[tokio::test]
async fn test_upsert_is_a_full_overwrite() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let (directory, gate) = gate(&db, &[]);

    let mut user = directory.register(1, "boss", 10, true).await?;
    user.is_admin = false;
    user.chat_id = 11;
    directory.upsert_user(&user).await?;

    assert!(!gate.check_admin(1).await);
    assert_eq!(directory.get_by_id(1).await?.map(|u| u.chat_id), Some(11));

    Ok(())
}
