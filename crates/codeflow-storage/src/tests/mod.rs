use super::*;
use tempfile::tempdir;

#[test]
fn test_kv_store_table_is_created() -> Result<(), StorageError> {
    let storage = Storage::new_in_memory()?;

    let conn = storage.conn.lock();
    let mut stmt = conn.prepare("PRAGMA table_info('kv_store')")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    assert_eq!(columns, vec!["key", "value", "updated_at"]);
    drop(stmt);
    drop(conn);

    assert_eq!(storage.schema_version()?, SCHEMA_VERSION);
    Ok(())
}

#[test]
fn test_absent_credential_is_none() -> Result<(), StorageError> {
    let storage = Storage::new_in_memory()?;
    assert_eq!(storage.credential()?, None);
    Ok(())
}

#[test]
fn test_store_credential_overwrites_and_trims() -> Result<(), StorageError> {
    let storage = Storage::new_in_memory()?;

    assert_eq!(storage.store_credential("  first-key \n")?, "first-key");
    assert_eq!(storage.credential()?.as_deref(), Some("first-key"));

    storage.store_credential("second-key")?;
    assert_eq!(storage.credential()?.as_deref(), Some("second-key"));

    let conn = storage.conn.lock();
    let rows: i64 = conn.query_row("SELECT count(*) FROM kv_store", [], |row| row.get(0))?;
    assert_eq!(rows, 1);
    Ok(())
}

#[test]
fn test_empty_credential_is_rejected() -> Result<(), StorageError> {
    let storage = Storage::new_in_memory()?;
    storage.store_credential("kept")?;

    assert!(matches!(
        storage.store_credential("   "),
        Err(StorageError::EmptyCredential)
    ));
    assert_eq!(storage.credential()?.as_deref(), Some("kept"));
    Ok(())
}

#[test]
fn test_clear_credential() -> Result<(), StorageError> {
    let storage = Storage::new_in_memory()?;
    storage.store_credential("secret")?;
    storage.clear_credential()?;
    assert_eq!(storage.credential()?, None);
    // Clearing an absent credential is not an error.
    storage.clear_credential()?;
    Ok(())
}

#[test]
fn test_credential_survives_reopen() -> Result<(), StorageError> {
    let dir = tempdir().map_err(|e| StorageError::Other(e.to_string()))?;
    let path = dir.path().join("nested").join("codeflow.db");

    {
        let storage = Storage::open(&path)?;
        storage.store_credential("persisted-key")?;
        assert!(storage.updated_at(API_KEY_ENTRY)?.is_some());
    }

    let reopened = Storage::open(&path)?;
    assert_eq!(reopened.credential()?.as_deref(), Some("persisted-key"));
    Ok(())
}

#[test]
fn test_newer_schema_is_refused() -> Result<(), StorageError> {
    let dir = tempdir().map_err(|e| StorageError::Other(e.to_string()))?;
    let path = dir.path().join("codeflow.db");
    {
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "user_version", (SCHEMA_VERSION + 1).to_string())?;
    }

    assert!(matches!(Storage::open(&path), Err(StorageError::Other(_))));
    Ok(())
}

#[test]
fn test_memory_credentials() -> Result<(), StorageError> {
    let credentials = MemoryCredentials::new();
    assert_eq!(credentials.credential()?, None);

    credentials.store_credential(" abc ")?;
    assert_eq!(credentials.credential()?.as_deref(), Some("abc"));
    assert!(matches!(
        credentials.store_credential(""),
        Err(StorageError::EmptyCredential)
    ));

    credentials.clear_credential()?;
    assert_eq!(credentials.credential()?, None);

    let seeded = MemoryCredentials::with_credential("seed");
    assert_eq!(seeded.credential()?.as_deref(), Some("seed"));
    Ok(())
}
