use super::*;

/// Key of the single persisted credential row.
pub const API_KEY_ENTRY: &str = "gemini-store.api_key";

/// Access to the one opaque model credential. Absence is a normal state.
pub trait CredentialProvider: Send + Sync {
    fn credential(&self) -> Result<Option<String>, StorageError>;

    /// Trims and durably stores `value`, replacing any previous credential.
    /// Returns the value actually stored.
    fn store_credential(&self, value: &str) -> Result<String, StorageError>;

    fn clear_credential(&self) -> Result<(), StorageError>;
}

fn normalize(value: &str) -> Result<String, StorageError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StorageError::EmptyCredential);
    }
    Ok(trimmed.to_string())
}

impl CredentialProvider for Storage {
    fn credential(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .get_value(API_KEY_ENTRY)?
            .filter(|value| !value.is_empty()))
    }

    fn store_credential(&self, value: &str) -> Result<String, StorageError> {
        let value = normalize(value)?;
        self.set_value(API_KEY_ENTRY, &value)?;
        tracing::info!("stored model credential");
        Ok(value)
    }

    fn clear_credential(&self) -> Result<(), StorageError> {
        if self.delete_value(API_KEY_ENTRY)? {
            tracing::info!("cleared model credential");
        }
        Ok(())
    }
}

/// In-process credential holder for ephemeral runs and tests.
#[derive(Default)]
pub struct MemoryCredentials {
    value: Mutex<Option<String>>,
}

impl MemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(value: &str) -> Self {
        Self {
            value: Mutex::new(Some(value.to_string())),
        }
    }
}

impl CredentialProvider for MemoryCredentials {
    fn credential(&self) -> Result<Option<String>, StorageError> {
        Ok(self.value.lock().clone())
    }

    fn store_credential(&self, value: &str) -> Result<String, StorageError> {
        let value = normalize(value)?;
        *self.value.lock() = Some(value.clone());
        Ok(value)
    }

    fn clear_credential(&self) -> Result<(), StorageError> {
        *self.value.lock() = None;
        Ok(())
    }
}
