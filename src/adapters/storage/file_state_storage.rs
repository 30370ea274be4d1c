//! File-based State Storage Adapter
//!
//! Stores conversation state as YAML files on disk, one directory per
//! conversation, so a conversation can be inspected by hand while it runs.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::dialog::ConversationState;
use crate::domain::foundation::ConversationId;
use crate::ports::{StateStorage, StateStorageError};

/// File-based storage for conversation state
#[derive(Debug, Clone)]
pub struct FileStateStorage {
    base_path: PathBuf,
}

impl FileStateStorage {
    /// Create a new file storage with a base directory
    ///
    /// # Example
    /// ```ignore
    /// let storage = FileStateStorage::new("./data/conversations");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the directory path for a specific conversation
    fn conversation_dir(&self, conversation_id: &ConversationId) -> PathBuf {
        self.base_path.join(encode_id(conversation_id))
    }

    /// Get the state file path for a conversation
    fn state_file_path(&self, conversation_id: &ConversationId) -> PathBuf {
        self.conversation_dir(conversation_id).join("state.yaml")
    }

    /// Ensure directory exists
    async fn ensure_dir(&self, path: &Path) -> Result<(), StateStorageError> {
        fs::create_dir_all(path)
            .await
            .map_err(|e| StateStorageError::IoError(e.to_string()))
    }
}

/// Channel keys may contain `/`, `:` or `..`; everything outside
/// `[A-Za-z0-9_-]` is percent-encoded so the key stays one path segment.
fn encode_id(conversation_id: &ConversationId) -> String {
    let mut encoded = String::with_capacity(conversation_id.as_str().len());
    for byte in conversation_id.as_str().bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }
    encoded
}

#[async_trait]
impl StateStorage for FileStateStorage {
    async fn save_state(&self, state: &ConversationState) -> Result<(), StateStorageError> {
        let dir = self.conversation_dir(&state.conversation_id);
        self.ensure_dir(&dir).await?;

        let yaml = serde_yaml::to_string(state)
            .map_err(|e| StateStorageError::SerializationFailed(e.to_string()))?;

        fs::write(self.state_file_path(&state.conversation_id), yaml)
            .await
            .map_err(|e| StateStorageError::IoError(e.to_string()))?;

        Ok(())
    }

    async fn load_state(&self, conversation_id: &ConversationId) -> Result<ConversationState, StateStorageError> {
        let file_path = self.state_file_path(conversation_id);

        if !file_path.exists() {
            return Err(StateStorageError::NotFound(conversation_id.clone()));
        }

        let yaml = fs::read_to_string(&file_path)
            .await
            .map_err(|e| StateStorageError::IoError(e.to_string()))?;

        serde_yaml::from_str(&yaml).map_err(|e| StateStorageError::DeserializationFailed(e.to_string()))
    }

    async fn exists(&self, conversation_id: &ConversationId) -> Result<bool, StateStorageError> {
        Ok(self.state_file_path(conversation_id).exists())
    }

    async fn delete(&self, conversation_id: &ConversationId) -> Result<(), StateStorageError> {
        let dir = self.conversation_dir(conversation_id);

        if dir.exists() {
            fs::remove_dir_all(&dir)
                .await
                .map_err(|e| StateStorageError::IoError(e.to_string()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialog::{Awaiting, DialogFrame, DialogId};
    use crate::domain::report::{Report, SlotValue};
    use tempfile::TempDir;

    fn test_id(raw: &str) -> ConversationId {
        ConversationId::new(raw).unwrap()
    }

    fn mid_delegate_state(raw: &str) -> ConversationState {
        let mut state = ConversationState::new(test_id(raw), "zh-TW");
        let mut root = DialogFrame::incident_report(Report {
            origin: Some("月台門夾到旅客".into()),
            ..Default::default()
        });
        root.step_index = 1;
        root.awaiting = Some(Awaiting::Child { dialog: DialogId::DateResolver });
        state.stack.push(root);
        state
            .stack
            .push(DialogFrame::date_resolver(Some(SlotValue::text("XXXX-11-15"))));
        state
    }

    #[tokio::test]
    async fn test_file_storage_save_and_load_state() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStateStorage::new(temp_dir.path());
        let state = mid_delegate_state("conv-1");

        storage.save_state(&state).await.unwrap();

        assert!(temp_dir.path().join("conv-1").join("state.yaml").exists());
        let loaded = storage.load_state(&state.conversation_id).await.unwrap();
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn test_file_storage_load_nonexistent_state() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStateStorage::new(temp_dir.path());

        let result = storage.load_state(&test_id("missing")).await;

        assert!(matches!(result, Err(StateStorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_file_storage_corrupt_file_fails_to_deserialize() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStateStorage::new(temp_dir.path());
        let id = test_id("conv-1");
        std::fs::create_dir_all(temp_dir.path().join("conv-1")).unwrap();
        std::fs::write(temp_dir.path().join("conv-1").join("state.yaml"), "stack: [oops").unwrap();

        let result = storage.load_state(&id).await;

        assert!(matches!(result, Err(StateStorageError::DeserializationFailed(_))));
    }

    #[tokio::test]
    async fn test_file_storage_exists_and_delete() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStateStorage::new(temp_dir.path());
        let state = mid_delegate_state("conv-1");

        assert!(!storage.exists(&state.conversation_id).await.unwrap());
        storage.save_state(&state).await.unwrap();
        assert!(storage.exists(&state.conversation_id).await.unwrap());

        storage.delete(&state.conversation_id).await.unwrap();
        assert!(!storage.exists(&state.conversation_id).await.unwrap());
        assert!(!temp_dir.path().join("conv-1").exists());
    }

    #[tokio::test]
    async fn test_file_storage_keeps_channel_keys_inside_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStateStorage::new(temp_dir.path().join("states"));
        let state = mid_delegate_state("../teams:19/abc");

        storage.save_state(&state).await.unwrap();

        assert!(temp_dir
            .path()
            .join("states")
            .join("%2E%2E%2Fteams%3A19%2Fabc")
            .join("state.yaml")
            .exists());
        assert_eq!(storage.load_state(&state.conversation_id).await.unwrap(), state);
    }

    #[test]
    fn encode_id_is_identity_for_safe_keys() {
        assert_eq!(encode_id(&test_id("abc-123_X")), "abc-123_X");
        assert_eq!(encode_id(&test_id("a b")), "a%20b");
    }

    #[test]
    fn encode_id_escapes_every_utf8_byte() {
        assert_eq!(encode_id(&test_id("站/1")), "%E7%AB%99%2F1");
    }
}
