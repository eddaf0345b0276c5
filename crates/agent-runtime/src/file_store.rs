//! File-backed conversation store
//!
//! One pretty-printed JSON document per conversation under a root
//! directory. Writes go to a temporary sibling and are renamed into place.

use std::path::{Path, PathBuf};

use agent_core::{
    conversation::{check_revision, newest_first},
    error::{AgentError, Result},
    Conversation, ConversationId, ConversationStore, ConversationSummary,
};
use async_trait::async_trait;
use tokio::sync::Mutex;

pub struct FileConversationStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FileConversationStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        tracing::info!(path = %root.display(), "Opened conversation store");

        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &ConversationId) -> Result<PathBuf> {
        let raw = id.as_str();
        let valid = !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            // Unknown to any store, and never a path outside the root
            return Err(AgentError::NotFound(raw.to_string()));
        }
        Ok(self.root.join(format!("{raw}.json")))
    }

    async fn read(&self, path: &Path, id: &ConversationId) -> Result<Conversation> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AgentError::NotFound(id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, path: &Path, conversation: &Conversation) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(conversation)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[async_trait]
impl ConversationStore for FileConversationStore {
    async fn create(&self, conversation: &Conversation) -> Result<()> {
        let path = self.path_for(&conversation.id)?;
        let _guard = self.write_lock.lock().await;

        if tokio::fs::try_exists(&path).await? {
            return Err(AgentError::Store(format!(
                "conversation {} already exists",
                conversation.id
            )));
        }

        let mut stored = conversation.clone();
        stored.revision += 1;
        self.write(&path, &stored).await?;

        tracing::debug!(conversation_id = %conversation.id, "Created conversation file");
        Ok(())
    }

    async fn update(&self, conversation: &Conversation) -> Result<()> {
        let path = self.path_for(&conversation.id)?;
        let _guard = self.write_lock.lock().await;

        let current = self.read(&path, &conversation.id).await?;
        check_revision(&current, conversation)?;

        let mut stored = conversation.clone();
        stored.revision += 1;
        self.write(&path, &stored).await
    }

    async fn describe(&self, id: &ConversationId) -> Result<Conversation> {
        let path = self.path_for(id)?;
        self.read(&path, id).await
    }

    async fn list(&self) -> Result<Vec<ConversationSummary>> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut summaries = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes = tokio::fs::read(&path).await?;
            match serde_json::from_slice::<Conversation>(&bytes) {
                Ok(conversation) => summaries.push(conversation.summary()),
                Err(e) => {
                    tracing::warn!(path = %path.display(), "Skipping unreadable conversation: {}", e)
                }
            }
        }

        newest_first(&mut summaries);
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> (tempfile::TempDir, FileConversationStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileConversationStore::open(dir.path().join("conversations"))
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_create_and_describe() {
        let (_dir, store) = store().await;
        let mut conversation = Conversation::start("Weather in Oslo?");
        conversation.title = "Oslo Weather".into();
        conversation.push_assistant("Cold.");

        store.create(&conversation).await.unwrap();
        let loaded = store.describe(&conversation.id).await.unwrap();

        assert_eq!(loaded.title, "Oslo Weather");
        assert_eq!(loaded.messages.len(), 2);
        assert_eq!(loaded.messages[1].content, "Cold.");
        assert_eq!(loaded.revision, 1);
        assert!(store.root().join(format!("{}.json", conversation.id)).exists());
    }

    #[tokio::test]
    async fn test_create_twice_fails() {
        let (_dir, store) = store().await;
        let conversation = Conversation::start("hi");

        store.create(&conversation).await.unwrap();
        let err = store.create(&conversation).await.unwrap_err();
        assert!(matches!(err, AgentError::Store(_)));
    }

    #[tokio::test]
    async fn test_update_checks_revision() {
        let (_dir, store) = store().await;
        let conversation = Conversation::start("hi");
        store.create(&conversation).await.unwrap();

        let mut first = store.describe(&conversation.id).await.unwrap();
        let mut second = first.clone();

        first.push_user("first writer");
        store.update(&first).await.unwrap();

        second.push_user("second writer");
        let err = store.update(&second).await.unwrap_err();
        assert!(matches!(err, AgentError::Conflict { expected: 1, found: 2, .. }));

        let loaded = store.describe(&conversation.id).await.unwrap();
        assert_eq!(loaded.messages.last().unwrap().content, "first writer");
    }

    #[tokio::test]
    async fn test_missing_and_malformed_ids() {
        let (_dir, store) = store().await;

        let err = store.describe(&ConversationId::new()).await.unwrap_err();
        assert!(matches!(err, AgentError::NotFound(_)));

        let err = store
            .describe(&ConversationId::from_string("../../etc/passwd"))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::NotFound(_)));

        let err = store.update(&Conversation::start("orphan")).await.unwrap_err();
        assert!(matches!(err, AgentError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_newest_first_and_skips_junk() {
        let (_dir, store) = store().await;

        let older = Conversation::start("older");
        store.create(&older).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let newer = Conversation::start("newer");
        store.create(&newer).await.unwrap();

        tokio::fs::write(store.root().join("notes.txt"), "ignore me")
            .await
            .unwrap();
        tokio::fs::write(store.root().join("broken.json"), "{not json")
            .await
            .unwrap();

        let summaries = store.list().await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, newer.id);
        assert_eq!(summaries[1].id, older.id);
    }

    #[tokio::test]
    async fn test_reopen_sees_existing_data() {
        let dir = tempfile::tempdir().unwrap();
        let conversation = Conversation::start("persist me");
        {
            let store = FileConversationStore::open(dir.path()).await.unwrap();
            store.create(&conversation).await.unwrap();
        }

        let store = FileConversationStore::open(dir.path()).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 1);
    }
}
