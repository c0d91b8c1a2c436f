use crate::store::atomic_writer::AtomicWriter;
use crate::traits::{PersistenceMetadata, PersistenceStore, StoreSnapshot, FORMAT_VERSION};
use planboard_core::{PlanboardError, PlanboardResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// JSON file backend.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    instance_id: Uuid,
}

/// On-disk wrapper around the board data.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonEnvelope {
    pub version: u32,
    pub metadata: PersistenceMetadata,
    pub data: serde_json::Value,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            instance_id: Uuid::new_v4(),
        }
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }
}

#[async_trait::async_trait]
impl PersistenceStore for JsonFileStore {
    async fn save(&self, mut snapshot: StoreSnapshot) -> PlanboardResult<PersistenceMetadata> {
        snapshot.metadata.instance_id = self.instance_id;
        snapshot.metadata.saved_at = chrono::Utc::now();
        snapshot.metadata.format_version = FORMAT_VERSION;

        let data: serde_json::Value = serde_json::from_slice(&snapshot.data)
            .map_err(|e| PlanboardError::Serialization(e.to_string()))?;
        let envelope = JsonEnvelope {
            version: FORMAT_VERSION,
            metadata: snapshot.metadata.clone(),
            data,
        };
        let json_bytes = serde_json::to_vec_pretty(&envelope)
            .map_err(|e| PlanboardError::Serialization(e.to_string()))?;

        AtomicWriter::write_atomic(&self.path, &json_bytes).await?;

        tracing::info!(
            "Saved {} bytes to {}",
            json_bytes.len(),
            self.path.display()
        );
        Ok(snapshot.metadata)
    }

    async fn load(&self) -> PlanboardResult<(StoreSnapshot, PersistenceMetadata)> {
        let file_bytes = AtomicWriter::read_all(&self.path).await?;

        let envelope: JsonEnvelope = serde_json::from_slice(&file_bytes)
            .map_err(|e| PlanboardError::Serialization(e.to_string()))?;
        if envelope.version != FORMAT_VERSION {
            return Err(PlanboardError::Serialization(format!(
                "Unsupported format version: {}",
                envelope.version
            )));
        }

        let data = serde_json::to_vec(&envelope.data)
            .map_err(|e| PlanboardError::Serialization(e.to_string()))?;
        let snapshot = StoreSnapshot {
            data,
            metadata: envelope.metadata.clone(),
        };

        tracing::info!(
            "Loaded {} bytes from {}",
            file_bytes.len(),
            self.path.display()
        );
        Ok((snapshot, envelope.metadata))
    }

    async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn snapshot_of(value: serde_json::Value, store: &JsonFileStore) -> StoreSnapshot {
        StoreSnapshot {
            data: serde_json::to_vec(&value).unwrap(),
            metadata: PersistenceMetadata::new(store.instance_id()),
        }
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("planboard.json");
        let store = JsonFileStore::new(&file_path);
        assert!(!store.exists().await);

        let data = json!({ "boards": [], "cards": [] });
        let metadata = store.save(snapshot_of(data.clone(), &store)).await.unwrap();
        assert_eq!(metadata.format_version, FORMAT_VERSION);
        assert!(store.exists().await);

        let (loaded, loaded_metadata) = store.load().await.unwrap();
        assert_eq!(loaded_metadata.instance_id, store.instance_id());
        let loaded_data: serde_json::Value = serde_json::from_slice(&loaded.data).unwrap();
        assert_eq!(loaded_data, data);
    }

    #[tokio::test]
    async fn test_unknown_version_is_rejected() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("future.json");
        let store = JsonFileStore::new(&file_path);
        let envelope = json!({
            "version": 99,
            "metadata": PersistenceMetadata::new(Uuid::new_v4()),
            "data": {}
        });
        std::fs::write(&file_path, serde_json::to_vec(&envelope).unwrap()).unwrap();

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, PlanboardError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_envelope_shape_on_disk() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("planboard.json");
        let store = JsonFileStore::new(&file_path);
        store
            .save(snapshot_of(json!({ "boards": [] }), &store))
            .await
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&file_path).unwrap()).unwrap();
        assert_eq!(raw["version"], json!(FORMAT_VERSION));
        assert!(raw["metadata"]["saved_at"].is_string());
        assert_eq!(raw["data"], json!({ "boards": [] }));
    }
}
