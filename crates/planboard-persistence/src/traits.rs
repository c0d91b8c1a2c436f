use async_trait::async_trait;
use chrono::{DateTime, Utc};
use planboard_core::PlanboardResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Current on-disk envelope version.
pub const FORMAT_VERSION: u32 = 1;

/// Metadata stamped on every save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceMetadata {
    pub format_version: u32,
    /// Process that performed the save
    pub instance_id: Uuid,
    pub saved_at: DateTime<Utc>,
}

impl PersistenceMetadata {
    pub fn new(instance_id: Uuid) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            instance_id,
            saved_at: Utc::now(),
        }
    }
}

/// Serialized board data plus its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Raw JSON bytes of a [`planboard_domain::Snapshot`]
    pub data: Vec<u8>,
    pub metadata: PersistenceMetadata,
}

/// Backend that saves and loads whole snapshots.
#[async_trait]
pub trait PersistenceStore: Send + Sync {
    async fn save(&self, snapshot: StoreSnapshot) -> PlanboardResult<PersistenceMetadata>;

    async fn load(&self) -> PlanboardResult<(StoreSnapshot, PersistenceMetadata)>;

    async fn exists(&self) -> bool;

    fn path(&self) -> &Path;
}

/// Encoding strategy for persisted data.
pub trait Serializer<T: Send + Sync>: Send + Sync {
    fn serialize(&self, data: &T) -> PlanboardResult<Vec<u8>>;

    fn deserialize(&self, bytes: &[u8]) -> PlanboardResult<T>;
}
