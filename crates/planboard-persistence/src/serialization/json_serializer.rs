use crate::traits::Serializer;
use planboard_core::{PlanboardError, PlanboardResult};

/// Pretty-printed JSON encoding.
pub struct JsonSerializer;

impl<T: serde::Serialize + serde::de::DeserializeOwned + Send + Sync> Serializer<T>
    for JsonSerializer
{
    fn serialize(&self, data: &T) -> PlanboardResult<Vec<u8>> {
        serde_json::to_vec_pretty(data).map_err(|e| PlanboardError::Serialization(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> PlanboardResult<T> {
        serde_json::from_slice(bytes).map_err(|e| PlanboardError::Serialization(e.to_string()))
    }
}
