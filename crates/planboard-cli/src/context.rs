use planboard_core::PlanboardResult;
use planboard_domain::CardStore;
use planboard_persistence::LocalCardStore;

/// Store handle for one CLI invocation. Every store mutation is persisted
/// before it returns, so handlers never save explicitly.
pub struct CliContext {
    store: LocalCardStore,
}

impl CliContext {
    pub async fn load(file_path: &str) -> PlanboardResult<Self> {
        let store = LocalCardStore::open(file_path).await?;
        tracing::debug!("Opened data file {}", file_path);
        Ok(Self { store })
    }

    pub fn store(&self) -> &dyn CardStore {
        &self.store
    }
}
