use sqlx::PgPool;

use rollcall_config::CorsConfig;

use crate::modules::relationships::PgReferenceStore;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(db: PgPool, cors_config: CorsConfig) -> Self {
        Self { db, cors_config }
    }

    /// Relationship store sharing this state's pool.
    pub fn reference_store(&self) -> PgReferenceStore {
        PgReferenceStore::new(self.db.clone())
    }
}
