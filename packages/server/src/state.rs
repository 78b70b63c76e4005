use std::sync::Arc;

use common::storage::ObjectStore;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub object_store: Arc<dyn ObjectStore>,
    /// Queue handle for background image processing. `None` when the queue
    /// is disabled; uploads then skip dispatch entirely.
    pub mq: Option<Arc<mq::Mq>>,
    pub config: AppConfig,
}
