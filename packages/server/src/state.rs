use std::sync::Arc;

use common::storage::MediaStore;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::service::event::EventService;
use crate::service::text_gen::TextGenerator;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub media: Arc<dyn MediaStore>,
    pub events: EventService,
    pub text_gen: Arc<TextGenerator>,
}

impl AppState {
    /// Wire the services over a connected database and media store.
    pub fn new(db: DatabaseConnection, config: AppConfig, media: Arc<dyn MediaStore>) -> Self {
        let store = Arc::new(crate::repository::SeaOrmEventStore::new(db.clone()));
        let events = EventService::new(store, media.clone());
        let text_gen = Arc::new(TextGenerator::new(config.text_gen.clone()));
        Self {
            db,
            config,
            media,
            events,
            text_gen,
        }
    }
}
