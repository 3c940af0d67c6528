use crate::config::Config;
use crate::mailer::Mailer;
use crate::store::Store;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub mailer: Mailer,
    pub config: Arc<Config>,
}

impl AppState {
    /// Build state from configuration, seeding the catalog when enabled.
    pub fn new(config: Config) -> Self {
        let store = Store::new();
        if config.seed_demo_catalog {
            store.seed_demo_catalog();
        }

        AppState {
            store,
            mailer: Mailer::default(),
            config: Arc::new(config),
        }
    }
}
