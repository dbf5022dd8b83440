use crate::{config::Config, sanitize::Sanitizer, store::AnnouncementStore};
use axum::extract::FromRef;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sanitizer: Sanitizer,
    pub announcements: AnnouncementStore,
}

impl AppState {
    /// Builds the state from configuration with an empty store.
    pub fn new(config: Config) -> Self {
        let sanitizer = Sanitizer::new(config.markup_engine, config.max_nesting_depth)
            .with_max_text_bytes(config.max_text_bytes);
        Self {
            config,
            sanitizer,
            announcements: AnnouncementStore::default(),
        }
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Sanitizer {
    fn from_ref(state: &AppState) -> Self {
        state.sanitizer
    }
}

impl FromRef<AppState> for AnnouncementStore {
    fn from_ref(state: &AppState) -> Self {
        state.announcements.clone()
    }
}
