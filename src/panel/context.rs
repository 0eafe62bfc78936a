use crate::api::{AccountService, HttpAccountService};
use crate::cache::PersistentCache;
use crate::config::{Settings, StatePaths};
use crate::shared::logging::{append_panel_log, LogLevel};
use std::path::PathBuf;
use std::sync::Arc;

/// Everything an effect needs to talk to the outside world. Cheap to clone
/// into worker threads.
#[derive(Clone)]
pub struct PanelContext {
    pub broker: String,
    pub service: Arc<dyn AccountService>,
    pub cache: PersistentCache,
    pub log_path: Option<PathBuf>,
}

impl std::fmt::Debug for PanelContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelContext")
            .field("broker", &self.broker)
            .field("cache", &self.cache)
            .field("log_path", &self.log_path)
            .finish_non_exhaustive()
    }
}

impl PanelContext {
    pub fn new(
        broker: impl Into<String>,
        service: Arc<dyn AccountService>,
        cache: PersistentCache,
    ) -> Self {
        Self {
            broker: broker.into(),
            service,
            cache,
            log_path: None,
        }
    }

    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    pub fn from_settings(paths: &StatePaths, settings: &Settings) -> Self {
        Self::new(
            settings.broker.clone(),
            Arc::new(HttpAccountService::from_settings(settings)),
            PersistentCache::from_state_paths(paths),
        )
        .with_log_path(paths.panel_log_path())
    }

    pub fn log(&self, level: LogLevel, event: &str, message: &str) {
        if let Some(path) = &self.log_path {
            append_panel_log(path, level, event, message);
        }
    }
}
