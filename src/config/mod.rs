pub mod error;
pub mod load;
pub mod paths;
pub mod save;
pub mod settings;

pub use error::ConfigError;
pub use load::load_settings;
pub use paths::{default_state_root_path, StatePaths, DEFAULT_STATE_ROOT_DIR};
pub use save::{init_settings, save_settings};
pub use settings::{
    Settings, API_BASE_ENV, DEFAULT_API_BASE, DEFAULT_BROKER, DEFAULT_REQUEST_TIMEOUT_SECS,
};
