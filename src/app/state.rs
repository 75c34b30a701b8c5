//! Application state shared across routes

use std::fs;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::store::SharedStore;

/// Controller page compiled into the binary
pub const DEFAULT_INDEX_HTML: &str = include_str!("../../assets/index.html");

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SharedStore>,
    pub index_html: Arc<str>,
}

impl AppState {
    pub fn new(config: &Config, store: Arc<SharedStore>) -> Self {
        Self {
            store,
            index_html: load_index_html(config),
        }
    }
}

/// Use the configured page if it can be read, else the built-in one
fn load_index_html(config: &Config) -> Arc<str> {
    let Some(path) = &config.index_html_path else {
        return Arc::from(DEFAULT_INDEX_HTML);
    };

    match fs::read_to_string(path) {
        Ok(html) => {
            info!(path = %path.display(), "Serving controller page from disk");
            Arc::from(html)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Controller page unreadable, using built-in page");
            Arc::from(DEFAULT_INDEX_HTML)
        }
    }
}
