// Application state module
// Everything a request handler needs, shared read-only across connections

use std::sync::Arc;

use super::types::Config;
use crate::assets::AssetTree;
use crate::routing::Router;

/// Application state
pub struct AppState {
    pub config: Config,
    pub assets: Arc<dyn AssetTree>,
    pub router: Router,
}

impl AppState {
    pub fn new(config: Config, assets: Arc<dyn AssetTree>) -> Self {
        let router = Router::new(
            config.assets.root_document.clone(),
            config.assets.immutable_prefix.clone(),
        );
        Self {
            config,
            assets,
            router,
        }
    }

    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}
