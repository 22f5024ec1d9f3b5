use std::sync::Arc;

use taskboard_board::assistant::Assistant;
use taskboard_board::BoardService;
use taskboard_db::store::Store;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Board workflow over the configured store.
    pub board: Arc<BoardService<Store>>,
    /// Answer provider behind the `/assistant` endpoints.
    pub assistant: Arc<Assistant>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: Store, assistant: Assistant, config: ServerConfig) -> Self {
        Self {
            board: Arc::new(BoardService::new(store)),
            assistant: Arc::new(assistant),
            config: Arc::new(config),
        }
    }
}
