//! Web server CLI command

use crate::ai::Assistant;
use crate::api::{self, AppState};
use crate::error::Result;
use crate::storage::config::load_config;
use crate::storage::tasks::JsonFileStorage;
use crate::store::TaskStore;

/// Default port for the web server
pub const DEFAULT_PORT: u16 = 5000;

/// Execute the web server
///
/// Port resolution: `--port` flag, then `[web] port` in the config, then
/// [`DEFAULT_PORT`].
pub async fn execute(port: Option<u16>) -> Result<()> {
    let config = load_config();
    let port = port.or(config.web.port).unwrap_or(DEFAULT_PORT);

    let state = AppState {
        store: TaskStore::new(Box::new(JsonFileStorage::open_default())),
        assistant: Assistant::from_config(&config)?,
    };

    api::start_server(port, state).await?;
    Ok(())
}
