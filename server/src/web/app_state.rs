use std::sync::Arc;

use crate::discord::client::GuildFetcher;

/// Shared state for HTTP handlers.
///
/// Holds the one process-wide remote session, established at startup and
/// immutable afterwards. Handlers never mutate shared state; each request
/// computes its result independently.
pub struct AppState {
    pub fetcher: Arc<dyn GuildFetcher>,
}
