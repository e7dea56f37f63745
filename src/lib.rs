pub mod config;
pub mod telemetry;
pub mod state;
pub mod error;
pub mod domain { pub mod fingerprint; pub mod page; }
pub mod services { pub mod housekeeping; pub mod producer; pub mod storage; }
pub mod web { pub mod router; pub mod handlers; pub mod utils; }

use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::services::{housekeeping, storage::PageStore};
use crate::state::AppState;

pub struct App {
    pub router: axum::Router,
    pub state: AppState,
    pub cleaner: JoinHandle<()>,
}

/// Creates the one page store for the process, starts its cleaner and
/// wires the store into the HTTP surface. Cancel `shutdown` to stop the
/// cleaner.
pub fn build_app(cfg: &crate::config::Config, shutdown: CancellationToken) -> App {
    let store = PageStore::new();
    let cleaner = housekeeping::start_cleanup(store.clone(), cfg.sweep_every(), shutdown);

    let state = AppState {
        store,
        public_hostname: Arc::from(cfg.public_hostname.as_str()),
        page_ttl_secs: cfg.page_ttl_secs,
    };

    App { router: crate::web::router::build_router(state.clone()), state, cleaner }
}
