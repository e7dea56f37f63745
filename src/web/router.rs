use axum::{routing::get, Router};
use crate::services::producer::ReportKind;
use crate::state::AppState;
use super::handlers::{health, load_page};

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .route("/", get(load_page));
    for kind in ReportKind::ALL {
        router = router.route(kind.path(), get(load_page));
    }
    router.with_state(state)
}
