//! Route definitions for the `/assistant` endpoints.

use axum::routing::post;
use axum::Router;

use crate::handlers::assistant;
use crate::state::AppState;

/// Routes mounted at `/assistant`.
///
/// ```text
/// POST   /summarize        -> summarize
/// POST   /question         -> ask
/// POST   /suggestions      -> suggestions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summarize", post(assistant::summarize))
        .route("/question", post(assistant::ask))
        .route("/suggestions", post(assistant::suggestions))
}
