//! Router builder for the preference endpoints

use crate::server::handlers::{PreferenceState, get_preference, save_preference};
use axum::{
    Router,
    routing::{get, post},
};

/// Build the preference routes
///
/// - GET  /api/user-sort-preferences/{table_name} - Stored preference or `null`
/// - POST /api/user-sort-preferences - Create or overwrite a preference
pub fn preference_routes(state: PreferenceState) -> Router {
    Router::new()
        .route(
            "/api/user-sort-preferences/{table_name}",
            get(get_preference),
        )
        .route("/api/user-sort-preferences", post(save_preference))
        .with_state(state)
}
