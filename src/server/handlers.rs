//! HTTP handlers for the preference endpoints
//!
//! Both handlers are thin: validate the table name, delegate to the
//! configured [`RemotePreferences`] repository, map errors through
//! [`PreferenceError`]'s `IntoResponse`.

use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use crate::core::sort::validate_table_name;
use crate::core::{PreferenceError, RemotePreferences, SavePreferenceRequest, StoredPreference};

/// Application state shared across handlers
#[derive(Clone)]
pub struct PreferenceState {
    pub preferences: Arc<dyn RemotePreferences>,
}

impl PreferenceState {
    pub fn new(preferences: Arc<dyn RemotePreferences>) -> Self {
        Self { preferences }
    }
}

/// Get the stored preference of one table
///
/// GET /api/user-sort-preferences/{table_name}
///
/// Responds `null` when nothing is stored.
pub async fn get_preference(
    State(state): State<PreferenceState>,
    Path(table_name): Path<String>,
) -> Result<Json<Option<StoredPreference>>, PreferenceError> {
    validate_table_name(&table_name)?;

    let stored = state.preferences.fetch(&table_name).await?;
    Ok(Json(stored.as_ref().map(StoredPreference::from)))
}

/// Create or overwrite the preference of one table
///
/// POST /api/user-sort-preferences
///
/// Body: `{ "tableName": "...", "sortField": "...", "sortDirection": "asc" | "desc" }`
pub async fn save_preference(
    State(state): State<PreferenceState>,
    Json(request): Json<SavePreferenceRequest>,
) -> Result<Json<StoredPreference>, PreferenceError> {
    validate_table_name(&request.table_name)?;
    let (table_name, config) = request.into_parts()?;

    state.preferences.save(&table_name, &config).await?;
    tracing::debug!(table = %table_name, %config, "stored sort preference");

    Ok(Json(StoredPreference::from(&config)))
}
