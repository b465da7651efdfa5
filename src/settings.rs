//! App-wide user settings.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    app_state::{StoreState, lock_store},
    store::FlatFileStore,
};

/// The file that the settings document is persisted to.
pub const SETTINGS_FILE: &str = "settings.json";

/// The UI colour scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Follow the operating system preference.
    #[default]
    System,
    /// Always light.
    Light,
    /// Always dark.
    Dark,
}

/// The app-wide settings document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// The currency symbol shown next to amounts.
    pub currency: String,
    /// The UI colour scheme.
    pub theme: Theme,
    /// The day of the month the budgeting month starts on, between 1 and 31.
    /// A value past the end of a short month is clamped to its last day.
    pub start_date: u8,
    /// The Gemini API key used for receipt scanning. Empty when unset.
    pub gemini_api_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: "€".to_owned(),
            theme: Theme::System,
            start_date: 1,
            gemini_api_key: String::new(),
        }
    }
}

/// The payload for updating settings. Fields left out keep their current
/// values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    /// Replaces the currency symbol when supplied.
    #[serde(default)]
    pub currency: Option<String>,
    /// Replaces the theme when supplied.
    #[serde(default)]
    pub theme: Option<Theme>,
    /// Replaces the month start day when supplied. Must be between 1 and 31.
    #[serde(default)]
    pub start_date: Option<u8>,
    /// Replaces the Gemini API key when supplied.
    #[serde(default)]
    pub gemini_api_key: Option<String>,
}

/// Get the stored settings, falling back to the defaults if the store has
/// not been seeded yet.
pub fn get_settings(store: &FlatFileStore) -> Result<Settings, Error> {
    Ok(store.read(SETTINGS_FILE)?.unwrap_or_default())
}

/// Merge the supplied fields over the stored settings and persist the result.
///
/// # Errors
/// Returns [Error::InvalidStartDate] if the supplied start day falls outside
/// 1 to 31. Nothing is written when validation fails.
pub fn update_settings(store: &FlatFileStore, patch: &SettingsPatch) -> Result<Settings, Error> {
    if let Some(start_date) = patch.start_date
        && !(1..=31).contains(&start_date)
    {
        return Err(Error::InvalidStartDate(start_date));
    }

    let mut settings = get_settings(store)?;

    if let Some(currency) = &patch.currency {
        settings.currency = currency.clone();
    }
    if let Some(theme) = patch.theme {
        settings.theme = theme;
    }
    if let Some(start_date) = patch.start_date {
        settings.start_date = start_date;
    }
    if let Some(api_key) = &patch.gemini_api_key {
        settings.gemini_api_key = api_key.clone();
    }

    store.write(SETTINGS_FILE, &settings)?;

    Ok(settings)
}

/// Return the stored settings.
pub async fn get_settings_endpoint(
    State(state): State<StoreState>,
) -> Result<Json<Settings>, Error> {
    let store = lock_store(&state.store)?;

    Ok(Json(get_settings(&store)?))
}

/// Update the settings and respond with the merged document.
pub async fn update_settings_endpoint(
    State(state): State<StoreState>,
    Json(patch): Json<SettingsPatch>,
) -> Result<Json<Settings>, Error> {
    let store = lock_store(&state.store)?;

    Ok(Json(update_settings(&store, &patch)?))
}
