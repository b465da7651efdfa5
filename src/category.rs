//! User-managed spending categories.
//!
//! Categories are a flat list of names. The list is seeded with a default
//! set on first run and only ever grows; transactions reference categories
//! by name, so removing one would not invalidate existing records anyway.

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::{
    Error,
    app_state::{StoreState, lock_store},
    store::FlatFileStore,
};

/// The file that the category list is persisted to.
pub const CATEGORIES_FILE: &str = "categories.json";

/// The categories seeded into a fresh store.
pub const DEFAULT_CATEGORIES: [&str; 7] = [
    "Food",
    "Groceries",
    "Transport",
    "Utilities",
    "Shopping",
    "Entertainment",
    "Other",
];

/// The payload for adding a category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewCategory {
    /// The category name. Leading and trailing whitespace is ignored.
    pub name: String,
}

/// Get the stored category list, falling back to the defaults if the store
/// has not been seeded yet.
pub fn get_categories(store: &FlatFileStore) -> Result<Vec<String>, Error> {
    Ok(store
        .read(CATEGORIES_FILE)?
        .unwrap_or_else(|| DEFAULT_CATEGORIES.map(str::to_owned).to_vec()))
}

/// Append `name` to the category list, returning the full list afterwards.
///
/// Adding a name that already exists is a no-op rather than an error, so the
/// operation is safe to retry.
///
/// # Errors
/// Returns [Error::EmptyCategoryName] if `name` is empty after trimming.
pub fn add_category(store: &FlatFileStore, name: &str) -> Result<Vec<String>, Error> {
    let name = name.trim();

    if name.is_empty() {
        return Err(Error::EmptyCategoryName);
    }

    let mut categories = get_categories(store)?;

    if !categories.iter().any(|category| category == name) {
        categories.push(name.to_owned());
        store.write(CATEGORIES_FILE, &categories)?;
    }

    Ok(categories)
}

/// Return the full category list.
pub async fn get_categories_endpoint(
    State(state): State<StoreState>,
) -> Result<Json<Vec<String>>, Error> {
    let store = lock_store(&state.store)?;

    Ok(Json(get_categories(&store)?))
}

/// Add a category and respond with the updated list.
pub async fn create_category_endpoint(
    State(state): State<StoreState>,
    Json(payload): Json<NewCategory>,
) -> Result<Json<Vec<String>>, Error> {
    let store = lock_store(&state.store)?;

    Ok(Json(add_category(&store, &payload.name)?))
}

#[cfg(test)]
mod category_tests {
    use crate::{
        Error,
        category::{DEFAULT_CATEGORIES, add_category, get_categories},
        test_utils::get_test_store,
    };

    #[test]
    fn fresh_store_returns_default_categories() {
        let (_dir, store) = get_test_store();

        let categories = get_categories(&store).unwrap();

        assert_eq!(categories, DEFAULT_CATEGORIES.map(str::to_owned).to_vec());
    }

    #[test]
    fn added_category_is_trimmed_and_persisted() {
        let (_dir, store) = get_test_store();

        let categories = add_category(&store, "  Subscriptions  ").unwrap();

        assert_eq!(categories.last().map(String::as_str), Some("Subscriptions"));
        assert_eq!(get_categories(&store).unwrap(), categories);
    }

    #[test]
    fn adding_an_existing_category_changes_nothing() {
        let (_dir, store) = get_test_store();

        let before = add_category(&store, "Subscriptions").unwrap();
        let after = add_category(&store, "Subscriptions").unwrap();

        assert_eq!(before, after);
    }

    #[test]
    fn blank_name_is_rejected() {
        let (_dir, store) = get_test_store();

        assert_eq!(add_category(&store, "   "), Err(Error::EmptyCategoryName));
    }
}
