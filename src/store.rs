//! Flat-file JSON document storage.
//!
//! Each record collection (transactions, categories, settings) is persisted
//! as an independent JSON document that is rewritten in full on every change.
//! Concurrent writers from separate processes are last-writer-wins; this is
//! an accepted limitation for a single-user tool.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, category, settings::Settings, transaction};

/// Reads and writes the JSON documents in the application data directory.
#[derive(Debug)]
pub struct FlatFileStore {
    data_dir: PathBuf,
}

impl FlatFileStore {
    /// Create a store that keeps its documents under `data_dir`.
    ///
    /// The directory is not touched until [initialize] or the first write.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The directory holding the JSON documents.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Read the document `file_name` and deserialize it.
    ///
    /// Returns `None` if the document does not exist yet.
    ///
    /// # Errors
    /// Returns [Error::Io] if the file cannot be read, or [Error::Json] if
    /// its contents are not valid JSON for `T`.
    pub fn read<T: DeserializeOwned>(&self, file_name: &str) -> Result<Option<T>, Error> {
        let path = self.data_dir.join(file_name);

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        Ok(Some(serde_json::from_str(&text)?))
    }

    /// Serialize `value` and write it as the complete new contents of the
    /// document `file_name`.
    ///
    /// # Errors
    /// Returns [Error::Io] if the file cannot be written, or [Error::Json] if
    /// `value` cannot be serialized.
    pub fn write<T: Serialize>(&self, file_name: &str, value: &T) -> Result<(), Error> {
        fs::create_dir_all(&self.data_dir)?;

        let text = serde_json::to_string_pretty(value)?;
        fs::write(self.data_dir.join(file_name), text)?;

        Ok(())
    }
}

/// Create the data directory and seed any missing documents with their
/// defaults: an empty transaction list, the starter categories, and the
/// default settings.
///
/// Existing documents are left untouched.
///
/// # Errors
/// Returns an error if a document cannot be read or written.
pub fn initialize(store: &FlatFileStore) -> Result<(), Error> {
    if store
        .read::<Vec<transaction::Transaction>>(transaction::TRANSACTIONS_FILE)?
        .is_none()
    {
        store.write(
            transaction::TRANSACTIONS_FILE,
            &Vec::<transaction::Transaction>::new(),
        )?;
    }

    if store
        .read::<Vec<String>>(category::CATEGORIES_FILE)?
        .is_none()
    {
        let defaults: Vec<String> = category::DEFAULT_CATEGORIES
            .iter()
            .map(|name| (*name).to_owned())
            .collect();
        store.write(category::CATEGORIES_FILE, &defaults)?;
    }

    if store
        .read::<Settings>(crate::settings::SETTINGS_FILE)?
        .is_none()
    {
        store.write(crate::settings::SETTINGS_FILE, &Settings::default())?;
    }

    Ok(())
}

#[cfg(test)]
mod store_tests {
    use tempfile::TempDir;

    use crate::{
        category, settings::Settings, store::FlatFileStore, store::initialize,
        transaction::Transaction,
    };

    #[test]
    fn read_missing_document_returns_none() {
        let data_dir = TempDir::new().unwrap();
        let store = FlatFileStore::new(data_dir.path());

        let result: Option<Vec<String>> = store.read("categories.json").unwrap();

        assert_eq!(result, None);
    }

    #[test]
    fn write_then_read_round_trips() {
        let data_dir = TempDir::new().unwrap();
        let store = FlatFileStore::new(data_dir.path());
        let names = vec!["Food".to_owned(), "Transport".to_owned()];

        store.write("categories.json", &names).unwrap();
        let got: Option<Vec<String>> = store.read("categories.json").unwrap();

        assert_eq!(got, Some(names));
    }

    #[test]
    fn initialize_seeds_missing_documents() {
        let data_dir = TempDir::new().unwrap();
        let store = FlatFileStore::new(data_dir.path());

        initialize(&store).unwrap();

        let transactions: Option<Vec<Transaction>> =
            store.read(crate::transaction::TRANSACTIONS_FILE).unwrap();
        assert_eq!(transactions, Some(Vec::new()));

        let categories: Option<Vec<String>> = store.read(category::CATEGORIES_FILE).unwrap();
        assert_eq!(
            categories.unwrap(),
            category::DEFAULT_CATEGORIES
                .iter()
                .map(|name| (*name).to_owned())
                .collect::<Vec<_>>()
        );

        let settings: Option<Settings> = store.read(crate::settings::SETTINGS_FILE).unwrap();
        assert_eq!(settings, Some(Settings::default()));
    }

    #[test]
    fn initialize_leaves_existing_documents_untouched() {
        let data_dir = TempDir::new().unwrap();
        let store = FlatFileStore::new(data_dir.path());
        let names = vec!["Rent".to_owned()];
        store.write(category::CATEGORIES_FILE, &names).unwrap();

        initialize(&store).unwrap();

        let got: Option<Vec<String>> = store.read(category::CATEGORIES_FILE).unwrap();
        assert_eq!(got, Some(names));
    }
}
