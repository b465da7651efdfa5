//! Persistence functions for transactions.
//!
//! Every mutation reads the full collection, changes it in memory, and writes
//! it back as one document (read-modify-write).

use crate::{
    Error,
    store::FlatFileStore,
    transaction::models::{Transaction, TransactionId, TransactionPatch},
};

/// The document holding the transaction collection.
pub const TRANSACTIONS_FILE: &str = "transactions.json";

/// Retrieve every transaction in the store.
///
/// # Errors
/// Returns [Error::Io] or [Error::Json] if the document cannot be read.
pub fn get_transactions(store: &FlatFileStore) -> Result<Vec<Transaction>, Error> {
    Ok(store.read(TRANSACTIONS_FILE)?.unwrap_or_default())
}

/// Append `new_transactions` to the store in a single document write, so
/// either all of them are persisted or none are.
///
/// # Errors
/// Returns [Error::Io] or [Error::Json] if the document cannot be read or
/// written.
pub fn insert_transactions(
    store: &FlatFileStore,
    new_transactions: &[Transaction],
) -> Result<(), Error> {
    let mut transactions = get_transactions(store)?;
    transactions.extend_from_slice(new_transactions);

    store.write(TRANSACTIONS_FILE, &transactions)
}

/// Merge `patch` over the transaction with the given `id` and persist the
/// result.
///
/// # Errors
/// Returns [Error::UpdateMissingTransaction] if no transaction has that ID,
/// or [Error::MissingFrequency] if the merged record would be recurring
/// without a frequency; nothing is written in either case.
pub fn update_transaction(
    store: &FlatFileStore,
    id: &TransactionId,
    patch: &TransactionPatch,
) -> Result<Transaction, Error> {
    let mut transactions = get_transactions(store)?;

    let transaction = transactions
        .iter_mut()
        .find(|transaction| transaction.id == *id)
        .ok_or(Error::UpdateMissingTransaction)?;

    patch.apply_to(transaction);

    if transaction.is_recurring && transaction.recurring_frequency.is_none() {
        return Err(Error::MissingFrequency);
    }

    let updated = transaction.clone();

    store.write(TRANSACTIONS_FILE, &transactions)?;

    Ok(updated)
}

/// Remove the transaction with the given `id` from the store.
///
/// # Errors
/// Returns [Error::DeleteMissingTransaction] if no transaction has that ID;
/// the collection is left unchanged in that case.
pub fn delete_transaction(store: &FlatFileStore, id: &TransactionId) -> Result<(), Error> {
    let mut transactions = get_transactions(store)?;

    let index = transactions
        .iter()
        .position(|transaction| transaction.id == *id)
        .ok_or(Error::DeleteMissingTransaction)?;

    transactions.remove(index);

    store.write(TRANSACTIONS_FILE, &transactions)
}
