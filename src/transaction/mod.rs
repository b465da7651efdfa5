//! Transactions, the unit record of money spent or earned.
//!
//! Creating, listing, updating and deleting transactions, plus the expansion
//! of recurring payloads into concrete dated instances and the grouping of
//! stored instances back into their series.

mod create;
mod db;
mod delete;
mod grouping;
mod list;
mod models;
mod recurrence;
mod update;

pub use create::create_transaction_endpoint;
pub use db::{TRANSACTIONS_FILE, get_transactions};
pub use delete::delete_transaction_endpoint;
pub use grouping::{RecurringGroup, group_recurring};
pub use list::get_transactions_endpoint;
pub use models::{Frequency, NewTransaction, Transaction, TransactionItem};
pub use update::update_transaction_endpoint;
