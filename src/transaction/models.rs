//! The core data models for transactions.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::Error;

/// The opaque identifier of a transaction, stable for its lifetime.
pub type TransactionId = String;

/// How often a recurring transaction happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every day.
    Daily,
    /// Every seven days.
    Weekly,
    /// Every calendar month, on the same day-of-month clamped to the month length.
    Monthly,
    /// Every calendar year.
    Yearly,
}

/// A single purchased item recorded on a transaction, e.g. one line of a
/// grocery receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionItem {
    /// The item name as displayed to the user.
    pub name: String,
    /// The recorded price of this item. Never negative.
    pub price: f64,
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// A transaction may be one instance of a recurring series; the series' end
/// date is consumed at expansion time and never stored on instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Where the money was spent or earned (merchant or source).
    #[serde(default)]
    pub place: Option<String>,
    /// The name of the category the transaction belongs to.
    ///
    /// Categories are an open, user-managed set; a transaction may reference
    /// a category that has since been deleted.
    #[serde(default)]
    pub category: Option<String>,
    /// The amount of money spent or earned. Never negative; the direction is
    /// carried by [Transaction::is_income].
    pub amount: f64,
    /// Whether this transaction is income rather than an expense.
    #[serde(default)]
    pub is_income: bool,
    /// When the transaction happened.
    pub date: Date,
    /// The individual items purchased, possibly empty.
    #[serde(default)]
    pub items: Vec<TransactionItem>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Whether this transaction is an instance of a recurring series.
    #[serde(default)]
    pub is_recurring: bool,
    /// How often the series repeats. Always present when
    /// [Transaction::is_recurring] is true.
    #[serde(default)]
    pub recurring_frequency: Option<Frequency>,
    /// When the transaction record was created. Immutable.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The payload for creating a transaction.
///
/// Recurring payloads additionally carry the frequency and an optional end
/// date which bound the expansion into concrete instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    /// Where the money was spent or earned.
    #[serde(default)]
    pub place: Option<String>,
    /// The name of the category the transaction belongs to.
    #[serde(default)]
    pub category: Option<String>,
    /// The amount of money spent or earned. Must be zero or greater.
    pub amount: f64,
    /// Whether this transaction is income rather than an expense.
    #[serde(default)]
    pub is_income: bool,
    /// When the transaction happened. For recurring payloads, the first
    /// instance date.
    pub date: Date,
    /// The individual items purchased.
    #[serde(default)]
    pub items: Vec<TransactionItem>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Whether to expand this payload into a recurring series.
    #[serde(default)]
    pub is_recurring: bool,
    /// How often the series repeats. Required when
    /// [NewTransaction::is_recurring] is true.
    #[serde(default)]
    pub recurring_frequency: Option<Frequency>,
    /// The last date a recurring instance may fall on. Not persisted on the
    /// generated instances.
    #[serde(default)]
    pub recurring_end_date: Option<Date>,
}

impl NewTransaction {
    /// Check the payload invariants before anything is persisted.
    ///
    /// # Errors
    /// Returns [Error::NegativeAmount] if the amount is below zero,
    /// [Error::NegativeItemPrice] if any item price is below zero, or
    /// [Error::MissingFrequency] if the payload is recurring without a
    /// frequency.
    pub fn validate(&self) -> Result<(), Error> {
        if self.amount < 0.0 {
            return Err(Error::NegativeAmount(self.amount));
        }

        validate_items(&self.items)?;

        if self.is_recurring && self.recurring_frequency.is_none() {
            return Err(Error::MissingFrequency);
        }

        Ok(())
    }

    /// Materialize this payload as a stored transaction dated `date`, with a
    /// freshly generated ID.
    ///
    /// The recurring end date is intentionally dropped here.
    pub fn into_transaction_on(&self, date: Date, created_at: OffsetDateTime) -> Transaction {
        Transaction {
            id: Uuid::new_v4().to_string(),
            place: self.place.clone(),
            category: self.category.clone(),
            amount: self.amount,
            is_income: self.is_income,
            date,
            items: self.items.clone(),
            notes: self.notes.clone(),
            is_recurring: self.is_recurring,
            recurring_frequency: self.recurring_frequency,
            created_at,
        }
    }
}

/// The payload for updating a transaction.
///
/// Fields left out of the payload keep their current values (shallow merge).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatch {
    /// Replaces the place when supplied.
    #[serde(default)]
    pub place: Option<String>,
    /// Replaces the category when supplied.
    #[serde(default)]
    pub category: Option<String>,
    /// Replaces the amount when supplied. Must be zero or greater.
    #[serde(default)]
    pub amount: Option<f64>,
    /// Replaces the income flag when supplied.
    #[serde(default)]
    pub is_income: Option<bool>,
    /// Replaces the date when supplied.
    #[serde(default)]
    pub date: Option<Date>,
    /// Replaces the item list when supplied.
    #[serde(default)]
    pub items: Option<Vec<TransactionItem>>,
    /// Replaces the notes when supplied.
    #[serde(default)]
    pub notes: Option<String>,
    /// Replaces the recurring flag when supplied.
    #[serde(default)]
    pub is_recurring: Option<bool>,
    /// Replaces the recurring frequency when supplied.
    #[serde(default)]
    pub recurring_frequency: Option<Frequency>,
}

impl TransactionPatch {
    /// Check the patch invariants before anything is persisted.
    ///
    /// # Errors
    /// Returns [Error::NegativeAmount] or [Error::NegativeItemPrice] if a
    /// supplied value is below zero.
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(amount) = self.amount
            && amount < 0.0
        {
            return Err(Error::NegativeAmount(amount));
        }

        if let Some(items) = &self.items {
            validate_items(items)?;
        }

        Ok(())
    }

    /// Merge the supplied fields over `transaction`, leaving the rest as-is.
    ///
    /// The ID and creation timestamp are never touched.
    pub fn apply_to(&self, transaction: &mut Transaction) {
        if let Some(place) = &self.place {
            transaction.place = Some(place.clone());
        }
        if let Some(category) = &self.category {
            transaction.category = Some(category.clone());
        }
        if let Some(amount) = self.amount {
            transaction.amount = amount;
        }
        if let Some(is_income) = self.is_income {
            transaction.is_income = is_income;
        }
        if let Some(date) = self.date {
            transaction.date = date;
        }
        if let Some(items) = &self.items {
            transaction.items = items.clone();
        }
        if let Some(notes) = &self.notes {
            transaction.notes = Some(notes.clone());
        }
        if let Some(is_recurring) = self.is_recurring {
            transaction.is_recurring = is_recurring;
        }
        if let Some(frequency) = self.recurring_frequency {
            transaction.recurring_frequency = Some(frequency);
        }
    }
}

fn validate_items(items: &[TransactionItem]) -> Result<(), Error> {
    for item in items {
        if item.price < 0.0 {
            return Err(Error::NegativeItemPrice {
                name: item.name.clone(),
                price: item.price,
            });
        }
    }

    Ok(())
}
