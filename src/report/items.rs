//! Purchase statistics per item name, across every stored transaction.

use serde::Serialize;
use time::Date;

use crate::transaction::Transaction;

/// How often and how expensively one item has been bought.
///
/// Item names are matched case-insensitively with surrounding whitespace
/// ignored, so "Milk" and " milk " land in the same statistic.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStatistic {
    /// The item name, lower-cased and trimmed.
    pub name: String,
    /// How many times the item appears across all transactions.
    pub count: u32,
    /// The total spent on the item.
    pub total_spent: f64,
    /// The average price paid per purchase.
    pub average_price: f64,
    /// The date of the most recent transaction mentioning the item.
    pub last_purchased: Date,
}

/// Aggregate the items of `transactions` into per-name statistics, most
/// frequently bought first.
pub fn item_statistics(transactions: &[Transaction]) -> Vec<ItemStatistic> {
    let mut statistics: Vec<ItemStatistic> = Vec::new();

    for transaction in transactions {
        for item in &transaction.items {
            let name = item.name.trim().to_lowercase();

            if name.is_empty() {
                continue;
            }

            match statistics.iter_mut().find(|s| s.name == name) {
                Some(entry) => {
                    entry.count += 1;
                    entry.total_spent += item.price;
                    if transaction.date > entry.last_purchased {
                        entry.last_purchased = transaction.date;
                    }
                }
                None => statistics.push(ItemStatistic {
                    name,
                    count: 1,
                    total_spent: item.price,
                    average_price: 0.0,
                    last_purchased: transaction.date,
                }),
            }
        }
    }

    for statistic in &mut statistics {
        statistic.average_price = statistic.total_spent / f64::from(statistic.count);
    }

    statistics.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.name.cmp(&b.name))
    });

    statistics
}

#[cfg(test)]
mod item_statistics_tests {
    use time::macros::{date, datetime};
    use time::Date;

    use crate::{
        report::items::item_statistics,
        transaction::{NewTransaction, Transaction, TransactionItem},
    };

    fn transaction_with_items(date: Date, items: Vec<(&str, f64)>) -> Transaction {
        let payload = NewTransaction {
            place: Some("Corner Store".to_owned()),
            category: Some("Groceries".to_owned()),
            amount: items.iter().map(|(_, price)| price).sum(),
            is_income: false,
            date,
            items: items
                .into_iter()
                .map(|(name, price)| TransactionItem {
                    name: name.to_owned(),
                    price,
                })
                .collect(),
            notes: None,
            is_recurring: false,
            recurring_frequency: None,
            recurring_end_date: None,
        };

        payload.into_transaction_on(date, datetime!(2024-05-06 12:00 UTC))
    }

    #[test]
    fn names_merge_case_insensitively_with_whitespace_ignored() {
        let transactions = vec![
            transaction_with_items(date!(2024 - 05 - 01), vec![("Milk", 2.0)]),
            transaction_with_items(date!(2024 - 05 - 10), vec![(" milk ", 3.0)]),
        ];

        let statistics = item_statistics(&transactions);

        assert_eq!(statistics.len(), 1);
        let milk = &statistics[0];
        assert_eq!(milk.name, "milk");
        assert_eq!(milk.count, 2);
        assert_eq!(milk.total_spent, 5.0);
        assert_eq!(milk.average_price, 2.5);
        assert_eq!(milk.last_purchased, date!(2024 - 05 - 10));
    }

    #[test]
    fn most_frequent_items_come_first() {
        let transactions = vec![
            transaction_with_items(date!(2024 - 05 - 01), vec![("bread", 1.5), ("milk", 2.0)]),
            transaction_with_items(date!(2024 - 05 - 02), vec![("milk", 2.0)]),
        ];

        let statistics = item_statistics(&transactions);

        assert_eq!(
            statistics.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
            vec!["milk", "bread"]
        );
    }

    #[test]
    fn blank_item_names_are_skipped() {
        let transactions = vec![transaction_with_items(
            date!(2024 - 05 - 01),
            vec![("  ", 2.0), ("milk", 2.0)],
        )];

        let statistics = item_statistics(&transactions);

        assert_eq!(statistics.len(), 1);
        assert_eq!(statistics[0].name, "milk");
    }
}
