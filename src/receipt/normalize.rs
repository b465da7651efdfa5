//! Turns the loose JSON an analyzer returns into a well-formed scanned
//! receipt.
//!
//! Model output varies between runs and models: dates arrive in several
//! formats, amounts as numbers or formatted strings, items as a comma string
//! or an array of either strings or objects. Normalization accepts all of
//! these, and its output round-trips unchanged, so re-normalizing a scanned
//! receipt is a no-op.

use serde::{Deserialize, Serialize};
use time::{Date, format_description::FormatItem, macros::format_description};

use serde_json::Value;

use crate::transaction::TransactionItem;

/// The sentinel reported when the total on a receipt could not be read.
pub const UNRECOGNIZED: &str = "unrecognized";

const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
const SLASH_DATE: &[FormatItem<'static>] = format_description!("[month]/[day]/[year]");
const DOT_DATE: &[FormatItem<'static>] = format_description!("[day].[month].[year]");

/// A receipt total: either a readable amount, or the [UNRECOGNIZED]
/// sentinel when the analyzer could not make one out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScannedAmount {
    /// The total, zero or greater.
    Amount(f64),
    /// The [UNRECOGNIZED] sentinel.
    Unrecognized(String),
}

/// The well-formed result of scanning one receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannedReceipt {
    /// The merchant name, or the [UNRECOGNIZED] sentinel when the analyzer
    /// could not make one out.
    pub place: String,
    /// The purchase date, falling back to today when unreadable.
    pub date: Date,
    /// The receipt total.
    pub amount: ScannedAmount,
    /// The item lines, possibly empty. Prices default to zero.
    pub items: Vec<TransactionItem>,
}

/// Normalize the loose `fields` an analyzer extracted, using `today` as the
/// fallback date.
pub fn normalize(fields: &Value, today: Date) -> ScannedReceipt {
    ScannedReceipt {
        place: normalize_place(fields.get("place")),
        date: normalize_date(fields.get("date"), today),
        amount: normalize_amount(fields.get("amount")),
        items: normalize_items(fields.get("items")),
    }
}

fn normalize_place(place: Option<&Value>) -> String {
    match place.and_then(Value::as_str).map(str::trim) {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => UNRECOGNIZED.to_owned(),
    }
}

fn normalize_date(date: Option<&Value>, today: Date) -> Date {
    let Some(text) = date.and_then(Value::as_str).map(str::trim) else {
        return today;
    };

    [ISO_DATE, SLASH_DATE, DOT_DATE]
        .into_iter()
        .find_map(|format| Date::parse(text, format).ok())
        .unwrap_or(today)
}

fn normalize_amount(amount: Option<&Value>) -> ScannedAmount {
    match amount {
        Some(Value::Number(number)) => match number.as_f64() {
            Some(amount) if amount >= 0.0 => ScannedAmount::Amount(amount),
            _ => ScannedAmount::Unrecognized(UNRECOGNIZED.to_owned()),
        },
        Some(Value::String(text)) => {
            let filtered: String = text
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();

            match filtered.parse::<f64>() {
                Ok(amount) if amount >= 0.0 => ScannedAmount::Amount(amount),
                _ => ScannedAmount::Unrecognized(UNRECOGNIZED.to_owned()),
            }
        }
        _ => ScannedAmount::Unrecognized(UNRECOGNIZED.to_owned()),
    }
}

fn normalize_items(items: Option<&Value>) -> Vec<TransactionItem> {
    match items {
        Some(Value::String(text)) => text
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| TransactionItem {
                name: name.to_owned(),
                price: 0.0,
            })
            .collect(),
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|entry| match entry {
                Value::String(name) if !name.trim().is_empty() => Some(TransactionItem {
                    name: name.trim().to_owned(),
                    price: 0.0,
                }),
                Value::Object(fields) => {
                    let name = fields.get("name")?.as_str()?.trim().to_owned();
                    if name.is_empty() {
                        return None;
                    }

                    let price = fields
                        .get("price")
                        .and_then(Value::as_f64)
                        .filter(|price| *price >= 0.0)
                        .unwrap_or(0.0);

                    Some(TransactionItem { name, price })
                }
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod normalize_tests {
    use serde_json::json;
    use time::macros::date;

    use crate::receipt::normalize::{ScannedAmount, normalize};

    const TODAY: time::Date = date!(2024 - 05 - 06);

    #[test]
    fn well_formed_fields_pass_through() {
        let receipt = normalize(
            &json!({
                "place": "Corner Store",
                "date": "2024-05-01",
                "amount": 12.5,
                "items": [{"name": "Milk", "price": 2.5}],
            }),
            TODAY,
        );

        assert_eq!(receipt.place, "Corner Store");
        assert_eq!(receipt.date, date!(2024 - 05 - 01));
        assert_eq!(receipt.amount, ScannedAmount::Amount(12.5));
        assert_eq!(receipt.items.len(), 1);
        assert_eq!(receipt.items[0].name, "Milk");
        assert_eq!(receipt.items[0].price, 2.5);
    }

    #[test]
    fn alternative_date_formats_are_accepted() {
        for (text, expected) in [
            ("05/01/2024", date!(2024 - 05 - 01)),
            ("01.05.2024", date!(2024 - 05 - 01)),
        ] {
            let receipt = normalize(&json!({"date": text}), TODAY);

            assert_eq!(receipt.date, expected, "date text {text:?}");
        }
    }

    #[test]
    fn missing_place_is_unrecognized() {
        let receipt = normalize(&json!({"place": null}), TODAY);

        assert_eq!(receipt.place, "unrecognized");
    }

    #[test]
    fn unreadable_date_falls_back_to_today() {
        let receipt = normalize(&json!({"date": "last tuesday"}), TODAY);

        assert_eq!(receipt.date, TODAY);
    }

    #[test]
    fn formatted_amount_strings_are_parsed() {
        let receipt = normalize(&json!({"amount": "$12.50"}), TODAY);

        assert_eq!(receipt.amount, ScannedAmount::Amount(12.5));
    }

    #[test]
    fn unparseable_amount_strings_are_unrecognized() {
        let receipt = normalize(&json!({"amount": "total: N/A"}), TODAY);

        assert_eq!(
            receipt.amount,
            ScannedAmount::Unrecognized("unrecognized".to_owned())
        );
    }

    #[test]
    fn missing_or_negative_amounts_are_unrecognized() {
        for fields in [json!({}), json!({"amount": -3.0}), json!({"amount": null})] {
            let receipt = normalize(&fields, TODAY);

            assert_eq!(
                receipt.amount,
                ScannedAmount::Unrecognized("unrecognized".to_owned()),
                "fields {fields}"
            );
        }
    }

    #[test]
    fn comma_separated_item_strings_are_split() {
        let receipt = normalize(&json!({"items": "Milk, Bread , ,Eggs"}), TODAY);

        let names: Vec<_> = receipt.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Milk", "Bread", "Eggs"]);
        assert!(receipt.items.iter().all(|i| i.price == 0.0));
    }

    #[test]
    fn string_array_items_get_zero_prices() {
        let receipt = normalize(&json!({"items": ["Milk", " Bread ", ""]}), TODAY);

        let names: Vec<_> = receipt.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Milk", "Bread"]);
    }

    #[test]
    fn object_items_keep_non_negative_prices() {
        let receipt = normalize(
            &json!({"items": [
                {"name": "Milk", "price": 2.5},
                {"name": "Bread", "price": -1.0},
                {"name": "Eggs"},
                {"price": 4.0},
            ]}),
            TODAY,
        );

        let items: Vec<_> = receipt
            .items
            .iter()
            .map(|i| (i.name.as_str(), i.price))
            .collect();
        assert_eq!(items, vec![("Milk", 2.5), ("Bread", 0.0), ("Eggs", 0.0)]);
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw = json!({
            "place": " Corner Store ",
            "date": "05/01/2024",
            "amount": "$12.50",
            "items": "Milk, Bread",
        });

        let once = normalize(&raw, TODAY);
        let twice = normalize(&serde_json::to_value(&once).unwrap(), TODAY);

        assert_eq!(once, twice);
    }
}
