//! Reports derived from the stored transactions: the monthly spending
//! summary, per-item purchase statistics, and the recurring-series view.

mod handlers;
mod items;
mod summary;

pub use handlers::{
    get_item_statistics_endpoint, get_recurring_groups_endpoint, get_summary_endpoint,
};
