//! Price display, quote-item classification and order totals
pub mod format;
pub mod quote;
pub mod totals;

pub use format::{contact_for_price, display_amount, display_price, format_amount, format_price, parse_vnd, to_decimal};
pub use quote::{is_contact_for_price, Priced};
pub use totals::{
    compute_numeric_total, compute_order_total, compute_order_total_value, compute_totals, quote_note, LineItemInput,
    OrderPricing, OrderTotals, FORMATTED_ZERO,
};
