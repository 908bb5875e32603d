//! Handmade Commerce
//!
//! Pricing core of a bilingual (English/Vietnamese) handmade-goods store.
//!
//! ## Features
//! - Locale-aware price formatting (VND `290.000 ₫`, USD `$1,234.50`)
//! - "Contact for price" quote items (price `0`)
//! - Shipping quotes from a configurable method table with free-shipping thresholds
//! - Order totals that tolerate missing data
//! - Quote workflow on orders: pending quote, admin pricing, fulfillment

pub mod api;
pub mod config;
pub mod domain;

use thiserror::Error;

pub use domain::pricing::{
    compute_numeric_total, compute_order_total, compute_order_total_value, display_price, format_price,
    is_contact_for_price, OrderPricing, OrderTotals, Priced,
};
pub use domain::shipping::{calculate_shipping, Destination, ShippingItem, ShippingMethod, ShippingQuote, ShippingTable};
pub use domain::value_objects::{Locale, LocalizedText};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum CommerceError {
    #[error("Shipping configuration error: {0}")]
    Shipping(#[from] domain::shipping::ShippingConfigError),

    #[error("Order error: {0}")]
    Order(#[from] domain::aggregates::OrderError),

    #[error("Cart error: {0}")]
    Cart(#[from] domain::aggregates::CartError),

    #[error("Product error: {0}")]
    Product(#[from] domain::aggregates::ProductError),
}

pub type Result<T> = std::result::Result<T, CommerceError>;
