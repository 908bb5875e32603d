//! Order total aggregation
//!
//! Sums line items, adds shipping and tax, subtracts the discount. Missing or
//! unusable numbers contribute zero; this module never fails on data shape.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::format::{format_amount, to_decimal};
use crate::domain::value_objects::Locale;

pub const QUOTE_NOTE_EN: &str = "+ items awaiting a price quote";
pub const QUOTE_NOTE_VI: &str = "+ giá sản phẩm cần báo giá";

/// Rendered total for input that is not an order at all.
pub const FORMATTED_ZERO: &str = "0";

pub fn quote_note(locale: Locale) -> &'static str {
    match locale {
        Locale::Vi => QUOTE_NOTE_VI,
        Locale::En => QUOTE_NOTE_EN,
    }
}

/// One line of an order as handed over by the caller.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub total: Option<Decimal>,
}

impl LineItemInput {
    pub fn priced(price: Decimal, quantity: u32) -> Self {
        Self { price: Some(price), quantity: Some(quantity), ..Default::default() }
    }
    pub fn with_total(mut self, total: Decimal) -> Self { self.total = Some(total); self }
    pub fn with_product(mut self, product_id: impl Into<String>) -> Self { self.product_id = Some(product_id.into()); self }

    /// `total` when present, otherwise `price × quantity`; zero when neither
    /// resolves or the product does not fit in a `Decimal`.
    pub fn resolved_total(&self) -> Decimal {
        if let Some(total) = self.total { return total; }
        match (self.price, self.quantity) {
            (Some(price), Some(quantity)) => price.checked_mul(Decimal::from(quantity)).unwrap_or_else(|| {
                tracing::warn!(%price, quantity, "line total overflows; counting it as zero");
                Decimal::ZERO
            }),
            _ => Decimal::ZERO,
        }
    }

    pub fn is_unpriced(&self) -> bool { self.price.is_none() }

    fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else { return Self::default() };
        Self {
            product_id: field(obj, "productId", "product_id").and_then(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }),
            price: number(obj, "price", "price"),
            quantity: number(obj, "quantity", "quantity")
                .and_then(|q| if q.fract().is_zero() { q.to_u32() } else { None }),
            total: number(obj, "total", "total"),
        }
    }
}

/// The pricing-relevant subset of an order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPricing {
    pub items: Vec<LineItemInput>,
    #[serde(default)]
    pub shipping_cost: Option<Decimal>,
    #[serde(default)]
    pub tax_amount: Option<Decimal>,
    #[serde(default)]
    pub discount_amount: Option<Decimal>,
}

impl OrderPricing {
    pub fn new(items: Vec<LineItemInput>) -> Self { Self { items, ..Default::default() } }
    pub fn with_shipping(mut self, amount: Decimal) -> Self { self.shipping_cost = Some(amount); self }
    pub fn with_tax(mut self, amount: Decimal) -> Self { self.tax_amount = Some(amount); self }
    pub fn with_discount(mut self, amount: Decimal) -> Self { self.discount_amount = Some(amount); self }

    /// Lenient read of loosely shaped order data.
    ///
    /// Returns `None` unless `value` is an object with an `items` array. Numbers
    /// may be JSON numbers or numeric strings; anything else is treated as
    /// missing. Both camelCase and snake_case keys are accepted.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let items = obj.get("items")?.as_array()?;
        Some(Self {
            items: items.iter().map(LineItemInput::from_value).collect(),
            shipping_cost: number(obj, "shippingCost", "shipping_cost"),
            tax_amount: number(obj, "taxAmount", "tax_amount"),
            discount_amount: number(obj, "discountAmount", "discount_amount"),
        })
    }
}

/// Breakdown persisted alongside an order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub has_unpriced_items: bool,
}

pub fn compute_totals(order: &OrderPricing) -> OrderTotals {
    let subtotal = order
        .items
        .iter()
        .map(LineItemInput::resolved_total)
        .fold(Decimal::ZERO, |acc, line| add_or_skip(acc, line, "line total"));
    let shipping = order.shipping_cost.unwrap_or_default();
    let tax = order.tax_amount.unwrap_or_default();
    let discount = order.discount_amount.unwrap_or_default();
    let total = add_or_skip(add_or_skip(subtotal, shipping, "shipping"), tax, "tax");
    let total = add_or_skip(total, -discount, "discount");
    if total.is_sign_negative() && !total.is_zero() {
        tracing::warn!(%subtotal, %shipping, %tax, %discount, %total, "order total is negative; discount exceeds order value");
    }
    OrderTotals {
        subtotal,
        shipping,
        tax,
        discount,
        total,
        has_unpriced_items: order.items.iter().any(LineItemInput::is_unpriced),
    }
}

pub fn compute_numeric_total(order: &OrderPricing) -> Decimal {
    compute_totals(order).total
}

/// Display form of the grand total. Unpriced items get a trailing quote note.
pub fn compute_order_total(order: &OrderPricing, locale: Locale) -> String {
    let totals = compute_totals(order);
    let formatted = format_amount(totals.total, locale);
    if totals.has_unpriced_items {
        format!("{} {}", formatted, quote_note(locale))
    } else {
        formatted
    }
}

/// Like [`compute_order_total`] for raw data; anything that is not an order renders as `"0"`.
pub fn compute_order_total_value(value: &Value, locale: Locale) -> String {
    match OrderPricing::from_value(value) {
        Some(order) => compute_order_total(&order, locale),
        None => {
            tracing::debug!("order data has no usable items; rendering zero total");
            FORMATTED_ZERO.to_string()
        }
    }
}

/// `acc + value`, or `acc` unchanged when the sum leaves the `Decimal` range.
fn add_or_skip(acc: Decimal, value: Decimal, component: &'static str) -> Decimal {
    acc.checked_add(value).unwrap_or_else(|| {
        tracing::warn!(%acc, %value, component, "order amount overflows; leaving it out of the total");
        acc
    })
}

fn field<'a>(obj: &'a Map<String, Value>, camel: &str, snake: &str) -> Option<&'a Value> {
    obj.get(camel).or_else(|| obj.get(snake)).filter(|v| !v.is_null())
}

fn number(obj: &Map<String, Value>, camel: &str, snake: &str) -> Option<Decimal> {
    match field(obj, camel, snake)? {
        Value::Number(n) => n.as_f64().and_then(to_decimal),
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(to_decimal),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn sample_order() -> OrderPricing {
        OrderPricing::new(vec![
            LineItemInput::priced(dec!(100000), 2).with_total(dec!(200000)),
            LineItemInput::priced(dec!(50000), 1).with_total(dec!(50000)),
        ])
        .with_shipping(dec!(25000))
        .with_tax(dec!(25000))
        .with_discount(dec!(10000))
    }

    #[test]
    fn test_total_additivity() {
        let order = sample_order();
        assert_eq!(compute_numeric_total(&order), dec!(290000));
        assert_eq!(compute_order_total(&order, Locale::Vi), "290.000 ₫");
    }

    #[test]
    fn test_total_falls_back_to_price_times_quantity() {
        let order = OrderPricing::new(vec![LineItemInput::priced(dec!(19.99), 3)]);
        assert_eq!(compute_numeric_total(&order), dec!(59.97));
        assert_eq!(compute_order_total(&order, Locale::En), "$59.97");
    }

    #[test]
    fn test_undefined_price_adds_quote_note() {
        let order = OrderPricing::new(vec![
            LineItemInput::priced(dec!(100000), 2).with_total(dec!(200000)),
            LineItemInput { quantity: Some(1), ..Default::default() },
        ])
        .with_shipping(dec!(25000))
        .with_tax(dec!(25000));
        let rendered = compute_order_total(&order, Locale::Vi);
        assert!(rendered.contains("250.000 ₫"));
        assert!(rendered.contains(QUOTE_NOTE_VI));
    }

    #[test]
    fn test_zero_priced_item_has_no_note() {
        let order = OrderPricing::new(vec![LineItemInput::priced(Decimal::ZERO, 1)]);
        assert_eq!(compute_order_total(&order, Locale::Vi), "0 ₫");
    }

    #[test]
    fn test_negative_total_is_not_clamped() {
        let order = OrderPricing::new(vec![LineItemInput::priced(dec!(10), 1)]).with_discount(dec!(15));
        assert_eq!(compute_numeric_total(&order), dec!(-5));
    }

    #[test]
    fn test_invalid_top_level_input() {
        assert_eq!(compute_order_total_value(&Value::Null, Locale::Vi), "0");
        assert_eq!(compute_order_total_value(&json!("garbage"), Locale::Vi), "0");
        assert_eq!(compute_order_total_value(&json!({"total": 10}), Locale::Vi), "0");
        assert_eq!(compute_order_total_value(&json!({"items": "nope"}), Locale::Vi), "0");
    }

    #[test]
    fn test_lenient_value_parsing() {
        let value = json!({
            "items": [
                {"productId": "basket-01", "price": "120000", "quantity": 2},
                {"price": 30000, "quantity": 1, "total": null},
                "not an item"
            ],
            "shipping_cost": 20000,
            "taxAmount": "abc"
        });
        let order = OrderPricing::from_value(&value).unwrap();
        assert_eq!(order.items[0].product_id.as_deref(), Some("basket-01"));
        assert_eq!(order.tax_amount, None);
        let totals = compute_totals(&order);
        assert_eq!(totals.subtotal, dec!(270000));
        assert_eq!(totals.total, dec!(290000));
        assert!(totals.has_unpriced_items);
    }

    #[test]
    fn test_overflowing_amounts_are_left_out() {
        let value = json!({"items": [{"price": 7e28, "quantity": 2}, {"price": 1000, "quantity": 1}]});
        assert_eq!(compute_order_total_value(&value, Locale::Vi), "1.000 ₫");

        let value = json!({"items": [{"total": 5e28}, {"total": 5e28}]});
        let order = OrderPricing::from_value(&value).unwrap();
        assert_eq!(compute_numeric_total(&order), order.items[0].total.unwrap());

        let order = OrderPricing::new(vec![LineItemInput::priced(Decimal::MAX, 1)])
            .with_shipping(Decimal::MAX)
            .with_discount(Decimal::MIN);
        assert_eq!(compute_numeric_total(&order), Decimal::MAX);
    }

    #[test]
    fn test_totals_serialize_as_json_numbers() {
        let wire = serde_json::to_value(compute_totals(&sample_order())).unwrap();
        assert_eq!(wire["total"], json!(290000.0));
        assert_eq!(wire["discount"], json!(10000.0));
        assert_eq!(wire["hasUnpricedItems"], json!(false));
    }

    #[test]
    fn test_fractional_quantity_is_ignored() {
        let value = json!({"items": [{"price": 1000, "quantity": 1.5}]});
        let order = OrderPricing::from_value(&value).unwrap();
        assert_eq!(order.items[0].quantity, None);
        assert_eq!(compute_numeric_total(&order), Decimal::ZERO);
    }
}
