//! Quote-item classification
//!
//! A price of exactly zero means "contact us for a price": the item can be
//! carted and ordered, but an administrator has to price it before the order
//! is fulfilled. A missing price is not a zero price.

use rust_decimal::Decimal;
use serde_json::Value;

use super::format::to_decimal;

/// Anything that carries a unit price.
pub trait Priced {
    /// The resolved unit price, or `None` when it is missing or not a number.
    fn unit_price(&self) -> Option<Decimal>;
}

impl Priced for Decimal {
    fn unit_price(&self) -> Option<Decimal> { Some(*self) }
}

impl Priced for f64 {
    fn unit_price(&self) -> Option<Decimal> { to_decimal(*self) }
}

impl Priced for i64 {
    fn unit_price(&self) -> Option<Decimal> { Some(Decimal::from(*self)) }
}

impl<T: Priced> Priced for Option<T> {
    fn unit_price(&self) -> Option<Decimal> { self.as_ref().and_then(Priced::unit_price) }
}

impl<T: Priced + ?Sized> Priced for &T {
    fn unit_price(&self) -> Option<Decimal> { (**self).unit_price() }
}

/// A JSON number, or an object whose `price` field is a number.
impl Priced for Value {
    fn unit_price(&self) -> Option<Decimal> {
        match self {
            Value::Number(n) => n.as_f64().and_then(to_decimal),
            Value::Object(map) => match map.get("price") {
                Some(price @ Value::Number(_)) => price.unit_price(),
                _ => None,
            },
            _ => None,
        }
    }
}

/// True iff the resolved price is exactly zero.
pub fn is_contact_for_price<P: Priced + ?Sized>(item: &P) -> bool {
    item.unit_price().is_some_and(|price| price.is_zero())
}
