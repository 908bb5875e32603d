//! Order Aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;
use crate::domain::events::{DomainEvent, OrderEvent};
use crate::domain::pricing::{compute_totals, is_contact_for_price, LineItemInput, OrderPricing, OrderTotals, Priced};
use crate::domain::value_objects::{Locale, Quantity};

#[derive(Clone, Debug)]
pub struct Order {
    id: String,
    order_number: u64,
    customer_email: String,
    locale: Locale,
    status: OrderStatus,
    items: Vec<LineItem>,
    shipping_method_id: Option<String>,
    shipping_cost: Decimal,
    tax_amount: Decimal,
    discount_amount: Decimal,
    totals: OrderTotals,
    requires_pricing: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    events: Vec<DomainEvent>,
}

/// A priced (or awaiting-quote) product line. `unit_price == 0` marks a quote item.
#[derive(Clone, Debug, PartialEq)]
pub struct LineItem { pub product_id: String, pub name: String, pub quantity: Quantity, pub unit_price: Decimal }

impl LineItem {
    pub fn new(product_id: impl Into<String>, name: impl Into<String>, quantity: Quantity, unit_price: Decimal) -> Self {
        Self { product_id: product_id.into(), name: name.into(), quantity, unit_price }
    }
    pub fn total(&self) -> Decimal { self.unit_price.saturating_mul(Decimal::from(self.quantity.value())) }
}

impl Priced for LineItem {
    fn unit_price(&self) -> Option<Decimal> { Some(self.unit_price) }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus { PendingQuote, #[default] Pending, Processing, Shipped, Delivered, Cancelled, Refunded }

/// Charges applied on top of the line items at checkout.
#[derive(Clone, Debug, Default)]
pub struct Charges { pub shipping_method_id: Option<String>, pub shipping_cost: Decimal, pub tax_amount: Decimal, pub discount_amount: Decimal }

impl Order {
    /// Places an order at checkout. Any zero-priced line puts it into `PendingQuote`.
    pub fn place(order_number: u64, customer_email: impl Into<String>, locale: Locale, items: Vec<LineItem>, charges: Charges) -> Result<Self, OrderError> {
        if items.is_empty() { return Err(OrderError::NoItems); }
        let requires_pricing = items.iter().any(|i| is_contact_for_price(i));
        let now = Utc::now();
        let mut order = Self {
            id: Uuid::now_v7().to_string(), order_number, customer_email: customer_email.into(), locale,
            status: if requires_pricing { OrderStatus::PendingQuote } else { OrderStatus::Pending },
            items, shipping_method_id: charges.shipping_method_id, shipping_cost: charges.shipping_cost,
            tax_amount: charges.tax_amount, discount_amount: charges.discount_amount,
            totals: OrderTotals::default(), requires_pricing, created_at: now, updated_at: now, events: vec![],
        };
        order.recalculate();
        let event = if requires_pricing {
            OrderEvent::QuoteRequested { order_id: order.id.clone(), product_ids: order.unpriced_product_ids() }
        } else {
            OrderEvent::Placed { order_id: order.id.clone(), total: order.totals.total }
        };
        order.raise_event(DomainEvent::Order(event));
        tracing::info!(order_id = %order.id, order_number, status = ?order.status, total = %order.totals.total, "order placed");
        Ok(order)
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn order_number(&self) -> u64 { self.order_number }
    pub fn customer_email(&self) -> &str { &self.customer_email }
    pub fn locale(&self) -> Locale { self.locale }
    pub fn status(&self) -> OrderStatus { self.status }
    pub fn items(&self) -> &[LineItem] { &self.items }
    pub fn shipping_method_id(&self) -> Option<&str> { self.shipping_method_id.as_deref() }
    pub fn totals(&self) -> &OrderTotals { &self.totals }
    pub fn subtotal(&self) -> Decimal { self.totals.subtotal }
    pub fn total(&self) -> Decimal { self.totals.total }
    pub fn requires_pricing(&self) -> bool { self.requires_pricing }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }
    pub fn has_unpriced_items(&self) -> bool { self.items.iter().any(|i| is_contact_for_price(i)) }

    /// Admin pricing of a quote item. Totals are recomputed; once every line is
    /// priced the order joins the standard flow as `Pending`.
    pub fn assign_item_price(&mut self, product_id: &str, price: Decimal) -> Result<(), OrderError> {
        if self.status != OrderStatus::PendingQuote { return Err(OrderError::PricingLocked(self.status)); }
        if price <= Decimal::ZERO { return Err(OrderError::InvalidPrice(price)); }
        let index = self.items.iter()
            .position(|i| i.product_id == product_id && is_contact_for_price(i))
            .ok_or_else(|| OrderError::ItemNotFound(product_id.to_string()))?;
        self.items[index].unit_price = price;
        self.recalculate();
        self.raise_event(DomainEvent::Order(OrderEvent::ItemPriced { order_id: self.id.clone(), product_id: product_id.to_string(), price }));
        if !self.has_unpriced_items() {
            self.status = OrderStatus::Pending;
            self.raise_event(DomainEvent::Order(OrderEvent::QuoteCompleted { order_id: self.id.clone(), total: self.totals.total }));
            tracing::info!(order_id = %self.id, total = %self.totals.total, "quote completed");
        }
        Ok(())
    }

    pub fn start_processing(&mut self) -> Result<(), OrderError> {
        self.ensure_priced()?;
        self.transition(OrderStatus::Pending, OrderStatus::Processing)?;
        self.raise_event(DomainEvent::Order(OrderEvent::Processing { order_id: self.id.clone() }));
        Ok(())
    }

    pub fn ship(&mut self, tracking: Option<String>) -> Result<(), OrderError> {
        self.ensure_priced()?;
        self.transition(OrderStatus::Processing, OrderStatus::Shipped)?;
        self.raise_event(DomainEvent::Order(OrderEvent::Shipped { order_id: self.id.clone(), tracking }));
        Ok(())
    }

    pub fn deliver(&mut self) -> Result<(), OrderError> {
        self.transition(OrderStatus::Shipped, OrderStatus::Delivered)?;
        self.raise_event(DomainEvent::Order(OrderEvent::Delivered { order_id: self.id.clone() }));
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), OrderError> {
        match self.status {
            OrderStatus::PendingQuote | OrderStatus::Pending | OrderStatus::Processing => {}
            from => return Err(OrderError::InvalidTransition { from, to: OrderStatus::Cancelled }),
        }
        self.status = OrderStatus::Cancelled;
        self.touch();
        self.raise_event(DomainEvent::Order(OrderEvent::Cancelled { order_id: self.id.clone() }));
        Ok(())
    }

    pub fn refund(&mut self) -> Result<(), OrderError> {
        match self.status {
            OrderStatus::Shipped | OrderStatus::Delivered => {}
            from => return Err(OrderError::InvalidTransition { from, to: OrderStatus::Refunded }),
        }
        self.status = OrderStatus::Refunded;
        self.touch();
        self.raise_event(DomainEvent::Order(OrderEvent::Refunded { order_id: self.id.clone(), amount: self.totals.total }));
        Ok(())
    }

    /// Pricing input for the total aggregator.
    pub fn pricing(&self) -> OrderPricing {
        OrderPricing {
            items: self.items.iter()
                .map(|i| LineItemInput::priced(i.unit_price, i.quantity.value()).with_product(i.product_id.clone()))
                .collect(),
            shipping_cost: Some(self.shipping_cost),
            tax_amount: Some(self.tax_amount),
            discount_amount: Some(self.discount_amount),
        }
    }

    fn unpriced_product_ids(&self) -> Vec<String> {
        self.items.iter().filter(|i| is_contact_for_price(*i)).map(|i| i.product_id.clone()).collect()
    }

    fn ensure_priced(&self) -> Result<(), OrderError> {
        if self.has_unpriced_items() { return Err(OrderError::AwaitingQuote(self.unpriced_product_ids())); }
        Ok(())
    }

    fn transition(&mut self, from: OrderStatus, to: OrderStatus) -> Result<(), OrderError> {
        if self.status != from { return Err(OrderError::InvalidTransition { from: self.status, to }); }
        self.status = to;
        self.touch();
        Ok(())
    }

    fn recalculate(&mut self) {
        self.totals = compute_totals(&self.pricing());
        self.touch();
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
    fn touch(&mut self) { self.updated_at = Utc::now(); }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrderError {
    #[error("Order has no items")]
    NoItems,
    #[error("Order is awaiting a price quote for {0:?}")]
    AwaitingQuote(Vec<String>),
    #[error("Prices can only be assigned while awaiting a quote (status {0:?})")]
    PricingLocked(OrderStatus),
    #[error("No unpriced line item for product {0}")]
    ItemNotFound(String),
    #[error("Assigned price must be positive, got {0}")]
    InvalidPrice(Decimal),
    #[error("Cannot move order from {from:?} to {to:?}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
}
