//! Domain events
use rust_decimal::Decimal;

#[derive(Clone, Debug, PartialEq)]
pub enum DomainEvent {
    Product(ProductEvent),
    Order(OrderEvent),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ProductEvent {
    Created { product_id: String },
    Published { product_id: String },
    PriceChanged { product_id: String, old: Decimal, new: Decimal },
}

#[derive(Clone, Debug, PartialEq)]
pub enum OrderEvent {
    Placed { order_id: String, total: Decimal },
    QuoteRequested { order_id: String, product_ids: Vec<String> },
    ItemPriced { order_id: String, product_id: String, price: Decimal },
    QuoteCompleted { order_id: String, total: Decimal },
    Processing { order_id: String },
    Shipped { order_id: String, tracking: Option<String> },
    Delivered { order_id: String },
    Cancelled { order_id: String },
    Refunded { order_id: String, amount: Decimal },
}
