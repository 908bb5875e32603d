//! Cart Aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;
use crate::domain::aggregates::order::LineItem;
use crate::domain::aggregates::product::{Product, ProductStatus};
use crate::domain::pricing::{is_contact_for_price, Priced};
use crate::domain::shipping::ShippingItem;
use crate::domain::value_objects::{Locale, Quantity};

#[derive(Clone, Debug)]
pub struct Cart {
    id: String,
    session_id: Option<String>,
    items: Vec<CartItem>,
    subtotal: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub quantity: Quantity,
    pub unit_price: Decimal,
    pub weight: Decimal,
}

impl CartItem {
    /// Snapshot of an active product: its localized name, current price and parcel weight.
    pub fn from_product(product: &Product, quantity: Quantity, locale: Locale) -> Result<Self, CartError> {
        if product.status() != ProductStatus::Active { return Err(CartError::ProductUnavailable); }
        Ok(Self {
            product_id: product.id().to_string(),
            name: product.name(locale).to_string(),
            quantity,
            unit_price: product.price(),
            weight: product.weight(),
        })
    }

    pub fn line_total(&self) -> Decimal { self.unit_price.saturating_mul(Decimal::from(self.quantity.value())) }
}

impl Priced for CartItem {
    fn unit_price(&self) -> Option<Decimal> { Some(self.unit_price) }
}

impl Cart {
    pub fn new() -> Self {
        let now = Utc::now();
        Self { id: Uuid::new_v4().to_string(), session_id: None, items: vec![], subtotal: Decimal::ZERO, created_at: now, updated_at: now }
    }

    pub fn for_session(session_id: impl Into<String>) -> Self {
        let mut cart = Self::new();
        cart.session_id = Some(session_id.into());
        cart
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn session_id(&self) -> Option<&str> { self.session_id.as_deref() }
    pub fn items(&self) -> &[CartItem] { &self.items }
    /// Sum of priced lines; quote items are excluded until an administrator prices them.
    pub fn subtotal(&self) -> Decimal { self.subtotal }
    pub fn item_count(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn requires_quote(&self) -> bool { self.items.iter().any(|i| is_contact_for_price(i)) }

    /// Zero-priced items are accepted like any other.
    pub fn add_item(&mut self, item: CartItem) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.product_id == item.product_id) {
            existing.quantity = existing.quantity.add(item.quantity);
        } else {
            self.items.push(item);
        }
        self.recalculate();
    }

    pub fn update_quantity(&mut self, product_id: &str, quantity: u32) -> Result<(), CartError> {
        let index = self.items.iter().position(|i| i.product_id == product_id).ok_or(CartError::ItemNotFound)?;
        match Quantity::new(quantity) {
            Ok(q) => self.items[index].quantity = q,
            Err(_) => { self.items.remove(index); }
        }
        self.recalculate();
        Ok(())
    }

    pub fn remove_item(&mut self, product_id: &str) -> Result<(), CartError> {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        if self.items.len() == before { return Err(CartError::ItemNotFound); }
        self.recalculate();
        Ok(())
    }

    pub fn clear(&mut self) { self.items.clear(); self.recalculate(); }

    /// Parcel lines for the shipping calculator.
    pub fn shipping_items(&self) -> Vec<ShippingItem> {
        self.items.iter().map(|i| ShippingItem::new(i.weight, i.quantity)).collect()
    }

    /// Line items for checkout. Quote items do not block checkout.
    pub fn checkout_items(&self) -> Result<Vec<LineItem>, CartError> {
        if self.items.is_empty() { return Err(CartError::Empty); }
        Ok(self.items.iter().map(|i| LineItem::new(i.product_id.clone(), i.name.clone(), i.quantity, i.unit_price)).collect())
    }

    fn recalculate(&mut self) {
        self.subtotal = self
            .items
            .iter()
            .filter(|i| !is_contact_for_price(*i))
            .map(CartItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add);
        self.updated_at = Utc::now();
    }
}

impl Default for Cart { fn default() -> Self { Self::new() } }

#[derive(Debug, Clone, PartialEq, Eq)] pub enum CartError { ItemNotFound, Empty, ProductUnavailable }
impl std::error::Error for CartError {}
impl std::fmt::Display for CartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ItemNotFound => write!(f, "Item not found"),
            Self::Empty => write!(f, "Cart is empty"),
            Self::ProductUnavailable => write!(f, "Product is not available for sale"),
        }
    }
}
