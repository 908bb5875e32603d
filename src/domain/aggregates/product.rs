//! Product Aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;
use crate::domain::events::{DomainEvent, ProductEvent};
use crate::domain::pricing::{display_amount, is_contact_for_price, Priced};
use crate::domain::value_objects::{Locale, LocalizedText};

#[derive(Clone, Debug)]
pub struct Product {
    id: String,
    slug: String,
    name: LocalizedText,
    description: LocalizedText,
    price: Decimal,
    weight: Decimal,
    status: ProductStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    events: Vec<DomainEvent>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)] pub enum ProductStatus { #[default] Draft, Active, Archived }

impl Product {
    /// A zero `price` lists the product as "contact for price".
    pub fn create(slug: impl Into<String>, name: LocalizedText, price: Decimal) -> Result<Self, ProductError> {
        if price.is_sign_negative() && !price.is_zero() { return Err(ProductError::NegativePrice); }
        let id = Uuid::now_v7().to_string();
        let now = Utc::now();
        let mut product = Self {
            id: id.clone(), slug: slug.into(), name, description: LocalizedText::default(),
            price, weight: Decimal::ZERO, status: ProductStatus::Draft,
            created_at: now, updated_at: now, events: vec![],
        };
        product.raise_event(DomainEvent::Product(ProductEvent::Created { product_id: id }));
        Ok(product)
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn slug(&self) -> &str { &self.slug }
    pub fn name(&self, locale: Locale) -> &str { self.name.resolve(locale) }
    pub fn description(&self, locale: Locale) -> &str { self.description.resolve(locale) }
    pub fn price(&self) -> Decimal { self.price }
    pub fn weight(&self) -> Decimal { self.weight }
    pub fn status(&self) -> ProductStatus { self.status }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn is_contact_for_price(&self) -> bool { is_contact_for_price(self) }

    /// Storefront price label: formatted amount, or the contact phrase for quote items.
    pub fn display_price(&self, locale: Locale) -> String { display_amount(Some(self.price), locale) }

    pub fn set_description(&mut self, description: LocalizedText) { self.description = description; self.touch(); }
    pub fn set_weight(&mut self, weight: Decimal) { self.weight = weight.max(Decimal::ZERO); self.touch(); }

    pub fn publish(&mut self) -> Result<(), ProductError> {
        if self.name.en.trim().is_empty() { return Err(ProductError::MissingName); }
        self.status = ProductStatus::Active;
        self.touch();
        self.raise_event(DomainEvent::Product(ProductEvent::Published { product_id: self.id.clone() }));
        Ok(())
    }

    pub fn archive(&mut self) { self.status = ProductStatus::Archived; self.touch(); }

    pub fn update_price(&mut self, new_price: Decimal) -> Result<(), ProductError> {
        if new_price.is_sign_negative() && !new_price.is_zero() { return Err(ProductError::NegativePrice); }
        let old = std::mem::replace(&mut self.price, new_price);
        self.touch();
        self.raise_event(DomainEvent::Product(ProductEvent::PriceChanged { product_id: self.id.clone(), old, new: new_price }));
        Ok(())
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
    fn touch(&mut self) { self.updated_at = Utc::now(); }
}

impl Priced for Product {
    fn unit_price(&self) -> Option<Decimal> { Some(self.price) }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum ProductError { MissingName, NegativePrice }
impl std::error::Error for ProductError {}
impl std::fmt::Display for ProductError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self { Self::MissingName => write!(f, "Missing name"), Self::NegativePrice => write!(f, "Price must not be negative") }
    }
}
