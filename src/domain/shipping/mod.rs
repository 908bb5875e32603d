//! Shipping methods, shipment items and quotes

pub mod calculator;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::domain::value_objects::{LocalizedText, Quantity};

pub use calculator::{calculate_shipping, estimated_days_label, method_cost, total_weight};

/// Where a shipment goes. Only the country takes part in method selection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub country: String,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
}

impl Destination {
    pub fn country(country: impl Into<String>) -> Self {
        Self { country: country.into(), province: None, district: None, postal_code: None }
    }
}

impl Default for Destination {
    fn default() -> Self { Self::country("VN") }
}

/// One parcel line of a shipment. Dimensions are carried but not priced.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingItem {
    #[serde(default)]
    pub weight: Decimal,
    #[serde(default)]
    pub length: Option<Decimal>,
    #[serde(default)]
    pub width: Option<Decimal>,
    #[serde(default)]
    pub height: Option<Decimal>,
    #[serde(default)]
    pub quantity: Quantity,
}

impl ShippingItem {
    pub fn new(weight: Decimal, quantity: Quantity) -> Self {
        Self { weight, quantity, ..Default::default() }
    }
}

/// Administrator-maintained shipping option.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "ShippingMethodRecord", into = "ShippingMethodRecord")]
pub struct ShippingMethod {
    pub method_id: String,
    pub name: LocalizedText,
    pub description: LocalizedText,
    pub carrier: String,
    pub base_rate: Decimal,
    pub estimated_days_min: u32,
    pub estimated_days_max: u32,
    pub weight_threshold: Decimal,
    pub weight_rate: Decimal,
    pub free_shipping_threshold: Option<Decimal>,
    pub is_active: bool,
    pub display_order: i32,
    /// ISO country codes this method ships to; empty means everywhere.
    pub allowed_countries: Vec<String>,
}

impl ShippingMethod {
    pub fn serves(&self, destination: &Destination) -> bool {
        self.allowed_countries.is_empty()
            || self.allowed_countries.iter().any(|c| c.trim().eq_ignore_ascii_case(destination.country.trim()))
    }

    pub fn validate(&self) -> Result<(), ShippingConfigError> {
        if self.method_id.trim().is_empty() { return Err(ShippingConfigError::EmptyMethodId); }
        let amounts = [
            ("baseRate", Some(self.base_rate)),
            ("weightThreshold", Some(self.weight_threshold)),
            ("weightRate", Some(self.weight_rate)),
            ("freeShippingThreshold", self.free_shipping_threshold),
        ];
        for (field, amount) in amounts {
            if amount.is_some_and(|a| a.is_sign_negative() && !a.is_zero()) {
                return Err(ShippingConfigError::NegativeAmount { method_id: self.method_id.clone(), field });
            }
        }
        if self.estimated_days_min > self.estimated_days_max {
            return Err(ShippingConfigError::EstimatedDaysOrder {
                method_id: self.method_id.clone(),
                min: self.estimated_days_min,
                max: self.estimated_days_max,
            });
        }
        Ok(())
    }
}

/// Row shape as stored and edited by the admin CMS.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShippingMethodRecord {
    method_id: String,
    name_en: String,
    #[serde(default)]
    name_vi: String,
    #[serde(default)]
    description_en: String,
    #[serde(default)]
    description_vi: String,
    #[serde(default)]
    carrier: String,
    base_rate: Decimal,
    estimated_days_min: u32,
    estimated_days_max: u32,
    #[serde(default)]
    weight_threshold: Decimal,
    #[serde(default)]
    weight_rate: Decimal,
    #[serde(default)]
    free_shipping_threshold: Option<Decimal>,
    #[serde(default = "default_active")]
    is_active: bool,
    #[serde(default)]
    display_order: i32,
    #[serde(default)]
    allowed_countries: Vec<String>,
}

fn default_active() -> bool { true }

impl From<ShippingMethodRecord> for ShippingMethod {
    fn from(r: ShippingMethodRecord) -> Self {
        Self {
            method_id: r.method_id,
            name: LocalizedText::new(r.name_en, r.name_vi),
            description: LocalizedText::new(r.description_en, r.description_vi),
            carrier: r.carrier,
            base_rate: r.base_rate,
            estimated_days_min: r.estimated_days_min,
            estimated_days_max: r.estimated_days_max,
            weight_threshold: r.weight_threshold,
            weight_rate: r.weight_rate,
            free_shipping_threshold: r.free_shipping_threshold,
            is_active: r.is_active,
            display_order: r.display_order,
            allowed_countries: r.allowed_countries,
        }
    }
}

impl From<ShippingMethod> for ShippingMethodRecord {
    fn from(m: ShippingMethod) -> Self {
        Self {
            method_id: m.method_id,
            name_en: m.name.en,
            name_vi: m.name.vi,
            description_en: m.description.en,
            description_vi: m.description.vi,
            carrier: m.carrier,
            base_rate: m.base_rate,
            estimated_days_min: m.estimated_days_min,
            estimated_days_max: m.estimated_days_max,
            weight_threshold: m.weight_threshold,
            weight_rate: m.weight_rate,
            free_shipping_threshold: m.free_shipping_threshold,
            is_active: m.is_active,
            display_order: m.display_order,
            allowed_countries: m.allowed_countries,
        }
    }
}

/// Result of pricing one method for a shipment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingQuote {
    pub method_id: String,
    pub name: String,
    pub description: String,
    pub cost: Decimal,
    pub estimated_days: String,
    pub is_free_shipping: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_cost: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
}

#[derive(Debug, Error)]
pub enum ShippingConfigError {
    #[error("shipping method has an empty id")]
    EmptyMethodId,
    #[error("shipping method {method_id}: {field} must not be negative")]
    NegativeAmount { method_id: String, field: &'static str },
    #[error("shipping method {method_id}: estimated days {min}-{max} are out of order")]
    EstimatedDaysOrder { method_id: String, min: u32, max: u32 },
    #[error("duplicate shipping method id {0}")]
    DuplicateMethodId(String),
    #[error("invalid shipping method table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("cannot read shipping method table: {0}")]
    Io(#[from] std::io::Error),
}

/// Validated, immutable set of shipping methods handed to the calculator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShippingTable {
    methods: Vec<ShippingMethod>,
}

impl ShippingTable {
    pub fn new(methods: Vec<ShippingMethod>) -> Result<Self, ShippingConfigError> {
        let mut seen = HashSet::new();
        for method in &methods {
            method.validate()?;
            if !seen.insert(method.method_id.as_str()) {
                return Err(ShippingConfigError::DuplicateMethodId(method.method_id.clone()));
            }
        }
        Ok(Self { methods })
    }

    pub fn from_json(json: &str) -> Result<Self, ShippingConfigError> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ShippingConfigError> {
        let table = Self::from_json(&std::fs::read_to_string(path.as_ref())?)?;
        tracing::info!(path = %path.as_ref().display(), methods = table.methods.len(), "loaded shipping methods");
        Ok(table)
    }

    /// Methods offered when no table is configured (rates in VND, weights in kg).
    pub fn builtin() -> Self {
        let method = |id: &str, order: i32, name: LocalizedText, description: LocalizedText, carrier: &str,
                      base: i64, days: (u32, u32), threshold: i64, rate: i64, free: Option<i64>| ShippingMethod {
            method_id: id.to_string(),
            name,
            description,
            carrier: carrier.to_string(),
            base_rate: Decimal::from(base),
            estimated_days_min: days.0,
            estimated_days_max: days.1,
            weight_threshold: Decimal::from(threshold),
            weight_rate: Decimal::from(rate),
            free_shipping_threshold: free.map(Decimal::from),
            is_active: true,
            display_order: order,
            allowed_countries: vec![],
        };
        Self {
            methods: vec![
                method(
                    "standard", 1,
                    LocalizedText::new("Standard Shipping", "Giao hàng tiêu chuẩn"),
                    LocalizedText::new("Delivered nationwide", "Giao hàng toàn quốc"),
                    "GHN", 30_000, (3, 5), 1, 10_000, Some(500_000),
                ),
                method(
                    "express", 2,
                    LocalizedText::new("Express Shipping", "Giao hàng nhanh"),
                    LocalizedText::new("Priority handling for urgent orders", "Ưu tiên xử lý đơn hàng gấp"),
                    "GHN Express", 50_000, (1, 2), 1, 15_000, None,
                ),
                method(
                    "economy", 3,
                    LocalizedText::new("Economy Shipping", "Giao hàng tiết kiệm"),
                    LocalizedText::new("Lower cost, longer delivery", "Chi phí thấp, thời gian giao lâu hơn"),
                    "GHTK", 20_000, (5, 7), 2, 5_000, Some(300_000),
                ),
            ],
        }
    }

    pub fn methods(&self) -> &[ShippingMethod] { &self.methods }
    pub fn len(&self) -> usize { self.methods.len() }
    pub fn is_empty(&self) -> bool { self.methods.is_empty() }
}
