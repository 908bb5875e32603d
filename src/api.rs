//! JSON HTTP surface over the pricing and shipping services

use axum::{extract::{Query, State}, http::StatusCode, response::{IntoResponse, Response}, routing::{get, post}, Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use validator::Validate;

use crate::domain::pricing::{
    compute_order_total, compute_totals, format_amount, format_price, display_price, is_contact_for_price, to_decimal,
    OrderPricing, OrderTotals, FORMATTED_ZERO,
};
use crate::domain::shipping::{calculate_shipping, total_weight, Destination, ShippingItem, ShippingMethod, ShippingQuote, ShippingTable};
use crate::domain::value_objects::{Locale, Quantity};

#[derive(Clone)]
pub struct AppState { pub shipping: Arc<ShippingTable>, pub default_locale: Locale }

impl AppState {
    pub fn new(shipping: ShippingTable, default_locale: Locale) -> Self { Self { shipping: Arc::new(shipping), default_locale } }
    fn locale(&self, requested: Option<&str>) -> Locale { requested.map(Locale::parse).unwrap_or(self.default_locale) }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "handmade-commerce"})) }))
        .route("/api/v1/shipping/methods", get(list_shipping_methods))
        .route("/api/v1/shipping/calculate", post(calculate_shipping_quotes))
        .route("/api/v1/orders/total", post(order_total))
        .route("/api/v1/pricing/display", post(display_pricing))
        .layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()).with_state(state)
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self { ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR") };
        tracing::warn!(error_code = code, message = %self, "request rejected");
        (status, Json(serde_json::json!({"error": code, "message": self.to_string()}))).into_response()
    }
}

#[derive(Debug, Deserialize)] pub struct LocaleParams { pub locale: Option<String> }

async fn list_shipping_methods(State(s): State<AppState>) -> Json<Vec<ShippingMethod>> {
    Json(s.shipping.methods().iter().filter(|m| m.is_active).cloned().collect())
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShippingItemRequest {
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100000.0))]
    pub weight: f64,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1))]
    pub quantity: u32,
}

fn default_quantity() -> u32 { 1 }

impl ShippingItemRequest {
    fn to_item(&self) -> ShippingItem {
        ShippingItem {
            weight: to_decimal(self.weight).unwrap_or_default(),
            length: self.length.and_then(to_decimal),
            width: self.width.and_then(to_decimal),
            height: self.height.and_then(to_decimal),
            quantity: Quantity::new(self.quantity).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CalculateShippingRequest {
    #[serde(default)]
    pub destination: Destination,
    #[serde(default)]
    #[validate]
    pub items: Vec<ShippingItemRequest>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1e15))]
    pub order_value: f64,
    pub locale: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteView { #[serde(flatten)] pub quote: ShippingQuote, pub cost_display: String }

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateShippingResponse { pub locale: Locale, pub total_weight: Decimal, pub quotes: Vec<QuoteView> }

async fn calculate_shipping_quotes(State(s): State<AppState>, Json(r): Json<CalculateShippingRequest>) -> Result<Json<CalculateShippingResponse>, ApiError> {
    r.validate()?;
    let locale = s.locale(r.locale.as_deref());
    let items: Vec<ShippingItem> = r.items.iter().map(ShippingItemRequest::to_item).collect();
    let order_value = to_decimal(r.order_value).unwrap_or_default();
    let quotes = calculate_shipping(&r.destination, &items, order_value, s.shipping.methods(), locale)
        .into_iter()
        .map(|quote| QuoteView { cost_display: format_amount(quote.cost, locale), quote })
        .collect();
    Ok(Json(CalculateShippingResponse { locale, total_weight: total_weight(&items), quotes }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotalResponse { pub display: String, pub totals: Option<OrderTotals> }

/// Accepts any JSON body; malformed order data renders as a zero total.
async fn order_total(State(s): State<AppState>, Query(p): Query<LocaleParams>, Json(body): Json<Value>) -> Json<OrderTotalResponse> {
    let locale = s.locale(p.locale.as_deref());
    let response = match OrderPricing::from_value(&body) {
        Some(order) => OrderTotalResponse { display: compute_order_total(&order, locale), totals: Some(compute_totals(&order)) },
        None => OrderTotalResponse { display: FORMATTED_ZERO.to_string(), totals: None },
    };
    Json(response)
}

#[derive(Debug, Deserialize)] pub struct DisplayPriceRequest { pub amount: Option<f64>, pub locale: Option<String> }

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayPriceResponse { pub display: String, pub formatted: String, pub contact_for_price: bool }

async fn display_pricing(State(s): State<AppState>, Json(r): Json<DisplayPriceRequest>) -> Json<DisplayPriceResponse> {
    let locale = s.locale(r.locale.as_deref());
    Json(DisplayPriceResponse {
        display: display_price(r.amount, locale),
        formatted: format_price(r.amount, locale),
        contact_for_price: is_contact_for_price(&r.amount),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> Router { router(AppState::new(ShippingTable::builtin(), Locale::Vi)) }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::post(uri).header("content-type", "application/json").body(Body::from(body.to_string())).unwrap();
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_calculate_shipping() {
        let (status, body) = post_json(
            "/api/v1/shipping/calculate",
            serde_json::json!({"destination": {"country": "VN"}, "items": [{"weight": 1.5, "quantity": 2}], "orderValue": 100000}),
        ).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["locale"], "vi");
        assert_eq!(body["quotes"][0]["methodId"], "standard");
        assert_eq!(body["quotes"][0]["costDisplay"], "50.000 ₫");
        assert!(body["quotes"][0].get("originalCost").is_none());
    }

    #[tokio::test]
    async fn test_calculate_shipping_rejects_negative_weight() {
        let (status, body) = post_json("/api/v1/shipping/calculate", serde_json::json!({"items": [{"weight": -1}]})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_calculate_shipping_rejects_out_of_range_amounts() {
        let (status, _) = post_json("/api/v1/shipping/calculate", serde_json::json!({"items": [{"weight": 5e27, "quantity": 100}]})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = post_json("/api/v1/shipping/calculate", serde_json::json!({"orderValue": 1e30})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_order_total_with_overflowing_lines() {
        let order = serde_json::json!({"items": [{"price": 7e28, "quantity": 2}, {"price": 1000, "quantity": 1}]});
        let (status, body) = post_json("/api/v1/orders/total?locale=vi", order).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["display"], "1.000 ₫");

        let (status, _) = post_json("/api/v1/orders/total", serde_json::json!({"items": [{"total": 5e28}, {"total": 5e28}]})).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_order_total() {
        let order = serde_json::json!({
            "items": [{"price": 100000, "quantity": 2, "total": 200000}, {"price": 50000, "quantity": 1, "total": 50000}],
            "shippingCost": 25000, "taxAmount": 25000, "discountAmount": 10000
        });
        let (status, body) = post_json("/api/v1/orders/total?locale=vi", order).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["display"], "290.000 ₫");

        let (_, body) = post_json("/api/v1/orders/total", serde_json::json!("garbage")).await;
        assert_eq!(body["display"], "0");
        assert!(body["totals"].is_null());
    }

    #[tokio::test]
    async fn test_display_price() {
        let (_, body) = post_json("/api/v1/pricing/display", serde_json::json!({"amount": 0, "locale": "en"})).await;
        assert_eq!(body["display"], "Contact for Price");
        assert_eq!(body["formatted"], "$0.00");
        assert_eq!(body["contactForPrice"], true);
    }
}
