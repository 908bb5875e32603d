//! Shipping rate calculation
//!
//! `cost = base_rate + max(0, total_weight - weight_threshold) * weight_rate`,
//! replaced by zero once the order value reaches the method's free-shipping
//! threshold.

use rust_decimal::Decimal;

use super::{Destination, ShippingItem, ShippingMethod, ShippingQuote};
use crate::domain::value_objects::Locale;

/// Quotes every active method that serves `destination`, in display order.
pub fn calculate_shipping(
    destination: &Destination,
    items: &[ShippingItem],
    order_value: Decimal,
    methods: &[ShippingMethod],
    locale: Locale,
) -> Vec<ShippingQuote> {
    let weight = total_weight(items);
    let mut eligible: Vec<&ShippingMethod> = methods.iter().filter(|m| m.is_active && m.serves(destination)).collect();
    eligible.sort_by_key(|m| m.display_order);

    let quotes: Vec<ShippingQuote> = eligible.into_iter().map(|m| quote_method(m, weight, order_value, locale)).collect();
    tracing::debug!(
        country = %destination.country,
        %weight,
        %order_value,
        quotes = quotes.len(),
        "calculated shipping quotes"
    );
    quotes
}

/// Sum of `weight × quantity`. Negative weights count as zero; a weight
/// beyond the `Decimal` range saturates at `Decimal::MAX`.
pub fn total_weight(items: &[ShippingItem]) -> Decimal {
    let total = items
        .iter()
        .map(|item| item.weight.max(Decimal::ZERO).saturating_mul(Decimal::from(item.quantity.value())))
        .fold(Decimal::ZERO, Decimal::saturating_add);
    if total == Decimal::MAX {
        tracing::warn!(items = items.len(), "total shipping weight saturated");
    }
    total
}

/// Cost of a method before any free-shipping override. Saturates at
/// `Decimal::MAX`, so the cost stays non-decreasing in weight.
pub fn method_cost(method: &ShippingMethod, total_weight: Decimal) -> Decimal {
    let excess = total_weight.saturating_sub(method.weight_threshold).max(Decimal::ZERO);
    method.base_rate.saturating_add(excess.saturating_mul(method.weight_rate))
}

/// `"3-5 days"`, `"2 ngày"`.
pub fn estimated_days_label(min: u32, max: u32, locale: Locale) -> String {
    let unit = match (locale, max) {
        (Locale::Vi, _) => "ngày",
        (Locale::En, 1) if min == 1 => "day",
        (Locale::En, _) => "days",
    };
    if min == max { format!("{} {}", min, unit) } else { format!("{}-{} {}", min, max, unit) }
}

fn quote_method(method: &ShippingMethod, weight: Decimal, order_value: Decimal, locale: Locale) -> ShippingQuote {
    let cost = method_cost(method, weight);
    let is_free_shipping = method.free_shipping_threshold.is_some_and(|threshold| order_value >= threshold);
    ShippingQuote {
        method_id: method.method_id.clone(),
        name: method.name.resolve(locale).to_string(),
        description: method.description.resolve(locale).to_string(),
        cost: if is_free_shipping { Decimal::ZERO } else { cost },
        estimated_days: estimated_days_label(method.estimated_days_min, method.estimated_days_max, locale),
        is_free_shipping,
        original_cost: is_free_shipping.then_some(cost),
        carrier: Some(method.carrier.clone()).filter(|c| !c.trim().is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shipping::ShippingTable;
    use crate::domain::value_objects::Quantity;
    use rust_decimal_macros::dec;

    fn item(weight: Decimal, quantity: u32) -> ShippingItem {
        ShippingItem::new(weight, Quantity::new(quantity).unwrap())
    }

    fn builtin() -> Vec<ShippingMethod> { ShippingTable::builtin().methods().to_vec() }

    #[test]
    fn test_weight_surcharge() {
        let methods = builtin();
        // 2 × 1.5kg = 3kg, 2kg over the standard threshold
        let quotes = calculate_shipping(&Destination::default(), &[item(dec!(1.5), 2)], dec!(100000), &methods, Locale::Vi);
        assert_eq!(quotes.len(), 3);
        assert_eq!(quotes[0].method_id, "standard");
        assert_eq!(quotes[0].cost, dec!(50000));
        assert!(!quotes[0].is_free_shipping);
        assert_eq!(quotes[0].original_cost, None);
        assert_eq!(quotes[1].cost, dec!(80000));
        assert_eq!(quotes[2].cost, dec!(25000));
    }

    #[test]
    fn test_free_shipping_keeps_original_cost() {
        let quotes = calculate_shipping(&Destination::default(), &[item(dec!(3), 1)], dec!(500000), &builtin(), Locale::En);
        let standard = &quotes[0];
        assert!(standard.is_free_shipping);
        assert_eq!(standard.cost, Decimal::ZERO);
        assert_eq!(standard.original_cost, Some(dec!(50000)));
        // express has no free-shipping threshold
        assert!(!quotes[1].is_free_shipping);
        assert_eq!(quotes[1].cost, dec!(80000));
    }

    #[test]
    fn test_empty_items_cost_base_rate() {
        let methods = builtin();
        let quotes = calculate_shipping(&Destination::default(), &[], Decimal::ZERO, &methods, Locale::Vi);
        assert_eq!(quotes.len(), methods.len());
        for (quote, method) in quotes.iter().zip(&methods) {
            assert_eq!(quote.cost, method.base_rate);
        }
    }

    #[test]
    fn test_inactive_and_ordering() {
        let mut methods = builtin();
        methods[0].is_active = false;
        methods[2].display_order = -1;
        let quotes = calculate_shipping(&Destination::default(), &[], Decimal::ZERO, &methods, Locale::En);
        let ids: Vec<&str> = quotes.iter().map(|q| q.method_id.as_str()).collect();
        assert_eq!(ids, vec!["economy", "express"]);
    }

    #[test]
    fn test_no_eligible_methods() {
        let quotes = calculate_shipping(&Destination::default(), &[item(dec!(1), 1)], Decimal::ZERO, &[], Locale::En);
        assert!(quotes.is_empty());
    }

    #[test]
    fn test_country_restriction() {
        let mut methods = builtin();
        methods[1].allowed_countries = vec!["VN".into()];
        let quotes = calculate_shipping(&Destination::country("SG"), &[], Decimal::ZERO, &methods, Locale::En);
        assert!(quotes.iter().all(|q| q.method_id != "express"));
        assert_eq!(quotes.len(), 2);
    }

    #[test]
    fn test_flat_rate_method() {
        let mut method = builtin().remove(0);
        method.weight_threshold = Decimal::ZERO;
        method.weight_rate = Decimal::ZERO;
        assert_eq!(method_cost(&method, dec!(40)), method.base_rate);
    }

    #[test]
    fn test_zero_weight_items() {
        assert_eq!(total_weight(&[item(Decimal::ZERO, 5), item(dec!(0.25), 4)]), dec!(1));
    }

    #[test]
    fn test_huge_weights_saturate() {
        let items = [item(Decimal::from_i128_with_scale(5 * 10i128.pow(27), 0), 100), item(dec!(1), 1)];
        assert_eq!(total_weight(&items), Decimal::MAX);

        let quotes = calculate_shipping(&Destination::default(), &items, Decimal::ZERO, &builtin(), Locale::En);
        assert_eq!(quotes.len(), 3);
        assert!(quotes.iter().all(|q| q.cost == Decimal::MAX));

        let free = calculate_shipping(&Destination::default(), &items, Decimal::MAX, &builtin(), Locale::En);
        assert_eq!(free[0].cost, Decimal::ZERO);
        assert_eq!(free[0].original_cost, Some(Decimal::MAX));
    }

    #[test]
    fn test_locale_text() {
        let vi = calculate_shipping(&Destination::default(), &[], Decimal::ZERO, &builtin(), Locale::Vi);
        assert_eq!(vi[0].name, "Giao hàng tiêu chuẩn");
        assert_eq!(vi[0].estimated_days, "3-5 ngày");
        assert_eq!(vi[0].carrier.as_deref(), Some("GHN"));
        let fallback = calculate_shipping(&Destination::default(), &[], Decimal::ZERO, &builtin(), Locale::parse("ja"));
        assert_eq!(fallback[0].name, "Standard Shipping");
        assert_eq!(fallback[0].description, "Delivered nationwide");
    }

    #[test]
    fn test_estimated_days_label() {
        assert_eq!(estimated_days_label(1, 1, Locale::En), "1 day");
        assert_eq!(estimated_days_label(2, 2, Locale::En), "2 days");
        assert_eq!(estimated_days_label(1, 2, Locale::Vi), "1-2 ngày");
    }
}
