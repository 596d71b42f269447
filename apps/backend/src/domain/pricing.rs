//! Order pricing.

use serde::Serialize;
use utoipa::ToSchema;

use super::order_status::OrderType;
use crate::config::PricingConfig;

/// Round half away from zero to whole cents.
pub fn round_cents(value: f64) -> i64 {
    value.round() as i64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteLine {
    pub unit_price_cents: i64,
    pub quantity: i32,
}

impl QuoteLine {
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * i64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Quote {
    pub subtotal_cents: i64,
    pub service_fee_cents: i64,
    pub delivery_fee_cents: i64,
    pub total_cents: i64,
    pub distance_km: Option<f64>,
}

/// Price `lines` for an order of `order_type`.
///
/// The delivery fee applies only to delivery orders with a known distance.
pub fn quote(
    lines: &[QuoteLine],
    order_type: OrderType,
    distance_km: Option<f64>,
    config: &PricingConfig,
) -> Quote {
    let subtotal_cents: i64 = lines.iter().map(QuoteLine::line_total_cents).sum();
    let service_fee_cents = round_cents(subtotal_cents as f64 * config.service_fee_rate);
    let delivery_fee_cents = match (order_type, distance_km) {
        (OrderType::Delivery, Some(km)) => {
            config.delivery_base_fee_cents
                + round_cents(km * config.delivery_per_km_fee_cents as f64)
        }
        _ => 0,
    };

    Quote {
        subtotal_cents,
        service_fee_cents,
        delivery_fee_cents,
        total_cents: subtotal_cents + service_fee_cents + delivery_fee_cents,
        distance_km,
    }
}
