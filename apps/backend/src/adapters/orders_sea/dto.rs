//! DTOs for orders_sea adapter.

use crate::domain::scopes::ScopeFilter;

#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub customer_id: i64,
    pub restaurant_id: i64,
    pub city_id: Option<i64>,
    pub order_type: String,
    pub status: String,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub customer_lat: Option<f64>,
    pub customer_lon: Option<f64>,
    pub delivery_note: Option<String>,
    pub subtotal_cents: i64,
    pub service_fee_cents: i64,
    pub delivery_fee_cents: i64,
    pub tip_cents: i64,
    pub total_cents: i64,
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct OrderItemCreate {
    pub menu_item_id: i64,
    pub name: String,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub customer_id: Option<i64>,
    pub restaurant_id: Option<i64>,
    pub city_id: Option<i64>,
    /// Restrict to what a staff member may see; `None` is unrestricted
    pub scope: Option<ScopeFilter>,
    pub status: Option<String>,
    pub order_type: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Narrowing for status counts and revenue.
#[derive(Debug, Clone, Default)]
pub struct OrderStatsFilter {
    pub restaurant_id: Option<i64>,
    pub city_id: Option<i64>,
    pub scope: Option<ScopeFilter>,
}
