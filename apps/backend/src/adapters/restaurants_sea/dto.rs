//! DTOs for restaurants_sea adapter.

use crate::domain::scopes::ScopeFilter;

#[derive(Debug, Clone)]
pub struct RestaurantCreate {
    pub owner_id: i64,
    pub city_id: Option<i64>,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub cuisine_type: Option<String>,
    pub description: Option<String>,
    pub commission_rate: f64,
}

/// Partial update; nullable fields use `Some(None)` to clear.
#[derive(Debug, Clone, Default)]
pub struct RestaurantUpdate {
    pub city_id: Option<Option<i64>>,
    pub name: Option<String>,
    pub phone: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub address: Option<String>,
    pub lat: Option<Option<f64>>,
    pub lon: Option<Option<f64>>,
    pub cuisine_type: Option<Option<String>>,
    pub description: Option<Option<String>>,
}

/// Filters for listing restaurants.
#[derive(Debug, Clone, Default)]
pub struct RestaurantFilter {
    /// Only active and approved rows
    pub public_only: bool,
    pub approved: Option<bool>,
    pub city_id: Option<i64>,
    /// Restrict to what a staff member may see; `None` is unrestricted
    pub scope: Option<ScopeFilter>,
    /// Case-insensitive match on name or cuisine
    pub search: Option<String>,
    pub limit: u64,
    pub offset: u64,
}
