//! Restaurant browsing, owner management, business hours and approval.

use sea_orm::ConnectionTrait;
use tracing::info;

use super::page_limit;
use crate::domain::hours::validate_hours;
use crate::domain::GeoPoint;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::repos::access;
use crate::repos::restaurants::{
    self, BusinessHour, Restaurant, RestaurantCreate, RestaurantFilter, RestaurantUpdate,
};

fn not_found() -> DomainError {
    DomainError::not_found(NotFoundKind::Restaurant, "Restaurant not found")
}

fn validate_location(lat: Option<f64>, lon: Option<f64>) -> Result<(), DomainError> {
    match (lat, lon) {
        (None, None) => Ok(()),
        (Some(lat), Some(lon)) if GeoPoint::new(lat, lon).is_valid() => Ok(()),
        (Some(_), Some(_)) => Err(DomainError::validation(
            ValidationKind::InvalidCoordinates,
            "lat must be within [-90, 90] and lon within [-180, 180]",
        )),
        _ => Err(DomainError::validation(
            ValidationKind::InvalidCoordinates,
            "lat and lon must be given together",
        )),
    }
}

async fn ensure_city<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    city_id: Option<i64>,
) -> Result<(), DomainError> {
    let Some(city_id) = city_id else {
        return Ok(());
    };
    if access::find_city(conn, city_id).await?.is_none() {
        return Err(DomainError::not_found(NotFoundKind::City, "City not found"));
    }
    Ok(())
}

fn require_text(value: &str, field: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation_other(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

// ----- customer browsing -----

pub async fn list_public<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    search: Option<String>,
    limit: Option<u64>,
    offset: Option<u64>,
) -> Result<Vec<Restaurant>, DomainError> {
    restaurants::list(
        conn,
        RestaurantFilter {
            public_only: true,
            approved: None,
            city_id: None,
            scope: None,
            search,
            limit: page_limit(limit),
            offset: offset.unwrap_or(0),
        },
    )
    .await
}

/// Active and approved restaurant, or 404.
pub async fn get_public<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Restaurant, DomainError> {
    restaurants::find_by_id(conn, id)
        .await?
        .filter(Restaurant::is_public)
        .ok_or_else(not_found)
}

pub async fn public_hours<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Vec<BusinessHour>, DomainError> {
    let restaurant = get_public(conn, id).await?;
    restaurants::list_hours(conn, restaurant.id).await
}

// ----- owner management -----

pub async fn list_owned<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner_id: i64,
) -> Result<Vec<Restaurant>, DomainError> {
    restaurants::list_by_owner(conn, owner_id).await
}

/// Restaurant owned by `owner_id`. Other owners' restaurants read as 404.
pub async fn get_owned<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner_id: i64,
    id: i64,
) -> Result<Restaurant, DomainError> {
    restaurants::find_by_id(conn, id)
        .await?
        .filter(|r| r.owner_id == owner_id)
        .ok_or_else(not_found)
}

#[derive(Debug, Clone, Default)]
pub struct NewRestaurant {
    pub city_id: Option<i64>,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub cuisine_type: Option<String>,
    pub description: Option<String>,
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner_id: i64,
    input: NewRestaurant,
    commission_rate: f64,
) -> Result<Restaurant, DomainError> {
    let name = require_text(&input.name, "name")?;
    let address = require_text(&input.address, "address")?;
    validate_location(input.lat, input.lon)?;
    ensure_city(conn, input.city_id).await?;

    let restaurant = restaurants::create(
        conn,
        RestaurantCreate {
            owner_id,
            city_id: input.city_id,
            name,
            phone: input.phone,
            email: input.email,
            address,
            lat: input.lat,
            lon: input.lon,
            cuisine_type: input.cuisine_type,
            description: input.description,
            commission_rate,
        },
    )
    .await?;

    info!(restaurant_id = restaurant.id, owner_id, "restaurant.created");
    Ok(restaurant)
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner_id: i64,
    id: i64,
    mut update: RestaurantUpdate,
) -> Result<Restaurant, DomainError> {
    let current = get_owned(conn, owner_id, id).await?;

    if let Some(name) = update.name.as_deref() {
        update.name = Some(require_text(name, "name")?);
    }
    if let Some(address) = update.address.as_deref() {
        update.address = Some(require_text(address, "address")?);
    }
    let lat = update.lat.unwrap_or(current.lat);
    let lon = update.lon.unwrap_or(current.lon);
    validate_location(lat, lon)?;
    ensure_city(conn, update.city_id.flatten()).await?;

    let restaurant = restaurants::update(conn, id, update)
        .await?
        .ok_or_else(not_found)?;
    info!(restaurant_id = id, owner_id, "restaurant.updated");
    Ok(restaurant)
}

// ----- business hours -----

pub async fn list_hours<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner_id: i64,
    restaurant_id: i64,
) -> Result<Vec<BusinessHour>, DomainError> {
    get_owned(conn, owner_id, restaurant_id).await?;
    restaurants::list_hours(conn, restaurant_id).await
}

pub async fn create_hours<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner_id: i64,
    restaurant_id: i64,
    day_of_week: i16,
    open_time: String,
    close_time: String,
    is_closed: bool,
) -> Result<BusinessHour, DomainError> {
    get_owned(conn, owner_id, restaurant_id).await?;
    validate_hours(day_of_week, &open_time, &close_time, is_closed)?;

    let existing = restaurants::list_hours(conn, restaurant_id).await?;
    if existing.iter().any(|h| h.day_of_week == day_of_week) {
        return Err(DomainError::conflict(
            ConflictKind::BusinessHoursExists,
            format!("Hours for day {day_of_week} already exist"),
        ));
    }

    restaurants::create_hours(conn, restaurant_id, day_of_week, open_time, close_time, is_closed)
        .await
}

/// Hours row whose restaurant belongs to `owner_id`.
async fn owned_hours<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner_id: i64,
    hour_id: i64,
) -> Result<BusinessHour, DomainError> {
    let hours = restaurants::find_hours(conn, hour_id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::BusinessHours, "Hours not found"))?;
    get_owned(conn, owner_id, hours.restaurant_id)
        .await
        .map_err(|_| DomainError::not_found(NotFoundKind::BusinessHours, "Hours not found"))?;
    Ok(hours)
}

pub async fn update_hours<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner_id: i64,
    hour_id: i64,
    open_time: Option<String>,
    close_time: Option<String>,
    is_closed: Option<bool>,
) -> Result<BusinessHour, DomainError> {
    let current = owned_hours(conn, owner_id, hour_id).await?;
    let open_time = open_time.unwrap_or(current.open_time);
    let close_time = close_time.unwrap_or(current.close_time);
    let is_closed = is_closed.unwrap_or(current.is_closed);
    validate_hours(current.day_of_week, &open_time, &close_time, is_closed)?;

    restaurants::update_hours(conn, hour_id, open_time, close_time, is_closed)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::BusinessHours, "Hours not found"))
}

pub async fn delete_hours<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner_id: i64,
    hour_id: i64,
) -> Result<(), DomainError> {
    owned_hours(conn, owner_id, hour_id).await?;
    restaurants::delete_hours(conn, hour_id).await?;
    Ok(())
}

// ----- admin -----

pub async fn admin_list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    approved: Option<bool>,
    limit: Option<u64>,
    offset: Option<u64>,
) -> Result<Vec<Restaurant>, DomainError> {
    restaurants::list(
        conn,
        RestaurantFilter {
            public_only: false,
            approved,
            city_id: None,
            scope: None,
            search: None,
            limit: page_limit(limit),
            offset: offset.unwrap_or(0),
        },
    )
    .await
}

pub async fn approve<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    admin_id: i64,
    id: i64,
) -> Result<Restaurant, DomainError> {
    let restaurant = restaurants::approve(conn, id, admin_id)
        .await?
        .ok_or_else(not_found)?;
    info!(restaurant_id = id, admin_id, "restaurant.approved");
    Ok(restaurant)
}

pub async fn toggle_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Restaurant, DomainError> {
    let restaurant = restaurants::toggle_active(conn, id)
        .await?
        .ok_or_else(not_found)?;
    info!(restaurant_id = id, is_active = restaurant.is_active, "restaurant.toggled");
    Ok(restaurant)
}

pub async fn pending_approval_count<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<u64, DomainError> {
    restaurants::count_pending_approval(conn).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_must_pair_and_be_in_range() {
        assert!(validate_location(None, None).is_ok());
        assert!(validate_location(Some(52.5), Some(13.4)).is_ok());
        assert!(validate_location(Some(52.5), None).is_err());
        assert!(validate_location(Some(91.0), Some(0.0)).is_err());
        assert!(validate_location(Some(0.0), Some(181.0)).is_err());
    }

    #[test]
    fn text_fields_are_trimmed() {
        assert_eq!(require_text("  Pho 99 ", "name").unwrap(), "Pho 99");
        assert!(require_text("   ", "name").is_err());
    }
}
