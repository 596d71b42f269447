//! Menu browsing and owner menu management.

use sea_orm::ConnectionTrait;
use tracing::info;

use super::restaurants;
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};
use crate::repos::menu::{self, MenuItem, MenuItemCreate, MenuItemUpdate};
use crate::repos::restaurants as restaurants_repo;

fn not_found() -> DomainError {
    DomainError::not_found(NotFoundKind::MenuItem, "Menu item not found")
}

fn validate_price(price_cents: i64) -> Result<(), DomainError> {
    if price_cents <= 0 {
        return Err(DomainError::validation(
            ValidationKind::InvalidPrice,
            "price_cents must be positive",
        ));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<String, DomainError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation_other("name must not be empty"));
    }
    Ok(name.to_string())
}

/// Owner check for menu writes. Someone else's restaurant is forbidden.
async fn ensure_owner<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner_id: i64,
    restaurant_id: i64,
) -> Result<(), DomainError> {
    let restaurant = restaurants_repo::find_by_id(conn, restaurant_id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Restaurant, "Restaurant not found"))?;
    if restaurant.owner_id != owner_id {
        return Err(DomainError::forbidden("Restaurant belongs to another owner"));
    }
    Ok(())
}

// ----- customer -----

pub async fn public_menu<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    restaurant_id: i64,
    category: Option<&str>,
    available_only: bool,
) -> Result<Vec<MenuItem>, DomainError> {
    let restaurant = restaurants::get_public(conn, restaurant_id).await?;
    menu::list_by_restaurant(conn, restaurant.id, category, available_only).await
}

pub async fn public_item<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<MenuItem, DomainError> {
    let item = menu::find_by_id(conn, id).await?.ok_or_else(not_found)?;
    restaurants::get_public(conn, item.restaurant_id)
        .await
        .map_err(|_| not_found())?;
    Ok(item)
}

// ----- owner -----

pub async fn owner_menu<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner_id: i64,
    restaurant_id: i64,
) -> Result<Vec<MenuItem>, DomainError> {
    ensure_owner(conn, owner_id, restaurant_id).await?;
    menu::list_by_restaurant(conn, restaurant_id, None, false).await
}

pub async fn owner_item<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner_id: i64,
    id: i64,
) -> Result<MenuItem, DomainError> {
    let item = menu::find_by_id(conn, id).await?.ok_or_else(not_found)?;
    ensure_owner(conn, owner_id, item.restaurant_id).await?;
    Ok(item)
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner_id: i64,
    mut input: MenuItemCreate,
) -> Result<MenuItem, DomainError> {
    ensure_owner(conn, owner_id, input.restaurant_id).await?;
    input.name = validate_name(&input.name)?;
    validate_price(input.price_cents)?;

    let item = menu::create(conn, input).await?;
    info!(menu_item_id = item.id, restaurant_id = item.restaurant_id, "menu_item.created");
    Ok(item)
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner_id: i64,
    id: i64,
    mut update: MenuItemUpdate,
) -> Result<MenuItem, DomainError> {
    owner_item(conn, owner_id, id).await?;
    if let Some(name) = update.name.as_deref() {
        update.name = Some(validate_name(name)?);
    }
    if let Some(price_cents) = update.price_cents {
        validate_price(price_cents)?;
    }

    let item = menu::update(conn, id, update).await?.ok_or_else(not_found)?;
    info!(menu_item_id = id, "menu_item.updated");
    Ok(item)
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner_id: i64,
    id: i64,
) -> Result<(), DomainError> {
    owner_item(conn, owner_id, id).await?;
    menu::soft_delete(conn, id).await?;
    info!(menu_item_id = id, "menu_item.deleted");
    Ok(())
}
