//! Cart repository functions.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::adapters::cart_sea as cart_adapter;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CartLine {
    pub menu_item_id: i64,
    #[serde(skip)]
    pub restaurant_id: i64,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
    pub line_total_cents: i64,
}

/// Cart lines whose menu item still exists and is not deleted.
pub async fn lines<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<CartLine>, DomainError> {
    let rows = cart_adapter::list_with_items(conn, user_id).await?;
    Ok(rows
        .into_iter()
        .filter_map(|(row, item)| {
            let item = item.filter(|i| i.deleted_at.is_none())?;
            Some(CartLine {
                menu_item_id: item.id,
                restaurant_id: item.restaurant_id,
                name: item.name,
                unit_price_cents: item.price_cents,
                quantity: row.quantity,
                line_total_cents: item.price_cents * i64::from(row.quantity),
            })
        })
        .collect())
}

/// Insert or add to an existing line. Returns the resulting quantity.
pub async fn add<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    menu_item_id: i64,
    quantity: i32,
    max_quantity: i32,
) -> Result<i32, DomainError> {
    match cart_adapter::find_item(conn, user_id, menu_item_id).await? {
        Some(row) => {
            let next = (row.quantity + quantity).min(max_quantity);
            Ok(cart_adapter::set_quantity(conn, row, next).await?.quantity)
        }
        None => Ok(cart_adapter::insert_item(conn, user_id, menu_item_id, quantity)
            .await?
            .quantity),
    }
}

pub async fn remove<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    menu_item_id: i64,
) -> Result<bool, DomainError> {
    Ok(cart_adapter::delete_item(conn, user_id, menu_item_id).await? > 0)
}

pub async fn clear<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<u64, DomainError> {
    Ok(cart_adapter::clear(conn, user_id).await?)
}
