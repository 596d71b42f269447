//! Menu item repository functions.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::adapters::menu_items_sea as menu_adapter;
use crate::entities::menu_items;
use crate::errors::domain::DomainError;

pub use menu_adapter::{MenuItemCreate, MenuItemUpdate};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MenuItem {
    pub id: i64,
    pub restaurant_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub category: Option<String>,
    pub is_available: bool,
    pub image_url: Option<String>,
    pub sales_count: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: MenuItemCreate,
) -> Result<MenuItem, DomainError> {
    Ok(menu_adapter::create(conn, dto).await?.into())
}

/// Non-deleted item by id.
pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<MenuItem>, DomainError> {
    Ok(menu_adapter::find_by_id(conn, id).await?.map(MenuItem::from))
}

pub async fn find_many<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: &[i64],
) -> Result<Vec<MenuItem>, DomainError> {
    let rows = menu_adapter::find_many(conn, ids).await?;
    Ok(rows.into_iter().map(MenuItem::from).collect())
}

pub async fn list_by_restaurant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    restaurant_id: i64,
    category: Option<&str>,
    available_only: bool,
) -> Result<Vec<MenuItem>, DomainError> {
    let rows =
        menu_adapter::list_by_restaurant(conn, restaurant_id, category, available_only).await?;
    Ok(rows.into_iter().map(MenuItem::from).collect())
}

pub async fn top_sellers<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    restaurant_id: i64,
    exclude: &[i64],
    limit: u64,
) -> Result<Vec<MenuItem>, DomainError> {
    let rows = menu_adapter::top_sellers(conn, restaurant_id, exclude, limit).await?;
    Ok(rows.into_iter().map(MenuItem::from).collect())
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    dto: MenuItemUpdate,
) -> Result<Option<MenuItem>, DomainError> {
    let Some(model) = menu_adapter::find_by_id(conn, id).await? else {
        return Ok(None);
    };
    Ok(Some(menu_adapter::update(conn, model, dto).await?.into()))
}

pub async fn soft_delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<bool, DomainError> {
    let Some(model) = menu_adapter::find_by_id(conn, id).await? else {
        return Ok(false);
    };
    menu_adapter::soft_delete(conn, model).await?;
    Ok(true)
}

pub async fn increment_sales<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    quantity: i32,
) -> Result<(), DomainError> {
    Ok(menu_adapter::increment_sales(conn, id, quantity).await?)
}

impl From<menu_items::Model> for MenuItem {
    fn from(model: menu_items::Model) -> Self {
        Self {
            id: model.id,
            restaurant_id: model.restaurant_id,
            name: model.name,
            description: model.description,
            price_cents: model.price_cents,
            category: model.category,
            is_available: model.is_available,
            image_url: model.image_url,
            sales_count: model.sales_count,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
