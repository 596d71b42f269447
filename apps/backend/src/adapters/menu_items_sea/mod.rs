//! SeaORM adapter for menu items. Soft-deleted rows are excluded from every
//! lookup.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use time::OffsetDateTime;

use crate::entities::menu_items;

pub mod dto;

pub use dto::{MenuItemCreate, MenuItemUpdate};

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: MenuItemCreate,
) -> Result<menu_items::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    menu_items::ActiveModel {
        id: NotSet,
        restaurant_id: Set(dto.restaurant_id),
        name: Set(dto.name),
        description: Set(dto.description),
        price_cents: Set(dto.price_cents),
        category: Set(dto.category),
        is_available: Set(dto.is_available),
        image_url: Set(dto.image_url),
        sales_count: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    }
    .insert(conn)
    .await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<menu_items::Model>, sea_orm::DbErr> {
    menu_items::Entity::find_by_id(id)
        .filter(menu_items::Column::DeletedAt.is_null())
        .one(conn)
        .await
}

pub async fn find_many<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: &[i64],
) -> Result<Vec<menu_items::Model>, sea_orm::DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    menu_items::Entity::find()
        .filter(menu_items::Column::Id.is_in(ids.iter().copied()))
        .filter(menu_items::Column::DeletedAt.is_null())
        .all(conn)
        .await
}

pub async fn list_by_restaurant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    restaurant_id: i64,
    category: Option<&str>,
    available_only: bool,
) -> Result<Vec<menu_items::Model>, sea_orm::DbErr> {
    let mut query = menu_items::Entity::find()
        .filter(menu_items::Column::RestaurantId.eq(restaurant_id))
        .filter(menu_items::Column::DeletedAt.is_null());
    if let Some(category) = category {
        query = query.filter(menu_items::Column::Category.eq(category));
    }
    if available_only {
        query = query.filter(menu_items::Column::IsAvailable.eq(true));
    }
    query
        .order_by_asc(menu_items::Column::Category)
        .order_by_asc(menu_items::Column::Name)
        .all(conn)
        .await
}

/// Best sellers of a restaurant, skipping `exclude`.
pub async fn top_sellers<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    restaurant_id: i64,
    exclude: &[i64],
    limit: u64,
) -> Result<Vec<menu_items::Model>, sea_orm::DbErr> {
    let mut query = menu_items::Entity::find()
        .filter(menu_items::Column::RestaurantId.eq(restaurant_id))
        .filter(menu_items::Column::DeletedAt.is_null())
        .filter(menu_items::Column::IsAvailable.eq(true));
    if !exclude.is_empty() {
        query = query.filter(menu_items::Column::Id.is_not_in(exclude.iter().copied()));
    }
    query
        .order_by_desc(menu_items::Column::SalesCount)
        .order_by_asc(menu_items::Column::Id)
        .limit(limit)
        .all(conn)
        .await
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    model: menu_items::Model,
    dto: MenuItemUpdate,
) -> Result<menu_items::Model, sea_orm::DbErr> {
    let mut active: menu_items::ActiveModel = model.into();
    if let Some(name) = dto.name {
        active.name = Set(name);
    }
    if let Some(description) = dto.description {
        active.description = Set(description);
    }
    if let Some(price_cents) = dto.price_cents {
        active.price_cents = Set(price_cents);
    }
    if let Some(category) = dto.category {
        active.category = Set(category);
    }
    if let Some(is_available) = dto.is_available {
        active.is_available = Set(is_available);
    }
    if let Some(image_url) = dto.image_url {
        active.image_url = Set(image_url);
    }
    active.updated_at = Set(OffsetDateTime::now_utc());
    active.update(conn).await
}

pub async fn soft_delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    model: menu_items::Model,
) -> Result<menu_items::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    let mut active: menu_items::ActiveModel = model.into();
    active.deleted_at = Set(Some(now));
    active.is_available = Set(false);
    active.updated_at = Set(now);
    active.update(conn).await
}

pub async fn increment_sales<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    quantity: i32,
) -> Result<(), sea_orm::DbErr> {
    menu_items::Entity::update_many()
        .col_expr(
            menu_items::Column::SalesCount,
            Expr::col(menu_items::Column::SalesCount).add(i64::from(quantity)),
        )
        .filter(menu_items::Column::Id.eq(id))
        .exec(conn)
        .await?;
    Ok(())
}
