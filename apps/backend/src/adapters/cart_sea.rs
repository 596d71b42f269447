//! SeaORM adapter for cart rows.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::{cart_items, menu_items};

/// Cart rows with their menu items, oldest first.
pub async fn list_with_items<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<(cart_items::Model, Option<menu_items::Model>)>, sea_orm::DbErr> {
    cart_items::Entity::find()
        .filter(cart_items::Column::UserId.eq(user_id))
        .order_by_asc(cart_items::Column::Id)
        .find_also_related(menu_items::Entity)
        .all(conn)
        .await
}

pub async fn find_item<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    menu_item_id: i64,
) -> Result<Option<cart_items::Model>, sea_orm::DbErr> {
    cart_items::Entity::find()
        .filter(cart_items::Column::UserId.eq(user_id))
        .filter(cart_items::Column::MenuItemId.eq(menu_item_id))
        .one(conn)
        .await
}

pub async fn insert_item<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    menu_item_id: i64,
    quantity: i32,
) -> Result<cart_items::Model, sea_orm::DbErr> {
    cart_items::ActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        menu_item_id: Set(menu_item_id),
        quantity: Set(quantity),
    }
    .insert(conn)
    .await
}

pub async fn set_quantity<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    row: cart_items::Model,
    quantity: i32,
) -> Result<cart_items::Model, sea_orm::DbErr> {
    let mut active: cart_items::ActiveModel = row.into();
    active.quantity = Set(quantity);
    active.update(conn).await
}

pub async fn delete_item<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    menu_item_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let res = cart_items::Entity::delete_many()
        .filter(cart_items::Column::UserId.eq(user_id))
        .filter(cart_items::Column::MenuItemId.eq(menu_item_id))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}

pub async fn clear<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let res = cart_items::Entity::delete_many()
        .filter(cart_items::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}
