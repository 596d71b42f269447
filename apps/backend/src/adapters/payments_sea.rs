//! SeaORM adapter for payments and refunds.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};
use time::OffsetDateTime;

use crate::entities::{payments, refunds};

#[derive(Debug, Clone)]
pub struct PaymentCreate {
    pub order_id: i64,
    pub provider: String,
    pub amount_cents: i64,
    pub currency: String,
    pub provider_ref: Option<String>,
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PaymentCreate,
) -> Result<payments::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    payments::ActiveModel {
        id: NotSet,
        order_id: Set(dto.order_id),
        provider: Set(dto.provider),
        status: Set("pending".to_string()),
        amount_cents: Set(dto.amount_cents),
        currency: Set(dto.currency),
        provider_ref: Set(dto.provider_ref),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<payments::Model>, sea_orm::DbErr> {
    payments::Entity::find_by_id(id).one(conn).await
}

pub async fn find_by_order<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    order_id: i64,
) -> Result<Option<payments::Model>, sea_orm::DbErr> {
    payments::Entity::find()
        .filter(payments::Column::OrderId.eq(order_id))
        .one(conn)
        .await
}

pub async fn update_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    model: payments::Model,
    status: &str,
) -> Result<payments::Model, sea_orm::DbErr> {
    let mut active: payments::ActiveModel = model.into();
    active.status = Set(status.to_string());
    active.updated_at = Set(OffsetDateTime::now_utc());
    active.update(conn).await
}

pub async fn create_refund<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    payment_id: i64,
    amount_cents: i64,
    reason: Option<String>,
) -> Result<refunds::Model, sea_orm::DbErr> {
    refunds::ActiveModel {
        id: NotSet,
        payment_id: Set(payment_id),
        amount_cents: Set(amount_cents),
        reason: Set(reason),
        created_at: Set(OffsetDateTime::now_utc()),
    }
    .insert(conn)
    .await
}

pub async fn list_refunds<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    payment_id: i64,
) -> Result<Vec<refunds::Model>, sea_orm::DbErr> {
    refunds::Entity::find()
        .filter(refunds::Column::PaymentId.eq(payment_id))
        .order_by_asc(refunds::Column::Id)
        .all(conn)
        .await
}
