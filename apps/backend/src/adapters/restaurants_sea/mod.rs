//! SeaORM adapter for restaurants and their business hours.

use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use time::OffsetDateTime;

use super::scope_condition;
use crate::domain::scopes::ScopeFilter;
use crate::entities::{business_hours, restaurants};

pub mod dto;

pub use dto::{RestaurantCreate, RestaurantFilter, RestaurantUpdate};

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: RestaurantCreate,
) -> Result<restaurants::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    restaurants::ActiveModel {
        id: NotSet,
        owner_id: Set(dto.owner_id),
        city_id: Set(dto.city_id),
        name: Set(dto.name),
        phone: Set(dto.phone),
        email: Set(dto.email),
        address: Set(dto.address),
        lat: Set(dto.lat),
        lon: Set(dto.lon),
        cuisine_type: Set(dto.cuisine_type),
        description: Set(dto.description),
        rating: Set(0.0),
        commission_rate: Set(dto.commission_rate),
        is_approved: Set(false),
        approved_by: Set(None),
        approved_at: Set(None),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<restaurants::Model>, sea_orm::DbErr> {
    restaurants::Entity::find_by_id(id).one(conn).await
}

pub async fn list_by_owner<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner_id: i64,
) -> Result<Vec<restaurants::Model>, sea_orm::DbErr> {
    restaurants::Entity::find()
        .filter(restaurants::Column::OwnerId.eq(owner_id))
        .order_by_asc(restaurants::Column::Id)
        .all(conn)
        .await
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: RestaurantFilter,
) -> Result<Vec<restaurants::Model>, sea_orm::DbErr> {
    let mut query = restaurants::Entity::find();

    if filter.public_only {
        query = query
            .filter(restaurants::Column::IsActive.eq(true))
            .filter(restaurants::Column::IsApproved.eq(true));
    }
    if let Some(approved) = filter.approved {
        query = query.filter(restaurants::Column::IsApproved.eq(approved));
    }
    if let Some(city_id) = filter.city_id {
        query = query.filter(restaurants::Column::CityId.eq(city_id));
    }
    if let Some(scope) = filter.scope.as_ref() {
        query = query.filter(scope_condition(scope, restaurants::Column::CityId, restaurants::Column::Id));
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search.to_lowercase());
        query = query.filter(
            Condition::any()
                .add(Expr::expr(Func::lower(Expr::col(restaurants::Column::Name))).like(&pattern))
                .add(
                    Expr::expr(Func::lower(Expr::col(restaurants::Column::CuisineType)))
                        .like(&pattern),
                ),
        );
    }

    query
        .order_by_desc(restaurants::Column::Rating)
        .order_by_asc(restaurants::Column::Id)
        .limit(filter.limit)
        .offset(filter.offset)
        .all(conn)
        .await
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    model: restaurants::Model,
    dto: RestaurantUpdate,
) -> Result<restaurants::Model, sea_orm::DbErr> {
    let mut active: restaurants::ActiveModel = model.into();
    if let Some(city_id) = dto.city_id {
        active.city_id = Set(city_id);
    }
    if let Some(name) = dto.name {
        active.name = Set(name);
    }
    if let Some(phone) = dto.phone {
        active.phone = Set(phone);
    }
    if let Some(email) = dto.email {
        active.email = Set(email);
    }
    if let Some(address) = dto.address {
        active.address = Set(address);
    }
    if let Some(lat) = dto.lat {
        active.lat = Set(lat);
    }
    if let Some(lon) = dto.lon {
        active.lon = Set(lon);
    }
    if let Some(cuisine_type) = dto.cuisine_type {
        active.cuisine_type = Set(cuisine_type);
    }
    if let Some(description) = dto.description {
        active.description = Set(description);
    }
    active.updated_at = Set(OffsetDateTime::now_utc());
    active.update(conn).await
}

pub async fn approve<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    model: restaurants::Model,
    admin_id: i64,
    now: OffsetDateTime,
) -> Result<restaurants::Model, sea_orm::DbErr> {
    let mut active: restaurants::ActiveModel = model.into();
    active.is_approved = Set(true);
    active.approved_by = Set(Some(admin_id));
    active.approved_at = Set(Some(now));
    active.updated_at = Set(now);
    active.update(conn).await
}

/// Reject, clearing any earlier approval.
pub async fn revoke_approval<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    model: restaurants::Model,
) -> Result<restaurants::Model, sea_orm::DbErr> {
    let mut active: restaurants::ActiveModel = model.into();
    active.is_approved = Set(false);
    active.approved_by = Set(None);
    active.approved_at = Set(None);
    active.updated_at = Set(OffsetDateTime::now_utc());
    active.update(conn).await
}

pub async fn set_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    model: restaurants::Model,
    is_active: bool,
) -> Result<restaurants::Model, sea_orm::DbErr> {
    let mut active: restaurants::ActiveModel = model.into();
    active.is_active = Set(is_active);
    active.updated_at = Set(OffsetDateTime::now_utc());
    active.update(conn).await
}

pub async fn count_pending_approval<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<u64, sea_orm::DbErr> {
    restaurants::Entity::find()
        .filter(restaurants::Column::IsApproved.eq(false))
        .filter(restaurants::Column::IsActive.eq(true))
        .count(conn)
        .await
}

/// `(city_id, count)` of active restaurants awaiting approval.
pub async fn pending_approval_by_city<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    scope: Option<&ScopeFilter>,
) -> Result<Vec<(Option<i64>, i64)>, sea_orm::DbErr> {
    let mut query = restaurants::Entity::find()
        .select_only()
        .column(restaurants::Column::CityId)
        .column_as(restaurants::Column::Id.count(), "count")
        .filter(restaurants::Column::IsApproved.eq(false))
        .filter(restaurants::Column::IsActive.eq(true))
        .group_by(restaurants::Column::CityId)
        .order_by_asc(restaurants::Column::CityId);
    if let Some(scope) = scope {
        query = query.filter(scope_condition(scope, restaurants::Column::CityId, restaurants::Column::Id));
    }
    query.into_tuple::<(Option<i64>, i64)>().all(conn).await
}

// ----- business hours -----

pub async fn list_hours<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    restaurant_id: i64,
) -> Result<Vec<business_hours::Model>, sea_orm::DbErr> {
    business_hours::Entity::find()
        .filter(business_hours::Column::RestaurantId.eq(restaurant_id))
        .order_by_asc(business_hours::Column::DayOfWeek)
        .all(conn)
        .await
}

pub async fn find_hours_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<business_hours::Model>, sea_orm::DbErr> {
    business_hours::Entity::find_by_id(id).one(conn).await
}

pub async fn create_hours<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    restaurant_id: i64,
    day_of_week: i16,
    open_time: String,
    close_time: String,
    is_closed: bool,
) -> Result<business_hours::Model, sea_orm::DbErr> {
    business_hours::ActiveModel {
        id: NotSet,
        restaurant_id: Set(restaurant_id),
        day_of_week: Set(day_of_week),
        open_time: Set(open_time),
        close_time: Set(close_time),
        is_closed: Set(is_closed),
    }
    .insert(conn)
    .await
}

pub async fn update_hours<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    model: business_hours::Model,
    open_time: String,
    close_time: String,
    is_closed: bool,
) -> Result<business_hours::Model, sea_orm::DbErr> {
    let mut active: business_hours::ActiveModel = model.into();
    active.open_time = Set(open_time);
    active.close_time = Set(close_time);
    active.is_closed = Set(is_closed);
    active.update(conn).await
}

pub async fn delete_hours<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let res = business_hours::Entity::delete_by_id(id).exec(conn).await?;
    Ok(res.rows_affected)
}
