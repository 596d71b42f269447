//! SeaORM adapter for cities, roles, role assignments and shift leads.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};
use time::OffsetDateTime;

use crate::entities::{cities, roles, shift_leads, user_roles};

// ----- cities -----

pub async fn create_city<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: String,
    code: String,
    country: String,
    timezone: String,
) -> Result<cities::Model, sea_orm::DbErr> {
    cities::ActiveModel {
        id: NotSet,
        name: Set(name),
        code: Set(code),
        country: Set(country),
        timezone: Set(timezone),
        is_active: Set(true),
        created_at: Set(OffsetDateTime::now_utc()),
    }
    .insert(conn)
    .await
}

pub async fn find_city<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<cities::Model>, sea_orm::DbErr> {
    cities::Entity::find_by_id(id).one(conn).await
}

pub async fn list_cities<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    active_only: bool,
) -> Result<Vec<cities::Model>, sea_orm::DbErr> {
    let mut query = cities::Entity::find();
    if active_only {
        query = query.filter(cities::Column::IsActive.eq(true));
    }
    query.order_by_asc(cities::Column::Name).all(conn).await
}

// ----- roles -----

pub async fn create_role<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    code: String,
    name: String,
    description: Option<String>,
    scope_type: &str,
) -> Result<roles::Model, sea_orm::DbErr> {
    roles::ActiveModel {
        id: NotSet,
        code: Set(code),
        name: Set(name),
        description: Set(description),
        scope_type: Set(scope_type.to_string()),
        is_active: Set(true),
        created_at: Set(OffsetDateTime::now_utc()),
    }
    .insert(conn)
    .await
}

pub async fn find_role<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<roles::Model>, sea_orm::DbErr> {
    roles::Entity::find_by_id(id).one(conn).await
}

pub async fn find_role_by_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    code: &str,
) -> Result<Option<roles::Model>, sea_orm::DbErr> {
    roles::Entity::find()
        .filter(roles::Column::Code.eq(code))
        .one(conn)
        .await
}

pub async fn list_roles<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<roles::Model>, sea_orm::DbErr> {
    roles::Entity::find()
        .order_by_asc(roles::Column::Id)
        .all(conn)
        .await
}

pub async fn update_role<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    model: roles::Model,
    name: Option<String>,
    description: Option<Option<String>>,
    is_active: Option<bool>,
) -> Result<roles::Model, sea_orm::DbErr> {
    let mut active: roles::ActiveModel = model.into();
    if let Some(name) = name {
        active.name = Set(name);
    }
    if let Some(description) = description {
        active.description = Set(description);
    }
    if let Some(is_active) = is_active {
        active.is_active = Set(is_active);
    }
    active.update(conn).await
}

// ----- user roles -----

#[derive(Debug, Clone)]
pub struct UserRoleCreate {
    pub user_id: i64,
    pub role_id: i64,
    pub city_id: Option<i64>,
    pub restaurant_id: Option<i64>,
    pub assigned_by: Option<i64>,
    pub notes: Option<String>,
}

/// Filters for listing assignments.
#[derive(Debug, Clone, Default)]
pub struct UserRoleFilter {
    pub user_id: Option<i64>,
    pub role_id: Option<i64>,
    /// Any of these cities; `None` is unrestricted
    pub city_ids: Option<Vec<i64>>,
    pub active_only: bool,
}

pub async fn create_user_role<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserRoleCreate,
) -> Result<user_roles::Model, sea_orm::DbErr> {
    user_roles::ActiveModel {
        id: NotSet,
        user_id: Set(dto.user_id),
        role_id: Set(dto.role_id),
        city_id: Set(dto.city_id),
        restaurant_id: Set(dto.restaurant_id),
        is_active: Set(true),
        assigned_by: Set(dto.assigned_by),
        assigned_at: Set(OffsetDateTime::now_utc()),
        revoked_at: Set(None),
        notes: Set(dto.notes),
    }
    .insert(conn)
    .await
}

pub async fn find_user_role<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<user_roles::Model>, sea_orm::DbErr> {
    user_roles::Entity::find_by_id(id).one(conn).await
}

/// Active assignment with exactly this role and scope.
pub async fn find_active_assignment<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    role_id: i64,
    city_id: Option<i64>,
    restaurant_id: Option<i64>,
) -> Result<Option<user_roles::Model>, sea_orm::DbErr> {
    let mut query = user_roles::Entity::find()
        .filter(user_roles::Column::UserId.eq(user_id))
        .filter(user_roles::Column::RoleId.eq(role_id))
        .filter(user_roles::Column::IsActive.eq(true));
    query = match city_id {
        Some(id) => query.filter(user_roles::Column::CityId.eq(id)),
        None => query.filter(user_roles::Column::CityId.is_null()),
    };
    query = match restaurant_id {
        Some(id) => query.filter(user_roles::Column::RestaurantId.eq(id)),
        None => query.filter(user_roles::Column::RestaurantId.is_null()),
    };
    query.one(conn).await
}

pub async fn list_user_roles<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: UserRoleFilter,
) -> Result<Vec<user_roles::Model>, sea_orm::DbErr> {
    let mut query = user_roles::Entity::find();
    if let Some(user_id) = filter.user_id {
        query = query.filter(user_roles::Column::UserId.eq(user_id));
    }
    if let Some(role_id) = filter.role_id {
        query = query.filter(user_roles::Column::RoleId.eq(role_id));
    }
    if let Some(city_ids) = filter.city_ids {
        query = query.filter(user_roles::Column::CityId.is_in(city_ids));
    }
    if filter.active_only {
        query = query.filter(user_roles::Column::IsActive.eq(true));
    }
    query
        .order_by_asc(user_roles::Column::Id)
        .all(conn)
        .await
}

/// Active assignments of `user_id` whose role is itself active.
pub async fn active_grants<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<(user_roles::Model, roles::Model)>, sea_orm::DbErr> {
    let rows = user_roles::Entity::find()
        .find_also_related(roles::Entity)
        .filter(user_roles::Column::UserId.eq(user_id))
        .filter(user_roles::Column::IsActive.eq(true))
        .filter(roles::Column::IsActive.eq(true))
        .order_by_asc(user_roles::Column::Id)
        .all(conn)
        .await?;
    Ok(rows
        .into_iter()
        .filter_map(|(grant, role)| role.map(|role| (grant, role)))
        .collect())
}

pub async fn revoke_user_role<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    model: user_roles::Model,
    now: OffsetDateTime,
) -> Result<user_roles::Model, sea_orm::DbErr> {
    let mut active: user_roles::ActiveModel = model.into();
    active.is_active = Set(false);
    active.revoked_at = Set(Some(now));
    active.update(conn).await
}

// ----- shift leads -----

#[derive(Debug, Clone, Copy)]
pub struct ShiftLeadCreate {
    pub user_id: i64,
    pub city_id: i64,
    pub min_hours_per_shift: i32,
    pub max_hours_per_shift: i32,
    pub min_hours_per_week: i32,
    pub max_hours_per_week: i32,
}

pub async fn create_shift_lead<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ShiftLeadCreate,
) -> Result<shift_leads::Model, sea_orm::DbErr> {
    shift_leads::ActiveModel {
        id: NotSet,
        user_id: Set(dto.user_id),
        city_id: Set(dto.city_id),
        min_hours_per_shift: Set(dto.min_hours_per_shift),
        max_hours_per_shift: Set(dto.max_hours_per_shift),
        min_hours_per_week: Set(dto.min_hours_per_week),
        max_hours_per_week: Set(dto.max_hours_per_week),
        is_active: Set(true),
        created_at: Set(OffsetDateTime::now_utc()),
    }
    .insert(conn)
    .await
}

pub async fn list_shift_leads<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    city_ids: Option<Vec<i64>>,
) -> Result<Vec<shift_leads::Model>, sea_orm::DbErr> {
    let mut query = shift_leads::Entity::find();
    if let Some(city_ids) = city_ids {
        query = query.filter(shift_leads::Column::CityId.is_in(city_ids));
    }
    query
        .order_by_asc(shift_leads::Column::CityId)
        .order_by_asc(shift_leads::Column::Id)
        .all(conn)
        .await
}
