//! Cities, roles, role assignments and shift leads.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;
use utoipa::ToSchema;

use super::parse_column;
use crate::adapters::access_sea as access_adapter;
use crate::domain::scopes::{Grant, ScopeType, ShiftLimits};
use crate::entities::{cities, roles, shift_leads, user_roles};
use crate::errors::domain::DomainError;

pub use access_adapter::{UserRoleCreate, UserRoleFilter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub country: String,
    pub timezone: String,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Role {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub scope_type: ScopeType,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserRoleAssignment {
    pub id: i64,
    pub user_id: i64,
    pub role_id: i64,
    pub city_id: Option<i64>,
    pub restaurant_id: Option<i64>,
    pub is_active: bool,
    pub assigned_by: Option<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub assigned_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub revoked_at: Option<OffsetDateTime>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ShiftLead {
    pub id: i64,
    pub user_id: i64,
    pub city_id: i64,
    pub min_hours_per_shift: i32,
    pub max_hours_per_shift: i32,
    pub min_hours_per_week: i32,
    pub max_hours_per_week: i32,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

// ----- cities -----

pub async fn create_city<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: String,
    code: String,
    country: String,
    timezone: String,
) -> Result<City, DomainError> {
    Ok(access_adapter::create_city(conn, name, code, country, timezone)
        .await?
        .into())
}

pub async fn find_city<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<City>, DomainError> {
    Ok(access_adapter::find_city(conn, id).await?.map(City::from))
}

pub async fn list_cities<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    active_only: bool,
) -> Result<Vec<City>, DomainError> {
    let rows = access_adapter::list_cities(conn, active_only).await?;
    Ok(rows.into_iter().map(City::from).collect())
}

// ----- roles -----

pub async fn create_role<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    code: String,
    name: String,
    description: Option<String>,
    scope_type: ScopeType,
) -> Result<Role, DomainError> {
    Role::try_from(
        access_adapter::create_role(conn, code, name, description, scope_type.as_str()).await?,
    )
}

pub async fn find_role<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<Role>, DomainError> {
    access_adapter::find_role(conn, id)
        .await?
        .map(Role::try_from)
        .transpose()
}

pub async fn find_role_by_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    code: &str,
) -> Result<Option<Role>, DomainError> {
    access_adapter::find_role_by_code(conn, code)
        .await?
        .map(Role::try_from)
        .transpose()
}

pub async fn list_roles<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<Role>, DomainError> {
    access_adapter::list_roles(conn)
        .await?
        .into_iter()
        .map(Role::try_from)
        .collect()
}

pub async fn update_role<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    name: Option<String>,
    description: Option<Option<String>>,
    is_active: Option<bool>,
) -> Result<Option<Role>, DomainError> {
    let Some(model) = access_adapter::find_role(conn, id).await? else {
        return Ok(None);
    };
    let updated = access_adapter::update_role(conn, model, name, description, is_active).await?;
    Role::try_from(updated).map(Some)
}

// ----- assignments -----

pub async fn assign<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserRoleCreate,
) -> Result<UserRoleAssignment, DomainError> {
    Ok(access_adapter::create_user_role(conn, dto).await?.into())
}

pub async fn find_assignment<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<UserRoleAssignment>, DomainError> {
    Ok(access_adapter::find_user_role(conn, id)
        .await?
        .map(UserRoleAssignment::from))
}

pub async fn find_active_assignment<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    role_id: i64,
    city_id: Option<i64>,
    restaurant_id: Option<i64>,
) -> Result<Option<UserRoleAssignment>, DomainError> {
    Ok(
        access_adapter::find_active_assignment(conn, user_id, role_id, city_id, restaurant_id)
            .await?
            .map(UserRoleAssignment::from),
    )
}

pub async fn list_assignments<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: UserRoleFilter,
) -> Result<Vec<UserRoleAssignment>, DomainError> {
    let rows = access_adapter::list_user_roles(conn, filter).await?;
    Ok(rows.into_iter().map(UserRoleAssignment::from).collect())
}

/// Soft revoke; already revoked rows come back unchanged.
pub async fn revoke<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<UserRoleAssignment>, DomainError> {
    let Some(model) = access_adapter::find_user_role(conn, id).await? else {
        return Ok(None);
    };
    if !model.is_active {
        return Ok(Some(model.into()));
    }
    let revoked = access_adapter::revoke_user_role(conn, model, OffsetDateTime::now_utc()).await?;
    Ok(Some(revoked.into()))
}

/// Active grants of an active role, ready to fold into scopes.
pub async fn active_grants<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<Grant>, DomainError> {
    access_adapter::active_grants(conn, user_id)
        .await?
        .into_iter()
        .map(|(grant, role)| {
            Ok(Grant {
                scope_type: parse_column(&role.scope_type, "roles.scope_type")?,
                role_code: role.code,
                city_id: grant.city_id,
                restaurant_id: grant.restaurant_id,
            })
        })
        .collect()
}

// ----- shift leads -----

pub async fn create_shift_lead<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    city_id: i64,
    limits: ShiftLimits,
) -> Result<ShiftLead, DomainError> {
    let row = access_adapter::create_shift_lead(
        conn,
        access_adapter::ShiftLeadCreate {
            user_id,
            city_id,
            min_hours_per_shift: limits.min_per_shift,
            max_hours_per_shift: limits.max_per_shift,
            min_hours_per_week: limits.min_per_week,
            max_hours_per_week: limits.max_per_week,
        },
    )
    .await?;
    Ok(row.into())
}

pub async fn list_shift_leads<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    city_ids: Option<Vec<i64>>,
) -> Result<Vec<ShiftLead>, DomainError> {
    let rows = access_adapter::list_shift_leads(conn, city_ids).await?;
    Ok(rows.into_iter().map(ShiftLead::from).collect())
}

impl From<cities::Model> for City {
    fn from(model: cities::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            code: model.code,
            country: model.country,
            timezone: model.timezone,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }
}

impl TryFrom<roles::Model> for Role {
    type Error = DomainError;

    fn try_from(model: roles::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            scope_type: parse_column(&model.scope_type, "roles.scope_type")?,
            code: model.code,
            name: model.name,
            description: model.description,
            is_active: model.is_active,
            created_at: model.created_at,
        })
    }
}

impl From<user_roles::Model> for UserRoleAssignment {
    fn from(model: user_roles::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            role_id: model.role_id,
            city_id: model.city_id,
            restaurant_id: model.restaurant_id,
            is_active: model.is_active,
            assigned_by: model.assigned_by,
            assigned_at: model.assigned_at,
            revoked_at: model.revoked_at,
            notes: model.notes,
        }
    }
}

impl From<shift_leads::Model> for ShiftLead {
    fn from(model: shift_leads::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            city_id: model.city_id,
            min_hours_per_shift: model.min_hours_per_shift,
            max_hours_per_shift: model.max_hours_per_shift,
            min_hours_per_week: model.min_hours_per_week,
            max_hours_per_week: model.max_hours_per_week,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }
}
