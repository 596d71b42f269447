//! Restaurant and business-hours repository functions.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::adapters::restaurants_sea as restaurants_adapter;
use crate::domain::scopes::ScopeFilter;
use crate::domain::GeoPoint;
use crate::entities::{business_hours, restaurants};
use crate::errors::domain::DomainError;

pub use restaurants_adapter::{RestaurantCreate, RestaurantFilter, RestaurantUpdate};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Restaurant {
    pub id: i64,
    pub owner_id: i64,
    pub city_id: Option<i64>,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub cuisine_type: Option<String>,
    pub description: Option<String>,
    pub rating: f64,
    pub commission_rate: f64,
    pub is_approved: bool,
    pub approved_by: Option<i64>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub approved_at: Option<OffsetDateTime>,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Restaurant {
    /// Visible to customers.
    pub fn is_public(&self) -> bool {
        self.is_active && self.is_approved
    }

    pub fn location(&self) -> Option<GeoPoint> {
        crate::domain::geo::point_from(self.lat, self.lon)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BusinessHour {
    pub id: i64,
    pub restaurant_id: i64,
    pub day_of_week: i16,
    pub open_time: String,
    pub close_time: String,
    pub is_closed: bool,
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: RestaurantCreate,
) -> Result<Restaurant, DomainError> {
    Ok(restaurants_adapter::create(conn, dto).await?.into())
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<Restaurant>, DomainError> {
    Ok(restaurants_adapter::find_by_id(conn, id).await?.map(Restaurant::from))
}

pub async fn list_by_owner<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner_id: i64,
) -> Result<Vec<Restaurant>, DomainError> {
    let rows = restaurants_adapter::list_by_owner(conn, owner_id).await?;
    Ok(rows.into_iter().map(Restaurant::from).collect())
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: RestaurantFilter,
) -> Result<Vec<Restaurant>, DomainError> {
    let rows = restaurants_adapter::list(conn, filter).await?;
    Ok(rows.into_iter().map(Restaurant::from).collect())
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    dto: RestaurantUpdate,
) -> Result<Option<Restaurant>, DomainError> {
    let Some(model) = restaurants_adapter::find_by_id(conn, id).await? else {
        return Ok(None);
    };
    Ok(Some(restaurants_adapter::update(conn, model, dto).await?.into()))
}

/// Approve once; repeated approvals keep the first approver.
pub async fn approve<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    admin_id: i64,
) -> Result<Option<Restaurant>, DomainError> {
    let Some(model) = restaurants_adapter::find_by_id(conn, id).await? else {
        return Ok(None);
    };
    if model.is_approved {
        return Ok(Some(model.into()));
    }
    let approved =
        restaurants_adapter::approve(conn, model, admin_id, OffsetDateTime::now_utc()).await?;
    Ok(Some(approved.into()))
}

/// Approve or reject. Approving also reactivates; rejecting clears the
/// approver.
pub async fn set_approval<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    approver_id: i64,
    approve: bool,
) -> Result<Option<Restaurant>, DomainError> {
    let Some(model) = restaurants_adapter::find_by_id(conn, id).await? else {
        return Ok(None);
    };
    if !approve {
        return Ok(Some(restaurants_adapter::revoke_approval(conn, model).await?.into()));
    }
    let model = if model.is_approved {
        model
    } else {
        restaurants_adapter::approve(conn, model, approver_id, OffsetDateTime::now_utc()).await?
    };
    if model.is_active {
        return Ok(Some(model.into()));
    }
    Ok(Some(restaurants_adapter::set_active(conn, model, true).await?.into()))
}

pub async fn set_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    is_active: bool,
) -> Result<Option<Restaurant>, DomainError> {
    let Some(model) = restaurants_adapter::find_by_id(conn, id).await? else {
        return Ok(None);
    };
    Ok(Some(restaurants_adapter::set_active(conn, model, is_active).await?.into()))
}

pub async fn toggle_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<Restaurant>, DomainError> {
    let Some(model) = restaurants_adapter::find_by_id(conn, id).await? else {
        return Ok(None);
    };
    let next = !model.is_active;
    Ok(Some(restaurants_adapter::set_active(conn, model, next).await?.into()))
}

pub async fn count_pending_approval<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<u64, DomainError> {
    Ok(restaurants_adapter::count_pending_approval(conn).await?)
}

pub async fn pending_approval_by_city<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    scope: Option<&ScopeFilter>,
) -> Result<Vec<(Option<i64>, i64)>, DomainError> {
    Ok(restaurants_adapter::pending_approval_by_city(conn, scope).await?)
}

pub async fn list_hours<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    restaurant_id: i64,
) -> Result<Vec<BusinessHour>, DomainError> {
    let rows = restaurants_adapter::list_hours(conn, restaurant_id).await?;
    Ok(rows.into_iter().map(BusinessHour::from).collect())
}

pub async fn find_hours<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<BusinessHour>, DomainError> {
    Ok(restaurants_adapter::find_hours_by_id(conn, id)
        .await?
        .map(BusinessHour::from))
}

pub async fn create_hours<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    restaurant_id: i64,
    day_of_week: i16,
    open_time: String,
    close_time: String,
    is_closed: bool,
) -> Result<BusinessHour, DomainError> {
    let row = restaurants_adapter::create_hours(
        conn,
        restaurant_id,
        day_of_week,
        open_time,
        close_time,
        is_closed,
    )
    .await?;
    Ok(row.into())
}

pub async fn update_hours<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    open_time: String,
    close_time: String,
    is_closed: bool,
) -> Result<Option<BusinessHour>, DomainError> {
    let Some(model) = restaurants_adapter::find_hours_by_id(conn, id).await? else {
        return Ok(None);
    };
    let row = restaurants_adapter::update_hours(conn, model, open_time, close_time, is_closed)
        .await?;
    Ok(Some(row.into()))
}

pub async fn delete_hours<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<bool, DomainError> {
    Ok(restaurants_adapter::delete_hours(conn, id).await? > 0)
}

impl From<restaurants::Model> for Restaurant {
    fn from(model: restaurants::Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            city_id: model.city_id,
            name: model.name,
            phone: model.phone,
            email: model.email,
            address: model.address,
            lat: model.lat,
            lon: model.lon,
            cuisine_type: model.cuisine_type,
            description: model.description,
            rating: model.rating,
            commission_rate: model.commission_rate,
            is_approved: model.is_approved,
            approved_by: model.approved_by,
            approved_at: model.approved_at,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<business_hours::Model> for BusinessHour {
    fn from(model: business_hours::Model) -> Self {
        Self {
            id: model.id,
            restaurant_id: model.restaurant_id,
            day_of_week: model.day_of_week,
            open_time: model.open_time,
            close_time: model.close_time,
            is_closed: model.is_closed,
        }
    }
}
