//! Geofence repository functions. Polygons are stored as JSON `[lat, lon]` pairs.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::adapters::geofences_sea as geofences_adapter;
use crate::domain::GeoPoint;
use crate::entities::geofences;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Geofence {
    pub id: i64,
    pub name: String,
    pub polygon: Vec<GeoPoint>,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
    polygon: &[GeoPoint],
) -> Result<Geofence, DomainError> {
    let pairs: Vec<[f64; 2]> = polygon.iter().map(|p| [p.lat, p.lon]).collect();
    let encoded = serde_json::to_string(&pairs)
        .map_err(|e| DomainError::validation_other(format!("polygon: {e}")))?;
    Geofence::try_from(geofences_adapter::create(conn, name, encoded).await?)
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    active_only: bool,
) -> Result<Vec<Geofence>, DomainError> {
    geofences_adapter::list(conn, active_only)
        .await?
        .into_iter()
        .map(Geofence::try_from)
        .collect()
}

pub async fn toggle_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<Geofence>, DomainError> {
    let Some(model) = geofences_adapter::find_by_id(conn, id).await? else {
        return Ok(None);
    };
    let next = !model.is_active;
    Geofence::try_from(geofences_adapter::set_active(conn, model, next).await?).map(Some)
}

impl TryFrom<geofences::Model> for Geofence {
    type Error = DomainError;

    fn try_from(model: geofences::Model) -> Result<Self, Self::Error> {
        let pairs: Vec<[f64; 2]> = serde_json::from_str(&model.polygon)
            .map_err(|e| DomainError::corrupt(format!("geofences.polygon: {e}")))?;
        Ok(Self {
            id: model.id,
            name: model.name,
            polygon: pairs
                .into_iter()
                .map(|[lat, lon]| GeoPoint::new(lat, lon))
                .collect(),
            is_active: model.is_active,
            created_at: model.created_at,
        })
    }
}
