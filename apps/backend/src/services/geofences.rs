//! Polygon service areas.

use sea_orm::ConnectionTrait;
use tracing::info;

use crate::domain::geo::point_in_polygon;
use crate::domain::GeoPoint;
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};
use crate::repos::geofences::{self, Geofence};

pub const MIN_VERTICES: usize = 3;

pub fn validate_polygon(polygon: &[GeoPoint]) -> Result<(), DomainError> {
    if polygon.len() < MIN_VERTICES {
        return Err(DomainError::validation(
            ValidationKind::InvalidCoordinates,
            format!("A geofence needs at least {MIN_VERTICES} vertices"),
        ));
    }
    if let Some(bad) = polygon.iter().find(|p| !p.is_valid()) {
        return Err(DomainError::validation(
            ValidationKind::InvalidCoordinates,
            format!("Vertex ({}, {}) is out of range", bad.lat, bad.lon),
        ));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
    polygon: &[GeoPoint],
) -> Result<Geofence, DomainError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation_other("name must not be empty"));
    }
    validate_polygon(polygon)?;

    let fence = geofences::create(conn, name, polygon).await?;
    info!(geofence_id = fence.id, vertices = polygon.len(), "geofence.created");
    Ok(fence)
}

pub async fn list<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<Vec<Geofence>, DomainError> {
    geofences::list(conn, false).await
}

pub async fn toggle_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Geofence, DomainError> {
    let fence = geofences::toggle_active(conn, id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Geofence, "Geofence not found"))?;
    info!(geofence_id = id, is_active = fence.is_active, "geofence.toggled");
    Ok(fence)
}

/// With no active geofence every point is served; otherwise the point must
/// fall inside at least one.
pub fn covers(fences: &[Geofence], point: GeoPoint) -> bool {
    fences.is_empty() || fences.iter().any(|f| point_in_polygon(point, &f.polygon))
}

pub async fn ensure_in_service_area<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    point: GeoPoint,
) -> Result<(), DomainError> {
    let fences = geofences::list(conn, true).await?;
    if !covers(&fences, point) {
        return Err(DomainError::validation(
            ValidationKind::OutsideServiceArea,
            "Delivery address is outside every service area",
        ));
    }
    Ok(())
}
