//! Role administration: cities, roles, scoped role assignments and shift
//! leads. Every operation takes the caller's [`AccessScopes`].

use sea_orm::ConnectionTrait;
use tracing::info;

use crate::domain::scopes::{
    self, validate_assignment_shape, AccessScopes, ScopeType, ShiftLimits,
};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::repos::access::{
    self, City, Role, ShiftLead, UserRoleAssignment, UserRoleCreate, UserRoleFilter,
};
use crate::repos::{restaurants as restaurants_repo, users};

fn super_admin_only(scopes: &AccessScopes) -> Result<(), DomainError> {
    if scopes.is_super_admin {
        return Ok(());
    }
    Err(DomainError::forbidden("Super admin access required"))
}

fn city_not_found() -> DomainError {
    DomainError::not_found(NotFoundKind::City, "City not found")
}

fn role_not_found() -> DomainError {
    DomainError::not_found(NotFoundKind::Role, "Role not found")
}

fn require_text(value: &str, field: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation_other(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Role codes are lower snake case, 2 to 50 characters.
fn validate_role_code(code: &str) -> Result<String, DomainError> {
    let code = code.trim();
    let well_formed = (2..=50).contains(&code.len())
        && code.starts_with(|c: char| c.is_ascii_lowercase())
        && code.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !well_formed {
        return Err(DomainError::validation_other(
            "code must be 2-50 lower-case letters, digits or underscores",
        ));
    }
    Ok(code.to_string())
}

/// Fold the user's active grants into scopes. `platform_admin` is true for
/// accounts whose login role is `admin`.
pub async fn load_scopes<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    platform_admin: bool,
) -> Result<AccessScopes, DomainError> {
    let grants = access::active_grants(conn, user_id).await?;
    Ok(AccessScopes::from_grants(user_id, platform_admin, &grants))
}

// ----- cities -----

#[derive(Debug, Clone)]
pub struct NewCity {
    pub name: String,
    pub code: String,
    pub country: String,
    pub timezone: Option<String>,
}

pub async fn list_cities<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    active_only: bool,
) -> Result<Vec<City>, DomainError> {
    access::list_cities(conn, active_only).await
}

pub async fn create_city<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    scopes: &AccessScopes,
    input: NewCity,
) -> Result<City, DomainError> {
    super_admin_only(scopes)?;
    let name = require_text(&input.name, "name")?;
    let code = require_text(&input.code, "code")?.to_uppercase();
    let country = require_text(&input.country, "country")?;
    let timezone = match input.timezone.as_deref().map(str::trim) {
        Some(tz) if !tz.is_empty() => tz.to_string(),
        _ => "UTC".to_string(),
    };

    let city = access::create_city(conn, name, code, country, timezone).await?;
    info!(city_id = city.id, code = %city.code, "city.created");
    Ok(city)
}

// ----- roles -----

#[derive(Debug, Clone)]
pub struct NewRole {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub scope_type: ScopeType,
}

pub async fn list_roles<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    scopes: &AccessScopes,
) -> Result<Vec<Role>, DomainError> {
    super_admin_only(scopes)?;
    access::list_roles(conn).await
}

pub async fn create_role<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    scopes: &AccessScopes,
    input: NewRole,
) -> Result<Role, DomainError> {
    super_admin_only(scopes)?;
    let code = validate_role_code(&input.code)?;
    let name = require_text(&input.name, "name")?;
    if access::find_role_by_code(conn, &code).await?.is_some() {
        return Err(DomainError::conflict(
            ConflictKind::RoleExists,
            format!("Role '{code}' already exists"),
        ));
    }

    let role = access::create_role(conn, code, name, input.description, input.scope_type).await?;
    info!(role_id = role.id, code = %role.code, scope_type = %role.scope_type, "role.created");
    Ok(role)
}

pub async fn update_role<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    scopes: &AccessScopes,
    id: i64,
    name: Option<String>,
    description: Option<Option<String>>,
    is_active: Option<bool>,
) -> Result<Role, DomainError> {
    super_admin_only(scopes)?;
    let name = name.as_deref().map(|n| require_text(n, "name")).transpose()?;
    let role = access::update_role(conn, id, name, description, is_active)
        .await?
        .ok_or_else(role_not_found)?;
    info!(role_id = id, is_active = role.is_active, "role.updated");
    Ok(role)
}

// ----- assignments -----

#[derive(Debug, Clone)]
pub struct AssignRole {
    pub user_id: i64,
    pub role_code: String,
    pub city_id: Option<i64>,
    pub restaurant_id: Option<i64>,
    pub notes: Option<String>,
}

/// Super admins see every assignment, city admins the ones in their cities.
pub async fn list_assignments<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    scopes: &AccessScopes,
    user_id: Option<i64>,
    active_only: bool,
) -> Result<Vec<UserRoleAssignment>, DomainError> {
    if !scopes.is_super_admin && !scopes.has_role(&[scopes::CITY_ADMIN]) {
        return Err(DomainError::forbidden("Only admins may list role assignments"));
    }
    access::list_assignments(
        conn,
        UserRoleFilter {
            user_id,
            role_id: None,
            city_ids: scopes.city_filter(),
            active_only,
        },
    )
    .await
}

pub async fn assign_role<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    scopes: &AccessScopes,
    input: AssignRole,
) -> Result<UserRoleAssignment, DomainError> {
    let role = access::find_role_by_code(conn, input.role_code.trim())
        .await?
        .filter(|r| r.is_active)
        .ok_or_else(role_not_found)?;
    validate_assignment_shape(role.scope_type, input.city_id, input.restaurant_id)?;
    if !scopes.can_assign(role.scope_type, input.city_id) {
        return Err(DomainError::forbidden(format!(
            "Not allowed to assign '{}' here",
            role.code
        )));
    }

    if users::find_by_id(conn, input.user_id).await?.is_none() {
        return Err(DomainError::not_found(NotFoundKind::User, "User not found"));
    }
    if let Some(city_id) = input.city_id {
        access::find_city(conn, city_id).await?.ok_or_else(city_not_found)?;
    }
    if let Some(restaurant_id) = input.restaurant_id {
        if restaurants_repo::find_by_id(conn, restaurant_id).await?.is_none() {
            return Err(DomainError::not_found(
                NotFoundKind::Restaurant,
                "Restaurant not found",
            ));
        }
    }
    if access::find_active_assignment(
        conn,
        input.user_id,
        role.id,
        input.city_id,
        input.restaurant_id,
    )
    .await?
    .is_some()
    {
        return Err(DomainError::conflict(
            ConflictKind::RoleAlreadyAssigned,
            format!("User already holds '{}' in this scope", role.code),
        ));
    }

    let assignment = access::assign(
        conn,
        UserRoleCreate {
            user_id: input.user_id,
            role_id: role.id,
            city_id: input.city_id,
            restaurant_id: input.restaurant_id,
            assigned_by: Some(scopes.user_id),
            notes: input.notes,
        },
    )
    .await?;
    info!(
        assignment_id = assignment.id,
        user_id = assignment.user_id,
        role = %role.code,
        city_id = ?assignment.city_id,
        restaurant_id = ?assignment.restaurant_id,
        assigned_by = scopes.user_id,
        "role.assigned"
    );
    Ok(assignment)
}

/// Soft revoke under the same rules as assignment.
pub async fn revoke_assignment<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    scopes: &AccessScopes,
    id: i64,
) -> Result<UserRoleAssignment, DomainError> {
    let not_found =
        || DomainError::not_found(NotFoundKind::RoleAssignment, "Role assignment not found");
    let assignment = access::find_assignment(conn, id).await?.ok_or_else(not_found)?;
    let role = access::find_role(conn, assignment.role_id)
        .await?
        .ok_or_else(role_not_found)?;
    if !scopes.can_assign(role.scope_type, assignment.city_id) {
        return Err(DomainError::forbidden(format!(
            "Not allowed to revoke '{}' here",
            role.code
        )));
    }

    let revoked = access::revoke(conn, id).await?.ok_or_else(not_found)?;
    info!(assignment_id = id, revoked_by = scopes.user_id, "role.revoked");
    Ok(revoked)
}

// ----- shift leads -----

/// Register a shift lead for a city and grant the `shift_lead` role there.
pub async fn create_shift_lead<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    scopes: &AccessScopes,
    user_id: i64,
    city_id: i64,
    limits: ShiftLimits,
) -> Result<ShiftLead, DomainError> {
    if !scopes.can_assign(ScopeType::City, Some(city_id)) {
        return Err(DomainError::forbidden("Not allowed to manage shift leads in this city"));
    }
    limits.validate()?;
    access::find_city(conn, city_id).await?.ok_or_else(city_not_found)?;
    if users::find_by_id(conn, user_id).await?.is_none() {
        return Err(DomainError::not_found(NotFoundKind::User, "User not found"));
    }

    let lead = access::create_shift_lead(conn, user_id, city_id, limits).await?;

    if let Some(role) = access::find_role_by_code(conn, scopes::SHIFT_LEAD).await? {
        let held = access::find_active_assignment(conn, user_id, role.id, Some(city_id), None)
            .await?
            .is_some();
        if !held {
            access::assign(
                conn,
                UserRoleCreate {
                    user_id,
                    role_id: role.id,
                    city_id: Some(city_id),
                    restaurant_id: None,
                    assigned_by: Some(scopes.user_id),
                    notes: Some("Granted with shift lead registration".to_string()),
                },
            )
            .await?;
        }
    }

    info!(shift_lead_id = lead.id, user_id, city_id, "shift_lead.created");
    Ok(lead)
}

pub async fn list_shift_leads<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    scopes: &AccessScopes,
    city_id: Option<i64>,
) -> Result<Vec<ShiftLead>, DomainError> {
    if !scopes.is_super_admin && !scopes.has_role(&[scopes::CITY_ADMIN]) {
        return Err(DomainError::forbidden("Only admins may list shift leads"));
    }
    let city_ids = match city_id {
        Some(id) if scopes.can_access_city(id) => Some(vec![id]),
        Some(id) => {
            return Err(DomainError::forbidden(format!("No access to city {id}")));
        }
        None => scopes.city_filter(),
    };
    access::list_shift_leads(conn, city_ids).await
}
