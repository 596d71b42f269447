//! Role administration: cities, roles, scoped role assignments and shift
//! leads. Callers are authorised by their grants, not their login role.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_with::rust::double_option;
use utoipa::{IntoParams, ToSchema};

use crate::db::txn::with_txn;
use crate::domain::scopes::{ScopeType, ShiftLimits};
use crate::domain::UserRole;
use crate::error::{AppError, ProblemDetails};
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::repos::access::{City, Role, ShiftLead, UserRoleAssignment};
use crate::services::access::{self as access_service, AssignRole, NewCity, NewRole};
use crate::state::app_state::AppState;

fn is_platform_admin(user: &CurrentUser) -> bool {
    user.role == UserRole::Admin
}

// ----- roles -----

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRoleRequest {
    /// Lower snake case, e.g. `night_dispatcher`
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub scope_type: ScopeType,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateRoleRequest {
    pub name: Option<String>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

#[utoipa::path(
    get,
    path = "/api/v1/rbac/roles",
    tag = "rbac",
    security(("bearer" = [])),
    responses((status = 200, body = Vec<Role>), (status = 403, body = ProblemDetails))
)]
pub async fn list_roles(
    user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (user_id, admin) = (user.id, is_platform_admin(&user));

    let roles = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            let scopes = access_service::load_scopes(txn, user_id, admin).await?;
            access_service::list_roles(txn, &scopes)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(roles))
}

#[utoipa::path(
    post,
    path = "/api/v1/rbac/roles",
    tag = "rbac",
    security(("bearer" = [])),
    request_body = CreateRoleRequest,
    responses(
        (status = 201, body = Role),
        (status = 403, body = ProblemDetails),
        (status = 409, description = "Code already taken", body = ProblemDetails),
    )
)]
pub async fn create_role(
    user: CurrentUser,
    app_state: web::Data<AppState>,
    body: ValidatedJson<CreateRoleRequest>,
) -> Result<HttpResponse, AppError> {
    let (user_id, admin) = (user.id, is_platform_admin(&user));
    let body = body.into_inner();
    let input = NewRole {
        code: body.code,
        name: body.name,
        description: body.description,
        scope_type: body.scope_type,
    };

    let role = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            let scopes = access_service::load_scopes(txn, user_id, admin).await?;
            access_service::create_role(txn, &scopes, input)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(role))
}

#[utoipa::path(
    patch,
    path = "/api/v1/rbac/roles/{id}",
    tag = "rbac",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Role id")),
    request_body = UpdateRoleRequest,
    responses((status = 200, body = Role), (status = 404, body = ProblemDetails))
)]
pub async fn update_role(
    user: CurrentUser,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
    body: ValidatedJson<UpdateRoleRequest>,
) -> Result<HttpResponse, AppError> {
    let (user_id, admin) = (user.id, is_platform_admin(&user));
    let role_id = path.into_inner();
    let body = body.into_inner();

    let role = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            let scopes = access_service::load_scopes(txn, user_id, admin).await?;
            access_service::update_role(
                txn,
                &scopes,
                role_id,
                body.name,
                body.description,
                body.is_active,
            )
            .await
            .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(role))
}

// ----- assignments -----

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AssignmentListQuery {
    pub user_id: Option<i64>,
    /// Include revoked assignments
    #[serde(default)]
    pub include_revoked: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignRoleRequest {
    pub user_id: i64,
    pub role_code: String,
    pub city_id: Option<i64>,
    pub restaurant_id: Option<i64>,
    pub notes: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/rbac/user-roles",
    tag = "rbac",
    security(("bearer" = [])),
    params(AssignmentListQuery),
    responses((status = 200, body = Vec<UserRoleAssignment>), (status = 403, body = ProblemDetails))
)]
pub async fn list_assignments(
    user: CurrentUser,
    app_state: web::Data<AppState>,
    query: web::Query<AssignmentListQuery>,
) -> Result<HttpResponse, AppError> {
    let (user_id, admin) = (user.id, is_platform_admin(&user));
    let AssignmentListQuery {
        user_id: filter_user,
        include_revoked,
    } = query.into_inner();

    let assignments = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            let scopes = access_service::load_scopes(txn, user_id, admin).await?;
            access_service::list_assignments(txn, &scopes, filter_user, !include_revoked)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(assignments))
}

#[utoipa::path(
    post,
    path = "/api/v1/rbac/user-roles",
    tag = "rbac",
    security(("bearer" = [])),
    request_body = AssignRoleRequest,
    responses(
        (status = 201, body = UserRoleAssignment),
        (status = 403, description = "Outside the caller's scope", body = ProblemDetails),
        (status = 409, description = "Already assigned", body = ProblemDetails),
        (status = 422, description = "Scope ids do not fit the role", body = ProblemDetails),
    )
)]
pub async fn assign_role(
    user: CurrentUser,
    app_state: web::Data<AppState>,
    body: ValidatedJson<AssignRoleRequest>,
) -> Result<HttpResponse, AppError> {
    let (user_id, admin) = (user.id, is_platform_admin(&user));
    let body = body.into_inner();
    let input = AssignRole {
        user_id: body.user_id,
        role_code: body.role_code,
        city_id: body.city_id,
        restaurant_id: body.restaurant_id,
        notes: body.notes,
    };

    let assignment = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            let scopes = access_service::load_scopes(txn, user_id, admin).await?;
            access_service::assign_role(txn, &scopes, input)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(assignment))
}

#[utoipa::path(
    delete,
    path = "/api/v1/rbac/user-roles/{id}",
    tag = "rbac",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Assignment id")),
    responses((status = 204), (status = 403, body = ProblemDetails), (status = 404, body = ProblemDetails))
)]
pub async fn revoke_assignment(
    user: CurrentUser,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let (user_id, admin) = (user.id, is_platform_admin(&user));
    let assignment_id = path.into_inner();

    with_txn(&app_state, move |txn| {
        Box::pin(async move {
            let scopes = access_service::load_scopes(txn, user_id, admin).await?;
            access_service::revoke_assignment(txn, &scopes, assignment_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

// ----- cities -----

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CityListQuery {
    #[serde(default)]
    pub active_only: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCityRequest {
    pub name: String,
    /// Short code, stored upper-case
    pub code: String,
    pub country: String,
    /// IANA name, defaults to UTC
    pub timezone: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/rbac/cities",
    tag = "rbac",
    security(("bearer" = [])),
    params(CityListQuery),
    responses((status = 200, body = Vec<City>))
)]
pub async fn list_cities(
    _user: CurrentUser,
    app_state: web::Data<AppState>,
    query: web::Query<CityListQuery>,
) -> Result<HttpResponse, AppError> {
    let active_only = query.into_inner().active_only;

    let cities = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            access_service::list_cities(txn, active_only)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(cities))
}

#[utoipa::path(
    post,
    path = "/api/v1/rbac/cities",
    tag = "rbac",
    security(("bearer" = [])),
    request_body = CreateCityRequest,
    responses(
        (status = 201, body = City),
        (status = 403, body = ProblemDetails),
        (status = 409, description = "Name or code taken", body = ProblemDetails),
    )
)]
pub async fn create_city(
    user: CurrentUser,
    app_state: web::Data<AppState>,
    body: ValidatedJson<CreateCityRequest>,
) -> Result<HttpResponse, AppError> {
    let (user_id, admin) = (user.id, is_platform_admin(&user));
    let body = body.into_inner();
    let input = NewCity {
        name: body.name,
        code: body.code,
        country: body.country,
        timezone: body.timezone,
    };

    let city = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            let scopes = access_service::load_scopes(txn, user_id, admin).await?;
            access_service::create_city(txn, &scopes, input)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(city))
}

// ----- shift leads -----

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ShiftLeadListQuery {
    pub city_id: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateShiftLeadRequest {
    pub user_id: i64,
    pub city_id: i64,
    pub min_hours_per_shift: Option<i32>,
    pub max_hours_per_shift: Option<i32>,
    pub min_hours_per_week: Option<i32>,
    pub max_hours_per_week: Option<i32>,
}

impl CreateShiftLeadRequest {
    fn limits(&self) -> ShiftLimits {
        let defaults = ShiftLimits::default();
        ShiftLimits {
            min_per_shift: self.min_hours_per_shift.unwrap_or(defaults.min_per_shift),
            max_per_shift: self.max_hours_per_shift.unwrap_or(defaults.max_per_shift),
            min_per_week: self.min_hours_per_week.unwrap_or(defaults.min_per_week),
            max_per_week: self.max_hours_per_week.unwrap_or(defaults.max_per_week),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/rbac/shift-leads",
    tag = "rbac",
    security(("bearer" = [])),
    params(ShiftLeadListQuery),
    responses((status = 200, body = Vec<ShiftLead>), (status = 403, body = ProblemDetails))
)]
pub async fn list_shift_leads(
    user: CurrentUser,
    app_state: web::Data<AppState>,
    query: web::Query<ShiftLeadListQuery>,
) -> Result<HttpResponse, AppError> {
    let (user_id, admin) = (user.id, is_platform_admin(&user));
    let city_id = query.into_inner().city_id;

    let leads = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            let scopes = access_service::load_scopes(txn, user_id, admin).await?;
            access_service::list_shift_leads(txn, &scopes, city_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(leads))
}

#[utoipa::path(
    post,
    path = "/api/v1/rbac/shift-leads",
    tag = "rbac",
    security(("bearer" = [])),
    request_body = CreateShiftLeadRequest,
    responses(
        (status = 201, body = ShiftLead),
        (status = 403, body = ProblemDetails),
        (status = 409, description = "Already a lead in this city", body = ProblemDetails),
        (status = 422, description = "Hour limits out of range", body = ProblemDetails),
    )
)]
pub async fn create_shift_lead(
    user: CurrentUser,
    app_state: web::Data<AppState>,
    body: ValidatedJson<CreateShiftLeadRequest>,
) -> Result<HttpResponse, AppError> {
    let (user_id, admin) = (user.id, is_platform_admin(&user));
    let body = body.into_inner();
    let limits = body.limits();
    let (lead_user, city_id) = (body.user_id, body.city_id);

    let lead = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            let scopes = access_service::load_scopes(txn, user_id, admin).await?;
            access_service::create_shift_lead(txn, &scopes, lead_user, city_id, limits)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(lead))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/roles", web::get().to(list_roles))
        .route("/roles", web::post().to(create_role))
        .route("/roles/{id}", web::patch().to(update_role))
        .route("/user-roles", web::get().to(list_assignments))
        .route("/user-roles", web::post().to(assign_role))
        .route("/user-roles/{id}", web::delete().to(revoke_assignment))
        .route("/cities", web::get().to(list_cities))
        .route("/cities", web::post().to(create_city))
        .route("/shift-leads", web::get().to(list_shift_leads))
        .route("/shift-leads", web::post().to(create_shift_lead));
}
