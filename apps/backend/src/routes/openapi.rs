//! OpenAPI document served at `/api/v1/openapi.json`.

use actix_web::{web, HttpResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::{admin, auth, customer, health, rbac, restaurant, rider, staff};
use crate::domain::{
    OrderStatus, OrderType, PaymentProvider, PaymentStatus, ScopeType, UserRole, VehicleType,
};
use crate::error::ProblemDetails;

#[derive(OpenApi)]
#[openapi(
    info(title = "Food delivery API", version = "1"),
    paths(
        health::health,
        auth::signup,
        auth::login,
        auth::refresh,
        auth::me,
        customer::get_profile,
        customer::update_profile,
        customer::delete_profile,
        customer::list_restaurants,
        customer::get_restaurant,
        customer::restaurant_hours,
        customer::restaurant_menu,
        customer::menu_item,
        customer::get_cart,
        customer::add_cart_item,
        customer::remove_cart_item,
        customer::clear_cart,
        customer::quote,
        customer::place_order,
        customer::list_orders,
        customer::get_order,
        customer::cancel_order,
        customer::create_payment,
        restaurant::list_restaurants,
        restaurant::create_restaurant,
        restaurant::get_restaurant,
        restaurant::update_restaurant,
        restaurant::list_hours,
        restaurant::create_hours,
        restaurant::update_hours,
        restaurant::delete_hours,
        restaurant::list_menu,
        restaurant::create_menu_item,
        restaurant::get_menu_item,
        restaurant::update_menu_item,
        restaurant::delete_menu_item,
        restaurant::list_orders,
        restaurant::get_order,
        restaurant::confirm_order,
        restaurant::preparing_order,
        restaurant::ready_order,
        restaurant::complete_order,
        restaurant::cancel_order,
        restaurant::restaurant_analytics,
        rider::create_profile,
        rider::get_profile,
        rider::update_profile,
        rider::toggle_availability,
        rider::start_shift,
        rider::end_shift,
        rider::active_shift,
        rider::shift_history,
        rider::available_deliveries,
        rider::accept_delivery,
        rider::pickup_delivery,
        rider::deliver_delivery,
        rider::active_deliveries,
        rider::delivery_history,
        rider::earnings_summary,
        rider::payout,
        admin::pending_approval_count,
        admin::list_restaurants,
        admin::approve_restaurant,
        admin::toggle_restaurant,
        admin::order_summary,
        admin::list_orders,
        admin::refund_order,
        admin::get_payment,
        admin::authorize_payment,
        admin::capture_payment,
        admin::fail_payment,
        admin::create_geofence,
        admin::list_geofences,
        admin::toggle_geofence,
        admin::eligible_drivers,
        admin::update_driver,
        staff::list_orders,
        staff::order_stats,
        staff::assign_driver,
        staff::refund_order,
        staff::list_restaurants,
        staff::review_restaurant,
        staff::set_restaurant_active,
        staff::pending_approval_counts,
        rbac::list_roles,
        rbac::create_role,
        rbac::update_role,
        rbac::list_assignments,
        rbac::assign_role,
        rbac::revoke_assignment,
        rbac::list_cities,
        rbac::create_city,
        rbac::list_shift_leads,
        rbac::create_shift_lead,
    ),
    components(schemas(
        ProblemDetails,
        UserRole,
        OrderStatus,
        OrderType,
        PaymentStatus,
        PaymentProvider,
        VehicleType,
        ScopeType,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "auth", description = "Signup, login and token refresh"),
        (name = "customer", description = "Browsing, cart and orders"),
        (name = "restaurant", description = "Restaurant owner management"),
        (name = "rider", description = "Driver shifts, deliveries and earnings"),
        (name = "admin", description = "Platform administration"),
        (name = "staff", description = "City and restaurant scoped operations"),
        (name = "rbac", description = "Cities, roles and role assignments"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/openapi.json", web::get().to(openapi_json));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_role_scope() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for prefix in [
            "/health",
            "/api/v1/auth/",
            "/api/v1/customer/",
            "/api/v1/restaurant/",
            "/api/v1/rider/",
            "/api/v1/admin/",
            "/api/v1/staff/",
            "/api/v1/rbac/",
        ] {
            assert!(
                paths.iter().any(|p| p.starts_with(prefix)),
                "no path under {prefix}"
            );
        }
    }

    #[test]
    fn bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer"));
    }
}
