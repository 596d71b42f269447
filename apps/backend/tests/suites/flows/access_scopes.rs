use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use backend_test_support::problem_details::assert_problem_details;
use food_backend::domain::UserRole;
use food_backend::repos::restaurants::{self as restaurants_repo, RestaurantUpdate};
use serde_json::{json, Value};

use crate::support::auth::bearer;
use crate::support::factory::{
    seed_city, seed_kitchen_in, seed_restaurant, seed_user, Kitchen, NEAR_LAT, NEAR_LON,
};
use crate::support::http::{delete, get, json_ok, patch, post};
use crate::support::{build_test_state, create_test_app};

async fn grant<S>(
    app: &S,
    auth: &str,
    user_id: i64,
    role_code: &str,
    city_id: Option<i64>,
    restaurant_id: Option<i64>,
) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    post(
        app,
        "/api/v1/rbac/user-roles",
        auth,
        json!({
            "user_id": user_id,
            "role_code": role_code,
            "city_id": city_id,
            "restaurant_id": restaurant_id,
        }),
    )
    .await
}

async fn pickup_order<S>(app: &S, customer_auth: &str, kitchen: &Kitchen) -> Value
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    json_ok(
        post(
            app,
            "/api/v1/customer/orders",
            customer_auth,
            json!({
                "restaurant_id": kitchen.restaurant.id,
                "order_type": "pickup",
                "items": [{ "menu_item_id": kitchen.item.id, "quantity": 1 }],
            }),
        )
        .await,
        201,
    )
    .await
}

fn ids(list: &Value) -> Vec<i64> {
    list.as_array()
        .expect("array")
        .iter()
        .filter_map(|v| v["id"].as_i64())
        .collect()
}

#[actix_web::test]
async fn city_admin_sees_only_its_city() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let admin = seed_user(&db, UserRole::Admin).await;
    let customer = seed_user(&db, UserRole::Customer).await;
    let staff = seed_user(&db, UserRole::Customer).await;
    let app = create_test_app(state.clone()).await;
    let admin_auth = bearer(admin.id, UserRole::Admin, &state.security);
    let customer_auth = bearer(customer.id, UserRole::Customer, &state.security);
    let staff_auth = bearer(staff.id, UserRole::Customer, &state.security);

    let berlin = json_ok(
        post(
            &app,
            "/api/v1/rbac/cities",
            &admin_auth,
            json!({ "name": "Berlin", "code": "ber", "country": "Germany" }),
        )
        .await,
        201,
    )
    .await;
    assert_eq!(berlin["code"], "BER");
    assert_eq!(berlin["timezone"], "UTC");
    let berlin_id = berlin["id"].as_i64().expect("id");

    let resp = post(
        &app,
        "/api/v1/rbac/cities",
        &admin_auth,
        json!({ "name": "Berlin", "code": "BE2", "country": "Germany" }),
    )
    .await;
    assert_problem_details(resp, "CITY_EXISTS", StatusCode::CONFLICT).await;

    // only platform admins create cities
    let resp = post(
        &app,
        "/api/v1/rbac/cities",
        &staff_auth,
        json!({ "name": "Munich", "code": "MUC", "country": "Germany" }),
    )
    .await;
    assert_problem_details(resp, "FORBIDDEN", StatusCode::FORBIDDEN).await;

    let hamburg = seed_city(&db, "Hamburg", "HAM").await;
    let berlin_kitchen = seed_kitchen_in(&db, berlin_id).await;
    let hamburg_kitchen = seed_kitchen_in(&db, hamburg.id).await;
    let berlin_order = pickup_order(&app, &customer_auth, &berlin_kitchen).await;
    pickup_order(&app, &customer_auth, &hamburg_kitchen).await;
    assert_eq!(berlin_order["city_id"], berlin_id);

    // no grants yet
    let resp = get(&app, "/api/v1/staff/orders", &staff_auth).await;
    assert_problem_details(resp, "FORBIDDEN", StatusCode::FORBIDDEN).await;

    let assignment = json_ok(
        grant(&app, &admin_auth, staff.id, "city_admin", Some(berlin_id), None).await,
        201,
    )
    .await;
    assert_eq!(assignment["is_active"], true);
    assert_eq!(assignment["assigned_by"], admin.id);

    let resp = grant(&app, &admin_auth, staff.id, "city_admin", Some(berlin_id), None).await;
    assert_problem_details(resp, "ROLE_ALREADY_ASSIGNED", StatusCode::CONFLICT).await;

    let orders = json_ok(get(&app, "/api/v1/staff/orders", &staff_auth).await, 200).await;
    assert_eq!(ids(&orders), vec![berlin_order["id"].as_i64().expect("id")]);

    let resp = get(
        &app,
        &format!("/api/v1/staff/orders?city_id={}", hamburg.id),
        &staff_auth,
    )
    .await;
    assert_problem_details(resp, "FORBIDDEN", StatusCode::FORBIDDEN).await;

    let resp = get(
        &app,
        &format!("/api/v1/staff/orders?restaurant_id={}", hamburg_kitchen.restaurant.id),
        &staff_auth,
    )
    .await;
    assert_problem_details(resp, "FORBIDDEN", StatusCode::FORBIDDEN).await;

    let restaurants = json_ok(get(&app, "/api/v1/staff/restaurants", &staff_auth).await, 200).await;
    assert_eq!(ids(&restaurants), vec![berlin_kitchen.restaurant.id]);

    let stats = json_ok(
        get(&app, "/api/v1/staff/orders/stats/summary", &staff_auth).await,
        200,
    )
    .await;
    assert_eq!(stats["total_orders"], 1);
    assert_eq!(stats["pending_orders"], 1);

    // platform admins see every city
    let all = json_ok(get(&app, "/api/v1/staff/orders", &admin_auth).await, 200).await;
    assert_eq!(ids(&all).len(), 2);

    Ok(())
}

#[actix_web::test]
async fn assignment_rules_follow_role_scope() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let admin = seed_user(&db, UserRole::Admin).await;
    let city_admin = seed_user(&db, UserRole::Customer).await;
    let dispatcher = seed_user(&db, UserRole::Customer).await;
    let berlin = seed_city(&db, "Berlin", "BER").await;
    let hamburg = seed_city(&db, "Hamburg", "HAM").await;
    let kitchen = seed_kitchen_in(&db, berlin.id).await;
    let app = create_test_app(state.clone()).await;
    let admin_auth = bearer(admin.id, UserRole::Admin, &state.security);
    let city_auth = bearer(city_admin.id, UserRole::Customer, &state.security);
    let dispatcher_auth = bearer(dispatcher.id, UserRole::Customer, &state.security);

    let resp = grant(&app, &admin_auth, city_admin.id, "city_admin", None, None).await;
    assert_problem_details(resp, "INVALID_ROLE_SCOPE", StatusCode::UNPROCESSABLE_ENTITY).await;

    let resp = grant(
        &app,
        &admin_auth,
        city_admin.id,
        "restaurant_admin",
        Some(berlin.id),
        None,
    )
    .await;
    assert_problem_details(resp, "INVALID_ROLE_SCOPE", StatusCode::UNPROCESSABLE_ENTITY).await;

    let resp = grant(&app, &admin_auth, city_admin.id, "night_owl", Some(berlin.id), None).await;
    assert_problem_details(resp, "ROLE_NOT_FOUND", StatusCode::NOT_FOUND).await;

    let resp = grant(&app, &admin_auth, 999_999, "city_admin", Some(berlin.id), None).await;
    assert_problem_details(resp, "USER_NOT_FOUND", StatusCode::NOT_FOUND).await;

    json_ok(
        grant(&app, &admin_auth, city_admin.id, "city_admin", Some(berlin.id), None).await,
        201,
    )
    .await;

    // a city admin hands out city roles in its own city only
    let resp = grant(&app, &city_auth, dispatcher.id, "dispatcher", Some(hamburg.id), None).await;
    assert_problem_details(resp, "FORBIDDEN", StatusCode::FORBIDDEN).await;
    let resp = grant(&app, &city_auth, dispatcher.id, "super_admin", None, None).await;
    assert_problem_details(resp, "FORBIDDEN", StatusCode::FORBIDDEN).await;
    let resp = grant(
        &app,
        &city_auth,
        dispatcher.id,
        "restaurant_admin",
        None,
        Some(kitchen.restaurant.id),
    )
    .await;
    assert_problem_details(resp, "FORBIDDEN", StatusCode::FORBIDDEN).await;

    let assignment = json_ok(
        grant(&app, &city_auth, dispatcher.id, "dispatcher", Some(berlin.id), None).await,
        201,
    )
    .await;
    let assignment_id = assignment["id"].as_i64().expect("id");
    json_ok(get(&app, "/api/v1/staff/orders", &dispatcher_auth).await, 200).await;

    // the city admin's view of assignments stays inside Berlin
    let listed = json_ok(get(&app, "/api/v1/rbac/user-roles", &city_auth).await, 200).await;
    assert!(listed
        .as_array()
        .expect("array")
        .iter()
        .all(|a| a["city_id"] == berlin.id));
    let resp = get(&app, "/api/v1/rbac/roles", &city_auth).await;
    assert_problem_details(resp, "FORBIDDEN", StatusCode::FORBIDDEN).await;

    let resp = delete(
        &app,
        &format!("/api/v1/rbac/user-roles/{assignment_id}"),
        &city_auth,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = get(&app, "/api/v1/staff/orders", &dispatcher_auth).await;
    assert_problem_details(resp, "FORBIDDEN", StatusCode::FORBIDDEN).await;

    let history = json_ok(
        get(
            &app,
            &format!("/api/v1/rbac/user-roles?user_id={}&include_revoked=true", dispatcher.id),
            &admin_auth,
        )
        .await,
        200,
    )
    .await;
    assert_eq!(history[0]["is_active"], false);
    assert!(history[0]["revoked_at"].is_string());

    let resp = delete(&app, "/api/v1/rbac/user-roles/999999", &admin_auth).await;
    assert_problem_details(resp, "ROLE_ASSIGNMENT_NOT_FOUND", StatusCode::NOT_FOUND).await;

    Ok(())
}

#[actix_web::test]
async fn custom_roles_and_shift_leads() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let admin = seed_user(&db, UserRole::Admin).await;
    let lead = seed_user(&db, UserRole::Customer).await;
    let berlin = seed_city(&db, "Berlin", "BER").await;
    let app = create_test_app(state.clone()).await;
    let admin_auth = bearer(admin.id, UserRole::Admin, &state.security);

    let role = json_ok(
        post(
            &app,
            "/api/v1/rbac/roles",
            &admin_auth,
            json!({ "code": "night_dispatch", "name": "Night dispatch", "scope_type": "city" }),
        )
        .await,
        201,
    )
    .await;
    assert_eq!(role["scope_type"], "city");

    let resp = post(
        &app,
        "/api/v1/rbac/roles",
        &admin_auth,
        json!({ "code": "night_dispatch", "name": "Again", "scope_type": "city" }),
    )
    .await;
    assert_problem_details(resp, "ROLE_EXISTS", StatusCode::CONFLICT).await;

    let retired = json_ok(
        patch(
            &app,
            &format!("/api/v1/rbac/roles/{}", role["id"]),
            &admin_auth,
            json!({ "is_active": false, "description": "retired" }),
        )
        .await,
        200,
    )
    .await;
    assert_eq!(retired["is_active"], false);
    assert_eq!(retired["description"], "retired");

    // inactive roles cannot be handed out
    let resp = grant(&app, &admin_auth, lead.id, "night_dispatch", Some(berlin.id), None).await;
    assert_problem_details(resp, "ROLE_NOT_FOUND", StatusCode::NOT_FOUND).await;

    let resp = patch(&app, "/api/v1/rbac/roles/999999", &admin_auth, json!({ "name": "x" })).await;
    assert_problem_details(resp, "ROLE_NOT_FOUND", StatusCode::NOT_FOUND).await;

    let roles = json_ok(get(&app, "/api/v1/rbac/roles", &admin_auth).await, 200).await;
    let shift_lead_role = roles
        .as_array()
        .expect("roles")
        .iter()
        .find(|r| r["code"] == "shift_lead")
        .and_then(|r| r["id"].as_i64())
        .expect("seeded shift_lead role");

    let resp = post(
        &app,
        "/api/v1/rbac/shift-leads",
        &admin_auth,
        json!({ "user_id": lead.id, "city_id": berlin.id, "max_hours_per_shift": 30 }),
    )
    .await;
    assert_problem_details(resp, "INVALID_SHIFT_LIMITS", StatusCode::UNPROCESSABLE_ENTITY).await;

    let created = json_ok(
        post(
            &app,
            "/api/v1/rbac/shift-leads",
            &admin_auth,
            json!({ "user_id": lead.id, "city_id": berlin.id }),
        )
        .await,
        201,
    )
    .await;
    assert_eq!(created["min_hours_per_shift"], 4);
    assert_eq!(created["max_hours_per_week"], 60);

    let grants = json_ok(
        get(
            &app,
            &format!("/api/v1/rbac/user-roles?user_id={}", lead.id),
            &admin_auth,
        )
        .await,
        200,
    )
    .await;
    assert_eq!(grants[0]["role_id"], shift_lead_role);
    assert_eq!(grants[0]["city_id"], berlin.id);

    let resp = post(
        &app,
        "/api/v1/rbac/shift-leads",
        &admin_auth,
        json!({ "user_id": lead.id, "city_id": berlin.id }),
    )
    .await;
    assert_problem_details(resp, "SHIFT_LEAD_EXISTS", StatusCode::CONFLICT).await;

    let leads = json_ok(
        get(
            &app,
            &format!("/api/v1/rbac/shift-leads?city_id={}", berlin.id),
            &admin_auth,
        )
        .await,
        200,
    )
    .await;
    assert_eq!(ids(&leads), vec![created["id"].as_i64().expect("id")]);

    Ok(())
}

#[actix_web::test]
async fn dispatcher_assigns_driver_in_scope() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let admin = seed_user(&db, UserRole::Admin).await;
    let customer = seed_user(&db, UserRole::Customer).await;
    let rider = seed_user(&db, UserRole::Driver).await;
    let local = seed_user(&db, UserRole::Customer).await;
    let remote = seed_user(&db, UserRole::Customer).await;
    let berlin = seed_city(&db, "Berlin", "BER").await;
    let hamburg = seed_city(&db, "Hamburg", "HAM").await;
    let kitchen = seed_kitchen_in(&db, berlin.id).await;
    let app = create_test_app(state.clone()).await;
    let admin_auth = bearer(admin.id, UserRole::Admin, &state.security);
    let customer_auth = bearer(customer.id, UserRole::Customer, &state.security);
    let owner_auth = bearer(kitchen.owner.id, UserRole::RestaurantOwner, &state.security);
    let rider_auth = bearer(rider.id, UserRole::Driver, &state.security);
    let local_auth = bearer(local.id, UserRole::Customer, &state.security);
    let remote_auth = bearer(remote.id, UserRole::Customer, &state.security);

    json_ok(grant(&app, &admin_auth, local.id, "dispatcher", Some(berlin.id), None).await, 201).await;
    json_ok(grant(&app, &admin_auth, remote.id, "dispatcher", Some(hamburg.id), None).await, 201)
        .await;

    let driver = json_ok(
        post(&app, "/api/v1/rider/profile", &rider_auth, json!({ "vehicle_type": "bike" })).await,
        201,
    )
    .await;
    json_ok(post(&app, "/api/v1/rider/shifts/start", &rider_auth, json!({})).await, 201).await;

    let order = json_ok(
        post(
            &app,
            "/api/v1/customer/orders",
            &customer_auth,
            json!({
                "restaurant_id": kitchen.restaurant.id,
                "order_type": "delivery",
                "items": [{ "menu_item_id": kitchen.item.id, "quantity": 1 }],
                "customer_lat": NEAR_LAT,
                "customer_lon": NEAR_LON,
            }),
        )
        .await,
        201,
    )
    .await;
    let oid = order["id"].as_i64().expect("id");
    for step in ["confirm", "preparing", "ready"] {
        json_ok(
            post(&app, &format!("/api/v1/restaurant/orders/{oid}/{step}"), &owner_auth, json!({}))
                .await,
            200,
        )
        .await;
    }
    let assign_uri = format!("/api/v1/staff/orders/{oid}/assign-driver");

    let resp = post(&app, &assign_uri, &remote_auth, json!({ "driver_id": driver["id"] })).await;
    assert_problem_details(resp, "FORBIDDEN", StatusCode::FORBIDDEN).await;

    let resp = post(&app, &assign_uri, &local_auth, json!({ "driver_id": 999_999 })).await;
    assert_problem_details(resp, "DRIVER_NOT_FOUND", StatusCode::NOT_FOUND).await;

    let delivery = json_ok(
        post(&app, &assign_uri, &local_auth, json!({ "driver_id": driver["id"] })).await,
        201,
    )
    .await;
    assert_eq!(delivery["order_id"], oid);
    assert_eq!(delivery["driver_id"], driver["id"]);

    let resp = post(&app, &assign_uri, &local_auth, json!({ "driver_id": driver["id"] })).await;
    assert_problem_details(resp, "DELIVERY_ALREADY_ASSIGNED", StatusCode::CONFLICT).await;

    // dispatchers do not refund
    let resp = post(
        &app,
        &format!("/api/v1/staff/orders/{oid}/refund"),
        &local_auth,
        json!({}),
    )
    .await;
    assert_problem_details(resp, "FORBIDDEN", StatusCode::FORBIDDEN).await;

    Ok(())
}

#[actix_web::test]
async fn pending_approvals_grouped_by_city() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let admin = seed_user(&db, UserRole::Admin).await;
    let owner = seed_user(&db, UserRole::RestaurantOwner).await;
    let city_admin = seed_user(&db, UserRole::Customer).await;
    let berlin = seed_city(&db, "Berlin", "BER").await;
    let hamburg = seed_city(&db, "Hamburg", "HAM").await;
    let mut pending = Vec::new();
    for city_id in [berlin.id, hamburg.id] {
        let restaurant = seed_restaurant(&db, owner.id, false).await;
        restaurants_repo::update(
            &db,
            restaurant.id,
            RestaurantUpdate {
                city_id: Some(Some(city_id)),
                ..Default::default()
            },
        )
        .await
        .expect("move restaurant");
        pending.push(restaurant.id);
    }
    let app = create_test_app(state.clone()).await;
    let admin_auth = bearer(admin.id, UserRole::Admin, &state.security);
    let city_auth = bearer(city_admin.id, UserRole::Customer, &state.security);
    json_ok(
        grant(&app, &admin_auth, city_admin.id, "city_admin", Some(berlin.id), None).await,
        201,
    )
    .await;
    let count_uri = "/api/v1/staff/restaurants/pending-approval/count";

    let all = json_ok(get(&app, count_uri, &admin_auth).await, 200).await;
    assert_eq!(all["total_pending"], 2);
    assert_eq!(all["by_city"].as_array().expect("by_city").len(), 2);

    let mine = json_ok(get(&app, count_uri, &city_auth).await, 200).await;
    assert_eq!(mine["total_pending"], 1);
    assert_eq!(mine["by_city"][0]["city_id"], berlin.id);

    let listed = json_ok(
        get(&app, "/api/v1/staff/restaurants?pending_approval=true", &city_auth).await,
        200,
    )
    .await;
    assert_eq!(ids(&listed), vec![pending[0]]);

    let resp = post(
        &app,
        &format!("/api/v1/staff/restaurants/{}/approve", pending[1]),
        &city_auth,
        json!({ "approve": true }),
    )
    .await;
    assert_problem_details(resp, "FORBIDDEN", StatusCode::FORBIDDEN).await;

    let approved = json_ok(
        post(
            &app,
            &format!("/api/v1/staff/restaurants/{}/approve", pending[0]),
            &city_auth,
            json!({ "approve": true, "notes": "hygiene check passed" }),
        )
        .await,
        200,
    )
    .await;
    assert_eq!(approved["is_approved"], true);
    assert_eq!(approved["approved_by"], city_admin.id);

    let paused = json_ok(
        post(
            &app,
            &format!("/api/v1/staff/restaurants/{}/active", pending[0]),
            &city_auth,
            json!({ "is_active": false }),
        )
        .await,
        200,
    )
    .await;
    assert_eq!(paused["is_active"], false);

    let mine = json_ok(get(&app, count_uri, &city_auth).await, 200).await;
    assert_eq!(mine["total_pending"], 0);

    Ok(())
}
