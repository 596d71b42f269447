use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use backend_test_support::problem_details::assert_problem_details;
use food_backend::domain::UserRole;
use serde_json::{json, Value};

use crate::support::auth::bearer;
use crate::support::factory::{seed_kitchen, seed_user, Kitchen, MID_LAT, MID_LON, NEAR_LAT, NEAR_LON};
use crate::support::http::{get, json_ok, patch, post};
use crate::support::{build_test_state, create_test_app};

/// Place a delivery order and walk it to `ready` as the owner.
async fn ready_delivery<S>(
    app: &S,
    customer_auth: &str,
    owner_auth: &str,
    kitchen: &Kitchen,
    lat: f64,
    lon: f64,
) -> Value
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let order = json_ok(
        post(
            app,
            "/api/v1/customer/orders",
            customer_auth,
            json!({
                "restaurant_id": kitchen.restaurant.id,
                "order_type": "delivery",
                "items": [{ "menu_item_id": kitchen.item.id, "quantity": 1 }],
                "customer_lat": lat,
                "customer_lon": lon,
            }),
        )
        .await,
        201,
    )
    .await;
    for step in ["confirm", "preparing", "ready"] {
        json_ok(
            post(
                app,
                &format!("/api/v1/restaurant/orders/{}/{step}", order["id"]),
                owner_auth,
                json!({}),
            )
            .await,
            200,
        )
        .await;
    }
    order
}

#[actix_web::test]
async fn driver_profile_and_shifts() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let user = seed_user(&db, UserRole::Driver).await;
    let app = create_test_app(state.clone()).await;
    let auth = bearer(user.id, UserRole::Driver, &state.security);

    let resp = get(&app, "/api/v1/rider/profile", &auth).await;
    assert_problem_details(resp, "DRIVER_NOT_FOUND", StatusCode::NOT_FOUND).await;

    let driver = json_ok(
        post(&app, "/api/v1/rider/profile", &auth, json!({ "vehicle_type": "bike" })).await,
        201,
    )
    .await;
    assert_eq!(driver["vehicle_type"], "bike");
    assert_eq!(driver["is_available"], false);
    assert_eq!(driver["hourly_rate_cents"], 0);

    let resp = post(&app, "/api/v1/rider/profile", &auth, json!({ "vehicle_type": "car" })).await;
    assert_problem_details(resp, "DRIVER_PROFILE_EXISTS", StatusCode::CONFLICT).await;

    let resp = get(&app, "/api/v1/rider/shifts/active", &auth).await;
    assert_problem_details(resp, "SHIFT_NOT_FOUND", StatusCode::NOT_FOUND).await;

    let shift = json_ok(
        post(
            &app,
            "/api/v1/rider/shifts/start",
            &auth,
            json!({ "lat": NEAR_LAT, "lon": NEAR_LON }),
        )
        .await,
        201,
    )
    .await;
    assert!(shift["ends_at"].is_null());

    let profile = json_ok(get(&app, "/api/v1/rider/profile", &auth).await, 200).await;
    assert_eq!(profile["is_available"], true);

    let resp = post(&app, "/api/v1/rider/shifts/start", &auth, json!({})).await;
    assert_problem_details(resp, "SHIFT_ALREADY_ACTIVE", StatusCode::CONFLICT).await;

    let resp = post(&app, "/api/v1/rider/shifts/end", &auth, json!({ "lat": NEAR_LAT })).await;
    assert_problem_details(resp, "INVALID_COORDINATES", StatusCode::UNPROCESSABLE_ENTITY).await;

    let ended = json_ok(post(&app, "/api/v1/rider/shifts/end", &auth, json!({})).await, 200).await;
    assert_eq!(ended["id"], shift["id"]);
    assert!(ended["ends_at"].is_string());

    let profile = json_ok(get(&app, "/api/v1/rider/profile", &auth).await, 200).await;
    assert_eq!(profile["is_available"], false);

    let history = json_ok(get(&app, "/api/v1/rider/shifts/history?limit=5", &auth).await, 200).await;
    assert_eq!(history.as_array().map(Vec::len), Some(1));

    let resp = post(&app, "/api/v1/rider/shifts/end", &auth, json!({})).await;
    assert_problem_details(resp, "SHIFT_NOT_FOUND", StatusCode::NOT_FOUND).await;

    Ok(())
}

#[actix_web::test]
async fn delivery_from_accept_to_payout() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let kitchen = seed_kitchen(&db).await;
    let customer = seed_user(&db, UserRole::Customer).await;
    let rider = seed_user(&db, UserRole::Driver).await;
    let admin = seed_user(&db, UserRole::Admin).await;
    let app = create_test_app(state.clone()).await;
    let customer_auth = bearer(customer.id, UserRole::Customer, &state.security);
    let owner_auth = bearer(kitchen.owner.id, UserRole::RestaurantOwner, &state.security);
    let auth = bearer(rider.id, UserRole::Driver, &state.security);
    let admin_auth = bearer(admin.id, UserRole::Admin, &state.security);

    let driver = json_ok(
        post(&app, "/api/v1/rider/profile", &auth, json!({ "vehicle_type": "bike" })).await,
        201,
    )
    .await;
    json_ok(
        patch(
            &app,
            &format!("/api/v1/admin/drivers/{}", driver["id"]),
            &admin_auth,
            json!({ "hourly_rate_cents": 1200 }),
        )
        .await,
        200,
    )
    .await;

    let order = ready_delivery(&app, &customer_auth, &owner_auth, &kitchen, NEAR_LAT, NEAR_LON).await;
    let oid = order["id"].as_i64().expect("id");

    // off shift
    let resp = post(&app, &format!("/api/v1/rider/deliveries/accept/{oid}"), &auth, json!({})).await;
    assert_problem_details(resp, "DRIVER_UNAVAILABLE", StatusCode::UNPROCESSABLE_ENTITY).await;

    json_ok(post(&app, "/api/v1/rider/shifts/start", &auth, json!({})).await, 201).await;

    let available = json_ok(get(&app, "/api/v1/rider/deliveries/available", &auth).await, 200).await;
    assert!(available
        .as_array()
        .expect("orders")
        .iter()
        .any(|o| o["id"] == oid));

    let delivery = json_ok(
        post(&app, &format!("/api/v1/rider/deliveries/accept/{oid}"), &auth, json!({})).await,
        201,
    )
    .await;
    assert_eq!(delivery["order_id"], oid);
    assert_eq!(delivery["distance_km"], order["distance_km"]);
    let did = delivery["id"].as_i64().expect("id");

    let seen = json_ok(
        get(&app, &format!("/api/v1/customer/orders/{oid}"), &customer_auth).await,
        200,
    )
    .await;
    assert_eq!(seen["status"], "assigned");

    let resp = post(&app, &format!("/api/v1/rider/deliveries/accept/{oid}"), &auth, json!({})).await;
    assert_problem_details(resp, "DELIVERY_ALREADY_ASSIGNED", StatusCode::CONFLICT).await;

    let resp = post(&app, &format!("/api/v1/rider/deliveries/{did}/deliver"), &auth, json!({})).await;
    assert_problem_details(resp, "INVALID_STATUS_TRANSITION", StatusCode::CONFLICT).await;

    let active = json_ok(get(&app, "/api/v1/rider/deliveries/active", &auth).await, 200).await;
    assert_eq!(active.as_array().map(Vec::len), Some(1));

    let picked = json_ok(
        post(&app, &format!("/api/v1/rider/deliveries/{did}/pickup"), &auth, json!({})).await,
        200,
    )
    .await;
    assert!(picked["picked_at"].is_string());

    let done = json_ok(
        post(&app, &format!("/api/v1/rider/deliveries/{did}/deliver"), &auth, json!({})).await,
        200,
    )
    .await;
    let km = done["distance_km"].as_f64().expect("km");
    let earning = done["driver_earning_cents"].as_i64().expect("earning");
    assert_eq!(earning, (km * 15.0).round() as i64);

    let seen = json_ok(
        get(&app, &format!("/api/v1/customer/orders/{oid}"), &customer_auth).await,
        200,
    )
    .await;
    assert_eq!(seen["status"], "delivered");

    let summary = json_ok(get(&app, "/api/v1/rider/earnings/summary", &auth).await, 200).await;
    assert_eq!(summary["completed_deliveries"], 1);
    assert_eq!(summary["total_earning_cents"], earning);

    let history = json_ok(get(&app, "/api/v1/rider/deliveries/history", &auth).await, 200).await;
    assert_eq!(history.as_array().map(Vec::len), Some(1));

    let payout = json_ok(get(&app, "/api/v1/rider/earnings/payout", &auth).await, 200).await;
    assert_eq!(payout["hourly_rate_cents"], 1200);
    assert_eq!(payout["completed_orders"], 1);
    assert_eq!(payout["bonus_count"], 0);
    assert_eq!(payout["bonus_cents"], 0);
    assert_eq!(payout["total_cents"], payout["hourly_pay_cents"]);

    let resp = get(
        &app,
        "/api/v1/rider/earnings/payout?since=2026-10-14T12:00:00Z&until=2026-10-14T11:00:00Z",
        &auth,
    )
    .await;
    assert_problem_details(resp, "INVALID_TIME_WINDOW", StatusCode::UNPROCESSABLE_ENTITY).await;

    Ok(())
}

#[actix_web::test]
async fn bike_cannot_take_long_delivery() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let kitchen = seed_kitchen(&db).await;
    let customer = seed_user(&db, UserRole::Customer).await;
    let biker = seed_user(&db, UserRole::Driver).await;
    let motorist = seed_user(&db, UserRole::Driver).await;
    let app = create_test_app(state.clone()).await;
    let customer_auth = bearer(customer.id, UserRole::Customer, &state.security);
    let owner_auth = bearer(kitchen.owner.id, UserRole::RestaurantOwner, &state.security);
    let bike_auth = bearer(biker.id, UserRole::Driver, &state.security);
    let car_auth = bearer(motorist.id, UserRole::Driver, &state.security);

    for (auth, vehicle) in [(&bike_auth, "bike"), (&car_auth, "car")] {
        json_ok(
            post(&app, "/api/v1/rider/profile", auth, json!({ "vehicle_type": vehicle })).await,
            201,
        )
        .await;
        json_ok(post(&app, "/api/v1/rider/shifts/start", auth, json!({})).await, 201).await;
    }

    let order = ready_delivery(&app, &customer_auth, &owner_auth, &kitchen, MID_LAT, MID_LON).await;
    let oid = order["id"].as_i64().expect("id");
    let km = order["distance_km"].as_f64().expect("km");
    assert!(km > 8.0 && km <= 15.0, "distance {km}");

    let bike_view = json_ok(get(&app, "/api/v1/rider/deliveries/available", &bike_auth).await, 200).await;
    assert!(!bike_view
        .as_array()
        .expect("orders")
        .iter()
        .any(|o| o["id"] == oid));

    let resp = post(&app, &format!("/api/v1/rider/deliveries/accept/{oid}"), &bike_auth, json!({})).await;
    assert_problem_details(resp, "DISTANCE_EXCEEDED", StatusCode::UNPROCESSABLE_ENTITY).await;

    json_ok(
        post(&app, &format!("/api/v1/rider/deliveries/accept/{oid}"), &car_auth, json!({})).await,
        201,
    )
    .await;

    Ok(())
}

#[actix_web::test]
async fn cancelling_assigned_order_frees_the_driver() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let kitchen = seed_kitchen(&db).await;
    let customer = seed_user(&db, UserRole::Customer).await;
    let rider = seed_user(&db, UserRole::Driver).await;
    let app = create_test_app(state.clone()).await;
    let customer_auth = bearer(customer.id, UserRole::Customer, &state.security);
    let owner_auth = bearer(kitchen.owner.id, UserRole::RestaurantOwner, &state.security);
    let auth = bearer(rider.id, UserRole::Driver, &state.security);

    json_ok(
        post(&app, "/api/v1/rider/profile", &auth, json!({ "vehicle_type": "bike" })).await,
        201,
    )
    .await;
    json_ok(post(&app, "/api/v1/rider/shifts/start", &auth, json!({})).await, 201).await;

    let order = ready_delivery(&app, &customer_auth, &owner_auth, &kitchen, NEAR_LAT, NEAR_LON).await;
    let oid = order["id"].as_i64().expect("id");
    let delivery = json_ok(
        post(&app, &format!("/api/v1/rider/deliveries/accept/{oid}"), &auth, json!({})).await,
        201,
    )
    .await;
    let did = delivery["id"].as_i64().expect("id");

    let cancelled = json_ok(
        post(
            &app,
            &format!("/api/v1/restaurant/orders/{oid}/cancel"),
            &owner_auth,
            json!({}),
        )
        .await,
        200,
    )
    .await;
    assert_eq!(cancelled["status"], "cancelled");

    let active = json_ok(get(&app, "/api/v1/rider/deliveries/active", &auth).await, 200).await;
    assert_eq!(active.as_array().map(Vec::len), Some(0));

    let resp = post(&app, &format!("/api/v1/rider/deliveries/{did}/pickup"), &auth, json!({})).await;
    assert_problem_details(resp, "DELIVERY_NOT_FOUND", StatusCode::NOT_FOUND).await;

    Ok(())
}

#[actix_web::test]
async fn database_rejects_a_second_open_shift() -> Result<(), Box<dyn std::error::Error>> {
    use food_backend::domain::VehicleType;
    use food_backend::errors::domain::{ConflictKind, DomainError};
    use food_backend::repos::shifts;
    use time::OffsetDateTime;

    use crate::support::factory::seed_driver;

    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let user = seed_user(&db, UserRole::Driver).await;
    let driver = seed_driver(&db, user.id, VehicleType::Bike).await;
    let now = OffsetDateTime::now_utc();

    // straight through the repo, skipping the service's active-shift check
    shifts::start(&db, driver.id, now, None, None).await?;
    let err = shifts::start(&db, driver.id, now, None, None)
        .await
        .expect_err("second open shift");
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::ShiftAlreadyActive, _)
    ));

    let closed = shifts::end_active(&db, driver.id, now, None, None).await?;
    assert!(closed.is_some());
    shifts::start(&db, driver.id, now, None, None).await?;

    Ok(())
}
