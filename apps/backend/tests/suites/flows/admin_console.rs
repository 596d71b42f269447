use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use backend_test_support::problem_details::assert_problem_details;
use food_backend::domain::UserRole;
use serde_json::{json, Value};

use crate::support::auth::bearer;
use crate::support::factory::{
    seed_kitchen, seed_restaurant, seed_user, Kitchen, MID_LAT, MID_LON, NEAR_LAT, NEAR_LON,
};
use crate::support::http::{get, json_ok, patch, post};
use crate::support::{build_test_state, create_test_app};

async fn place_order<S>(app: &S, auth: &str, kitchen: &Kitchen, body: Value) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let mut body = body;
    body["restaurant_id"] = json!(kitchen.restaurant.id);
    body["items"] = json!([{ "menu_item_id": kitchen.item.id, "quantity": 1 }]);
    post(app, "/api/v1/customer/orders", auth, body).await
}

#[actix_web::test]
async fn approval_controls_visibility() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let owner = seed_user(&db, UserRole::RestaurantOwner).await;
    let restaurant = seed_restaurant(&db, owner.id, false).await;
    let admin = seed_user(&db, UserRole::Admin).await;
    let customer = seed_user(&db, UserRole::Customer).await;
    let app = create_test_app(state.clone()).await;
    let auth = bearer(admin.id, UserRole::Admin, &state.security);
    let customer_auth = bearer(customer.id, UserRole::Customer, &state.security);
    let public_uri = format!("/api/v1/customer/restaurants/{}", restaurant.id);

    let count = json_ok(
        get(&app, "/api/v1/admin/restaurants/pending-approval/count", &auth).await,
        200,
    )
    .await;
    assert_eq!(count["count"], 1);

    let pending = json_ok(get(&app, "/api/v1/admin/restaurants?approved=false", &auth).await, 200).await;
    assert_eq!(pending[0]["id"], restaurant.id);

    let resp = get(&app, &public_uri, &customer_auth).await;
    assert_problem_details(resp, "RESTAURANT_NOT_FOUND", StatusCode::NOT_FOUND).await;

    let approved = json_ok(
        post(
            &app,
            &format!("/api/v1/admin/restaurants/{}/approve", restaurant.id),
            &auth,
            json!({}),
        )
        .await,
        200,
    )
    .await;
    assert_eq!(approved["is_approved"], true);
    assert_eq!(approved["approved_by"], admin.id);
    assert!(approved["approved_at"].is_string());

    json_ok(get(&app, &public_uri, &customer_auth).await, 200).await;

    let toggled = json_ok(
        patch(
            &app,
            &format!("/api/v1/admin/restaurants/{}/toggle-active", restaurant.id),
            &auth,
            json!({}),
        )
        .await,
        200,
    )
    .await;
    assert_eq!(toggled["is_active"], false);

    let resp = get(&app, &public_uri, &customer_auth).await;
    assert_problem_details(resp, "RESTAURANT_NOT_FOUND", StatusCode::NOT_FOUND).await;

    let count = json_ok(
        get(&app, "/api/v1/admin/restaurants/pending-approval/count", &auth).await,
        200,
    )
    .await;
    assert_eq!(count["count"], 0);

    Ok(())
}

#[actix_web::test]
async fn payment_capture_and_refund() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let kitchen = seed_kitchen(&db).await;
    let admin = seed_user(&db, UserRole::Admin).await;
    let customer = seed_user(&db, UserRole::Customer).await;
    let app = create_test_app(state.clone()).await;
    let auth = bearer(admin.id, UserRole::Admin, &state.security);
    let customer_auth = bearer(customer.id, UserRole::Customer, &state.security);
    let owner_auth = bearer(kitchen.owner.id, UserRole::RestaurantOwner, &state.security);

    let order = json_ok(
        place_order(&app, &customer_auth, &kitchen, json!({ "order_type": "pickup" })).await,
        201,
    )
    .await;
    let oid = order["id"].as_i64().expect("id");
    let refund_uri = format!("/api/v1/admin/orders/{oid}/refund");

    let payment = json_ok(
        post(
            &app,
            &format!("/api/v1/customer/orders/{oid}/payment"),
            &customer_auth,
            json!({ "provider": "card" }),
        )
        .await,
        201,
    )
    .await;
    assert_eq!(payment["status"], "pending");
    assert_eq!(payment["amount_cents"], order["total_cents"]);
    let pid = payment["id"].as_i64().expect("id");

    // order still open
    let resp = post(&app, &refund_uri, &auth, json!({})).await;
    assert_problem_details(resp, "INVALID_STATUS_TRANSITION", StatusCode::CONFLICT).await;

    for step in ["confirm", "preparing", "ready", "complete"] {
        json_ok(
            post(&app, &format!("/api/v1/restaurant/orders/{oid}/{step}"), &owner_auth, json!({})).await,
            200,
        )
        .await;
    }

    let resp = post(&app, &refund_uri, &auth, json!({})).await;
    assert_problem_details(resp, "PAYMENT_NOT_CAPTURED", StatusCode::CONFLICT).await;

    let authorized = json_ok(
        post(&app, &format!("/api/v1/admin/payments/{pid}/authorize"), &auth, json!({})).await,
        200,
    )
    .await;
    assert_eq!(authorized["status"], "authorized");
    let captured = json_ok(
        post(&app, &format!("/api/v1/admin/payments/{pid}/capture"), &auth, json!({})).await,
        200,
    )
    .await;
    assert_eq!(captured["status"], "captured");

    let resp = post(&app, &format!("/api/v1/admin/payments/{pid}/fail"), &auth, json!({})).await;
    assert_problem_details(resp, "INVALID_STATUS_TRANSITION", StatusCode::CONFLICT).await;

    let too_much = order["total_cents"].as_i64().expect("total") + 1;
    let resp = post(&app, &refund_uri, &auth, json!({ "amount_cents": too_much })).await;
    assert_problem_details(resp, "INVALID_REFUND_AMOUNT", StatusCode::UNPROCESSABLE_ENTITY).await;

    let outcome = json_ok(
        post(&app, &refund_uri, &auth, json!({ "reason": "cold pizza" })).await,
        200,
    )
    .await;
    assert_eq!(outcome["order"]["status"], "refunded");
    assert_eq!(outcome["payment"]["status"], "refunded");
    assert_eq!(outcome["refund"]["amount_cents"], order["total_cents"]);
    assert_eq!(outcome["refund"]["reason"], "cold pizza");

    let resp = post(&app, &refund_uri, &auth, json!({})).await;
    assert_problem_details(resp, "ALREADY_REFUNDED", StatusCode::CONFLICT).await;

    let detail = json_ok(get(&app, &format!("/api/v1/admin/payments/{pid}"), &auth).await, 200).await;
    assert_eq!(detail["status"], "refunded");
    assert_eq!(detail["refunds"].as_array().map(Vec::len), Some(1));

    let summary = json_ok(get(&app, "/api/v1/admin/orders/stats/summary", &auth).await, 200).await;
    assert_eq!(summary["total"], 1);
    assert_eq!(summary["by_status"]["refunded"], 1);

    let refunded = json_ok(get(&app, "/api/v1/admin/orders?status=refunded", &auth).await, 200).await;
    assert_eq!(refunded.as_array().map(Vec::len), Some(1));

    let resp = get(&app, "/api/v1/admin/payments/999999", &auth).await;
    assert_problem_details(resp, "PAYMENT_NOT_FOUND", StatusCode::NOT_FOUND).await;

    Ok(())
}

#[actix_web::test]
async fn geofences_limit_the_service_area() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let kitchen = seed_kitchen(&db).await;
    let admin = seed_user(&db, UserRole::Admin).await;
    let customer = seed_user(&db, UserRole::Customer).await;
    let app = create_test_app(state.clone()).await;
    let auth = bearer(admin.id, UserRole::Admin, &state.security);
    let customer_auth = bearer(customer.id, UserRole::Customer, &state.security);

    let resp = post(
        &app,
        "/api/v1/admin/geofences",
        &auth,
        json!({ "name": "Line", "polygon": [[52.5, 13.3], [52.6, 13.5]] }),
    )
    .await;
    assert_problem_details(resp, "INVALID_COORDINATES", StatusCode::UNPROCESSABLE_ENTITY).await;

    // box around Mitte, excluding the mid-range point further north
    let fence = json_ok(
        post(
            &app,
            "/api/v1/admin/geofences",
            &auth,
            json!({
                "name": "Mitte",
                "polygon": [[52.50, 13.38], [52.50, 13.44], [52.56, 13.44], [52.56, 13.38]],
            }),
        )
        .await,
        201,
    )
    .await;
    assert_eq!(fence["is_active"], true);
    assert_eq!(fence["polygon"].as_array().map(Vec::len), Some(4));

    let near = json!({ "order_type": "delivery", "customer_lat": NEAR_LAT, "customer_lon": NEAR_LON });
    let mid = json!({ "order_type": "delivery", "customer_lat": MID_LAT, "customer_lon": MID_LON });

    json_ok(place_order(&app, &customer_auth, &kitchen, near).await, 201).await;

    let resp = place_order(&app, &customer_auth, &kitchen, mid.clone()).await;
    assert_problem_details(resp, "OUTSIDE_SERVICE_AREA", StatusCode::UNPROCESSABLE_ENTITY).await;

    let toggled = json_ok(
        patch(
            &app,
            &format!("/api/v1/admin/geofences/{}/toggle-active", fence["id"]),
            &auth,
            json!({}),
        )
        .await,
        200,
    )
    .await;
    assert_eq!(toggled["is_active"], false);

    // no active fence serves everywhere
    json_ok(place_order(&app, &customer_auth, &kitchen, mid).await, 201).await;

    let fences = json_ok(get(&app, "/api/v1/admin/geofences", &auth).await, 200).await;
    assert_eq!(fences.as_array().map(Vec::len), Some(1));

    Ok(())
}

#[actix_web::test]
async fn eligible_drivers_by_vehicle_range() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let admin = seed_user(&db, UserRole::Admin).await;
    let biker = seed_user(&db, UserRole::Driver).await;
    let motorist = seed_user(&db, UserRole::Driver).await;
    let app = create_test_app(state.clone()).await;
    let auth = bearer(admin.id, UserRole::Admin, &state.security);

    let mut driver_ids = Vec::new();
    for (user, vehicle) in [(&biker, "bike"), (&motorist, "car")] {
        let rider_auth = bearer(user.id, UserRole::Driver, &state.security);
        let driver = json_ok(
            post(&app, "/api/v1/rider/profile", &rider_auth, json!({ "vehicle_type": vehicle })).await,
            201,
        )
        .await;
        json_ok(post(&app, "/api/v1/rider/shifts/start", &rider_auth, json!({})).await, 201).await;
        driver_ids.push(driver["id"].as_i64().expect("id"));
    }
    let (bike_id, car_id) = (driver_ids[0], driver_ids[1]);

    let ids = |body: &Value| -> Vec<i64> {
        body.as_array()
            .expect("drivers")
            .iter()
            .filter_map(|d| d["id"].as_i64())
            .collect()
    };

    let short = json_ok(get(&app, "/api/v1/admin/drivers/eligible?distance_km=5", &auth).await, 200).await;
    assert_eq!(ids(&short), vec![bike_id, car_id]);

    let long = json_ok(get(&app, "/api/v1/admin/drivers/eligible?distance_km=12", &auth).await, 200).await;
    assert_eq!(ids(&long), vec![car_id]);

    let too_far = json_ok(get(&app, "/api/v1/admin/drivers/eligible?distance_km=20", &auth).await, 200).await;
    assert!(ids(&too_far).is_empty());

    let suspended = json_ok(
        patch(
            &app,
            &format!("/api/v1/admin/drivers/{car_id}"),
            &auth,
            json!({ "is_active": false }),
        )
        .await,
        200,
    )
    .await;
    assert_eq!(suspended["is_active"], false);

    let long = json_ok(get(&app, "/api/v1/admin/drivers/eligible?distance_km=12", &auth).await, 200).await;
    assert!(ids(&long).is_empty());

    let resp = patch(
        &app,
        &format!("/api/v1/admin/drivers/{bike_id}"),
        &auth,
        json!({ "hourly_rate_cents": -1 }),
    )
    .await;
    assert_problem_details(resp, "INVALID_PRICE", StatusCode::UNPROCESSABLE_ENTITY).await;

    Ok(())
}
