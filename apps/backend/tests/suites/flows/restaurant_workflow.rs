use actix_web::http::StatusCode;
use backend_test_support::problem_details::assert_problem_details;
use food_backend::domain::UserRole;
use serde_json::{json, Value};

use crate::support::auth::bearer;
use crate::support::factory::{seed_kitchen, seed_user, Kitchen};
use crate::support::http::{delete, get, json_ok, patch, post};
use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn owner_sets_up_restaurant() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let owner = seed_user(&db, UserRole::RestaurantOwner).await;
    let rival = seed_user(&db, UserRole::RestaurantOwner).await;
    let app = create_test_app(state.clone()).await;
    let auth = bearer(owner.id, UserRole::RestaurantOwner, &state.security);
    let rival_auth = bearer(rival.id, UserRole::RestaurantOwner, &state.security);

    let restaurant = json_ok(
        post(
            &app,
            "/api/v1/restaurant/profile",
            &auth,
            json!({
                "name": "  Curry Haus ",
                "address": "Torstrasse 5, Berlin",
                "lat": 52.5290,
                "lon": 13.4010,
                "cuisine_type": "indian",
            }),
        )
        .await,
        201,
    )
    .await;
    let rid = restaurant["id"].as_i64().expect("id");
    assert_eq!(restaurant["name"], "Curry Haus");
    assert_eq!(restaurant["is_approved"], false);
    assert_eq!(restaurant["is_active"], true);
    assert_eq!(restaurant["owner_id"], owner.id);

    let mine = json_ok(get(&app, "/api/v1/restaurant/profile", &auth).await, 200).await;
    assert_eq!(mine.as_array().map(Vec::len), Some(1));

    // other owners cannot see it
    let resp = get(&app, &format!("/api/v1/restaurant/profile/{rid}"), &rival_auth).await;
    assert_problem_details(resp, "RESTAURANT_NOT_FOUND", StatusCode::NOT_FOUND).await;

    let updated = json_ok(
        patch(
            &app,
            &format!("/api/v1/restaurant/profile/{rid}"),
            &auth,
            json!({ "description": "Spicy", "phone": null }),
        )
        .await,
        200,
    )
    .await;
    assert_eq!(updated["description"], "Spicy");
    assert!(updated["phone"].is_null());

    let hours_uri = format!("/api/v1/restaurant/business-hours/restaurant/{rid}");
    let monday = json_ok(
        post(
            &app,
            &hours_uri,
            &auth,
            json!({ "day_of_week": 0, "open_time": "11:00", "close_time": "22:00" }),
        )
        .await,
        201,
    )
    .await;
    assert_eq!(monday["is_closed"], false);

    let resp = post(
        &app,
        &hours_uri,
        &auth,
        json!({ "day_of_week": 0, "open_time": "12:00", "close_time": "20:00" }),
    )
    .await;
    assert_problem_details(resp, "BUSINESS_HOURS_EXISTS", StatusCode::CONFLICT).await;

    let resp = post(
        &app,
        &hours_uri,
        &auth,
        json!({ "day_of_week": 1, "open_time": "22:00", "close_time": "11:00" }),
    )
    .await;
    assert_problem_details(resp, "INVALID_BUSINESS_HOURS", StatusCode::UNPROCESSABLE_ENTITY)
        .await;

    let resp = delete(
        &app,
        &format!("/api/v1/restaurant/business-hours/{}", monday["id"]),
        &rival_auth,
    )
    .await;
    assert_problem_details(resp, "BUSINESS_HOURS_NOT_FOUND", StatusCode::NOT_FOUND).await;

    let resp = delete(
        &app,
        &format!("/api/v1/restaurant/business-hours/{}", monday["id"]),
        &auth,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    Ok(())
}

#[actix_web::test]
async fn owner_manages_menu() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let Kitchen {
        owner, restaurant, ..
    } = seed_kitchen(&db).await;
    let rival = seed_user(&db, UserRole::RestaurantOwner).await;
    let app = create_test_app(state.clone()).await;
    let auth = bearer(owner.id, UserRole::RestaurantOwner, &state.security);
    let rival_auth = bearer(rival.id, UserRole::RestaurantOwner, &state.security);

    let item = json_ok(
        post(
            &app,
            "/api/v1/restaurant/menu",
            &auth,
            json!({ "restaurant_id": restaurant.id, "name": "Diavola", "price_cents": 1150 }),
        )
        .await,
        201,
    )
    .await;
    assert_eq!(item["is_available"], true);

    let resp = post(
        &app,
        "/api/v1/restaurant/menu",
        &auth,
        json!({ "restaurant_id": restaurant.id, "name": "Free", "price_cents": 0 }),
    )
    .await;
    assert_problem_details(resp, "INVALID_PRICE", StatusCode::UNPROCESSABLE_ENTITY).await;

    let resp = post(
        &app,
        "/api/v1/restaurant/menu",
        &rival_auth,
        json!({ "restaurant_id": restaurant.id, "name": "Sabotage", "price_cents": 100 }),
    )
    .await;
    assert_problem_details(resp, "FORBIDDEN", StatusCode::FORBIDDEN).await;

    let item_uri = format!("/api/v1/restaurant/menu/{}", item["id"]);
    let hidden = json_ok(
        patch(&app, &item_uri, &auth, json!({ "is_available": false })).await,
        200,
    )
    .await;
    assert_eq!(hidden["is_available"], false);

    // customers can hide unavailable items
    let customer = seed_user(&db, UserRole::Customer).await;
    let customer_auth = bearer(customer.id, UserRole::Customer, &state.security);
    let public = json_ok(
        get(
            &app,
            &format!(
                "/api/v1/customer/menu/restaurant/{}?available_only=true",
                restaurant.id
            ),
            &customer_auth,
        )
        .await,
        200,
    )
    .await;
    assert!(public
        .as_array()
        .expect("menu")
        .iter()
        .all(|i| i["name"] != "Diavola"));

    let resp = delete(&app, &item_uri, &auth).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let owner_menu = json_ok(
        get(
            &app,
            &format!("/api/v1/restaurant/menu/restaurant/{}", restaurant.id),
            &auth,
        )
        .await,
        200,
    )
    .await;
    assert_eq!(owner_menu.as_array().map(Vec::len), Some(1));

    Ok(())
}

async fn place_pickup(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<actix_web::body::BoxBody>,
        Error = actix_web::Error,
    >,
    auth: &str,
    kitchen: &Kitchen,
    quantity: i32,
) -> Value {
    json_ok(
        post(
            app,
            "/api/v1/customer/orders",
            auth,
            json!({
                "restaurant_id": kitchen.restaurant.id,
                "order_type": "pickup",
                "items": [{ "menu_item_id": kitchen.item.id, "quantity": quantity }],
            }),
        )
        .await,
        201,
    )
    .await
}

#[actix_web::test]
async fn pickup_order_runs_through_kitchen() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let kitchen = seed_kitchen(&db).await;
    let customer = seed_user(&db, UserRole::Customer).await;
    let app = create_test_app(state.clone()).await;
    let auth = bearer(kitchen.owner.id, UserRole::RestaurantOwner, &state.security);
    let customer_auth = bearer(customer.id, UserRole::Customer, &state.security);

    let order = place_pickup(&app, &customer_auth, &kitchen, 2).await;
    let oid = order["id"].as_i64().expect("id");

    // ready before confirm is out of order
    let resp = post(&app, &format!("/api/v1/restaurant/orders/{oid}/ready"), &auth, json!({})).await;
    assert_problem_details(resp, "INVALID_STATUS_TRANSITION", StatusCode::CONFLICT).await;

    for (step, status) in [
        ("confirm", "confirmed"),
        ("preparing", "preparing"),
        ("ready", "ready"),
        ("complete", "delivered"),
    ] {
        let body = json_ok(
            post(&app, &format!("/api/v1/restaurant/orders/{oid}/{step}"), &auth, json!({})).await,
            200,
        )
        .await;
        assert_eq!(body["status"], status, "after {step}");
    }

    let delivered = json_ok(
        get(
            &app,
            &format!(
                "/api/v1/restaurant/orders/restaurant/{}?status=delivered",
                kitchen.restaurant.id
            ),
            &auth,
        )
        .await,
        200,
    )
    .await;
    assert_eq!(delivered.as_array().map(Vec::len), Some(1));

    let second = place_pickup(&app, &customer_auth, &kitchen, 1).await;
    let cancelled = json_ok(
        post(
            &app,
            &format!("/api/v1/restaurant/orders/{}/cancel", second["id"]),
            &auth,
            json!({}),
        )
        .await,
        200,
    )
    .await;
    assert_eq!(cancelled["status"], "cancelled");

    let stats = json_ok(
        get(
            &app,
            &format!("/api/v1/restaurant/analytics/restaurant/{}", kitchen.restaurant.id),
            &auth,
        )
        .await,
        200,
    )
    .await;
    assert_eq!(stats["total_orders"], 2);
    assert_eq!(stats["completed_orders"], 1);
    assert_eq!(stats["cancelled_orders"], 1);
    assert_eq!(stats["revenue_cents"], order["total_cents"]);
    assert_eq!(stats["average_order_value_cents"], order["total_cents"]);

    Ok(())
}

#[actix_web::test]
async fn other_owner_cannot_touch_orders() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let kitchen = seed_kitchen(&db).await;
    let rival = seed_user(&db, UserRole::RestaurantOwner).await;
    let customer = seed_user(&db, UserRole::Customer).await;
    let app = create_test_app(state.clone()).await;
    let rival_auth = bearer(rival.id, UserRole::RestaurantOwner, &state.security);
    let customer_auth = bearer(customer.id, UserRole::Customer, &state.security);

    let order = place_pickup(&app, &customer_auth, &kitchen, 1).await;

    let resp = post(
        &app,
        &format!("/api/v1/restaurant/orders/{}/confirm", order["id"]),
        &rival_auth,
        json!({}),
    )
    .await;
    assert_problem_details(resp, "ORDER_NOT_FOUND", StatusCode::NOT_FOUND).await;

    let resp = get(
        &app,
        &format!("/api/v1/restaurant/analytics/restaurant/{}", kitchen.restaurant.id),
        &rival_auth,
    )
    .await;
    assert_problem_details(resp, "RESTAURANT_NOT_FOUND", StatusCode::NOT_FOUND).await;

    Ok(())
}
