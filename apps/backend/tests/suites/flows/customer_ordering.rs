use actix_web::http::StatusCode;
use backend_test_support::problem_details::assert_problem_details;
use food_backend::domain::UserRole;
use food_backend::AppConfig;
use serde_json::json;

use crate::support::auth::bearer;
use crate::support::factory::{
    seed_kitchen, seed_menu_item, seed_restaurant, seed_user, FAR_LAT, FAR_LON, NEAR_LAT,
    NEAR_LON,
};
use crate::support::http::{delete, get, json_ok, post};
use crate::support::{build_test_state, build_test_state_with, create_test_app};

#[actix_web::test]
async fn browse_only_shows_public_restaurants() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let kitchen = seed_kitchen(&db).await;
    let pending = seed_restaurant(&db, kitchen.owner.id, false).await;
    let customer = seed_user(&db, UserRole::Customer).await;
    let app = create_test_app(state.clone()).await;
    let auth = bearer(customer.id, UserRole::Customer, &state.security);

    let list = json_ok(get(&app, "/api/v1/customer/restaurants?search=PIZZ", &auth).await, 200).await;
    let ids: Vec<i64> = list
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|r| r["id"].as_i64())
        .collect();
    assert!(ids.contains(&kitchen.restaurant.id));
    assert!(!ids.contains(&pending.id));

    let resp = get(&app, &format!("/api/v1/customer/restaurants/{}", pending.id), &auth).await;
    assert_problem_details(resp, "RESTAURANT_NOT_FOUND", StatusCode::NOT_FOUND).await;

    let menu = json_ok(
        get(
            &app,
            &format!("/api/v1/customer/menu/restaurant/{}", kitchen.restaurant.id),
            &auth,
        )
        .await,
        200,
    )
    .await;
    assert_eq!(menu.as_array().map(Vec::len), Some(1));
    assert_eq!(menu[0]["name"], "Margherita");
    assert_eq!(menu[0]["price_cents"], 950);

    Ok(())
}

#[actix_web::test]
async fn cart_stays_with_one_restaurant() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let kitchen = seed_kitchen(&db).await;
    let other = seed_kitchen(&db).await;
    let customer = seed_user(&db, UserRole::Customer).await;
    let app = create_test_app(state.clone()).await;
    let auth = bearer(customer.id, UserRole::Customer, &state.security);

    let cart = json_ok(
        post(
            &app,
            "/api/v1/customer/cart/items",
            &auth,
            json!({ "menu_item_id": kitchen.item.id, "quantity": 2 }),
        )
        .await,
        200,
    )
    .await;
    assert_eq!(cart["restaurant_id"], kitchen.restaurant.id);
    assert_eq!(cart["subtotal_cents"], 1900);
    assert_eq!(cart["items"][0]["line_total_cents"], 1900);

    let resp = post(
        &app,
        "/api/v1/customer/cart/items",
        &auth,
        json!({ "menu_item_id": other.item.id, "quantity": 1 }),
    )
    .await;
    assert_problem_details(resp, "CART_RESTAURANT_MISMATCH", StatusCode::CONFLICT).await;

    let resp = post(
        &app,
        "/api/v1/customer/cart/items",
        &auth,
        json!({ "menu_item_id": kitchen.item.id, "quantity": 0 }),
    )
    .await;
    assert_problem_details(resp, "INVALID_QUANTITY", StatusCode::UNPROCESSABLE_ENTITY).await;

    let resp = delete(
        &app,
        &format!("/api/v1/customer/cart/items/{}", kitchen.item.id),
        &auth,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let cart = json_ok(get(&app, "/api/v1/customer/cart", &auth).await, 200).await;
    assert_eq!(cart["items"].as_array().map(Vec::len), Some(0));
    assert!(cart["restaurant_id"].is_null());

    Ok(())
}

#[actix_web::test]
async fn quote_prices_pickup_without_delivery_fee() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let kitchen = seed_kitchen(&db).await;
    seed_menu_item(&db, kitchen.owner.id, kitchen.restaurant.id, "Tiramisu", 550).await;
    let customer = seed_user(&db, UserRole::Customer).await;
    let app = create_test_app(state.clone()).await;
    let auth = bearer(customer.id, UserRole::Customer, &state.security);

    let quote = json_ok(
        post(
            &app,
            "/api/v1/customer/cart/quote",
            &auth,
            json!({
                "restaurant_id": kitchen.restaurant.id,
                "order_type": "pickup",
                "items": [{ "menu_item_id": kitchen.item.id, "quantity": 2 }],
            }),
        )
        .await,
        200,
    )
    .await;
    assert_eq!(quote["subtotal_cents"], 1900);
    assert_eq!(quote["service_fee_cents"], 190);
    assert_eq!(quote["delivery_fee_cents"], 0);
    assert_eq!(quote["total_cents"], 2090);
    assert!(quote["distance_km"].is_null());

    // the other dish is suggested, the ordered one is not
    let suggested: Vec<&str> = quote["suggestions"]
        .as_array()
        .expect("suggestions")
        .iter()
        .filter_map(|s| s["name"].as_str())
        .collect();
    assert_eq!(suggested, vec!["Tiramisu"]);

    let resp = post(
        &app,
        "/api/v1/customer/cart/quote",
        &auth,
        json!({ "restaurant_id": kitchen.restaurant.id, "order_type": "pickup", "items": [] }),
    )
    .await;
    assert_problem_details(resp, "EMPTY_ORDER", StatusCode::UNPROCESSABLE_ENTITY).await;

    Ok(())
}

#[actix_web::test]
async fn delivery_order_is_priced_and_clears_cart() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let kitchen = seed_kitchen(&db).await;
    let customer = seed_user(&db, UserRole::Customer).await;
    let app = create_test_app(state.clone()).await;
    let auth = bearer(customer.id, UserRole::Customer, &state.security);

    json_ok(
        post(
            &app,
            "/api/v1/customer/cart/items",
            &auth,
            json!({ "menu_item_id": kitchen.item.id, "quantity": 2 }),
        )
        .await,
        200,
    )
    .await;

    let order = json_ok(
        post(
            &app,
            "/api/v1/customer/orders",
            &auth,
            json!({
                "restaurant_id": kitchen.restaurant.id,
                "order_type": "delivery",
                "items": [{ "menu_item_id": kitchen.item.id, "quantity": 2 }],
                "customer_address": "Prenzlauer Allee 10",
                "customer_lat": NEAR_LAT,
                "customer_lon": NEAR_LON,
                "tip_cents": 100,
                "pay_with": "card",
            }),
        )
        .await,
        201,
    )
    .await;

    assert_eq!(order["status"], "created");
    assert_eq!(order["order_type"], "delivery");
    assert_eq!(order["subtotal_cents"], 1900);
    assert_eq!(order["service_fee_cents"], 190);
    let km = order["distance_km"].as_f64().expect("distance");
    assert!((1.0..1.3).contains(&km), "distance {km}");
    let delivery_fee = order["delivery_fee_cents"].as_i64().expect("fee");
    assert_eq!(delivery_fee, 200 + (km * 60.0).round() as i64);
    assert_eq!(order["tip_cents"], 100);
    assert_eq!(
        order["total_cents"].as_i64(),
        Some(1900 + 190 + delivery_fee + 100)
    );
    assert_eq!(order["items"][0]["name"], "Margherita");

    let cart = json_ok(get(&app, "/api/v1/customer/cart", &auth).await, 200).await;
    assert_eq!(cart["items"].as_array().map(Vec::len), Some(0));

    // pay_with already created the payment
    let resp = post(
        &app,
        &format!("/api/v1/customer/orders/{}/payment", order["id"]),
        &auth,
        json!({ "provider": "paypal" }),
    )
    .await;
    assert_problem_details(resp, "PAYMENT_EXISTS", StatusCode::CONFLICT).await;

    let mine = json_ok(get(&app, "/api/v1/customer/orders", &auth).await, 200).await;
    assert_eq!(mine.as_array().map(Vec::len), Some(1));

    Ok(())
}

#[actix_web::test]
async fn delivery_order_rejections() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let kitchen = seed_kitchen(&db).await;
    let pending = seed_restaurant(&db, kitchen.owner.id, false).await;
    let pending_item = seed_menu_item(&db, kitchen.owner.id, pending.id, "Calzone", 1100).await;
    let customer = seed_user(&db, UserRole::Customer).await;
    let app = create_test_app(state.clone()).await;
    let auth = bearer(customer.id, UserRole::Customer, &state.security);

    let resp = post(
        &app,
        "/api/v1/customer/orders",
        &auth,
        json!({
            "restaurant_id": kitchen.restaurant.id,
            "order_type": "delivery",
            "items": [{ "menu_item_id": kitchen.item.id, "quantity": 1 }],
            "customer_lat": FAR_LAT,
            "customer_lon": FAR_LON,
        }),
    )
    .await;
    assert_problem_details(resp, "DISTANCE_EXCEEDED", StatusCode::UNPROCESSABLE_ENTITY).await;

    let resp = post(
        &app,
        "/api/v1/customer/orders",
        &auth,
        json!({
            "restaurant_id": kitchen.restaurant.id,
            "order_type": "delivery",
            "items": [{ "menu_item_id": kitchen.item.id, "quantity": 1 }],
            "customer_lat": 95.0,
            "customer_lon": NEAR_LON,
        }),
    )
    .await;
    assert_problem_details(resp, "INVALID_COORDINATES", StatusCode::UNPROCESSABLE_ENTITY).await;

    let resp = post(
        &app,
        "/api/v1/customer/orders",
        &auth,
        json!({
            "restaurant_id": pending.id,
            "order_type": "pickup",
            "items": [{ "menu_item_id": pending_item.id, "quantity": 1 }],
        }),
    )
    .await;
    assert_problem_details(resp, "RESTAURANT_NOT_FOUND", StatusCode::NOT_FOUND).await;

    // item from another restaurant
    let resp = post(
        &app,
        "/api/v1/customer/orders",
        &auth,
        json!({
            "restaurant_id": kitchen.restaurant.id,
            "order_type": "pickup",
            "items": [{ "menu_item_id": pending_item.id, "quantity": 1 }],
        }),
    )
    .await;
    assert_problem_details(resp, "MENU_ITEM_UNAVAILABLE", StatusCode::UNPROCESSABLE_ENTITY).await;

    let mine = json_ok(get(&app, "/api/v1/customer/orders", &auth).await, 200).await;
    assert_eq!(mine.as_array().map(Vec::len), Some(0));

    Ok(())
}

#[actix_web::test]
async fn customer_cancels_before_kitchen_starts() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let kitchen = seed_kitchen(&db).await;
    let customer = seed_user(&db, UserRole::Customer).await;
    let stranger = seed_user(&db, UserRole::Customer).await;
    let app = create_test_app(state.clone()).await;
    let auth = bearer(customer.id, UserRole::Customer, &state.security);
    let owner_auth = bearer(kitchen.owner.id, UserRole::RestaurantOwner, &state.security);

    let place = || {
        post(
            &app,
            "/api/v1/customer/orders",
            &auth,
            json!({
                "restaurant_id": kitchen.restaurant.id,
                "order_type": "pickup",
                "items": [{ "menu_item_id": kitchen.item.id, "quantity": 1 }],
            }),
        )
    };

    let first = json_ok(place().await, 201).await;
    let cancelled = json_ok(
        post(
            &app,
            &format!("/api/v1/customer/orders/{}/cancel", first["id"]),
            &auth,
            json!({}),
        )
        .await,
        200,
    )
    .await;
    assert_eq!(cancelled["status"], "cancelled");

    // orders belong to their customer
    let resp = get(
        &app,
        &format!("/api/v1/customer/orders/{}", first["id"]),
        &bearer(stranger.id, UserRole::Customer, &state.security),
    )
    .await;
    assert_problem_details(resp, "ORDER_NOT_FOUND", StatusCode::NOT_FOUND).await;

    let second = json_ok(place().await, 201).await;
    for step in ["confirm", "preparing"] {
        json_ok(
            post(
                &app,
                &format!("/api/v1/restaurant/orders/{}/{step}", second["id"]),
                &owner_auth,
                json!({}),
            )
            .await,
            200,
        )
        .await;
    }
    let resp = post(
        &app,
        &format!("/api/v1/customer/orders/{}/cancel", second["id"]),
        &auth,
        json!({}),
    )
    .await;
    assert_problem_details(resp, "INVALID_STATUS_TRANSITION", StatusCode::CONFLICT).await;

    Ok(())
}

#[actix_web::test]
async fn payments_switched_off() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state_with(AppConfig {
        payment_enabled: false,
        ..AppConfig::default()
    })
    .await?;
    let db = state.db().expect("test db").clone();
    let kitchen = seed_kitchen(&db).await;
    let customer = seed_user(&db, UserRole::Customer).await;
    let app = create_test_app(state.clone()).await;
    let auth = bearer(customer.id, UserRole::Customer, &state.security);

    let pickup = json!({
        "restaurant_id": kitchen.restaurant.id,
        "order_type": "pickup",
        "items": [{ "menu_item_id": kitchen.item.id, "quantity": 1 }],
    });

    let order = json_ok(post(&app, "/api/v1/customer/orders", &auth, pickup.clone()).await, 201).await;
    let resp = post(
        &app,
        &format!("/api/v1/customer/orders/{}/payment", order["id"]),
        &auth,
        json!({ "provider": "card" }),
    )
    .await;
    assert_problem_details(resp, "PAYMENTS_DISABLED", StatusCode::UNPROCESSABLE_ENTITY).await;

    // pay_with fails the whole placement
    let mut paid = pickup;
    paid["pay_with"] = json!("card");
    let resp = post(&app, "/api/v1/customer/orders", &auth, paid).await;
    assert_problem_details(resp, "PAYMENTS_DISABLED", StatusCode::UNPROCESSABLE_ENTITY).await;

    let mine = json_ok(get(&app, "/api/v1/customer/orders", &auth).await, 200).await;
    assert_eq!(mine.as_array().map(Vec::len), Some(1));

    Ok(())
}
