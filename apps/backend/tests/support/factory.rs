//! Seed rows directly through repos and services, bypassing HTTP.

use backend_test_support::unique_helpers::unique_email;
use food_backend::domain::{UserRole, VehicleType};
use food_backend::repos::access::{self, City};
use food_backend::repos::drivers::Driver;
use food_backend::repos::menu::{MenuItem, MenuItemCreate};
use food_backend::repos::restaurants::{self as restaurants_repo, Restaurant, RestaurantUpdate};
use food_backend::repos::users::{self, User, UserCreate};
use food_backend::services::restaurants::{self as restaurant_service, NewRestaurant};
use food_backend::services::{drivers as driver_service, menu as menu_service};
use sea_orm::DatabaseConnection;

/// Alexanderplatz, Berlin
pub const RESTAURANT_LAT: f64 = 52.5219;
pub const RESTAURANT_LON: f64 = 13.4132;

/// About 1.1 km north of the restaurant
pub const NEAR_LAT: f64 = 52.5319;
pub const NEAR_LON: f64 = 13.4132;

/// About 12 km north, too far for a bike but fine for a car
pub const MID_LAT: f64 = 52.6299;
pub const MID_LON: f64 = 13.4132;

/// About 22 km north, beyond every vehicle's range
pub const FAR_LAT: f64 = 52.7219;
pub const FAR_LON: f64 = 13.4132;

/// Users seeded here never log in with a password; tests mint tokens.
pub async fn seed_user(db: &DatabaseConnection, role: UserRole) -> User {
    users::create_user(
        db,
        UserCreate {
            email: Some(unique_email(role.as_str())),
            phone: None,
            first_name: Some("Test".to_string()),
            last_name: Some(role.as_str().to_string()),
            role: role.as_str().to_string(),
            password_hash: "not-a-real-hash".to_string(),
        },
    )
    .await
    .expect("seed user")
}

/// An active restaurant at the Berlin test location, approved by a fresh
/// admin when `approved` is set.
pub async fn seed_restaurant(db: &DatabaseConnection, owner_id: i64, approved: bool) -> Restaurant {
    let restaurant = restaurant_service::create(
        db,
        owner_id,
        NewRestaurant {
            name: "Pizzeria Test".to_string(),
            address: "Alexanderplatz 1, Berlin".to_string(),
            lat: Some(RESTAURANT_LAT),
            lon: Some(RESTAURANT_LON),
            cuisine_type: Some("italian".to_string()),
            ..Default::default()
        },
        0.12,
    )
    .await
    .expect("seed restaurant");

    if !approved {
        return restaurant;
    }
    let admin = seed_user(db, UserRole::Admin).await;
    restaurant_service::approve(db, admin.id, restaurant.id)
        .await
        .expect("approve restaurant")
}

pub async fn seed_menu_item(
    db: &DatabaseConnection,
    owner_id: i64,
    restaurant_id: i64,
    name: &str,
    price_cents: i64,
) -> MenuItem {
    menu_service::create(
        db,
        owner_id,
        MenuItemCreate {
            restaurant_id,
            name: name.to_string(),
            description: None,
            price_cents,
            category: Some("mains".to_string()),
            is_available: true,
            image_url: None,
        },
    )
    .await
    .expect("seed menu item")
}

pub async fn seed_driver(db: &DatabaseConnection, user_id: i64, vehicle: VehicleType) -> Driver {
    driver_service::create_profile(db, user_id, vehicle, Some("B-TS 123".to_string()))
        .await
        .expect("seed driver")
}

/// Owner, approved restaurant and one menu item priced at 950.
pub struct Kitchen {
    pub owner: User,
    pub restaurant: Restaurant,
    pub item: MenuItem,
}

pub async fn seed_kitchen(db: &DatabaseConnection) -> Kitchen {
    let owner = seed_user(db, UserRole::RestaurantOwner).await;
    let restaurant = seed_restaurant(db, owner.id, true).await;
    let item = seed_menu_item(db, owner.id, restaurant.id, "Margherita", 950).await;
    Kitchen {
        owner,
        restaurant,
        item,
    }
}

pub async fn seed_city(db: &DatabaseConnection, name: &str, code: &str) -> City {
    access::create_city(
        db,
        name.to_string(),
        code.to_string(),
        "Germany".to_string(),
        "Europe/Berlin".to_string(),
    )
    .await
    .expect("seed city")
}

/// Approved kitchen whose restaurant sits in `city_id`.
pub async fn seed_kitchen_in(db: &DatabaseConnection, city_id: i64) -> Kitchen {
    let mut kitchen = seed_kitchen(db).await;
    kitchen.restaurant = restaurants_repo::update(
        db,
        kitchen.restaurant.id,
        RestaurantUpdate {
            city_id: Some(Some(city_id)),
            ..Default::default()
        },
    )
    .await
    .expect("move restaurant")
    .expect("restaurant exists");
    kitchen
}
