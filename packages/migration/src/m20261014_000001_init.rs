use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKey, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Users {
    Table,
    Id,
    Email,
    Phone,
    FirstName,
    LastName,
    DateOfBirth,
    Role,
    PasswordHash,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Restaurants {
    Table,
    Id,
    OwnerId,
    Name,
    Phone,
    Email,
    Address,
    Lat,
    Lon,
    CuisineType,
    Description,
    Rating,
    CommissionRate,
    IsApproved,
    ApprovedBy,
    ApprovedAt,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum BusinessHours {
    Table,
    Id,
    RestaurantId,
    DayOfWeek,
    OpenTime,
    CloseTime,
    IsClosed,
}

#[derive(Iden)]
enum MenuItems {
    Table,
    Id,
    RestaurantId,
    Name,
    Description,
    PriceCents,
    Category,
    IsAvailable,
    ImageUrl,
    SalesCount,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum CartItems {
    Table,
    Id,
    UserId,
    MenuItemId,
    Quantity,
}

#[derive(Iden)]
enum Orders {
    Table,
    Id,
    CustomerId,
    RestaurantId,
    OrderType,
    Status,
    CustomerName,
    CustomerPhone,
    CustomerAddress,
    CustomerLat,
    CustomerLon,
    DeliveryNote,
    SubtotalCents,
    ServiceFeeCents,
    DeliveryFeeCents,
    TipCents,
    TotalCents,
    DistanceKm,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum OrderItems {
    Table,
    Id,
    OrderId,
    MenuItemId,
    Name,
    Quantity,
    UnitPriceCents,
    LineTotalCents,
}

#[derive(Iden)]
enum Drivers {
    Table,
    Id,
    UserId,
    VehicleType,
    HourlyRateCents,
    LicensePlate,
    IsAvailable,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Shifts {
    Table,
    Id,
    DriverId,
    StartsAt,
    EndsAt,
    StartLat,
    StartLon,
    EndLat,
    EndLon,
}

#[derive(Iden)]
enum Deliveries {
    Table,
    Id,
    OrderId,
    DriverId,
    AssignedAt,
    PickedAt,
    DeliveredAt,
    DistanceKm,
    DriverEarningCents,
}

#[derive(Iden)]
enum Payments {
    Table,
    Id,
    OrderId,
    Provider,
    Status,
    AmountCents,
    Currency,
    ProviderRef,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Refunds {
    Table,
    Id,
    PaymentId,
    AmountCents,
    Reason,
    CreatedAt,
}

#[derive(Iden)]
enum Geofences {
    Table,
    Id,
    Name,
    Polygon,
    IsActive,
    CreatedAt,
}

fn pk<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .primary_key()
        .auto_increment()
        .to_owned()
}

fn ts<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

fn flag<T: IntoIden>(col: T, default: bool) -> ColumnDef {
    ColumnDef::new(col)
        .boolean()
        .not_null()
        .default(default)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(&mut pk(Users::Id))
                    .col(ColumnDef::new(Users::Email).string().null())
                    .col(ColumnDef::new(Users::Phone).string_len(32).null())
                    .col(ColumnDef::new(Users::FirstName).string().null())
                    .col(ColumnDef::new(Users::LastName).string().null())
                    .col(ColumnDef::new(Users::DateOfBirth).date().null())
                    .col(ColumnDef::new(Users::Role).string_len(32).not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(&mut flag(Users::IsActive, true))
                    .col(&mut ts(Users::CreatedAt))
                    .col(&mut ts(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_users_email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_users_phone")
                    .table(Users::Table)
                    .col(Users::Phone)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // restaurants
        manager
            .create_table(
                Table::create()
                    .table(Restaurants::Table)
                    .if_not_exists()
                    .col(&mut pk(Restaurants::Id))
                    .col(ColumnDef::new(Restaurants::OwnerId).big_integer().not_null())
                    .col(ColumnDef::new(Restaurants::Name).string().not_null())
                    .col(ColumnDef::new(Restaurants::Phone).string_len(32).null())
                    .col(ColumnDef::new(Restaurants::Email).string().null())
                    .col(ColumnDef::new(Restaurants::Address).string().not_null())
                    .col(ColumnDef::new(Restaurants::Lat).double().null())
                    .col(ColumnDef::new(Restaurants::Lon).double().null())
                    .col(ColumnDef::new(Restaurants::CuisineType).string().null())
                    .col(ColumnDef::new(Restaurants::Description).text().null())
                    .col(
                        ColumnDef::new(Restaurants::Rating)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Restaurants::CommissionRate)
                            .double()
                            .not_null()
                            .default(0.12),
                    )
                    .col(&mut flag(Restaurants::IsApproved, false))
                    .col(ColumnDef::new(Restaurants::ApprovedBy).big_integer().null())
                    .col(
                        ColumnDef::new(Restaurants::ApprovedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(&mut flag(Restaurants::IsActive, true))
                    .col(&mut ts(Restaurants::CreatedAt))
                    .col(&mut ts(Restaurants::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_restaurants_owner")
                            .from(Restaurants::Table, Restaurants::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_restaurants_approved_by")
                            .from(Restaurants::Table, Restaurants::ApprovedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_restaurants_owner")
                    .table(Restaurants::Table)
                    .col(Restaurants::OwnerId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // business_hours
        manager
            .create_table(
                Table::create()
                    .table(BusinessHours::Table)
                    .if_not_exists()
                    .col(&mut pk(BusinessHours::Id))
                    .col(
                        ColumnDef::new(BusinessHours::RestaurantId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BusinessHours::DayOfWeek)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BusinessHours::OpenTime).string_len(5).not_null())
                    .col(ColumnDef::new(BusinessHours::CloseTime).string_len(5).not_null())
                    .col(&mut flag(BusinessHours::IsClosed, false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_business_hours_restaurant")
                            .from(BusinessHours::Table, BusinessHours::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_business_hours_restaurant_day")
                    .table(BusinessHours::Table)
                    .col(BusinessHours::RestaurantId)
                    .col(BusinessHours::DayOfWeek)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // menu_items
        manager
            .create_table(
                Table::create()
                    .table(MenuItems::Table)
                    .if_not_exists()
                    .col(&mut pk(MenuItems::Id))
                    .col(ColumnDef::new(MenuItems::RestaurantId).big_integer().not_null())
                    .col(ColumnDef::new(MenuItems::Name).string().not_null())
                    .col(ColumnDef::new(MenuItems::Description).text().null())
                    .col(ColumnDef::new(MenuItems::PriceCents).big_integer().not_null())
                    .col(ColumnDef::new(MenuItems::Category).string().null())
                    .col(&mut flag(MenuItems::IsAvailable, true))
                    .col(ColumnDef::new(MenuItems::ImageUrl).string().null())
                    .col(
                        ColumnDef::new(MenuItems::SalesCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(&mut ts(MenuItems::CreatedAt))
                    .col(&mut ts(MenuItems::UpdatedAt))
                    .col(
                        ColumnDef::new(MenuItems::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_menu_items_restaurant")
                            .from(MenuItems::Table, MenuItems::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_menu_items_restaurant")
                    .table(MenuItems::Table)
                    .col(MenuItems::RestaurantId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // cart_items
        manager
            .create_table(
                Table::create()
                    .table(CartItems::Table)
                    .if_not_exists()
                    .col(&mut pk(CartItems::Id))
                    .col(ColumnDef::new(CartItems::UserId).big_integer().not_null())
                    .col(ColumnDef::new(CartItems::MenuItemId).big_integer().not_null())
                    .col(ColumnDef::new(CartItems::Quantity).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cart_items_user")
                            .from(CartItems::Table, CartItems::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cart_items_menu_item")
                            .from(CartItems::Table, CartItems::MenuItemId)
                            .to(MenuItems::Table, MenuItems::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_cart_items_user_item")
                    .table(CartItems::Table)
                    .col(CartItems::UserId)
                    .col(CartItems::MenuItemId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // orders
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(&mut pk(Orders::Id))
                    .col(ColumnDef::new(Orders::CustomerId).big_integer().not_null())
                    .col(ColumnDef::new(Orders::RestaurantId).big_integer().not_null())
                    .col(ColumnDef::new(Orders::OrderType).string_len(16).not_null())
                    .col(ColumnDef::new(Orders::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Orders::CustomerName).string().null())
                    .col(ColumnDef::new(Orders::CustomerPhone).string_len(32).null())
                    .col(ColumnDef::new(Orders::CustomerAddress).string().null())
                    .col(ColumnDef::new(Orders::CustomerLat).double().null())
                    .col(ColumnDef::new(Orders::CustomerLon).double().null())
                    .col(ColumnDef::new(Orders::DeliveryNote).text().null())
                    .col(ColumnDef::new(Orders::SubtotalCents).big_integer().not_null())
                    .col(ColumnDef::new(Orders::ServiceFeeCents).big_integer().not_null())
                    .col(ColumnDef::new(Orders::DeliveryFeeCents).big_integer().not_null())
                    .col(ColumnDef::new(Orders::TipCents).big_integer().not_null())
                    .col(ColumnDef::new(Orders::TotalCents).big_integer().not_null())
                    .col(ColumnDef::new(Orders::DistanceKm).double().null())
                    .col(&mut ts(Orders::CreatedAt))
                    .col(&mut ts(Orders::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_customer")
                            .from(Orders::Table, Orders::CustomerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_restaurant")
                            .from(Orders::Table, Orders::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_orders_customer")
                    .table(Orders::Table)
                    .col(Orders::CustomerId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_orders_restaurant_status")
                    .table(Orders::Table)
                    .col(Orders::RestaurantId)
                    .col(Orders::Status)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // order_items
        manager
            .create_table(
                Table::create()
                    .table(OrderItems::Table)
                    .if_not_exists()
                    .col(&mut pk(OrderItems::Id))
                    .col(ColumnDef::new(OrderItems::OrderId).big_integer().not_null())
                    .col(ColumnDef::new(OrderItems::MenuItemId).big_integer().not_null())
                    .col(ColumnDef::new(OrderItems::Name).string().not_null())
                    .col(ColumnDef::new(OrderItems::Quantity).integer().not_null())
                    .col(
                        ColumnDef::new(OrderItems::UnitPriceCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrderItems::LineTotalCents)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_items_order")
                            .from(OrderItems::Table, OrderItems::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_items_menu_item")
                            .from(OrderItems::Table, OrderItems::MenuItemId)
                            .to(MenuItems::Table, MenuItems::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_order_items_order")
                    .table(OrderItems::Table)
                    .col(OrderItems::OrderId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // drivers
        manager
            .create_table(
                Table::create()
                    .table(Drivers::Table)
                    .if_not_exists()
                    .col(&mut pk(Drivers::Id))
                    .col(ColumnDef::new(Drivers::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Drivers::VehicleType).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Drivers::HourlyRateCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Drivers::LicensePlate).string_len(32).null())
                    .col(&mut flag(Drivers::IsAvailable, false))
                    .col(&mut flag(Drivers::IsActive, true))
                    .col(&mut ts(Drivers::CreatedAt))
                    .col(&mut ts(Drivers::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_drivers_user")
                            .from(Drivers::Table, Drivers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_drivers_user")
                    .table(Drivers::Table)
                    .col(Drivers::UserId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // shifts
        manager
            .create_table(
                Table::create()
                    .table(Shifts::Table)
                    .if_not_exists()
                    .col(&mut pk(Shifts::Id))
                    .col(ColumnDef::new(Shifts::DriverId).big_integer().not_null())
                    .col(&mut ts(Shifts::StartsAt))
                    .col(
                        ColumnDef::new(Shifts::EndsAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Shifts::StartLat).double().null())
                    .col(ColumnDef::new(Shifts::StartLon).double().null())
                    .col(ColumnDef::new(Shifts::EndLat).double().null())
                    .col(ColumnDef::new(Shifts::EndLon).double().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shifts_driver")
                            .from(Shifts::Table, Shifts::DriverId)
                            .to(Drivers::Table, Drivers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_shifts_driver")
                    .table(Shifts::Table)
                    .col(Shifts::DriverId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // one open shift per driver
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS ux_shifts_driver_open \
                 ON shifts (driver_id) WHERE ends_at IS NULL",
            )
            .await?;

        // deliveries
        manager
            .create_table(
                Table::create()
                    .table(Deliveries::Table)
                    .if_not_exists()
                    .col(&mut pk(Deliveries::Id))
                    .col(ColumnDef::new(Deliveries::OrderId).big_integer().not_null())
                    .col(ColumnDef::new(Deliveries::DriverId).big_integer().not_null())
                    .col(&mut ts(Deliveries::AssignedAt))
                    .col(
                        ColumnDef::new(Deliveries::PickedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Deliveries::DeliveredAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Deliveries::DistanceKm).double().not_null())
                    .col(
                        ColumnDef::new(Deliveries::DriverEarningCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deliveries_order")
                            .from(Deliveries::Table, Deliveries::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deliveries_driver")
                            .from(Deliveries::Table, Deliveries::DriverId)
                            .to(Drivers::Table, Drivers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_deliveries_order")
                    .table(Deliveries::Table)
                    .col(Deliveries::OrderId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_deliveries_driver")
                    .table(Deliveries::Table)
                    .col(Deliveries::DriverId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // payments
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(&mut pk(Payments::Id))
                    .col(ColumnDef::new(Payments::OrderId).big_integer().not_null())
                    .col(ColumnDef::new(Payments::Provider).string_len(16).not_null())
                    .col(ColumnDef::new(Payments::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Payments::AmountCents).big_integer().not_null())
                    .col(ColumnDef::new(Payments::Currency).string_len(3).not_null())
                    .col(ColumnDef::new(Payments::ProviderRef).string().null())
                    .col(&mut ts(Payments::CreatedAt))
                    .col(&mut ts(Payments::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_order")
                            .from(Payments::Table, Payments::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_payments_order")
                    .table(Payments::Table)
                    .col(Payments::OrderId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // refunds
        manager
            .create_table(
                Table::create()
                    .table(Refunds::Table)
                    .if_not_exists()
                    .col(&mut pk(Refunds::Id))
                    .col(ColumnDef::new(Refunds::PaymentId).big_integer().not_null())
                    .col(ColumnDef::new(Refunds::AmountCents).big_integer().not_null())
                    .col(ColumnDef::new(Refunds::Reason).string().null())
                    .col(&mut ts(Refunds::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_refunds_payment")
                            .from(Refunds::Table, Refunds::PaymentId)
                            .to(Payments::Table, Payments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // geofences
        manager
            .create_table(
                Table::create()
                    .table(Geofences::Table)
                    .if_not_exists()
                    .col(&mut pk(Geofences::Id))
                    .col(ColumnDef::new(Geofences::Name).string().not_null())
                    .col(ColumnDef::new(Geofences::Polygon).text().not_null())
                    .col(&mut flag(Geofences::IsActive, true))
                    .col(&mut ts(Geofences::CreatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // children before parents; indexes go with their tables
        manager
            .drop_table(Table::drop().table(Geofences::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Refunds::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Deliveries::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Shifts::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Drivers::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OrderItems::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Orders::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CartItems::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MenuItems::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BusinessHours::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Restaurants::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
