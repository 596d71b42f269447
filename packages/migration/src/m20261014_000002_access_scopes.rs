use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::prelude::TimeDateTimeWithTimeZone;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKey, ForeignKeyAction, Index, Query, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Restaurants {
    Table,
    Id,
    CityId,
}

#[derive(Iden)]
enum Orders {
    Table,
    CityId,
}

#[derive(Iden)]
enum Cities {
    Table,
    Id,
    Name,
    Code,
    Country,
    Timezone,
    IsActive,
    CreatedAt,
}

#[derive(Iden)]
enum Roles {
    Table,
    Id,
    Code,
    Name,
    Description,
    ScopeType,
    IsActive,
    CreatedAt,
}

#[derive(Iden)]
enum UserRoles {
    Table,
    Id,
    UserId,
    RoleId,
    CityId,
    RestaurantId,
    IsActive,
    AssignedBy,
    AssignedAt,
    RevokedAt,
    Notes,
}

#[derive(Iden)]
enum ShiftLeads {
    Table,
    Id,
    UserId,
    CityId,
    MinHoursPerShift,
    MaxHoursPerShift,
    MinHoursPerWeek,
    MaxHoursPerWeek,
    IsActive,
    CreatedAt,
}

/// `(code, name, scope_type)` for the roles every deployment starts with.
const SYSTEM_ROLES: &[(&str, &str, &str)] = &[
    ("super_admin", "Super Admin", "global"),
    ("city_admin", "City Admin", "city"),
    ("shift_lead", "Shift Lead", "city"),
    ("dispatcher", "Dispatcher", "city"),
    ("support", "Support", "city"),
    ("restaurant_admin", "Restaurant Admin", "restaurant"),
];

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

fn hours<T: IntoIden>(col: T, default: i32) -> ColumnDef {
    ColumnDef::new(col)
        .integer()
        .not_null()
        .default(default)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // cities
        manager
            .create_table(
                Table::create()
                    .table(Cities::Table)
                    .if_not_exists()
                    .col(&mut pk(Cities::Id))
                    .col(ColumnDef::new(Cities::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Cities::Code).string_len(16).not_null())
                    .col(ColumnDef::new(Cities::Country).string_len(100).not_null())
                    .col(ColumnDef::new(Cities::Timezone).string_len(64).not_null())
                    .col(&mut flag(Cities::IsActive, true))
                    .col(&mut ts(Cities::CreatedAt))
                    .to_owned(),
            )
            .await?;

        for (name, col) in [("ux_cities_name", Cities::Name), ("ux_cities_code", Cities::Code)] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Cities::Table)
                        .col(col)
                        .unique()
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }

        // roles
        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(&mut pk(Roles::Id))
                    .col(ColumnDef::new(Roles::Code).string_len(50).not_null())
                    .col(ColumnDef::new(Roles::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Roles::Description).text().null())
                    .col(ColumnDef::new(Roles::ScopeType).string_len(16).not_null())
                    .col(&mut flag(Roles::IsActive, true))
                    .col(&mut ts(Roles::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_roles_code")
                    .table(Roles::Table)
                    .col(Roles::Code)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        let now = TimeDateTimeWithTimeZone::now_utc();
        let mut seed = Query::insert()
            .into_table(Roles::Table)
            .columns([Roles::Code, Roles::Name, Roles::ScopeType, Roles::IsActive, Roles::CreatedAt])
            .to_owned();
        for (code, name, scope_type) in SYSTEM_ROLES {
            seed.values([
                (*code).into(),
                (*name).into(),
                (*scope_type).into(),
                true.into(),
                now.into(),
            ])
            .map_err(|e| DbErr::Migration(format!("seed roles: {e}")))?;
        }
        manager.exec_stmt(seed).await?;

        // user_roles
        manager
            .create_table(
                Table::create()
                    .table(UserRoles::Table)
                    .if_not_exists()
                    .col(&mut pk(UserRoles::Id))
                    .col(ColumnDef::new(UserRoles::UserId).big_integer().not_null())
                    .col(ColumnDef::new(UserRoles::RoleId).big_integer().not_null())
                    .col(ColumnDef::new(UserRoles::CityId).big_integer().null())
                    .col(ColumnDef::new(UserRoles::RestaurantId).big_integer().null())
                    .col(&mut flag(UserRoles::IsActive, true))
                    .col(ColumnDef::new(UserRoles::AssignedBy).big_integer().null())
                    .col(&mut ts(UserRoles::AssignedAt))
                    .col(
                        ColumnDef::new(UserRoles::RevokedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(UserRoles::Notes).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_roles_user")
                            .from(UserRoles::Table, UserRoles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_roles_role")
                            .from(UserRoles::Table, UserRoles::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_roles_city")
                            .from(UserRoles::Table, UserRoles::CityId)
                            .to(Cities::Table, Cities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_roles_restaurant")
                            .from(UserRoles::Table, UserRoles::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_user_roles_user")
                    .table(UserRoles::Table)
                    .col(UserRoles::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // shift_leads
        manager
            .create_table(
                Table::create()
                    .table(ShiftLeads::Table)
                    .if_not_exists()
                    .col(&mut pk(ShiftLeads::Id))
                    .col(ColumnDef::new(ShiftLeads::UserId).big_integer().not_null())
                    .col(ColumnDef::new(ShiftLeads::CityId).big_integer().not_null())
                    .col(&mut hours(ShiftLeads::MinHoursPerShift, 4))
                    .col(&mut hours(ShiftLeads::MaxHoursPerShift, 12))
                    .col(&mut hours(ShiftLeads::MinHoursPerWeek, 20))
                    .col(&mut hours(ShiftLeads::MaxHoursPerWeek, 60))
                    .col(&mut flag(ShiftLeads::IsActive, true))
                    .col(&mut ts(ShiftLeads::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shift_leads_user")
                            .from(ShiftLeads::Table, ShiftLeads::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shift_leads_city")
                            .from(ShiftLeads::Table, ShiftLeads::CityId)
                            .to(Cities::Table, Cities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_shift_leads_user_city")
                    .table(ShiftLeads::Table)
                    .col(ShiftLeads::UserId)
                    .col(ShiftLeads::CityId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // city columns; SQLite cannot add a foreign key through ALTER TABLE
        manager
            .alter_table(
                Table::alter()
                    .table(Restaurants::Table)
                    .add_column(ColumnDef::new(Restaurants::CityId).big_integer().null())
                    .to_owned(),
            )
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(Orders::Table)
                    .add_column(ColumnDef::new(Orders::CityId).big_integer().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_restaurants_city")
                    .table(Restaurants::Table)
                    .col(Restaurants::CityId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("ix_orders_city")
                    .table(Orders::Table)
                    .col(Orders::CityId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("ix_orders_city").table(Orders::Table).to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("ix_restaurants_city")
                    .table(Restaurants::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .alter_table(Table::alter().table(Orders::Table).drop_column(Orders::CityId).to_owned())
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(Restaurants::Table)
                    .drop_column(Restaurants::CityId)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(ShiftLeads::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserRoles::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Roles::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cities::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
