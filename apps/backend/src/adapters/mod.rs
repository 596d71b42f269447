//! SeaORM adapters. Functions here speak `DbErr`; repos translate.

pub mod access_sea;
pub mod cart_sea;
pub mod deliveries_sea;
pub mod drivers_sea;
pub mod geofences_sea;
pub mod menu_items_sea;
pub mod orders_sea;
pub mod payments_sea;
pub mod restaurants_sea;
pub mod shifts_sea;
pub mod users_sea;

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, Condition};

use crate::domain::scopes::ScopeFilter;

/// Rows in one of the scope's cities or restaurants. An empty scope matches
/// nothing.
pub(crate) fn scope_condition<A: ColumnTrait, B: ColumnTrait>(
    scope: &ScopeFilter,
    city_col: A,
    restaurant_col: B,
) -> Condition {
    if scope.is_empty() {
        return Condition::all().add(Expr::cust("1 = 0"));
    }
    let mut any = Condition::any();
    if !scope.city_ids.is_empty() {
        any = any.add(city_col.is_in(scope.city_ids.iter().copied()));
    }
    if !scope.restaurant_ids.is_empty() {
        any = any.add(restaurant_col.is_in(scope.restaurant_ids.iter().copied()));
    }
    any
}
