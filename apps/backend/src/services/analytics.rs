//! Restaurant sales analytics.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use utoipa::ToSchema;

use super::restaurants::get_owned;
use crate::domain::pricing::round_cents;
use crate::domain::OrderStatus;
use crate::errors::domain::DomainError;
use crate::repos::orders::{self, OrderStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct RestaurantAnalytics {
    pub total_orders: i64,
    pub completed_orders: i64,
    pub cancelled_orders: i64,
    pub revenue_cents: i64,
    pub average_order_value_cents: i64,
}

impl From<&OrderStats> for RestaurantAnalytics {
    fn from(stats: &OrderStats) -> Self {
        let completed = stats.count(OrderStatus::Delivered);
        Self {
            total_orders: stats.total(),
            completed_orders: completed,
            cancelled_orders: stats.count(OrderStatus::Cancelled),
            revenue_cents: stats.revenue_cents,
            average_order_value_cents: if completed == 0 {
                0
            } else {
                round_cents(stats.revenue_cents as f64 / completed as f64)
            },
        }
    }
}

pub async fn for_restaurant<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner_id: i64,
    restaurant_id: i64,
) -> Result<RestaurantAnalytics, DomainError> {
    get_owned(conn, owner_id, restaurant_id).await?;
    let stats = orders::stats(conn, Some(restaurant_id)).await?;
    Ok(RestaurantAnalytics::from(&stats))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn averages_over_delivered() {
        let stats = OrderStats {
            by_status: HashMap::from([
                (OrderStatus::Delivered, 3),
                (OrderStatus::Cancelled, 1),
                (OrderStatus::Created, 2),
            ]),
            revenue_cents: 1000,
        };
        let a = RestaurantAnalytics::from(&stats);
        assert_eq!(a.total_orders, 6);
        assert_eq!(a.completed_orders, 3);
        assert_eq!(a.cancelled_orders, 1);
        assert_eq!(a.average_order_value_cents, 333);
    }

    #[test]
    fn zero_average_without_sales() {
        let a = RestaurantAnalytics::from(&OrderStats::default());
        assert_eq!(a.total_orders, 0);
        assert_eq!(a.average_order_value_cents, 0);
    }
}
