//! Order lifecycle.
//!
//! ```text
//! created -> confirmed -> preparing -> ready
//! ready -> assigned -> picked_up -> delivered   (delivery)
//! ready -> delivered                            (pickup)
//! created | confirmed | preparing | ready | assigned -> cancelled
//! delivered | cancelled -> refunded
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::domain::{ConflictKind, DomainError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Created,
    Confirmed,
    Preparing,
    Ready,
    Assigned,
    PickedUp,
    Delivered,
    Cancelled,
    Refunded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    Pickup,
    Delivery,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 9] = [
        Self::Created,
        Self::Confirmed,
        Self::Preparing,
        Self::Ready,
        Self::Assigned,
        Self::PickedUp,
        Self::Delivered,
        Self::Cancelled,
        Self::Refunded,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Assigned => "assigned",
            Self::PickedUp => "picked_up",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
        }
    }

    /// Whether the workflow allows `self -> next` for an order of `order_type`.
    pub fn can_transition(self, next: OrderStatus, order_type: OrderType) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (Created, Confirmed) | (Confirmed, Preparing) | (Preparing, Ready) => true,
            (Ready, Assigned) | (Assigned, PickedUp) | (PickedUp, Delivered) => {
                order_type == OrderType::Delivery
            }
            (Ready, Delivered) => order_type == OrderType::Pickup,
            (Created | Confirmed | Preparing | Ready | Assigned, Cancelled) => true,
            (Delivered | Cancelled, Refunded) => true,
            _ => false,
        }
    }

    /// Customers may only withdraw before the kitchen starts.
    pub fn customer_may_cancel(self) -> bool {
        matches!(self, Self::Created | Self::Confirmed)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled | Self::Refunded)
    }

    pub fn ensure_transition(
        self,
        next: OrderStatus,
        order_type: OrderType,
    ) -> Result<(), DomainError> {
        if self.can_transition(next, order_type) {
            Ok(())
        } else {
            Err(DomainError::conflict(
                ConflictKind::InvalidStatusTransition,
                format!("Cannot move order from {self} to {next}"),
            ))
        }
    }
}

impl OrderType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pickup => "pickup",
            Self::Delivery => "delivery",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown order status '{s}'"))
    }
}

impl FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pickup" => Ok(Self::Pickup),
            "delivery" => Ok(Self::Delivery),
            other => Err(format!("unknown order type '{other}'")),
        }
    }
}
