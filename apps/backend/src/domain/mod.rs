//! Pure domain rules: roles, status workflows and the arithmetic behind
//! pricing, distance checks and payouts. No HTTP or database types here.

pub mod dispatch;
pub mod geo;
pub mod hours;
pub mod order_status;
pub mod payment_status;
pub mod payout;
pub mod pricing;
pub mod roles;
pub mod scopes;

pub use dispatch::VehicleType;
pub use geo::GeoPoint;
pub use order_status::{OrderStatus, OrderType};
pub use payment_status::{PaymentProvider, PaymentStatus};
pub use roles::UserRole;
pub use scopes::{AccessScopes, ScopeType};
