pub mod access_scopes;
pub mod admin_console;
pub mod customer_ordering;
pub mod restaurant_workflow;
pub mod rider_delivery;
