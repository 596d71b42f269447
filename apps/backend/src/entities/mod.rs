pub mod business_hours;
pub mod cart_items;
pub mod cities;
pub mod deliveries;
pub mod drivers;
pub mod geofences;
pub mod menu_items;
pub mod order_items;
pub mod orders;
pub mod payments;
pub mod refunds;
pub mod restaurants;
pub mod roles;
pub mod shift_leads;
pub mod shifts;
pub mod user_roles;
pub mod users;

pub use business_hours::Entity as BusinessHours;
pub use cart_items::Entity as CartItems;
pub use cities::Entity as Cities;
pub use deliveries::Entity as Deliveries;
pub use drivers::Entity as Drivers;
pub use geofences::Entity as Geofences;
pub use menu_items::Entity as MenuItems;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use payments::Entity as Payments;
pub use refunds::Entity as Refunds;
pub use restaurants::Entity as Restaurants;
pub use roles::Entity as Roles;
pub use shift_leads::Entity as ShiftLeads;
pub use shifts::Entity as Shifts;
pub use user_roles::Entity as UserRoles;
pub use users::Entity as Users;
