pub mod current_user;
pub mod require_role;
pub mod validated_json;

pub use current_user::CurrentUser;
pub use require_role::{Admin, Customer, Driver, RequireRole, RestaurantOwner};
pub use validated_json::ValidatedJson;
