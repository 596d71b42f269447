//! Role guards layered on [`CurrentUser`].
//!
//! ```ignore
//! async fn handler(user: RequireRole<Driver>) -> Result<HttpResponse, AppError> {
//!     let driver_user_id = user.id;
//!     // ...
//! }
//! ```

use std::future::Future;
use std::marker::PhantomData;
use std::ops::Deref;
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use super::current_user::CurrentUser;
use crate::domain::UserRole;
use crate::error::AppError;
use crate::logging::security;

pub trait RoleMarker {
    const ROLE: UserRole;
}

pub struct Customer;
pub struct RestaurantOwner;
pub struct Driver;
pub struct Admin;

impl RoleMarker for Customer {
    const ROLE: UserRole = UserRole::Customer;
}

impl RoleMarker for RestaurantOwner {
    const ROLE: UserRole = UserRole::RestaurantOwner;
}

impl RoleMarker for Driver {
    const ROLE: UserRole = UserRole::Driver;
}

impl RoleMarker for Admin {
    const ROLE: UserRole = UserRole::Admin;
}

/// A [`CurrentUser`] whose role is exactly `R::ROLE`.
#[derive(Debug)]
pub struct RequireRole<R> {
    user: CurrentUser,
    _role: PhantomData<R>,
}

impl<R> RequireRole<R> {
    pub fn into_inner(self) -> CurrentUser {
        self.user
    }
}

impl<R> Deref for RequireRole<R> {
    type Target = CurrentUser;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

pub(crate) fn check_role(user: &CurrentUser, required: UserRole) -> Result<(), AppError> {
    if user.role == required {
        return Ok(());
    }
    security::role_denied(user.id, required.as_str(), user.role.as_str());
    Err(AppError::insufficient_role(required.as_str()))
}

impl<R: RoleMarker + 'static> FromRequest for RequireRole<R> {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let user = CurrentUser::from_request(req, payload);

        Box::pin(async move {
            let user = user.await?;
            check_role(&user, R::ROLE)?;
            Ok(RequireRole {
                user,
                _role: PhantomData,
            })
        })
    }
}
