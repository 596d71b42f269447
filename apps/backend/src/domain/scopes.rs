//! Staff roles narrowed to a city or a restaurant.
//!
//! A user's active grants fold into [`AccessScopes`], which answers "may this
//! caller see city X / restaurant Y" and produces the [`ScopeFilter`] that
//! listing queries apply. Platform admins (`users.role = admin`) and holders
//! of `super_admin` see everything.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::domain::{DomainError, ValidationKind};

pub const SUPER_ADMIN: &str = "super_admin";
pub const CITY_ADMIN: &str = "city_admin";
pub const SHIFT_LEAD: &str = "shift_lead";
pub const DISPATCHER: &str = "dispatcher";
pub const SUPPORT: &str = "support";
pub const RESTAURANT_ADMIN: &str = "restaurant_admin";

/// What a role's assignments are narrowed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScopeType {
    Global,
    City,
    Restaurant,
    #[serde(rename = "self")]
    SelfOnly,
}

impl ScopeType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::City => "city",
            Self::Restaurant => "restaurant",
            Self::SelfOnly => "self",
        }
    }
}

impl fmt::Display for ScopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScopeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(Self::Global),
            "city" => Ok(Self::City),
            "restaurant" => Ok(Self::Restaurant),
            "self" => Ok(Self::SelfOnly),
            other => Err(format!("unknown scope type '{other}'")),
        }
    }
}

/// One active grant: the role's code and scope type plus where it applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub role_code: String,
    pub scope_type: ScopeType,
    pub city_id: Option<i64>,
    pub restaurant_id: Option<i64>,
}

/// Cities and restaurants a listing is limited to. Rows match when they sit
/// in any of the cities or are any of the restaurants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeFilter {
    pub city_ids: Vec<i64>,
    pub restaurant_ids: Vec<i64>,
}

impl ScopeFilter {
    pub fn is_empty(&self) -> bool {
        self.city_ids.is_empty() && self.restaurant_ids.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct AccessScopes {
    pub user_id: i64,
    pub is_super_admin: bool,
    pub city_ids: BTreeSet<i64>,
    pub restaurant_ids: BTreeSet<i64>,
    pub role_codes: BTreeSet<String>,
}

impl AccessScopes {
    pub fn from_grants(user_id: i64, platform_admin: bool, grants: &[Grant]) -> Self {
        let mut scopes = Self {
            user_id,
            is_super_admin: platform_admin,
            ..Default::default()
        };
        for grant in grants {
            scopes.role_codes.insert(grant.role_code.clone());
            if grant.role_code == SUPER_ADMIN {
                scopes.is_super_admin = true;
                continue;
            }
            match (grant.scope_type, grant.city_id, grant.restaurant_id) {
                (ScopeType::City, Some(city_id), _) => {
                    scopes.city_ids.insert(city_id);
                }
                (ScopeType::Restaurant, _, Some(restaurant_id)) => {
                    scopes.restaurant_ids.insert(restaurant_id);
                }
                _ => {}
            }
        }
        scopes
    }

    pub fn has_role(&self, codes: &[&str]) -> bool {
        codes.iter().any(|code| self.role_codes.contains(*code))
    }

    pub fn has_city_scope(&self) -> bool {
        !self.city_ids.is_empty()
    }

    pub fn has_restaurant_scope(&self) -> bool {
        !self.restaurant_ids.is_empty()
    }

    /// Super admin, or holds at least one city or restaurant grant.
    pub fn is_staff(&self) -> bool {
        self.is_super_admin || self.has_city_scope() || self.has_restaurant_scope()
    }

    pub fn can_access_city(&self, city_id: i64) -> bool {
        self.is_super_admin || self.city_ids.contains(&city_id)
    }

    /// Reachable directly or through the restaurant's city.
    pub fn can_access_restaurant(&self, restaurant_id: i64, city_id: Option<i64>) -> bool {
        self.is_super_admin
            || self.restaurant_ids.contains(&restaurant_id)
            || city_id.is_some_and(|id| self.city_ids.contains(&id))
    }

    /// `None` for super admins, otherwise the caller's cities and restaurants.
    pub fn filter(&self) -> Option<ScopeFilter> {
        if self.is_super_admin {
            return None;
        }
        Some(ScopeFilter {
            city_ids: self.city_ids.iter().copied().collect(),
            restaurant_ids: self.restaurant_ids.iter().copied().collect(),
        })
    }

    /// City ids this caller may administer; `None` means all of them.
    pub fn city_filter(&self) -> Option<Vec<i64>> {
        (!self.is_super_admin).then(|| self.city_ids.iter().copied().collect())
    }

    /// Super admins assign anything. City admins assign city-scoped roles
    /// inside their own cities. Nobody else assigns.
    pub fn can_assign(&self, scope_type: ScopeType, city_id: Option<i64>) -> bool {
        if self.is_super_admin {
            return true;
        }
        self.has_role(&[CITY_ADMIN])
            && scope_type == ScopeType::City
            && city_id.is_some_and(|id| self.city_ids.contains(&id))
    }
}

/// City-scoped roles need a city and no restaurant, restaurant-scoped roles
/// the reverse, and global or self roles neither.
pub fn validate_assignment_shape(
    scope_type: ScopeType,
    city_id: Option<i64>,
    restaurant_id: Option<i64>,
) -> Result<(), DomainError> {
    let ok = match scope_type {
        ScopeType::City => city_id.is_some() && restaurant_id.is_none(),
        ScopeType::Restaurant => restaurant_id.is_some() && city_id.is_none(),
        ScopeType::Global | ScopeType::SelfOnly => city_id.is_none() && restaurant_id.is_none(),
    };
    if ok {
        return Ok(());
    }
    let expected = match scope_type {
        ScopeType::City => "a city_id",
        ScopeType::Restaurant => "a restaurant_id",
        ScopeType::Global | ScopeType::SelfOnly => "no city_id or restaurant_id",
    };
    Err(DomainError::validation(
        ValidationKind::InvalidRoleScope,
        format!("A {scope_type} role needs {expected}"),
    ))
}

/// Working-hour bounds for a shift lead's city.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftLimits {
    pub min_per_shift: i32,
    pub max_per_shift: i32,
    pub min_per_week: i32,
    pub max_per_week: i32,
}

impl Default for ShiftLimits {
    fn default() -> Self {
        Self {
            min_per_shift: 4,
            max_per_shift: 12,
            min_per_week: 20,
            max_per_week: 60,
        }
    }
}

impl ShiftLimits {
    pub fn validate(&self) -> Result<(), DomainError> {
        let invalid = |detail: &str| {
            Err(DomainError::validation(
                ValidationKind::InvalidShiftLimits,
                detail.to_string(),
            ))
        };
        if !(1..=24).contains(&self.min_per_shift) || !(1..=24).contains(&self.max_per_shift) {
            return invalid("Hours per shift must be between 1 and 24");
        }
        if !(1..=168).contains(&self.min_per_week) || !(1..=168).contains(&self.max_per_week) {
            return invalid("Hours per week must be between 1 and 168");
        }
        if self.min_per_shift > self.max_per_shift {
            return invalid("min_hours_per_shift exceeds max_hours_per_shift");
        }
        if self.min_per_week > self.max_per_week {
            return invalid("min_hours_per_week exceeds max_hours_per_week");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(code: &str, scope_type: ScopeType, city: Option<i64>, restaurant: Option<i64>) -> Grant {
        Grant {
            role_code: code.to_string(),
            scope_type,
            city_id: city,
            restaurant_id: restaurant,
        }
    }

    #[test]
    fn grants_fold_into_city_and_restaurant_sets() {
        let scopes = AccessScopes::from_grants(
            7,
            false,
            &[
                grant(CITY_ADMIN, ScopeType::City, Some(1), None),
                grant(DISPATCHER, ScopeType::City, Some(2), None),
                grant(RESTAURANT_ADMIN, ScopeType::Restaurant, None, Some(40)),
            ],
        );
        assert!(!scopes.is_super_admin);
        assert_eq!(scopes.city_ids.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert!(scopes.can_access_restaurant(40, None));
        assert!(scopes.can_access_restaurant(41, Some(2)));
        assert!(!scopes.can_access_restaurant(41, Some(3)));
        assert!(!scopes.can_access_city(3));
        assert!(scopes.has_role(&[SUPPORT, DISPATCHER]));
        assert_eq!(
            scopes.filter(),
            Some(ScopeFilter {
                city_ids: vec![1, 2],
                restaurant_ids: vec![40],
            })
        );
    }

    #[test]
    fn super_admin_is_unrestricted() {
        let by_grant = AccessScopes::from_grants(1, false, &[grant(SUPER_ADMIN, ScopeType::Global, None, None)]);
        let by_platform_role = AccessScopes::from_grants(1, true, &[]);
        for scopes in [by_grant, by_platform_role] {
            assert!(scopes.is_staff());
            assert!(scopes.can_access_city(99));
            assert_eq!(scopes.filter(), None);
            assert_eq!(scopes.city_filter(), None);
            assert!(scopes.can_assign(ScopeType::Global, None));
        }
    }

    #[test]
    fn customers_hold_no_staff_scope() {
        let scopes = AccessScopes::from_grants(3, false, &[]);
        assert!(!scopes.is_staff());
        assert_eq!(scopes.filter(), Some(ScopeFilter::default()));
        assert!(scopes.filter().is_some_and(|f| f.is_empty()));
    }

    #[test]
    fn city_admins_assign_city_roles_in_their_own_cities() {
        let scopes =
            AccessScopes::from_grants(5, false, &[grant(CITY_ADMIN, ScopeType::City, Some(1), None)]);
        assert!(scopes.can_assign(ScopeType::City, Some(1)));
        assert!(!scopes.can_assign(ScopeType::City, Some(2)));
        assert!(!scopes.can_assign(ScopeType::Restaurant, None));
        assert!(!scopes.can_assign(ScopeType::Global, None));

        let support =
            AccessScopes::from_grants(6, false, &[grant(SUPPORT, ScopeType::City, Some(1), None)]);
        assert!(!support.can_assign(ScopeType::City, Some(1)));
    }

    #[test]
    fn assignment_shape_matches_scope_type() {
        assert!(validate_assignment_shape(ScopeType::City, Some(1), None).is_ok());
        assert!(validate_assignment_shape(ScopeType::City, None, None).is_err());
        assert!(validate_assignment_shape(ScopeType::City, Some(1), Some(2)).is_err());
        assert!(validate_assignment_shape(ScopeType::Restaurant, None, Some(2)).is_ok());
        assert!(validate_assignment_shape(ScopeType::Global, None, None).is_ok());
        assert!(matches!(
            validate_assignment_shape(ScopeType::Global, Some(1), None),
            Err(DomainError::Validation(ValidationKind::InvalidRoleScope, _))
        ));
    }

    #[test]
    fn shift_limits_bounds() {
        assert!(ShiftLimits::default().validate().is_ok());
        let inverted = ShiftLimits {
            min_per_shift: 10,
            max_per_shift: 6,
            ..Default::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(DomainError::Validation(ValidationKind::InvalidShiftLimits, _))
        ));
        let week = ShiftLimits {
            max_per_week: 200,
            ..Default::default()
        };
        assert!(week.validate().is_err());
    }

    #[test]
    fn scope_type_strings() {
        for scope in [ScopeType::Global, ScopeType::City, ScopeType::Restaurant, ScopeType::SelfOnly] {
            assert_eq!(scope.as_str().parse::<ScopeType>(), Ok(scope));
            let json = serde_json::to_string(&scope).unwrap();
            assert_eq!(json, format!("\"{}\"", scope.as_str()));
        }
        assert!("planet".parse::<ScopeType>().is_err());
    }
}
