//! Application settings read from the environment at startup.

use std::env;
use std::str::FromStr;

use crate::error::AppError;

/// Fee parameters for quotes and orders.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingConfig {
    pub service_fee_rate: f64,
    pub delivery_base_fee_cents: i64,
    pub delivery_per_km_fee_cents: i64,
}

/// Per-vehicle distance limits and per-km driver pay.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchConfig {
    pub bike_max_km: f64,
    pub car_max_km: f64,
    pub driver_pay_per_km_cents: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PayoutConfig {
    pub bonus_every_n_orders: u32,
    pub bonus_amount_cents: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub pricing: PricingConfig,
    pub dispatch: DispatchConfig,
    pub payout: PayoutConfig,
    pub commission_default_rate: f64,
    pub payment_enabled: bool,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            pricing: PricingConfig {
                service_fee_rate: 0.10,
                delivery_base_fee_cents: 200,
                delivery_per_km_fee_cents: 60,
            },
            dispatch: DispatchConfig {
                bike_max_km: 8.0,
                car_max_km: 15.0,
                driver_pay_per_km_cents: 15,
            },
            payout: PayoutConfig {
                bonus_every_n_orders: 25,
                bonus_amount_cents: 2500,
            },
            commission_default_rate: 0.12,
            payment_enabled: true,
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

/// Parse `key` if set, otherwise fall back to `default`.
///
/// A set but unparsable value is an error.
pub(crate) fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::config(format!("{key} has an invalid value '{raw}'"))),
        _ => Ok(default),
    }
}

fn parse_bool_env(key: &str, default: bool) -> Result<bool, AppError> {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "" => Ok(default),
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(AppError::config(format!("{key} must be a boolean, got '{raw}'"))),
        },
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let d = Self::default();

        let cors_allowed_origins = match env::var("CORS_ALLOWED_ORIGINS") {
            Ok(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => d.cors_allowed_origins,
        };

        let config = Self {
            host: env::var("BACKEND_HOST").unwrap_or(d.host),
            port: parse_env("BACKEND_PORT", d.port)?,
            pricing: PricingConfig {
                service_fee_rate: parse_env("SERVICE_FEE_RATE", d.pricing.service_fee_rate)?,
                delivery_base_fee_cents: parse_env(
                    "DELIVERY_BASE_FEE_CENTS",
                    d.pricing.delivery_base_fee_cents,
                )?,
                delivery_per_km_fee_cents: parse_env(
                    "DELIVERY_PER_KM_FEE_CENTS",
                    d.pricing.delivery_per_km_fee_cents,
                )?,
            },
            dispatch: DispatchConfig {
                bike_max_km: parse_env("BIKE_MAX_KM", d.dispatch.bike_max_km)?,
                car_max_km: parse_env("CAR_MAX_KM", d.dispatch.car_max_km)?,
                driver_pay_per_km_cents: parse_env(
                    "DRIVER_PAY_PER_KM_CENTS",
                    d.dispatch.driver_pay_per_km_cents,
                )?,
            },
            payout: PayoutConfig {
                bonus_every_n_orders: parse_env(
                    "BONUS_EVERY_N_ORDERS",
                    d.payout.bonus_every_n_orders,
                )?,
                bonus_amount_cents: parse_env("BONUS_AMOUNT_CENTS", d.payout.bonus_amount_cents)?,
            },
            commission_default_rate: parse_env(
                "COMMISSION_DEFAULT_RATE",
                d.commission_default_rate,
            )?,
            payment_enabled: parse_bool_env("PAYMENT_ENABLED", d.payment_enabled)?,
            cors_allowed_origins,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.payout.bonus_every_n_orders == 0 {
            return Err(AppError::config("BONUS_EVERY_N_ORDERS must be at least 1"));
        }
        if self.dispatch.bike_max_km <= 0.0 || self.dispatch.car_max_km <= 0.0 {
            return Err(AppError::config("vehicle distance limits must be positive"));
        }
        if !(0.0..=1.0).contains(&self.pricing.service_fee_rate)
            || !(0.0..=1.0).contains(&self.commission_default_rate)
        {
            return Err(AppError::config("rates must lie between 0 and 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    const KEYS: &[&str] = &[
        "BACKEND_PORT",
        "SERVICE_FEE_RATE",
        "BIKE_MAX_KM",
        "BONUS_EVERY_N_ORDERS",
        "PAYMENT_ENABLED",
        "CORS_ALLOWED_ORIGINS",
    ];

    fn clear() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn defaults_without_env() {
        clear();
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.payout.bonus_every_n_orders, 25);
        assert_eq!(config.dispatch.bike_max_km, 8.0);
    }

    #[test]
    #[serial]
    fn reads_overrides() {
        clear();
        env::set_var("BIKE_MAX_KM", "6.5");
        env::set_var("PAYMENT_ENABLED", "false");
        env::set_var("CORS_ALLOWED_ORIGINS", "https://a.test, https://b.test");

        let config = AppConfig::from_env().unwrap();
        clear();

        assert_eq!(config.dispatch.bike_max_km, 6.5);
        assert!(!config.payment_enabled);
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.test".to_string(), "https://b.test".to_string()]
        );
    }

    #[test]
    #[serial]
    fn invalid_number_is_config_error() {
        clear();
        env::set_var("BACKEND_PORT", "not-a-port");
        let err = AppConfig::from_env().unwrap_err();
        clear();
        assert!(matches!(err, AppError::Config { .. }));
    }

    #[test]
    #[serial]
    fn zero_bonus_block_rejected() {
        clear();
        env::set_var("BONUS_EVERY_N_ORDERS", "0");
        let err = AppConfig::from_env().unwrap_err();
        clear();
        assert!(matches!(err, AppError::Config { .. }));
    }
}
