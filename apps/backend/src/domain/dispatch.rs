//! Vehicle distance limits and per-km driver earnings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::pricing::round_cents;
use crate::config::DispatchConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Bike,
    Car,
}

impl VehicleType {
    pub const ALL: [VehicleType; 2] = [Self::Bike, Self::Car];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bike => "bike",
            Self::Car => "car",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bike" => Ok(Self::Bike),
            "car" => Ok(Self::Car),
            other => Err(format!("unknown vehicle type '{other}'")),
        }
    }
}

pub fn vehicle_max_km(vehicle: VehicleType, config: &DispatchConfig) -> f64 {
    match vehicle {
        VehicleType::Bike => config.bike_max_km,
        VehicleType::Car => config.car_max_km,
    }
}

pub fn driver_eligible(vehicle: VehicleType, distance_km: f64, config: &DispatchConfig) -> bool {
    distance_km <= vehicle_max_km(vehicle, config)
}

/// Farthest distance any vehicle may serve.
pub fn max_delivery_km(config: &DispatchConfig) -> f64 {
    VehicleType::ALL
        .iter()
        .map(|v| vehicle_max_km(*v, config))
        .fold(0.0, f64::max)
}

pub fn driver_earning_cents(distance_km: f64, config: &DispatchConfig) -> i64 {
    round_cents(distance_km * config.driver_pay_per_km_cents as f64)
}
